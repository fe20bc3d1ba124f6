use crate::{
    client_utils::HttpTransport,
    options::ResolvedOptions,
    resources::{Audio, Characters, Chat, Embeddings, Images, Models, Video},
    ClientOptions, VeniceResult,
};
use reqwest::Client;
use std::time::Duration;

/// The async Venice client.
///
/// Cheap to clone. Resource namespaces borrow the client and add no state of
/// their own, so a single client can be shared by many tasks.
///
/// ```no_run
/// # async fn run() -> venice_sdk::VeniceResult<()> {
/// use venice_sdk::{ChatCompletionRequest, ClientOptions, Message, Venice};
///
/// let client = Venice::new(ClientOptions::new("your-api-key"))?;
/// let completion = client
///     .chat()
///     .completions()
///     .create(&ChatCompletionRequest::new(
///         "llama-3.3-70b",
///         [Message::user("Hello!")],
///     ))
///     .await?;
/// println!("{}", completion.content().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Venice {
    transport: HttpTransport,
}

impl Venice {
    /// Create a client. Fails with `VeniceError::Configuration` when no API
    /// key is given and `VENICE_API_KEY` is unset.
    pub fn new(options: ClientOptions) -> VeniceResult<Self> {
        let resolved = ResolvedOptions::resolve(&options)?;
        let client = options.client.unwrap_or_else(Client::new);
        tracing::debug!(base_url = %resolved.base_url, "creating Venice client");

        Ok(Self {
            transport: HttpTransport::new(client, resolved),
        })
    }

    /// Create a client configured entirely from the environment.
    pub fn from_env() -> VeniceResult<Self> {
        Self::new(ClientOptions::default())
    }

    /// A client that shares this one's connection pool but applies another
    /// timeout to every call.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            transport: self.transport.with_timeout(timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.transport.options().base_url
    }

    pub fn timeout(&self) -> Duration {
        self.transport.options().timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.transport.options().max_retries
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat::new(&self.transport)
    }

    pub fn images(&self) -> Images<'_> {
        Images::new(&self.transport)
    }

    pub fn audio(&self) -> Audio<'_> {
        Audio::new(&self.transport)
    }

    pub fn embeddings(&self) -> Embeddings<'_> {
        Embeddings::new(&self.transport)
    }

    pub fn models(&self) -> Models<'_> {
        Models::new(&self.transport)
    }

    pub fn characters(&self) -> Characters<'_> {
        Characters::new(&self.transport)
    }

    pub fn video(&self) -> Video<'_> {
        Video::new(&self.transport)
    }
}

impl std::fmt::Debug for Venice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Venice")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout())
            .field("max_retries", &self.max_retries())
            .finish_non_exhaustive()
    }
}
