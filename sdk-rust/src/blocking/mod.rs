//! A blocking client with the same namespaces as [`crate::Venice`].
//!
//! Must not be created or used from within an async runtime.

mod resources;
mod transport;

pub use resources::{
    Audio, Characters, Chat, ChatCompletionChunks, Completions, Embeddings, Images, Models,
    Speech, Transcriptions, Video,
};

use crate::{options::ResolvedOptions, ClientOptions, VeniceError, VeniceResult};
use reqwest::blocking::Client;
use std::time::Duration;
use transport::BlockingTransport;

/// The blocking Venice client.
#[derive(Clone)]
pub struct Venice {
    transport: BlockingTransport,
}

impl Venice {
    pub fn new(options: ClientOptions) -> VeniceResult<Self> {
        let resolved = ResolvedOptions::resolve(&options)?;
        let client = Client::builder().build().map_err(|error| {
            VeniceError::Configuration(format!("Failed to build HTTP client: {error}"))
        })?;

        Ok(Self {
            transport: BlockingTransport::new(client, resolved),
        })
    }

    pub fn from_env() -> VeniceResult<Self> {
        Self::new(ClientOptions::default())
    }

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
        f.debug_struct("blocking::Venice")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout())
            .finish_non_exhaustive()
    }
}
