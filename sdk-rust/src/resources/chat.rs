use crate::{
    client_utils::HttpTransport, opentelemetry, stream_utils, ChatCompletion,
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionStream, VeniceResult,
};

const COMPLETIONS_PATH: &str = "/chat/completions";

/// The `chat` namespace.
pub struct Chat<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    pub fn completions(&self) -> Completions<'a> {
        Completions {
            transport: self.transport,
        }
    }
}

/// `/chat/completions`.
pub struct Completions<'a> {
    transport: &'a HttpTransport,
}

impl Completions<'_> {
    /// Request a complete chat completion.
    pub async fn create(&self, request: &ChatCompletionRequest) -> VeniceResult<ChatCompletion> {
        let body = request.to_body(false)?;
        opentelemetry::trace_create(request, || async move {
            self.transport.post_json(COMPLETIONS_PATH, &body).await
        })
        .await
    }

    /// Request a streamed chat completion.
    ///
    /// Errors in the status line are returned here, before any chunk is
    /// read. The returned stream yields chunks lazily and ends at the
    /// terminal sentinel.
    pub async fn stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> VeniceResult<ChatCompletionStream> {
        let body = request.to_body(true)?;
        opentelemetry::trace_stream(request, || async move {
            let lines = self.transport.post_lines(COMPLETIONS_PATH, &body).await?;
            Ok(ChatCompletionStream::from_stream(stream_utils::deframe::<
                _,
                ChatCompletionChunk,
            >(lines)))
        })
        .await
    }
}
