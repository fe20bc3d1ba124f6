use crate::{
    client_utils::HttpTransport, request_builder::RequestBody, EmbeddingRequest,
    EmbeddingResponse, VeniceResult,
};

/// The `embeddings` namespace.
pub struct Embeddings<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Embeddings<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn create(&self, request: &EmbeddingRequest) -> VeniceResult<EmbeddingResponse> {
        self.transport
            .post_json("/embeddings", &request.to_body()?)
            .await
    }
}
