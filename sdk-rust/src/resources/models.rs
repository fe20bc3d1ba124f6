use crate::{
    client_utils::HttpTransport, request_builder::require_path_segment, types::ListResponse,
    Model, VeniceResult,
};

/// The `models` namespace.
pub struct Models<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Models<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    /// List the available models.
    pub async fn list(&self) -> VeniceResult<Vec<Model>> {
        let response: ListResponse<Model> = self.transport.get_json("/models", &[]).await?;
        Ok(response.data)
    }

    pub async fn retrieve(&self, model_id: &str) -> VeniceResult<Model> {
        require_path_segment("model_id", model_id)?;
        self.transport
            .get_json(&format!("/models/{model_id}"), &[])
            .await
    }
}
