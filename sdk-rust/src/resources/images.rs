use crate::{
    client_utils::HttpTransport, request_builder::RequestBody, ImageEditRequest,
    ImageGenerateRequest, ImageGenerateResponse, ImageUpscaleRequest, VeniceResult,
};

/// The `images` namespace.
pub struct Images<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Images<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn generate(
        &self,
        request: &ImageGenerateRequest,
    ) -> VeniceResult<ImageGenerateResponse> {
        self.transport
            .post_json("/images/generations", &request.to_body()?)
            .await
    }

    /// Edit an image following a prompt, optionally restricted by a mask.
    pub async fn edit(&self, request: &ImageEditRequest) -> VeniceResult<ImageGenerateResponse> {
        self.transport
            .post_json("/images/edits", &request.to_body()?)
            .await
    }

    pub async fn upscale(
        &self,
        request: &ImageUpscaleRequest,
    ) -> VeniceResult<ImageGenerateResponse> {
        self.transport
            .post_json("/images/upscale", &request.to_body()?)
            .await
    }
}
