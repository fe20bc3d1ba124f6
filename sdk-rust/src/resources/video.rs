use crate::{
    client_utils::HttpTransport,
    request_builder::{require_path_segment, RequestBody},
    VeniceResult, VideoGenerateRequest, VideoGenerateResponse,
};

/// The `video` namespace. Generation is asynchronous: `generate` queues a
/// job and `status` polls it.
pub struct Video<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Video<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn generate(
        &self,
        request: &VideoGenerateRequest,
    ) -> VeniceResult<VideoGenerateResponse> {
        self.transport
            .post_json("/video/generations", &request.to_body()?)
            .await
    }

    pub async fn status(&self, video_id: &str) -> VeniceResult<VideoGenerateResponse> {
        require_path_segment("video_id", video_id)?;
        self.transport
            .get_json(&format!("/video/generations/{video_id}"), &[])
            .await
    }
}
