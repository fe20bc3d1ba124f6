use crate::{
    client_utils::HttpTransport, request_builder::require_path_segment, types::ListResponse,
    Character, VeniceResult,
};

/// The `characters` namespace.
pub struct Characters<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Characters<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self { transport }
    }

    /// List characters, optionally only the public ones.
    pub async fn list(&self, public_only: bool) -> VeniceResult<Vec<Character>> {
        let query = [("public_only", if public_only { "true" } else { "false" })];
        let response: ListResponse<Character> =
            self.transport.get_json("/characters", &query).await?;
        Ok(response.data)
    }

    pub async fn retrieve(&self, slug: &str) -> VeniceResult<Character> {
        require_path_segment("slug", slug)?;
        self.transport
            .get_json(&format!("/characters/{slug}"), &[])
            .await
    }
}
