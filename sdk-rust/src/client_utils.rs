use crate::{
    deprecation, errors::error_from_status, options::ResolvedOptions, stream_utils, VeniceError,
    VeniceResult,
};
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{io, time::Duration};
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

/// Performs HTTP calls for the async client. Status codes, transport failures
/// and advisory headers are all handled here, so callers only ever see typed
/// results.
#[derive(Clone)]
pub(crate) struct HttpTransport {
    client: Client,
    options: ResolvedOptions,
}

impl HttpTransport {
    pub fn new(client: Client, options: ResolvedOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut transport = self.clone();
        transport.options.timeout = timeout;
        transport
    }

    /// Send a request and return the response once its status is known to be
    /// a success.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> VeniceResult<Response> {
        tracing::debug!(%method, path, "sending request");

        let mut request = self
            .client
            .request(method, format!("{}{path}", self.options.base_url))
            .headers(self.options.headers.clone())
            .timeout(self.options.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        deprecation::inspect_headers(
            response.headers(),
            self.options.deprecation_observer.as_ref(),
        );

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            return Err(error_from_status(status.as_u16(), &headers, &body));
        }

        Ok(response)
    }

    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> VeniceResult<R> {
        let response = self.send(Method::GET, path, None, query).await?;
        decode_json(&response.bytes().await?)
    }

    pub async fn post_json<R: DeserializeOwned>(&self, path: &str, body: &Value) -> VeniceResult<R> {
        let response = self.send(Method::POST, path, Some(body), &[]).await?;
        decode_json(&response.bytes().await?)
    }

    pub async fn post_bytes(&self, path: &str, body: &Value) -> VeniceResult<Vec<u8>> {
        let response = self.send(Method::POST, path, Some(body), &[]).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Open a streaming request and return the body as lines. Fails before
    /// yielding anything when the status is not a success.
    pub async fn post_lines(
        &self,
        path: &str,
        body: &Value,
    ) -> VeniceResult<impl Stream<Item = VeniceResult<String>> + Send + 'static> {
        let response = self.send(Method::POST, path, Some(body), &[]).await?;

        let bytes = response.bytes_stream().map_err(io::Error::other).boxed();
        let mut lines = StreamReader::new(bytes).split(b'\n');

        Ok(async_stream::stream! {
            loop {
                match lines.next_segment().await {
                    Ok(Some(line)) => yield Ok(stream_utils::decode_line(line)),
                    Ok(None) => break,
                    Err(error) => {
                        yield Err(VeniceError::from(error));
                        break;
                    }
                }
            }
        }
        .boxed())
    }
}

pub(crate) fn decode_json<R: DeserializeOwned>(body: &[u8]) -> VeniceResult<R> {
    serde_json::from_slice(body)
        .map_err(|error| VeniceError::Decode(format!("Invalid response body: {error}")))
}
