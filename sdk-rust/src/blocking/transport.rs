use crate::{
    client_utils::decode_json, deprecation, errors::error_from_status, options::ResolvedOptions,
    stream_utils, VeniceError, VeniceResult,
};
use reqwest::{
    blocking::{Client, Response},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    io::{BufRead, BufReader},
    time::Duration,
};

pub(crate) type LineIter = Box<dyn Iterator<Item = VeniceResult<String>> + Send>;

#[derive(Clone)]
pub(crate) struct BlockingTransport {
    client: Client,
    options: ResolvedOptions,
}

impl BlockingTransport {
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

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> VeniceResult<Response> {
        tracing::debug!(%method, path, "sending blocking request");

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

        let response = request.send()?;
        deprecation::inspect_headers(
            response.headers(),
            self.options.deprecation_observer.as_ref(),
        );

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let headers = response.headers().clone();
            let body = response.bytes()?;
            return Err(error_from_status(status.as_u16(), &headers, &body));
        }

        Ok(response)
    }

    pub fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> VeniceResult<R> {
        let response = self.send(Method::GET, path, None, query)?;
        decode_json(&response.bytes()?)
    }

    pub fn post_json<R: DeserializeOwned>(&self, path: &str, body: &Value) -> VeniceResult<R> {
        let response = self.send(Method::POST, path, Some(body), &[])?;
        decode_json(&response.bytes()?)
    }

    pub fn post_bytes(&self, path: &str, body: &Value) -> VeniceResult<Vec<u8>> {
        let response = self.send(Method::POST, path, Some(body), &[])?;
        Ok(response.bytes()?.to_vec())
    }

    /// Open a streaming request and return the body as lines, read from the
    /// connection one at a time.
    pub fn post_lines(&self, path: &str, body: &Value) -> VeniceResult<LineIter> {
        let response = self.send(Method::POST, path, Some(body), &[])?;
        Ok(Box::new(
            BufReader::new(response)
                .split(b'\n')
                .map(|line| line.map(stream_utils::decode_line).map_err(VeniceError::from)),
        ))
    }
}
