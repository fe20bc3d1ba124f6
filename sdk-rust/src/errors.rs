use reqwest::header::HeaderMap;
use serde_json::Value;
use std::{fmt, io};
use thiserror::Error;

const REQUEST_ID_HEADER: &str = "cf-ray";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Details of an error response returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetails {
    /// The HTTP status code.
    pub status: u16,
    /// The human-readable message decoded from the error body.
    pub message: String,
    /// The decoded error body, so callers can branch on server-defined error
    /// subtypes. `Value::Null` when the body was empty.
    pub body: Value,
    /// The request correlation id, when the response carried one.
    pub request_id: Option<String>,
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status={})", self.message, self.status)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " [request_id={request_id}]")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum VeniceError {
    /// The API rejected the credentials (HTTP 401).
    #[error("Authentication error: {0}")]
    Authentication(ApiErrorDetails),
    /// Too many requests (HTTP 429).
    #[error("Rate limit error: {details}")]
    RateLimit {
        details: ApiErrorDetails,
        /// Seconds to wait before retrying, from the `retry-after` header.
        retry_after: Option<u64>,
    },
    /// Any other non-success status code.
    #[error("API error: {0}")]
    Api(ApiErrorDetails),
    /// The transport gave up waiting for the server.
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// The transport could not reach the server.
    #[error("Connection failed: {0}")]
    Connection(String),
    /// The caller input is malformed. Raised before any network activity.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The client could not be configured (e.g. no API key).
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A transport failure that is neither a timeout nor a connection error.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// A successful response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type VeniceResult<T> = Result<T, VeniceError>;

impl VeniceError {
    /// The HTTP status code, for errors that originate from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_details().map(|details| details.status)
    }

    #[must_use]
    pub fn api_details(&self) -> Option<&ApiErrorDetails> {
        match self {
            Self::Authentication(details)
            | Self::RateLimit { details, .. }
            | Self::Api(details) => Some(details),
            _ => None,
        }
    }

    /// Whether a caller-side retry could reasonably succeed. The SDK never
    /// retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Timeout(_) | Self::Connection(_) => true,
            Self::Api(details) => details.status >= 500,
            _ => false,
        }
    }
}

/// Transport failures are classified here, once, for both the async and the
/// blocking client.
impl From<reqwest::Error> for VeniceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connection(error.to_string())
        } else {
            Self::Transport(error)
        }
    }
}

/// Line readers over a response body surface transport failures as
/// `io::Error`. Recover the original `reqwest::Error` when it is there.
impl From<io::Error> for VeniceError {
    fn from(error: io::Error) -> Self {
        let message = error.to_string();
        if error.kind() == io::ErrorKind::TimedOut {
            return Self::Timeout(message);
        }
        match error.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
            Some(Ok(reqwest_error)) => Self::from(*reqwest_error),
            _ => Self::Connection(message),
        }
    }
}

/// Map a non-success response into the matching error kind.
pub(crate) fn error_from_status(status: u16, headers: &HeaderMap, body: &[u8]) -> VeniceError {
    let body = decode_error_body(body);
    let details = ApiErrorDetails {
        status,
        message: error_message(&body),
        request_id: header_str(headers, REQUEST_ID_HEADER).map(str::to_string),
        body,
    };

    match status {
        401 => VeniceError::Authentication(details),
        429 => VeniceError::RateLimit {
            details,
            retry_after: header_str(headers, RETRY_AFTER_HEADER)
                .and_then(|value| value.trim().parse().ok()),
        },
        _ => VeniceError::Api(details),
    }
}

fn decode_error_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn error_message(body: &Value) -> String {
    let message = match body {
        Value::String(text) if !text.is_empty() => Some(text.as_str()),
        Value::Object(map) => match map.get("error") {
            Some(Value::String(text)) => Some(text.as_str()),
            Some(Value::Object(error)) => error.get("message").and_then(Value::as_str),
            _ => map.get("message").and_then(Value::as_str),
        },
        _ => None,
    };
    message.unwrap_or("Unknown error").to_string()
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
