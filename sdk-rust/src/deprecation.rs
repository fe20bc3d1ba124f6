use crate::errors::header_str;
use reqwest::header::HeaderMap;
use std::fmt;

pub const DEPRECATION_WARNING_HEADER: &str = "x-venice-model-deprecation-warning";
pub const DEPRECATION_DATE_HEADER: &str = "x-venice-model-deprecation-date";
pub const MODEL_ID_HEADER: &str = "x-venice-model-id";

/// An advisory that the model serving a request is deprecated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    /// The affected model, or "unknown" when the server did not say.
    pub model: String,
    /// The announced removal date, verbatim.
    pub date: Option<String>,
    /// The warning text sent by the server.
    pub warning: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model '{}' is deprecated", self.model)?;
        if let Some(date) = &self.date {
            write!(f, " and will be removed on {date}")?;
        }
        Ok(())
    }
}

impl DeprecationNotice {
    /// Read the advisory headers of a response. `None` unless the warning
    /// header is present and non-empty.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let warning = header_str(headers, DEPRECATION_WARNING_HEADER)
            .filter(|warning| !warning.trim().is_empty())?;

        Some(Self {
            model: header_str(headers, MODEL_ID_HEADER)
                .unwrap_or("unknown")
                .to_string(),
            date: header_str(headers, DEPRECATION_DATE_HEADER).map(str::to_string),
            warning: warning.to_string(),
        })
    }
}

/// Receives deprecation advisories. Called on the task or thread that made
/// the request; it must not block.
pub trait DeprecationObserver: Send + Sync {
    fn on_deprecation(&self, notice: &DeprecationNotice);
}

impl<F> DeprecationObserver for F
where
    F: Fn(&DeprecationNotice) + Send + Sync,
{
    fn on_deprecation(&self, notice: &DeprecationNotice) {
        self(notice);
    }
}

/// The default observer: one `tracing` warning per advisory.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeprecationObserver;

impl DeprecationObserver for TracingDeprecationObserver {
    fn on_deprecation(&self, notice: &DeprecationNotice) {
        tracing::warn!(
            model = %notice.model,
            date = notice.date.as_deref().unwrap_or_default(),
            warning = %notice.warning,
            "{notice}"
        );
    }
}

pub(crate) fn inspect_headers(headers: &HeaderMap, observer: &dyn DeprecationObserver) {
    if let Some(notice) = DeprecationNotice::from_headers(headers) {
        observer.on_deprecation(&notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::sync::Mutex;

    #[test]
    fn reads_advisory_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            DEPRECATION_WARNING_HEADER,
            HeaderValue::from_static("This model is deprecated"),
        );
        headers.insert(DEPRECATION_DATE_HEADER, HeaderValue::from_static("2025-06-01"));
        headers.insert(MODEL_ID_HEADER, HeaderValue::from_static("llama-3.1-405b"));

        let notice = DeprecationNotice::from_headers(&headers).unwrap();

        assert_eq!(notice.model, "llama-3.1-405b");
        assert_eq!(notice.date.as_deref(), Some("2025-06-01"));
        assert_eq!(
            notice.to_string(),
            "Model 'llama-3.1-405b' is deprecated and will be removed on 2025-06-01"
        );
    }

    #[test]
    fn ignores_responses_without_warning() {
        let mut headers = HeaderMap::new();
        headers.insert(MODEL_ID_HEADER, HeaderValue::from_static("llama-3.3-70b"));

        assert!(DeprecationNotice::from_headers(&headers).is_none());
    }

    #[test]
    fn notifies_closure_observers() {
        let mut headers = HeaderMap::new();
        headers.insert(DEPRECATION_WARNING_HEADER, HeaderValue::from_static("yes"));
        let seen = Mutex::new(Vec::new());
        let observer = |notice: &DeprecationNotice| seen.lock().unwrap().push(notice.clone());

        inspect_headers(&headers, &observer);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "unknown");
        assert_eq!(seen[0].date, None);
    }
}
