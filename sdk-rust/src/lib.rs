//! A typed client for the Venice AI inference API.
//!
//! [`Venice`] is the async entry point. Enable the `blocking` feature (on by
//! default) for [`blocking::Venice`].

mod accumulator;
#[cfg(feature = "blocking")]
pub mod blocking;
mod boxed_stream;
mod client;
mod client_utils;
mod deprecation;
mod errors;
pub mod opentelemetry;
mod options;
mod params;
mod request_builder;
pub mod resources;
mod stream_utils;
mod types;
mod types_ext;

pub use accumulator::ChunkAccumulator;
pub use boxed_stream::ChatCompletionStream;
pub use client::Venice;
pub use deprecation::{
    DeprecationNotice, DeprecationObserver, TracingDeprecationObserver, DEPRECATION_DATE_HEADER,
    DEPRECATION_WARNING_HEADER, MODEL_ID_HEADER,
};
pub use errors::*;
pub use options::{
    ClientOptions, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT,
};
pub use params::*;
pub use request_builder::RequestBody;
pub use types::*;

/// Line-level de-framing of streamed responses.
pub mod stream {
    pub use crate::stream_utils::{
        decode_line, deframe, parse_frame, Frame, FrameIter, DATA_PREFIX, DONE_SENTINEL,
    };
}
