//! De-framing of `text/event-stream` chat responses.
//!
//! The body is a sequence of lines. A line starting with `data: ` carries one
//! JSON frame, and `data: [DONE]` ends the stream. Every other line (blank
//! lines, `:` comments, `event:` fields) is ignored. A frame that does not
//! decode is skipped so that one bad frame cannot break the rest of the
//! stream.

use crate::VeniceResult;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Decode one raw line. Bytes that are not valid UTF-8 are replaced rather
/// than failing the stream, so the frame is decided on by [`parse_frame`].
pub fn decode_line(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|error| {
        tracing::debug!("stream line is not valid UTF-8");
        String::from_utf8_lossy(error.as_bytes()).into_owned()
    })
}

/// What a single line of the stream means.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<T> {
    Chunk(T),
    /// The terminal sentinel. Nothing after it is read.
    Done,
    /// A keep-alive, comment or malformed line.
    Skip,
}

/// Interpret one line of the stream.
pub fn parse_frame<T: DeserializeOwned>(line: &str) -> Frame<T> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Frame::Skip;
    };
    if payload == DONE_SENTINEL {
        return Frame::Done;
    }
    match serde_json::from_str(payload) {
        Ok(chunk) => Frame::Chunk(chunk),
        Err(error) => {
            tracing::debug!(%error, "skipping malformed stream frame");
            Frame::Skip
        }
    }
}

/// Lazily turn a stream of lines into a stream of chunks.
///
/// One line is pulled per poll at most, the stream ends on the sentinel or
/// when the lines run out, and an error from the line source is yielded once
/// before the stream ends.
pub fn deframe<S, T>(lines: S) -> impl Stream<Item = VeniceResult<T>> + Send
where
    S: Stream<Item = VeniceResult<String>> + Send,
    T: DeserializeOwned + Send,
{
    async_stream::stream! {
        futures::pin_mut!(lines);
        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => match parse_frame::<T>(&line) {
                    Frame::Chunk(chunk) => yield Ok(chunk),
                    Frame::Done => break,
                    Frame::Skip => {}
                },
                Err(error) => {
                    yield Err(error);
                    break;
                }
            }
        }
    }
}

/// The blocking counterpart of [`deframe`]: an iterator of chunks over an
/// iterator of lines.
pub struct FrameIter<I, T> {
    lines: I,
    finished: bool,
    _chunk: PhantomData<fn() -> T>,
}

impl<I, T> FrameIter<I, T> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            finished: false,
            _chunk: PhantomData,
        }
    }
}

impl<I, T> Iterator for FrameIter<I, T>
where
    I: Iterator<Item = VeniceResult<String>>,
    T: DeserializeOwned,
{
    type Item = VeniceResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for line in self.lines.by_ref() {
            match line {
                Ok(line) => match parse_frame::<T>(&line) {
                    Frame::Chunk(chunk) => return Some(Ok(chunk)),
                    Frame::Done => break,
                    Frame::Skip => {}
                },
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
        self.finished = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChatCompletionChunk, VeniceError};
    use futures::{executor::block_on, stream, TryStreamExt};
    use std::{cell::Cell, rc::Rc};

    fn lines(raw: &[&str]) -> Vec<VeniceResult<String>> {
        raw.iter().map(|line| Ok((*line).to_string())).collect()
    }

    #[test]
    fn classifies_lines() {
        assert_eq!(parse_frame::<serde_json::Value>("data: [DONE]"), Frame::Done);
        assert_eq!(parse_frame::<serde_json::Value>(""), Frame::Skip);
        assert_eq!(parse_frame::<serde_json::Value>(": ping"), Frame::Skip);
        assert_eq!(parse_frame::<serde_json::Value>("event: message"), Frame::Skip);
        assert_eq!(parse_frame::<serde_json::Value>("data:{}"), Frame::Skip);
        assert_eq!(
            parse_frame::<serde_json::Value>("data: {\"a\":1}\r"),
            Frame::Chunk(serde_json::json!({ "a": 1 }))
        );
    }

    #[test]
    fn stops_at_the_sentinel_without_reading_further() {
        let consumed = Rc::new(Cell::new(0));
        let source = lines(&[
            r#"data: {"id":"1","choices":[{"index":0,"delta":{"content":"Hi"}}]}"#,
            "data: [DONE]",
            r#"data: {"id":"2"}"#,
        ]);
        let counter = consumed.clone();
        let source = source.into_iter().inspect(move |_| counter.set(counter.get() + 1));

        let chunks = FrameIter::<_, ChatCompletionChunk>::new(source)
            .collect::<VeniceResult<Vec<_>>>()
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "1");
        assert_eq!(chunks[0].choices.len(), 1);
        assert_eq!(chunks[0].choices[0].delta.content.as_deref(), Some("Hi"));
        assert_eq!(consumed.get(), 2);
    }

    #[test]
    fn skips_malformed_frames() {
        let chunks = FrameIter::<_, ChatCompletionChunk>::new(
            lines(&["data: {not valid json}", r#"data: {"id":"1","choices":[]}"#]).into_iter(),
        )
        .collect::<VeniceResult<Vec<_>>>()
        .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "1");
        assert!(chunks[0].choices.is_empty());
    }

    #[test]
    fn ends_when_lines_run_out() {
        let mut iter = FrameIter::<_, ChatCompletionChunk>::new(
            lines(&[": keep-alive", r#"data: {"id":"1"}"#]).into_iter(),
        );

        assert_eq!(iter.next().unwrap().unwrap().id, "1");
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn surfaces_source_errors_once() {
        let source = vec![
            Ok(r#"data: {"id":"1"}"#.to_string()),
            Err(VeniceError::Connection("reset".to_string())),
            Ok(r#"data: {"id":"2"}"#.to_string()),
        ];
        let mut iter = FrameIter::<_, ChatCompletionChunk>::new(source.into_iter());

        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next(), Some(Err(VeniceError::Connection(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn deframes_async_streams() {
        let source = stream::iter(lines(&[
            "data: {not valid json}",
            r#"data: {"id":"1","choices":[{"index":0,"delta":{"content":"Hi"}}]}"#,
            "",
            "data: [DONE]",
            r#"data: {"id":"2"}"#,
        ]));

        let chunks: Vec<ChatCompletionChunk> =
            block_on(deframe(source).try_collect()).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content(), Some("Hi"));
    }

    #[test]
    fn replaces_invalid_utf8_in_lines() {
        assert_eq!(decode_line(b"data: [DONE]".to_vec()), "data: [DONE]");

        let line = decode_line(b"data: {\"id\":\"1\",\"model\":\"\xff\xfe\"}".to_vec());
        let Frame::Chunk(chunk) = parse_frame::<ChatCompletionChunk>(&line) else {
            panic!("expected a chunk");
        };
        assert_eq!(chunk.id, "1");
        assert_eq!(chunk.model, "\u{fffd}\u{fffd}");
    }

    #[test]
    fn keeps_chunks_with_null_metadata() {
        let chunks = FrameIter::<_, ChatCompletionChunk>::new(
            lines(&[
                r#"data: {"id":"1","model":null,"created":null,"choices":[{"index":0,"delta":{"content":"Hi"}}]}"#,
                "data: [DONE]",
            ])
            .into_iter(),
        )
        .collect::<VeniceResult<Vec<_>>>()
        .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].model, "");
        assert_eq!(chunks[0].content(), Some("Hi"));
    }
}
