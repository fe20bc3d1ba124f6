use crate::{ChatCompletion, ChatCompletionChunk, ChunkAccumulator, VeniceResult};
use futures::{stream::BoxStream, Stream, StreamExt};
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// A lazily consumed stream of chat completion chunks.
///
/// Nothing is read from the connection until the stream is polled. Dropping
/// it releases the connection.
pub struct ChatCompletionStream(BoxStream<'static, VeniceResult<ChatCompletionChunk>>);

impl ChatCompletionStream {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = VeniceResult<ChatCompletionChunk>> + Send + 'static,
    {
        Self(Box::pin(stream))
    }

    /// Drain the stream and fold it into a single completion.
    pub async fn collect_completion(mut self) -> VeniceResult<ChatCompletion> {
        let mut accumulator = ChunkAccumulator::new();
        while let Some(chunk) = self.0.next().await {
            accumulator.add_chunk(&chunk?);
        }
        Ok(accumulator.compute_completion())
    }
}

impl Stream for ChatCompletionStream {
    type Item = VeniceResult<ChatCompletionChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.0.as_mut().poll_next(cx)
    }
}
