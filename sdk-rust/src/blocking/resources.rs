use super::transport::{BlockingTransport, LineIter};
use crate::{
    opentelemetry::ChatSpan,
    request_builder::{require_path_segment, RequestBody},
    stream_utils::FrameIter,
    types::ListResponse,
    AudioSpeechResponse, AudioTranscription, ChatCompletion, ChatCompletionChunk,
    ChatCompletionRequest, Character, ChunkAccumulator, EmbeddingRequest, EmbeddingResponse,
    ImageEditRequest, ImageGenerateRequest, ImageGenerateResponse, ImageUpscaleRequest, Model,
    SpeechRequest, TranscriptionRequest, VeniceResult, VideoGenerateRequest,
    VideoGenerateResponse,
};

pub struct Chat<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn completions(&self) -> Completions<'a> {
        Completions {
            transport: self.transport,
        }
    }
}

pub struct Completions<'a> {
    transport: &'a BlockingTransport,
}

impl Completions<'_> {
    pub fn create(&self, request: &ChatCompletionRequest) -> VeniceResult<ChatCompletion> {
        let body = request.to_body(false)?;
        let mut span = ChatSpan::new("create", request);
        let result = span.in_scope(|| self.transport.post_json("/chat/completions", &body));
        match &result {
            Ok(response) => span.on_response(response),
            Err(error) => span.on_error(error),
        }
        result
    }

    /// Request a streamed chat completion. The status line is checked before
    /// this returns. Chunks are read as the iterator advances.
    pub fn stream(&self, request: &ChatCompletionRequest) -> VeniceResult<ChatCompletionChunks> {
        let body = request.to_body(true)?;
        let mut span = ChatSpan::new("stream", request);
        match span.in_scope(|| self.transport.post_lines("/chat/completions", &body)) {
            Ok(lines) => Ok(ChatCompletionChunks {
                frames: FrameIter::new(lines),
                span,
            }),
            Err(error) => {
                span.on_error(&error);
                Err(error)
            }
        }
    }
}

/// A lazily read stream of chunks. Dropping it closes the connection.
pub struct ChatCompletionChunks {
    frames: FrameIter<LineIter, ChatCompletionChunk>,
    span: ChatSpan,
}

impl ChatCompletionChunks {
    /// Read the rest of the stream and fold it into a single completion.
    pub fn collect_completion(self) -> VeniceResult<ChatCompletion> {
        let mut accumulator = ChunkAccumulator::new();
        for chunk in self {
            accumulator.add_chunk(&chunk?);
        }
        Ok(accumulator.compute_completion())
    }
}

impl Iterator for ChatCompletionChunks {
    type Item = VeniceResult<ChatCompletionChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.frames.next()?;
        match &item {
            Ok(chunk) => self.span.on_chunk(chunk),
            Err(error) => self.span.on_error(error),
        }
        Some(item)
    }
}

pub struct Images<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Images<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn generate(&self, request: &ImageGenerateRequest) -> VeniceResult<ImageGenerateResponse> {
        self.transport
            .post_json("/images/generations", &request.to_body()?)
    }

    pub fn edit(&self, request: &ImageEditRequest) -> VeniceResult<ImageGenerateResponse> {
        self.transport.post_json("/images/edits", &request.to_body()?)
    }

    pub fn upscale(&self, request: &ImageUpscaleRequest) -> VeniceResult<ImageGenerateResponse> {
        self.transport.post_json("/images/upscale", &request.to_body()?)
    }
}

pub struct Audio<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Audio<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn speech(&self) -> Speech<'a> {
        Speech {
            transport: self.transport,
        }
    }

    pub fn transcriptions(&self) -> Transcriptions<'a> {
        Transcriptions {
            transport: self.transport,
        }
    }
}

pub struct Speech<'a> {
    transport: &'a BlockingTransport,
}

impl Speech<'_> {
    pub fn create(&self, request: &SpeechRequest) -> VeniceResult<AudioSpeechResponse> {
        let audio = self
            .transport
            .post_bytes("/audio/speech", &request.to_body()?)?;
        Ok(AudioSpeechResponse::new(audio, request.output_format()))
    }
}

pub struct Transcriptions<'a> {
    transport: &'a BlockingTransport,
}

impl Transcriptions<'_> {
    pub fn create(&self, request: &TranscriptionRequest) -> VeniceResult<AudioTranscription> {
        self.transport
            .post_json("/audio/transcriptions", &request.to_body()?)
    }
}

pub struct Embeddings<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Embeddings<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn create(&self, request: &EmbeddingRequest) -> VeniceResult<EmbeddingResponse> {
        self.transport.post_json("/embeddings", &request.to_body()?)
    }
}

pub struct Models<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Models<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn list(&self) -> VeniceResult<Vec<Model>> {
        let response: ListResponse<Model> = self.transport.get_json("/models", &[])?;
        Ok(response.data)
    }

    pub fn retrieve(&self, model_id: &str) -> VeniceResult<Model> {
        require_path_segment("model_id", model_id)?;
        self.transport.get_json(&format!("/models/{model_id}"), &[])
    }
}

pub struct Characters<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Characters<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn list(&self, public_only: bool) -> VeniceResult<Vec<Character>> {
        let query = [("public_only", if public_only { "true" } else { "false" })];
        let response: ListResponse<Character> = self.transport.get_json("/characters", &query)?;
        Ok(response.data)
    }

    pub fn retrieve(&self, slug: &str) -> VeniceResult<Character> {
        require_path_segment("slug", slug)?;
        self.transport.get_json(&format!("/characters/{slug}"), &[])
    }
}

pub struct Video<'a> {
    transport: &'a BlockingTransport,
}

impl<'a> Video<'a> {
    pub(crate) fn new(transport: &'a BlockingTransport) -> Self {
        Self { transport }
    }

    pub fn generate(&self, request: &VideoGenerateRequest) -> VeniceResult<VideoGenerateResponse> {
        self.transport
            .post_json("/video/generations", &request.to_body()?)
    }

    pub fn status(&self, video_id: &str) -> VeniceResult<VideoGenerateResponse> {
        require_path_segment("video_id", video_id)?;
        self.transport
            .get_json(&format!("/video/generations/{video_id}"), &[])
    }
}
