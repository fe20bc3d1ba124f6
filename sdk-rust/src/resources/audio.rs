use crate::{
    client_utils::HttpTransport, request_builder::RequestBody, AudioSpeechResponse,
    AudioTranscription, SpeechRequest, TranscriptionRequest, VeniceResult,
};

/// The `audio` namespace.
pub struct Audio<'a> {
    transport: &'a HttpTransport,
}

impl<'a> Audio<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
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

/// `/audio/speech`.
pub struct Speech<'a> {
    transport: &'a HttpTransport,
}

impl Speech<'_> {
    /// Synthesize speech. The body of the response is returned untouched,
    /// labelled with the requested format.
    pub async fn create(&self, request: &SpeechRequest) -> VeniceResult<AudioSpeechResponse> {
        let audio = self
            .transport
            .post_bytes("/audio/speech", &request.to_body()?)
            .await?;
        Ok(AudioSpeechResponse::new(audio, request.output_format()))
    }
}

/// `/audio/transcriptions`.
pub struct Transcriptions<'a> {
    transport: &'a HttpTransport,
}

impl Transcriptions<'_> {
    pub async fn create(
        &self,
        request: &TranscriptionRequest,
    ) -> VeniceResult<AudioTranscription> {
        self.transport
            .post_json("/audio/transcriptions", &request.to_body()?)
            .await
    }
}
