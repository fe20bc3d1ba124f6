use crate::{
    AudioContent, AudioFormat, AudioSpeechResponse, AudioTranscription, ChatCompletion,
    ChatCompletionChunk, ContentPart, Embedding, EmbeddingResponse, EmbeddingVector,
    FunctionDefinition, ImageContent, ImageUrl, InputAudio, Message, MessageContent, Model, Role,
    TextContent, Tool, ToolCall, ToolCallFunction, Usage, VeniceError, VeniceResult, VideoContent,
    VideoUrl,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

impl Default for ChatCompletion {
    fn default() -> Self {
        Self {
            id: String::new(),
            object: "chat.completion".to_string(),
            created: 0,
            model: String::new(),
            choices: Vec::new(),
            usage: None,
            system_fingerprint: None,
        }
    }
}

impl ChatCompletion {
    /// The text content of the first choice, if any.
    ///
    /// Returns `None` when there are no choices, when the content is empty, or
    /// when it is a list of parts.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_text())
            .filter(|text| !text.is_empty())
    }

    /// The message of the first choice, if any.
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Tool calls requested in the first choice. Empty when there are none.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.message()
            .and_then(|message| message.tool_calls.as_deref())
            .unwrap_or_default()
    }
}

impl Default for ChatCompletionChunk {
    fn default() -> Self {
        Self {
            id: String::new(),
            object: "chat.completion.chunk".to_string(),
            created: 0,
            model: String::new(),
            choices: Vec::new(),
            usage: None,
            system_fingerprint: None,
        }
    }
}

impl ChatCompletionChunk {
    /// The content fragment of the first choice, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}

impl MessageContent {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Parts(_) => None,
        }
    }

    /// Concatenated text of the content, including text parts.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text(text) => Some(text.text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(value: Vec<ContentPart>) -> Self {
        Self::Parts(value)
    }
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn developer(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Developer, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// The result of a tool call, correlated by `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent {
            text: text.into(),
            cache_control: None,
        })
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl(ImageContent {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
            cache_control: None,
        })
    }

    /// An inline image, sent as a `data:` URL.
    pub fn image_base64(data: &str, media_type: &str) -> Self {
        Self::image_url(format!("data:{media_type};base64,{data}"))
    }

    pub fn input_audio(data: impl Into<String>, format: impl Into<String>) -> Self {
        Self::InputAudio(AudioContent {
            input_audio: InputAudio {
                data: data.into(),
                format: format.into(),
            },
        })
    }

    pub fn video_url(url: impl Into<String>) -> Self {
        Self::VideoUrl(VideoContent {
            video_url: VideoUrl { url: url.into() },
        })
    }
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
}

impl Tool {
    #[must_use]
    pub fn function(function: FunctionDefinition) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: Some(function),
        }
    }
}

impl From<FunctionDefinition> for Tool {
    fn from(value: FunctionDefinition) -> Self {
        Self::function(value)
    }
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: ToolCallFunction {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// Decode the JSON arguments. Empty arguments decode to an empty object.
    pub fn parse_arguments(&self) -> VeniceResult<Value> {
        let arguments = self.function.arguments.trim();
        if arguments.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(arguments).map_err(|error| {
            VeniceError::Decode(format!(
                "Invalid arguments for tool call {}: {error}",
                self.id
            ))
        })
    }
}

impl AudioSpeechResponse {
    #[must_use]
    pub fn new(audio: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            audio,
            content_type: format!("audio/{}", format.as_str()),
        }
    }
}

impl AudioFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Aiff => "aiff",
            Self::Aac => "aac",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Pcm => "pcm",
        }
    }
}

impl Default for AudioTranscription {
    fn default() -> Self {
        Self {
            text: String::new(),
            task: "transcribe".to_string(),
            language: None,
            duration: None,
            words: None,
            segments: None,
        }
    }
}

impl EmbeddingVector {
    /// The embedding as floats, decoding the base64 form when needed.
    pub fn to_vec(&self) -> VeniceResult<Vec<f32>> {
        match self {
            Self::Float(values) => Ok(values.clone()),
            Self::Base64(encoded) => {
                let bytes = STANDARD.decode(encoded).map_err(|error| {
                    VeniceError::Decode(format!("Invalid base64 embedding: {error}"))
                })?;
                if bytes.len() % 4 != 0 {
                    return Err(VeniceError::Decode(format!(
                        "Base64 embedding has {} bytes, not a multiple of 4",
                        bytes.len()
                    )));
                }
                Ok(bytes
                    .chunks_exact(4)
                    .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .collect())
            }
        }
    }
}

impl Default for Embedding {
    fn default() -> Self {
        Self {
            object: "embedding".to_string(),
            index: 0,
            embedding: EmbeddingVector::default(),
        }
    }
}

impl Default for EmbeddingResponse {
    fn default() -> Self {
        Self {
            object: "list".to_string(),
            data: Vec::new(),
            model: String::new(),
            usage: Usage::default(),
        }
    }
}

impl EmbeddingResponse {
    /// All vectors, ordered by their `index`.
    pub fn vectors(&self) -> VeniceResult<Vec<Vec<f32>>> {
        let mut data: Vec<&Embedding> = self.data.iter().collect();
        data.sort_by_key(|embedding| embedding.index);
        data.into_iter()
            .map(|embedding| embedding.embedding.to_vec())
            .collect()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: String::new(),
            object: "model".to_string(),
            created: 0,
            owned_by: String::new(),
            model_spec: None,
            traits: None,
        }
    }
}
