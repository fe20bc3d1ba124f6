use crate::{
    AudioFormat, FunctionDefinition, Message, ReasoningEffort, Tool, VeniceError, VeniceResult,
    WebSearchMode,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const DEFAULT_IMAGE_MODEL: &str = "fluently-xl";
pub const DEFAULT_UPSCALE_MODEL: &str = "real-esrgan-4x";
pub const DEFAULT_SPEECH_MODEL: &str = "kokoro";
pub const DEFAULT_SPEECH_VOICE: &str = "af_bella";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_VIDEO_MODEL: &str = "kling-1.5-pro";

/// A request-side value: either a typed entity or a plain JSON object that is
/// sent as is.
#[derive(Debug, Clone, PartialEq)]
pub enum Param<T> {
    Typed(T),
    Raw(Map<String, Value>),
}

impl<T> Param<T> {
    /// Wrap a plain JSON value. Fails unless the value is an object.
    pub fn raw(value: Value) -> VeniceResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::Raw(map)),
            other => Err(VeniceError::Validation(format!(
                "Expected a JSON object, got {other}"
            ))),
        }
    }
}

impl<T> From<Map<String, Value>> for Param<T> {
    fn from(value: Map<String, Value>) -> Self {
        Self::Raw(value)
    }
}

impl From<Message> for Param<Message> {
    fn from(value: Message) -> Self {
        Self::Typed(value)
    }
}

impl From<Tool> for Param<Tool> {
    fn from(value: Tool) -> Self {
        Self::Typed(value)
    }
}

impl From<FunctionDefinition> for Param<Tool> {
    fn from(value: FunctionDefinition) -> Self {
        Self::Typed(Tool::function(value))
    }
}

impl From<VeniceParameters> for Param<VeniceParameters> {
    fn from(value: VeniceParameters) -> Self {
        Self::Typed(value)
    }
}

/// Venice-specific parameters, sent as the `venice_parameters` extension bag.
/// Only the keys that are set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VeniceParameters {
    /// Chat with a public character instead of the bare model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_slug: Option<String>,
    /// Remove `<think>` blocks from the response of reasoning models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_thinking_response: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_thinking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_web_search: Option<WebSearchMode>,
    /// Scrape URLs found in the user message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_web_scraping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_web_citations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_search_results_in_stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_search_results_as_documents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_venice_system_prompt: Option<bool>,
    /// Keys this SDK does not know yet.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One stop sequence or several.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StopSequence {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for StopSequence {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for StopSequence {
    fn from(value: Vec<String>) -> Self {
        Self::Multiple(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    Auto,
    None,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedToolChoice {
    #[serde(rename = "type")]
    pub choice_type: String,
    pub function: NamedFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedFunction {
    pub name: String,
}

/// How the model should choose among the tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    /// Force a call to the named function.
    Function(NamedToolChoice),
    Raw(Value),
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(NamedToolChoice {
            choice_type: "function".to_string(),
            function: NamedFunction { name: name.into() },
        })
    }
}

impl From<ToolChoiceMode> for ToolChoice {
    fn from(value: ToolChoiceMode) -> Self {
        Self::Mode(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// The format the model must output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamOptions {
    /// Emit a final chunk carrying token usage.
    pub include_usage: bool,
}

/// Parameters of a chat completion.
///
/// Every `Option` left as `None` is omitted from the request body. `Some`
/// values are always sent, including `Some(false)` and `Some(0.0)`.
///
/// `enable_web_search` and `character_slug` are shorthands for the matching
/// `venice_parameters` keys and take precedence over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Param<Message>>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_completion_tokens: Option<u32>,
    pub stop: Option<StopSequence>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<i64>,
    /// Number of parallel completions.
    pub n: Option<u32>,
    pub logprobs: Option<bool>,
    pub top_logprobs: Option<u32>,
    pub tools: Option<Vec<Param<Tool>>>,
    pub tool_choice: Option<ToolChoice>,
    pub parallel_tool_calls: Option<bool>,
    pub response_format: Option<ResponseFormat>,
    pub venice_parameters: Option<Param<VeniceParameters>>,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub prompt_cache_key: Option<String>,
    /// Only sent with streaming requests.
    pub stream_options: Option<StreamOptions>,
    pub enable_web_search: Option<WebSearchMode>,
    pub character_slug: Option<String>,
}

impl ChatCompletionRequest {
    pub fn new<I, M>(model: impl Into<String>, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Param<Message>>,
    {
        Self {
            model: model.into(),
            messages: messages.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerateRequest {
    pub prompt: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// E.g. "1024x1024".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_mode: Option<bool>,
}

impl ImageGenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            n: None,
            size: None,
            quality: None,
            style: None,
            response_format: None,
            negative_prompt: None,
            cfg_scale: None,
            steps: None,
            seed: None,
            safe_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageEditRequest {
    /// Base64 data or a URL.
    pub image: String,
    pub prompt: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ImageEditRequest {
    pub fn new(image: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            prompt: prompt.into(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            mask: None,
            n: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUpscaleRequest {
    /// Base64 data or a URL.
    pub image: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl ImageUpscaleRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            model: DEFAULT_UPSCALE_MODEL.to_string(),
            scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub input: String,
    pub model: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<AudioFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl SpeechRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: DEFAULT_SPEECH_VOICE.to_string(),
            response_format: None,
            speed: None,
        }
    }

    /// The format the server will answer with.
    #[must_use]
    pub fn output_format(&self) -> AudioFormat {
        self.response_format.unwrap_or_default()
    }
}

/// Audio transcription. The file travels base64-encoded in the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionRequest {
    #[serde(serialize_with = "serialize_base64")]
    pub file: Vec<u8>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// "word" and/or "segment".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_granularities: Option<Vec<String>>,
}

impl TranscriptionRequest {
    pub fn new(file: impl Into<Vec<u8>>) -> Self {
        Self {
            file: file.into(),
            model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            language: None,
            prompt: None,
            response_format: None,
            temperature: None,
            timestamp_granularities: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl From<&str> for EmbeddingInput {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(value: Vec<String>) -> Self {
        Self::Batch(value)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(value: Vec<&str>) -> Self {
        Self::Batch(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    Float,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub input: EmbeddingInput,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<EncodingFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl EmbeddingRequest {
    pub fn new(input: impl Into<EmbeddingInput>) -> Self {
        Self {
            input: input.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            encoding_format: None,
            dimensions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoGenerateRequest {
    pub prompt: String,
    pub model: String,
    /// Length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// E.g. "16:9".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Source image for image-to-video, as base64 data or a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl VideoGenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: DEFAULT_VIDEO_MODEL.to_string(),
            duration: None,
            aspect_ratio: None,
            image: None,
        }
    }
}

fn serialize_base64<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use base64::{engine::general_purpose::STANDARD, Engine};
    serializer.serialize_str(&STANDARD.encode(bytes))
}
