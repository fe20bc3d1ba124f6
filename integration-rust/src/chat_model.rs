use crate::{
    AiMessage, AiMessageChunk, ChatMessage, IntegrationError, IntegrationResult, ToolCallChunk,
};
use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use serde::Serialize;
use venice_sdk::{
    ChatCompletionChunk, ChatCompletionRequest, FinishReason, Message, ReasoningEffort,
    StopSequence, Tool, Usage, Venice, VeniceParameters, WebSearchMode,
};

pub type ChatGenerationStream = BoxStream<'static, IntegrationResult<ChatGenerationChunk>>;

/// A chat model as seen by an application framework.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// A stable identifier of the adapter type.
    fn model_type(&self) -> &'static str;

    async fn generate(
        &self,
        messages: &[ChatMessage],
        stop: Option<&[String]>,
    ) -> IntegrationResult<ChatResult>;

    async fn stream(
        &self,
        messages: &[ChatMessage],
        stop: Option<&[String]>,
    ) -> IntegrationResult<ChatGenerationStream>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResult {
    pub generations: Vec<ChatGeneration>,
    pub llm_output: LlmOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatGeneration {
    pub message: AiMessage,
    pub generation_info: GenerationInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationInfo {
    pub finish_reason: Option<FinishReason>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmOutput {
    /// Zero when the response carried no usage.
    pub token_usage: Usage,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatGenerationChunk {
    pub message: AiMessageChunk,
    pub generation_info: GenerationInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VeniceChatModelOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub enable_web_search: Option<WebSearchMode>,
    pub enable_web_citations: bool,
    pub character_slug: Option<String>,
    /// Set to `false` to ask the API to leave out its own system prompt.
    pub include_venice_system_prompt: bool,
}

impl Default for VeniceChatModelOptions {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b".to_string(),
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            reasoning_effort: None,
            enable_web_search: None,
            enable_web_citations: false,
            character_slug: None,
            include_venice_system_prompt: true,
        }
    }
}

/// [`ChatModel`] backed by Venice chat completions.
#[derive(Debug, Clone)]
pub struct VeniceChatModel {
    client: Venice,
    options: VeniceChatModelOptions,
    tools: Vec<Tool>,
}

impl VeniceChatModel {
    #[must_use]
    pub fn new(client: Venice, options: VeniceChatModelOptions) -> Self {
        Self {
            client,
            options,
            tools: Vec::new(),
        }
    }

    pub fn options(&self) -> &VeniceChatModelOptions {
        &self.options
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// A copy of this model that offers the given tools on every call.
    #[must_use]
    pub fn bind_tools<I, T>(&self, tools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tool>,
    {
        Self {
            tools: tools.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    fn venice_parameters(&self) -> Option<VeniceParameters> {
        let parameters = VeniceParameters {
            enable_web_search: self.options.enable_web_search,
            enable_web_citations: self.options.enable_web_citations.then_some(true),
            character_slug: self.options.character_slug.clone(),
            include_venice_system_prompt: (!self.options.include_venice_system_prompt)
                .then_some(false),
            ..Default::default()
        };
        (parameters != VeniceParameters::default()).then_some(parameters)
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        stop: Option<&[String]>,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            temperature: Some(self.options.temperature),
            max_tokens: self.options.max_tokens,
            top_p: self.options.top_p,
            frequency_penalty: self.options.frequency_penalty,
            presence_penalty: self.options.presence_penalty,
            reasoning_effort: self.options.reasoning_effort,
            stop: stop
                .filter(|stop| !stop.is_empty())
                .map(|stop| StopSequence::Multiple(stop.to_vec())),
            tools: (!self.tools.is_empty())
                .then(|| self.tools.iter().cloned().map(Into::into).collect()),
            venice_parameters: self.venice_parameters().map(Into::into),
            ..ChatCompletionRequest::new(
                self.options.model.as_str(),
                messages.iter().map(Message::from),
            )
        }
    }
}

#[async_trait]
impl ChatModel for VeniceChatModel {
    fn model_type(&self) -> &'static str {
        "venice-chat"
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        stop: Option<&[String]>,
    ) -> IntegrationResult<ChatResult> {
        let request = self.build_request(messages, stop);
        let completion = self.client.chat().completions().create(&request).await?;

        if completion.choices.is_empty() {
            return Err(IntegrationError::Invariant(
                "Chat completion contained no choices".to_string(),
            ));
        }

        let generations = completion
            .choices
            .iter()
            .map(|choice| ChatGeneration {
                message: AiMessage::from(&choice.message),
                generation_info: GenerationInfo {
                    finish_reason: choice.finish_reason,
                    model: Some(completion.model.clone()),
                },
            })
            .collect();

        Ok(ChatResult {
            generations,
            llm_output: LlmOutput {
                token_usage: completion.usage.unwrap_or_default(),
                model: completion.model,
            },
        })
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        stop: Option<&[String]>,
    ) -> IntegrationResult<ChatGenerationStream> {
        let request = self.build_request(messages, stop);
        let stream = self.client.chat().completions().stream(&request).await?;

        Ok(stream
            .filter_map(|chunk| async move {
                match chunk {
                    Ok(chunk) => to_generation_chunk(&chunk).map(Ok),
                    Err(error) => Some(Err(IntegrationError::from(error))),
                }
            })
            .boxed())
    }
}

/// The first choice of a chunk as a generation chunk. Chunks without choices
/// (such as a trailing usage chunk) produce nothing.
fn to_generation_chunk(chunk: &ChatCompletionChunk) -> Option<ChatGenerationChunk> {
    let choice = chunk.choices.first()?;
    Some(ChatGenerationChunk {
        message: AiMessageChunk {
            content: choice.delta.content.clone().unwrap_or_default(),
            reasoning_content: choice.delta.reasoning_content.clone(),
            tool_call_chunks: choice
                .delta
                .tool_calls
                .iter()
                .flatten()
                .map(ToolCallChunk::from)
                .collect(),
        },
        generation_info: GenerationInfo {
            finish_reason: choice.finish_reason,
            model: (!chunk.model.is_empty()).then(|| chunk.model.clone()),
        },
    })
}
