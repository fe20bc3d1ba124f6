use serde::{Deserialize, Serialize};
use serde_json::Value;
use venice_sdk::{Message, MessageContent, Role, ToolCall, ToolCallDelta};

/// A framework-side chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatMessage {
    System { content: String },
    Human { content: MessageContent },
    Ai(AiMessage),
    Tool { tool_call_id: String, content: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<MessageContent>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::Ai(AiMessage {
            content: content.into(),
            ..Default::default()
        })
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// A message produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<AiToolCall>,
    /// Hidden reasoning, when the model emitted any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiToolCall {
    pub id: String,
    pub name: String,
    /// Decoded arguments. Arguments that are not valid JSON are kept as a
    /// string.
    pub args: Value,
}

/// The incremental part of a streamed model message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMessageChunk {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_chunks: Vec<ToolCallChunk>,
}

/// A fragment of a tool call. Fragments sharing an `index` form one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallChunk {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub args: Option<String>,
}

impl From<&ChatMessage> for Message {
    fn from(message: &ChatMessage) -> Self {
        match message {
            ChatMessage::System { content } => Self::system(content.as_str()),
            ChatMessage::Human { content } => Self::user(content.clone()),
            ChatMessage::Ai(ai) => {
                let message = Self::assistant(ai.content.as_str());
                if ai.tool_calls.is_empty() {
                    message
                } else {
                    message.with_tool_calls(ai.tool_calls.iter().map(ToolCall::from).collect())
                }
            }
            ChatMessage::Tool {
                tool_call_id,
                content,
            } => Self::tool(tool_call_id.as_str(), content.as_str()),
        }
    }
}

impl From<&AiToolCall> for ToolCall {
    fn from(call: &AiToolCall) -> Self {
        let arguments = match &call.args {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        };
        Self::new(call.id.as_str(), call.name.as_str(), arguments)
    }
}

impl From<&ToolCall> for AiToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            name: call.function.name.clone(),
            args: call
                .parse_arguments()
                .unwrap_or_else(|_| Value::String(call.function.arguments.clone())),
        }
    }
}

impl From<&Message> for AiMessage {
    fn from(message: &Message) -> Self {
        if message.role != Role::Assistant {
            tracing::debug!(role = ?message.role, "converting a non-assistant message");
        }
        Self {
            content: message.content.to_text(),
            tool_calls: message
                .tool_calls
                .iter()
                .flatten()
                .map(AiToolCall::from)
                .collect(),
            reasoning_content: message.reasoning_content.clone(),
        }
    }
}

impl From<&ToolCallDelta> for ToolCallChunk {
    fn from(delta: &ToolCallDelta) -> Self {
        let function = delta.function.as_ref();
        Self {
            index: delta.index,
            id: delta.id.clone(),
            name: function.and_then(|function| function.name.clone()),
            args: function.and_then(|function| function.arguments.clone()),
        }
    }
}
