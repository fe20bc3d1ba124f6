//! Adapters exposing the Venice SDK through framework-style chat-model and
//! embeddings interfaces.

mod chat_model;
mod embeddings;
mod errors;
mod messages;

pub use chat_model::{
    ChatGeneration, ChatGenerationChunk, ChatGenerationStream, ChatModel, ChatResult,
    GenerationInfo, LlmOutput, VeniceChatModel, VeniceChatModelOptions,
};
pub use embeddings::{Embeddings, VeniceEmbeddings, VeniceEmbeddingsOptions};
pub use errors::{IntegrationError, IntegrationResult};
pub use messages::{AiMessage, AiMessageChunk, AiToolCall, ChatMessage, ToolCallChunk};
