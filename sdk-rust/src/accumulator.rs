use crate::{
    ChatCompletion, ChatCompletionChunk, Choice, FinishReason, Message, MessageContent, Role,
    ToolCall, ToolCallDelta, ToolCallFunction, Usage,
};
use std::collections::BTreeMap;

/// Internal representation of an accumulated tool call
#[derive(Debug, Clone, Default)]
struct AccumulatedToolCall {
    id: String,
    call_type: Option<String>,
    name: String,
    arguments: String,
}

/// Internal representation of an accumulated choice
#[derive(Debug, Clone, Default)]
struct AccumulatedChoice {
    role: Option<Role>,
    content: String,
    reasoning: String,
    tool_calls: BTreeMap<u32, AccumulatedToolCall>,
    finish_reason: Option<FinishReason>,
}

impl AccumulatedChoice {
    fn merge_tool_call(&mut self, delta: &ToolCallDelta) {
        let entry = self.tool_calls.entry(delta.index).or_default();
        if let Some(id) = &delta.id {
            entry.id.clone_from(id);
        }
        if delta.call_type.is_some() {
            entry.call_type.clone_from(&delta.call_type);
        }
        if let Some(function) = &delta.function {
            if let Some(name) = &function.name {
                entry.name.push_str(name);
            }
            if let Some(arguments) = &function.arguments {
                entry.arguments.push_str(arguments);
            }
        }
    }

    fn into_choice(self, index: u32) -> Choice {
        let tool_calls = self
            .tool_calls
            .into_values()
            .map(|call| ToolCall {
                id: call.id,
                call_type: call.call_type.unwrap_or_else(|| "function".to_string()),
                function: ToolCallFunction {
                    name: call.name,
                    arguments: call.arguments,
                },
            })
            .collect::<Vec<_>>();

        Choice {
            index,
            message: Message {
                role: self.role.unwrap_or(Role::Assistant),
                content: MessageContent::Text(self.content),
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                reasoning_content: (!self.reasoning.is_empty()).then_some(self.reasoning),
                ..Default::default()
            },
            finish_reason: self.finish_reason,
            logprobs: None,
        }
    }
}

/// Folds the chunks of a streamed chat completion into the completion the
/// non-streaming endpoint would have returned.
///
/// Content and reasoning are concatenated per choice, tool call fragments
/// are merged by their index, and the last non-empty metadata wins.
#[derive(Debug, Clone, Default)]
pub struct ChunkAccumulator {
    id: String,
    model: String,
    created: i64,
    system_fingerprint: Option<String>,
    choices: BTreeMap<u32, AccumulatedChoice>,
    usage: Option<Usage>,
}

impl ChunkAccumulator {
    /// Creates a new, empty `ChunkAccumulator`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chunk to the accumulator
    pub fn add_chunk(&mut self, chunk: &ChatCompletionChunk) {
        if !chunk.id.is_empty() {
            self.id.clone_from(&chunk.id);
        }
        if !chunk.model.is_empty() {
            self.model.clone_from(&chunk.model);
        }
        if chunk.created != 0 {
            self.created = chunk.created;
        }
        if chunk.system_fingerprint.is_some() {
            self.system_fingerprint.clone_from(&chunk.system_fingerprint);
        }
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }

        for choice in &chunk.choices {
            let accumulated = self.choices.entry(choice.index).or_default();
            let delta = &choice.delta;
            if delta.role.is_some() {
                accumulated.role = delta.role;
            }
            if let Some(content) = &delta.content {
                accumulated.content.push_str(content);
            }
            if let Some(reasoning) = &delta.reasoning_content {
                accumulated.reasoning.push_str(reasoning);
            }
            for tool_call in delta.tool_calls.iter().flatten() {
                accumulated.merge_tool_call(tool_call);
            }
            if choice.finish_reason.is_some() {
                accumulated.finish_reason = choice.finish_reason;
            }
        }
    }

    /// Whether no chunk carrying a choice has been added yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Builds the final completion, ordering choices by index
    #[must_use]
    pub fn compute_completion(self) -> ChatCompletion {
        ChatCompletion {
            id: self.id,
            created: self.created,
            model: self.model,
            choices: self
                .choices
                .into_iter()
                .map(|(index, choice)| choice.into_choice(index))
                .collect(),
            usage: self.usage,
            system_fingerprint: self.system_fingerprint,
            ..Default::default()
        }
    }

    /// Clears all accumulated data
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(value: serde_json::Value) -> ChatCompletionChunk {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn concatenates_content_per_choice() {
        let mut accumulator = ChunkAccumulator::new();
        accumulator.add_chunk(&chunk(json!({
            "id": "chatcmpl-1",
            "model": "llama-3.3-70b",
            "created": 1_700_000_000,
            "choices": [{ "index": 0, "delta": { "role": "assistant", "content": "Hel" } }]
        })));
        accumulator.add_chunk(&chunk(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "delta": { "content": "lo" }, "finish_reason": "stop" }]
        })));
        accumulator.add_chunk(&chunk(json!({
            "id": "chatcmpl-1",
            "choices": [],
            "usage": { "prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7 }
        })));

        let completion = accumulator.compute_completion();

        assert_eq!(completion.id, "chatcmpl-1");
        assert_eq!(completion.model, "llama-3.3-70b");
        assert_eq!(completion.created, 1_700_000_000);
        assert_eq!(completion.object, "chat.completion");
        assert_eq!(completion.content(), Some("Hello"));
        assert_eq!(completion.choices[0].finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.map(|usage| usage.total_tokens), Some(7));
    }

    #[test]
    fn merges_tool_call_fragments_by_index() {
        let mut accumulator = ChunkAccumulator::new();
        accumulator.add_chunk(&chunk(json!({
            "choices": [{ "index": 0, "delta": { "tool_calls": [
                { "index": 0, "id": "call_a", "type": "function",
                  "function": { "name": "get_weather", "arguments": "{\"ci" } },
                { "index": 1, "id": "call_b", "function": { "name": "get_time", "arguments": "" } }
            ] } }]
        })));
        accumulator.add_chunk(&chunk(json!({
            "choices": [{ "index": 0, "delta": { "tool_calls": [
                { "index": 0, "function": { "arguments": "ty\":\"Paris\"}" } },
                { "index": 1, "function": { "arguments": "{}" } }
            ] }, "finish_reason": "tool_calls" }]
        })));

        let completion = accumulator.compute_completion();
        let calls = completion.tool_calls();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].function.name, "get_weather");
        assert_eq!(
            calls[0].parse_arguments().unwrap(),
            json!({ "city": "Paris" })
        );
        assert_eq!(calls[1].id, "call_b");
        assert_eq!(calls[1].call_type, "function");
        assert_eq!(calls[1].function.arguments, "{}");
        assert_eq!(completion.content(), None);
    }

    #[test]
    fn keeps_parallel_choices_apart() {
        let mut accumulator = ChunkAccumulator::new();
        accumulator.add_chunk(&chunk(json!({
            "choices": [
                { "index": 1, "delta": { "content": "B" } },
                { "index": 0, "delta": { "content": "A", "reasoning_content": "think" } }
            ]
        })));

        let completion = accumulator.compute_completion();

        assert_eq!(completion.choices.len(), 2);
        assert_eq!(completion.choices[0].index, 0);
        assert_eq!(completion.choices[0].message.content.as_text(), Some("A"));
        assert_eq!(
            completion.choices[0].message.reasoning_content.as_deref(),
            Some("think")
        );
        assert_eq!(completion.choices[1].message.content.as_text(), Some("B"));
    }
}
