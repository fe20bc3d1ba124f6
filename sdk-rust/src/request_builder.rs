//! Assembles request bodies. Pure functions: no I/O happens here, and every
//! contract violation is reported as `VeniceError::Validation` before the
//! transport is touched.

use crate::{
    ChatCompletionRequest, EmbeddingInput, EmbeddingRequest, ImageEditRequest,
    ImageGenerateRequest, ImageUpscaleRequest, Param, SpeechRequest, TranscriptionRequest,
    VeniceError, VeniceResult, VideoGenerateRequest,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// A request type that validates itself and serializes to a JSON body.
pub trait RequestBody: Serialize {
    fn validate(&self) -> VeniceResult<()>;

    fn to_body(&self) -> VeniceResult<Value> {
        self.validate()?;
        serde_json::to_value(self).map_err(|error| {
            VeniceError::Validation(format!("Request is not serializable: {error}"))
        })
    }
}

impl<T: Serialize> Param<T> {
    /// Flatten to a plain JSON object.
    pub fn to_object(&self) -> VeniceResult<Map<String, Value>> {
        match self {
            Self::Raw(map) => Ok(map.clone()),
            Self::Typed(value) => match serde_json::to_value(value) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(VeniceError::Validation(format!(
                    "Expected an object, serialized to {other}"
                ))),
                Err(error) => Err(VeniceError::Validation(format!(
                    "Value is not serializable: {error}"
                ))),
            },
        }
    }
}

impl ChatCompletionRequest {
    /// Build the JSON body of `/chat/completions`.
    pub fn to_body(&self, stream: bool) -> VeniceResult<Value> {
        require_non_empty("model", &self.model)?;
        if self.messages.is_empty() {
            return Err(VeniceError::Validation(
                "messages must contain at least one message".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert("model".to_string(), Value::String(self.model.clone()));

        let messages = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                let message = message.to_object()?;
                match message.get("role") {
                    Some(Value::String(role)) if !role.is_empty() => Ok(Value::Object(message)),
                    Some(_) => Err(VeniceError::Validation(format!(
                        "messages[{index}].role must be a non-empty string"
                    ))),
                    None => Err(VeniceError::Validation(format!(
                        "messages[{index}] is missing a role"
                    ))),
                }
            })
            .collect::<VeniceResult<Vec<_>>>()?;
        body.insert("messages".to_string(), Value::Array(messages));

        insert_opt(&mut body, "temperature", self.temperature.as_ref())?;
        insert_opt(&mut body, "top_p", self.top_p.as_ref())?;
        insert_opt(&mut body, "max_tokens", self.max_tokens.as_ref())?;
        insert_opt(
            &mut body,
            "max_completion_tokens",
            self.max_completion_tokens.as_ref(),
        )?;
        insert_opt(&mut body, "stop", self.stop.as_ref())?;
        insert_opt(&mut body, "frequency_penalty", self.frequency_penalty.as_ref())?;
        insert_opt(&mut body, "presence_penalty", self.presence_penalty.as_ref())?;
        insert_opt(&mut body, "seed", self.seed.as_ref())?;
        insert_opt(&mut body, "n", self.n.as_ref())?;
        insert_opt(&mut body, "logprobs", self.logprobs.as_ref())?;
        insert_opt(&mut body, "top_logprobs", self.top_logprobs.as_ref())?;
        insert_opt(&mut body, "response_format", self.response_format.as_ref())?;
        insert_opt(&mut body, "prompt_cache_key", self.prompt_cache_key.as_ref())?;
        insert_opt(&mut body, "reasoning_effort", self.reasoning_effort.as_ref())?;

        if let Some(tools) = &self.tools {
            let tools = tools
                .iter()
                .map(|tool| tool.to_object().map(Value::Object))
                .collect::<VeniceResult<Vec<_>>>()?;
            body.insert("tools".to_string(), Value::Array(tools));
        }
        insert_opt(&mut body, "tool_choice", self.tool_choice.as_ref())?;
        insert_opt(
            &mut body,
            "parallel_tool_calls",
            self.parallel_tool_calls.as_ref(),
        )?;

        let venice_parameters = self.venice_parameters_body()?;
        if !venice_parameters.is_empty() {
            body.insert(
                "venice_parameters".to_string(),
                Value::Object(venice_parameters),
            );
        }

        if stream {
            body.insert("stream".to_string(), Value::Bool(true));
            insert_opt(&mut body, "stream_options", self.stream_options.as_ref())?;
        }

        Ok(Value::Object(body))
    }

    /// The extension bag with the shorthand parameters merged in. Shorthands
    /// overwrite same-named keys of an explicit bag.
    fn venice_parameters_body(&self) -> VeniceResult<Map<String, Value>> {
        let mut parameters = match &self.venice_parameters {
            Some(parameters) => parameters.to_object()?,
            None => Map::new(),
        };
        insert_opt(
            &mut parameters,
            "enable_web_search",
            self.enable_web_search.as_ref(),
        )?;
        insert_opt(
            &mut parameters,
            "character_slug",
            self.character_slug.as_ref(),
        )?;
        Ok(parameters)
    }
}

impl RequestBody for ImageGenerateRequest {
    fn validate(&self) -> VeniceResult<()> {
        require_non_empty("prompt", &self.prompt)?;
        require_non_empty("model", &self.model)
    }
}

impl RequestBody for ImageEditRequest {
    fn validate(&self) -> VeniceResult<()> {
        require_non_empty("image", &self.image)?;
        require_non_empty("prompt", &self.prompt)?;
        require_non_empty("model", &self.model)
    }
}

impl RequestBody for ImageUpscaleRequest {
    fn validate(&self) -> VeniceResult<()> {
        require_non_empty("image", &self.image)?;
        require_non_empty("model", &self.model)
    }
}

impl RequestBody for SpeechRequest {
    fn validate(&self) -> VeniceResult<()> {
        require_non_empty("input", &self.input)?;
        require_non_empty("model", &self.model)?;
        require_non_empty("voice", &self.voice)
    }
}

impl RequestBody for TranscriptionRequest {
    fn validate(&self) -> VeniceResult<()> {
        if self.file.is_empty() {
            return Err(VeniceError::Validation(
                "file must contain audio bytes".to_string(),
            ));
        }
        require_non_empty("model", &self.model)
    }
}

impl RequestBody for EmbeddingRequest {
    fn validate(&self) -> VeniceResult<()> {
        match &self.input {
            EmbeddingInput::Single(text) => require_non_empty("input", text)?,
            EmbeddingInput::Batch(texts) if texts.is_empty() => {
                return Err(VeniceError::Validation(
                    "input must contain at least one text".to_string(),
                ));
            }
            EmbeddingInput::Batch(_) => {}
        }
        require_non_empty("model", &self.model)
    }
}

impl RequestBody for VideoGenerateRequest {
    fn validate(&self) -> VeniceResult<()> {
        require_non_empty("prompt", &self.prompt)?;
        require_non_empty("model", &self.model)
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> VeniceResult<()> {
    if value.trim().is_empty() {
        Err(VeniceError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// An id interpolated into a URL path. Characters that would change the
/// target endpoint are rejected instead of escaped.
pub(crate) fn require_path_segment(field: &str, value: &str) -> VeniceResult<()> {
    require_non_empty(field, value)?;
    if value.contains(['/', '\\', '?', '#']) {
        return Err(VeniceError::Validation(format!(
            "{field} must not contain '/', '\\', '?' or '#'"
        )));
    }
    Ok(())
}

fn insert_opt<T: Serialize>(
    map: &mut Map<String, Value>,
    key: &str,
    value: Option<&T>,
) -> VeniceResult<()> {
    if let Some(value) = value {
        let value = serde_json::to_value(value).map_err(|error| {
            VeniceError::Validation(format!("{key} is not serializable: {error}"))
        })?;
        map.insert(key.to_string(), value);
    }
    Ok(())
}
