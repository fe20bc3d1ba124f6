use crate::{
    ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionStream,
    FinishReason, Usage, VeniceResult,
};
use futures::StreamExt;
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

const PROVIDER: &str = "venice";

/// Records a chat completion call as a span following the OpenTelemetry
/// GenAI semantic conventions.
pub struct ChatSpan {
    span: Span,
    usage: Option<Usage>,
    finish_reasons: Vec<FinishReason>,
    start_time: Instant,
    time_to_first_chunk: Option<f64>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    presence_penalty: Option<f64>,
    frequency_penalty: Option<f64>,
    seed: Option<i64>,
    ended: bool,
}

impl ChatSpan {
    pub fn new(method: &str, request: &ChatCompletionRequest) -> Self {
        let span = if method == "stream" {
            info_span!("venice.chat.stream")
        } else {
            info_span!("venice.chat.create")
        };
        span.set_attribute("gen_ai.operation.name", "chat");
        span.set_attribute("gen_ai.provider.name", PROVIDER);
        span.set_attribute("gen_ai.request.model", request.model.clone());
        span.set_attribute("venice.method", method.to_string());

        Self {
            span,
            usage: None,
            finish_reasons: Vec::new(),
            start_time: Instant::now(),
            time_to_first_chunk: None,
            max_tokens: request.max_tokens.or(request.max_completion_tokens),
            temperature: request.temperature,
            top_p: request.top_p,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
            seed: request.seed,
            ended: false,
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn in_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.span.in_scope(f)
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_response(&mut self, response: &ChatCompletion) {
        self.usage = response.usage;
        self.finish_reasons = response
            .choices
            .iter()
            .filter_map(|choice| choice.finish_reason)
            .collect();
        self.span
            .set_attribute("gen_ai.response.id", response.id.clone());
        self.span
            .set_attribute("gen_ai.response.model", response.model.clone());
    }

    pub fn on_chunk(&mut self, chunk: &ChatCompletionChunk) {
        if self.time_to_first_chunk.is_none() {
            self.time_to_first_chunk = Some(self.start_time.elapsed().as_secs_f64());
        }
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }
        self.finish_reasons.extend(
            chunk
                .choices
                .iter()
                .filter_map(|choice| choice.finish_reason),
        );
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        if let Some(usage) = &self.usage {
            self.span.set_attribute(
                "gen_ai.usage.input_tokens",
                i64::from(usage.prompt_tokens),
            );
            self.span.set_attribute(
                "gen_ai.usage.output_tokens",
                i64::from(usage.completion_tokens),
            );
        }

        if !self.finish_reasons.is_empty() {
            let reasons = self
                .finish_reasons
                .iter()
                .map(|reason| format!("{reason:?}").to_lowercase())
                .collect::<Vec<_>>()
                .join(",");
            self.span
                .set_attribute("gen_ai.response.finish_reasons", reasons);
        }

        if let Some(time_to_first_chunk) = self.time_to_first_chunk {
            self.span
                .set_attribute("gen_ai.server.time_to_first_token", time_to_first_chunk);
        }

        if let Some(max_tokens) = self.max_tokens {
            self.span
                .set_attribute("gen_ai.request.max_tokens", i64::from(max_tokens));
        }
        if let Some(temperature) = self.temperature {
            self.span
                .set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(top_p) = self.top_p {
            self.span.set_attribute("gen_ai.request.top_p", top_p);
        }
        if let Some(presence_penalty) = self.presence_penalty {
            self.span
                .set_attribute("gen_ai.request.presence_penalty", presence_penalty);
        }
        if let Some(frequency_penalty) = self.frequency_penalty {
            self.span
                .set_attribute("gen_ai.request.frequency_penalty", frequency_penalty);
        }
        if let Some(seed) = self.seed {
            self.span.set_attribute("gen_ai.request.seed", seed);
        }
    }
}

impl Drop for ChatSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

pub async fn trace_create<F, Fut>(
    request: &ChatCompletionRequest,
    f: F,
) -> VeniceResult<ChatCompletion>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = VeniceResult<ChatCompletion>>,
{
    let mut span = ChatSpan::new("create", request);
    let result = span.instrument_future(f()).await;

    match &result {
        Ok(response) => span.on_response(response),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}

pub async fn trace_stream<F, Fut>(
    request: &ChatCompletionRequest,
    f: F,
) -> VeniceResult<ChatCompletionStream>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = VeniceResult<ChatCompletionStream>>,
{
    let mut span = ChatSpan::new("stream", request);
    let stream_result = span.instrument_future(f()).await;

    match stream_result {
        Ok(mut stream) => {
            let span_handle = span.span();
            let streaming_span = span;
            let instrumented = async_stream::stream! {
                let mut span_state = streaming_span;

                while let Some(item) = stream.next().await {
                    match &item {
                        Ok(chunk) => span_state.on_chunk(chunk),
                        Err(error) => span_state.on_error(error),
                    }
                    yield item;
                }
            }
            .instrument(span_handle);

            Ok(ChatCompletionStream::from_stream(instrumented))
        }
        Err(error) => {
            span.on_error(&error);
            span.on_end();
            Err(error)
        }
    }
}
