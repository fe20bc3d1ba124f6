#![cfg(feature = "blocking")]

mod support;

use serde_json::json;
use std::time::Duration;
use support::{api_path, completion_body, options, sse_body, sse_body_with_invalid_utf8};
use tokio::runtime::Runtime;
use venice_sdk::{
    blocking::Venice, AudioFormat, ChatCompletionRequest, Message, SpeechRequest, VeniceError,
};
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// The mock server lives on its own runtime while the blocking client runs on
/// the test thread.
fn start_server() -> (Runtime, MockServer) {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn hello_request() -> ChatCompletionRequest {
    ChatCompletionRequest::new("llama-3.3-70b", [Message::user("Hello")])
}

#[test]
fn creates_a_chat_completion() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path(api_path("/chat/completions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi!")))
            .expect(1)
            .mount(&server),
    );

    let client = Venice::new(options(&server)).unwrap();
    let completion = client.chat().completions().create(&hello_request()).unwrap();

    assert_eq!(completion.content(), Some("Hi!"));
    assert_eq!(client.max_retries(), 2);
}

#[test]
fn streams_chunks_lazily() {
    let (runtime, server) = start_server();
    let body = sse_body(&[
        r#"data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":"A"}}]}"#,
        ": ping",
        r#"data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":"B"},"finish_reason":"stop"}]}"#,
        "data: [DONE]",
        r#"data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":"C"}}]}"#,
    ]);
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path(api_path("/chat/completions")))
            .and(body_partial_json(json!({ "stream": true })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server),
    );

    let client = Venice::new(options(&server)).unwrap();
    let mut chunks = client.chat().completions().stream(&hello_request()).unwrap();

    assert_eq!(chunks.next().unwrap().unwrap().content(), Some("A"));
    let rest = chunks.collect_completion().unwrap();
    assert_eq!(rest.content(), Some("B"));
}

#[test]
fn keeps_streaming_past_frames_that_are_not_utf8() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path(api_path("/chat/completions")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(sse_body_with_invalid_utf8(), "text/event-stream"),
            )
            .mount(&server),
    );

    let client = Venice::new(options(&server)).unwrap();
    let chunks = client
        .chat()
        .completions()
        .stream(&hello_request())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].content(), Some("ok"));
}

#[test]
fn maps_error_statuses() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path(api_path("/characters")))
            .and(query_param("public_only", "false"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({ "error": "Too many requests" })),
            )
            .mount(&server),
    );

    let client = Venice::new(options(&server)).unwrap();
    let error = client.characters().list(false).unwrap_err();

    assert!(matches!(error, VeniceError::RateLimit { .. }));
    assert_eq!(error.status(), Some(429));
}

#[test]
fn times_out_slow_responses() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path(api_path("/models")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server),
    );

    let client = Venice::new(options(&server))
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let error = client.models().list().unwrap_err();

    assert!(matches!(error, VeniceError::Timeout(_)), "got {error}");
}

#[test]
fn returns_speech_bytes() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path(api_path("/audio/speech")))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1_u8, 2, 3], "audio/flac"))
            .mount(&server),
    );

    let client = Venice::new(options(&server)).unwrap();
    let speech = client
        .audio()
        .speech()
        .create(&SpeechRequest {
            response_format: Some(AudioFormat::Flac),
            ..SpeechRequest::new("Hi")
        })
        .unwrap();

    assert_eq!(speech.audio, vec![1, 2, 3]);
    assert_eq!(speech.content_type, "audio/flac");
}
