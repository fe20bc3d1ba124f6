#![allow(dead_code)]

use serde_json::{json, Value};
use venice_sdk::{ClientOptions, Venice};
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";

pub fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::new("test-key").with_base_url(format!("{}{API_PREFIX}", server.uri()))
}

pub fn client(server: &MockServer) -> Venice {
    Venice::new(options(server)).unwrap()
}

pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "llama-3.3-70b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// An event stream body built from already-serialized lines.
pub fn sse_body(lines: &[&str]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// An event stream whose first frame carries bytes that are not UTF-8,
/// followed by a valid "ok" frame and the sentinel.
pub fn sse_body_with_invalid_utf8() -> Vec<u8> {
    let mut body =
        br#"data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(b"\"}}]}\n");
    body.extend_from_slice(
        sse_body(&[
            r#"data: {"id":"chatcmpl-1","model":null,"choices":[{"index":0,"delta":{"content":"ok"}}]}"#,
            "data: [DONE]",
        ])
        .as_bytes(),
    );
    body
}
