use futures::StreamExt;
use serde_json::json;
use venice_integration::{
    ChatMessage, ChatModel, Embeddings, IntegrationError, VeniceChatModel,
    VeniceChatModelOptions, VeniceEmbeddings, VeniceEmbeddingsOptions,
};
use venice_sdk::{ClientOptions, FinishReason, FunctionDefinition, Venice, WebSearchMode};
use wiremock::{
    matchers::{body_json, body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client(server: &MockServer) -> Venice {
    Venice::new(ClientOptions::new("test-key").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn generates_a_chat_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "llama-3.3-70b",
            "messages": [
                { "role": "system", "content": "Be brief." },
                { "role": "user", "content": "Hello!" }
            ],
            "temperature": 0.7,
            "stop": ["\n\n"],
            "venice_parameters": {
                "enable_web_search": "auto",
                "include_venice_system_prompt": false
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "model": "llama-3.3-70b",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hi!",
                    "reasoning_content": "The user greeted me."
                },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = VeniceChatModel::new(
        client(&server),
        VeniceChatModelOptions {
            enable_web_search: Some(WebSearchMode::Auto),
            include_venice_system_prompt: false,
            ..Default::default()
        },
    );
    let result = model
        .generate(
            &[ChatMessage::system("Be brief."), ChatMessage::human("Hello!")],
            Some(&["\n\n".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(model.model_type(), "venice-chat");
    assert_eq!(result.generations.len(), 1);
    let generation = &result.generations[0];
    assert_eq!(generation.message.content, "Hi!");
    assert_eq!(
        generation.message.reasoning_content.as_deref(),
        Some("The user greeted me.")
    );
    assert_eq!(generation.generation_info.finish_reason, Some(FinishReason::Stop));
    assert_eq!(result.llm_output.token_usage.total_tokens, 14);
    assert_eq!(result.llm_output.model, "llama-3.3-70b");
}

#[tokio::test]
async fn sends_bound_tools_and_decodes_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "tools": [{ "type": "function", "function": { "name": "get_weather" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama-3.3-70b",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "get_weather", "arguments": "{\"city\":\"Oslo\"}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = VeniceChatModel::new(client(&server), VeniceChatModelOptions::default());
    let with_tools = model.bind_tools([FunctionDefinition::new("get_weather")]);
    let result = with_tools
        .generate(&[ChatMessage::human("Weather in Oslo?")], None)
        .await
        .unwrap();

    assert!(model.tools().is_empty());
    assert_eq!(with_tools.tools().len(), 1);
    let calls = &result.generations[0].message.tool_calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "get_weather");
    assert_eq!(calls[0].args, json!({ "city": "Oslo" }));
    assert_eq!(result.llm_output.token_usage.total_tokens, 0);
}

#[tokio::test]
async fn rejects_responses_without_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let model = VeniceChatModel::new(client(&server), VeniceChatModelOptions::default());
    let error = model
        .generate(&[ChatMessage::human("Hi")], None)
        .await
        .unwrap_err();

    assert!(matches!(error, IntegrationError::Invariant(_)));
}

#[tokio::test]
async fn streams_generation_chunks() {
    let server = MockServer::start().await;
    let body = [
        r#"data: {"model":"llama-3.3-70b","choices":[{"index":0,"delta":{"content":"Hel"}}]}"#,
        r#"data: {"choices":[{"index":0,"delta":{"content":"lo"},"finish_reason":"stop"}]}"#,
        r#"data: {"choices":[],"usage":{"prompt_tokens":1,"completion_tokens":2,"total_tokens":3}}"#,
        "data: [DONE]",
        "",
    ]
    .join("\n");
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true, "temperature": 0.2 })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let model = VeniceChatModel::new(
        client(&server),
        VeniceChatModelOptions {
            temperature: 0.2,
            ..Default::default()
        },
    );
    let chunks: Vec<_> = model
        .stream(&[ChatMessage::human("Hi")], None)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 2);
    let chunks = chunks.into_iter().map(Result::unwrap).collect::<Vec<_>>();
    assert_eq!(chunks[0].message.content, "Hel");
    assert_eq!(chunks[0].generation_info.model.as_deref(), Some("llama-3.3-70b"));
    assert_eq!(chunks[1].message.content, "lo");
    assert_eq!(chunks[1].generation_info.finish_reason, Some(FinishReason::Stop));
}

#[tokio::test]
async fn embeds_documents_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_json(json!({
            "input": ["sky", "grass"],
            "model": "text-embedding-ada-002",
            "dimensions": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "index": 1, "embedding": [0.0, 1.0] },
                { "index": 0, "embedding": [1.0, 0.0] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embeddings = VeniceEmbeddings::new(
        client(&server),
        VeniceEmbeddingsOptions {
            dimensions: Some(2),
            ..Default::default()
        },
    );
    let vectors = embeddings
        .embed_documents(&["sky".to_string(), "grass".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn embeds_a_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({ "input": ["what is blue?"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [0.25, 0.75] }]
        })))
        .mount(&server)
        .await;

    let embeddings = VeniceEmbeddings::new(client(&server), VeniceEmbeddingsOptions::default());

    assert_eq!(
        embeddings.embed_query("what is blue?").await.unwrap(),
        vec![0.25, 0.75]
    );
    assert!(embeddings.embed_documents(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn surfaces_sdk_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "bad key" })))
        .mount(&server)
        .await;

    let embeddings = VeniceEmbeddings::new(client(&server), VeniceEmbeddingsOptions::default());
    let error = embeddings.embed_query("hi").await.unwrap_err();

    assert!(matches!(
        error,
        IntegrationError::Venice(venice_sdk::VeniceError::Authentication(_))
    ));
}
