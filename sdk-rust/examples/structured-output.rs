use dotenvy::dotenv;
use serde_json::json;
use venice_sdk::{ChatCompletionRequest, JsonSchemaFormat, Message, ResponseFormat};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let completion = client
        .chat()
        .completions()
        .create(&ChatCompletionRequest {
            response_format: Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "capital".to_string(),
                    schema: json!({
                        "type": "object",
                        "properties": {
                            "country": { "type": "string" },
                            "capital": { "type": "string" }
                        },
                        "required": ["country", "capital"],
                        "additionalProperties": false
                    }),
                    description: None,
                    strict: Some(true),
                },
            }),
            ..ChatCompletionRequest::new(
                common::CHAT_MODEL,
                [Message::user("What is the capital of France?")],
            )
        })
        .await
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(completion.content().unwrap_or("{}")).unwrap();
    println!("{value:#}");
}
