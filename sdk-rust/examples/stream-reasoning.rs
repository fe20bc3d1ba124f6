use dotenvy::dotenv;
use futures::stream::StreamExt;
use venice_sdk::{ChatCompletionRequest, Message, VeniceParameters};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let mut stream = client
        .chat()
        .completions()
        .stream(&ChatCompletionRequest {
            venice_parameters: Some(
                VeniceParameters {
                    strip_thinking_response: Some(false),
                    ..Default::default()
                }
                .into(),
            ),
            ..ChatCompletionRequest::new(
                "qwen3-4b",
                [Message::user("Which is larger, 9.11 or 9.9?")],
            )
        })
        .await
        .unwrap();

    while let Some(chunk) = stream.next().await {
        for choice in chunk.unwrap().choices {
            if let Some(reasoning) = choice.delta.reasoning_content {
                print!("\x1b[2m{reasoning}\x1b[0m");
            }
            if let Some(content) = choice.delta.content {
                print!("{content}");
            }
        }
    }
    println!();
}
