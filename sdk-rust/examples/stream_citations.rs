use dotenvy::dotenv;
use futures::stream::StreamExt;
use venice_sdk::{ChatCompletionRequest, Message, VeniceParameters, WebSearchMode};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let mut stream = client
        .chat()
        .completions()
        .stream(&ChatCompletionRequest {
            enable_web_search: Some(WebSearchMode::On),
            venice_parameters: Some(
                VeniceParameters {
                    enable_web_citations: Some(true),
                    include_search_results_in_stream: Some(true),
                    ..Default::default()
                }
                .into(),
            ),
            ..ChatCompletionRequest::new(
                common::CHAT_MODEL,
                [Message::user("What happened in the news today?")],
            )
        })
        .await
        .unwrap();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        for choice in &chunk.choices {
            if let Some(content) = &choice.delta.content {
                print!("{content}");
            }
            if !choice.delta.extra.is_empty() {
                println!("\n[extra] {:#?}", choice.delta.extra);
            }
        }
    }
    println!();
}
