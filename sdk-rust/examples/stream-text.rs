use dotenvy::dotenv;
use futures::stream::StreamExt;
use std::io::Write;
use venice_sdk::{ChatCompletionRequest, ChunkAccumulator, Message, StreamOptions};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let mut stream = client
        .chat()
        .completions()
        .stream(&ChatCompletionRequest {
            stream_options: Some(StreamOptions {
                include_usage: true,
            }),
            ..ChatCompletionRequest::new(
                common::CHAT_MODEL,
                [
                    Message::system("You are a concise storyteller."),
                    Message::user("Tell me a fairy tale in five sentences."),
                ],
            )
        })
        .await
        .unwrap();

    let mut accumulator = ChunkAccumulator::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        if let Some(content) = chunk.content() {
            print!("{content}");
            std::io::stdout().flush().unwrap();
        }
        accumulator.add_chunk(&chunk);
    }

    let completion = accumulator.compute_completion();
    println!("\n\nFinal response: {completion:#?}");
}
