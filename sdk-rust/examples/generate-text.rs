use dotenvy::dotenv;
use venice_sdk::{ChatCompletionRequest, Message};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let completion = client
        .chat()
        .completions()
        .create(&ChatCompletionRequest {
            temperature: Some(0.7),
            max_tokens: Some(512),
            ..ChatCompletionRequest::new(
                common::CHAT_MODEL,
                [
                    Message::user("Tell me a story."),
                    Message::assistant("Sure! What kind of story would you like to hear?"),
                    Message::user("a fairy tale"),
                ],
            )
        })
        .await
        .unwrap();

    println!("{}", completion.content().unwrap_or_default());
    println!("{:#?}", completion.usage);
}
