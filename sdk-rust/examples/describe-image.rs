use dotenvy::dotenv;
use venice_sdk::{ChatCompletionRequest, ContentPart, Message};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let completion = client
        .chat()
        .completions()
        .create(&ChatCompletionRequest::new(
            "mistral-31-24b",
            [Message::user(vec![
                ContentPart::text("Describe this image."),
                ContentPart::image_url(
                    "https://upload.wikimedia.org/wikipedia/commons/a/a7/Camponotus_flavomarginatus_ant.jpg",
                ),
            ])],
        ))
        .await
        .unwrap();

    println!("{}", completion.content().unwrap_or_default());
}
