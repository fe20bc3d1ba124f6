use dotenvy::dotenv;
use venice_sdk::{ChatCompletionRequest, Message, TranscriptionRequest};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .expect("usage: summarize-audio <audio file>");
    let client = common::get_client();

    let transcription = client
        .audio()
        .transcriptions()
        .create(&TranscriptionRequest::new(std::fs::read(path).unwrap()))
        .await
        .unwrap();

    let summary = client
        .chat()
        .completions()
        .create(&ChatCompletionRequest::new(
            common::CHAT_MODEL,
            [
                Message::system("Summarize the transcript in three bullet points."),
                Message::user(transcription.text),
            ],
        ))
        .await
        .unwrap();

    println!("{}", summary.content().unwrap_or_default());
}
