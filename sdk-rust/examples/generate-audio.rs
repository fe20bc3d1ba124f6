use dotenvy::dotenv;
use venice_sdk::{AudioFormat, SpeechRequest};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let speech = client
        .audio()
        .speech()
        .create(&SpeechRequest {
            response_format: Some(AudioFormat::Mp3),
            speed: Some(1.1),
            ..SpeechRequest::new("Hello from Venice. This is a synthesized voice.")
        })
        .await
        .unwrap();

    std::fs::write("speech.mp3", &speech.audio).unwrap();
    println!(
        "Saved {} bytes of {} to speech.mp3",
        speech.audio.len(),
        speech.content_type
    );
}
