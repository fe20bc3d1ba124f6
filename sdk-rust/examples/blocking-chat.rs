use dotenvy::dotenv;
use venice_sdk::{blocking::Venice, ChatCompletionRequest, Message};

fn main() {
    dotenv().ok();

    let client = Venice::from_env().expect("VENICE_API_KEY environment variable must be set");
    let request = ChatCompletionRequest::new("llama-3.3-70b", [Message::user("Count to five.")]);

    for chunk in client.chat().completions().stream(&request).unwrap() {
        if let Some(content) = chunk.unwrap().content() {
            print!("{content}");
        }
    }
    println!();
}
