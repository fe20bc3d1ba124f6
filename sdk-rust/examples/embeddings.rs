use dotenvy::dotenv;
use venice_sdk::EmbeddingRequest;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let response = client
        .embeddings()
        .create(&EmbeddingRequest {
            model: "text-embedding-bge-m3".to_string(),
            ..EmbeddingRequest::new(vec!["The quick brown fox", "jumps over the lazy dog"])
        })
        .await
        .unwrap();

    for (index, vector) in response.vectors().unwrap().iter().enumerate() {
        println!("{index}: {} dimensions", vector.len());
    }
    println!("{:?}", response.usage);
}
