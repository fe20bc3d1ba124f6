use dotenvy::dotenv;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    for model in client.models().list().await.unwrap() {
        println!("{} ({})", model.id, model.owned_by);
    }

    for character in client.characters().list(true).await.unwrap() {
        println!("{}: {}", character.slug, character.name);
    }
}
