use base64::{engine::general_purpose::STANDARD, Engine};
use dotenvy::dotenv;
use venice_sdk::{ImageGenerateRequest, ImageResponseFormat};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();

    let response = client
        .images()
        .generate(&ImageGenerateRequest {
            size: Some("1024x1024".to_string()),
            response_format: Some(ImageResponseFormat::B64Json),
            negative_prompt: Some("blurry".to_string()),
            ..ImageGenerateRequest::new("A lighthouse on a cliff at dusk, oil painting")
        })
        .await
        .unwrap();

    for (index, image) in response.data.iter().enumerate() {
        if let Some(data) = &image.b64_json {
            let path = format!("image-{index}.png");
            std::fs::write(&path, STANDARD.decode(data).unwrap()).unwrap();
            println!("Saved {path}");
        } else if let Some(url) = &image.url {
            println!("{url}");
        }
    }
}
