use venice_sdk::Venice;

pub const CHAT_MODEL: &str = "llama-3.3-70b";

pub fn get_client() -> Venice {
    Venice::from_env().expect("VENICE_API_KEY environment variable must be set")
}
