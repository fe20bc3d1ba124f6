use std::{env, time::Duration};
use venice_sdk::{ClientOptions, Venice, VeniceError, API_KEY_ENV, DEFAULT_BASE_URL};

#[test]
fn fails_fast_without_an_api_key() {
    if env::var(API_KEY_ENV).is_ok() {
        return;
    }

    let error = Venice::new(ClientOptions::default()).unwrap_err();

    let VeniceError::Configuration(message) = error else {
        panic!("expected a configuration error");
    };
    assert!(message.contains(API_KEY_ENV));
}

#[test]
fn rejects_blank_api_keys() {
    let result = Venice::new(ClientOptions::new("   "));

    assert!(matches!(result, Err(VeniceError::Configuration(_))));
}

#[test]
fn applies_defaults_and_overrides() {
    let client = Venice::new(ClientOptions {
        base_url: Some(DEFAULT_BASE_URL.to_string()),
        max_retries: Some(5),
        ..ClientOptions::new("test-key")
    })
    .unwrap();

    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.timeout(), Duration::from_secs(120));
    assert_eq!(client.max_retries(), 5);

    let short = client.with_timeout(Duration::from_secs(5));
    assert_eq!(short.timeout(), Duration::from_secs(5));
    assert_eq!(client.timeout(), Duration::from_secs(120));
}

#[test]
fn redacts_the_api_key_in_debug_output() {
    let options = ClientOptions::new("sk-secret");

    let debug = format!("{options:?}");

    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("<redacted>"));
}
