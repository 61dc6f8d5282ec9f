use gatepass_api::{ApiConfig, ApiError};
use gatepass_types::ContentId;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn default_paths_match_backend_routes() {
    let config = ApiConfig::default();
    assert_eq!(config.redeem_path, "/api/redeem");
    assert_eq!(config.content_path, "/api/content");
    assert_eq!(config.decode_path, "/api/decode");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
}

#[test]
fn endpoint_urls_join_against_base() {
    let config = ApiConfig::with_base_url("https://gate.example");
    assert_eq!(
        config.redeem_url().unwrap().as_str(),
        "https://gate.example/api/redeem"
    );
    assert_eq!(
        config.decode_url().unwrap().as_str(),
        "https://gate.example/api/decode"
    );
}

#[test]
fn content_url_appends_id() {
    let config = ApiConfig::with_base_url("https://gate.example");
    let url = config.content_url(&ContentId::new("42")).unwrap();
    assert_eq!(url.as_str(), "https://gate.example/api/content/42");
}

#[test]
fn trailing_slash_on_content_path_is_tolerated() {
    let mut config = ApiConfig::with_base_url("https://gate.example");
    config.content_path = "/api/content/".to_string();
    let url = config.content_url(&ContentId::new("7")).unwrap();
    assert_eq!(url.as_str(), "https://gate.example/api/content/7");
}

#[test]
fn invalid_base_url_is_a_config_error() {
    let config = ApiConfig::with_base_url("not a url");
    let err = config.redeem_url().unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}
