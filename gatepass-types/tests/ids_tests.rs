use gatepass_types::{BearerToken, ContentId, DeviceId, OpaqueToken};
use pretty_assertions::assert_eq;

#[test]
fn extract_from_absolute_url() {
    let token = OpaqueToken::extract("https://h/re?c=ABC");
    assert_eq!(token.as_str(), "ABC");
}

#[test]
fn extract_from_relative_url() {
    let token = OpaqueToken::extract("/redeem?c=XYZ");
    assert_eq!(token.as_str(), "XYZ");
}

#[test]
fn extract_bare_string_passes_through() {
    let token = OpaqueToken::extract("plain-token");
    assert_eq!(token.as_str(), "plain-token");
}

#[test]
fn extract_trims_whitespace() {
    let token = OpaqueToken::extract("  plain-token \n");
    assert_eq!(token.as_str(), "plain-token");
}

#[test]
fn extract_empty_yields_empty() {
    let token = OpaqueToken::extract("");
    assert_eq!(token.as_str(), "");
    assert!(token.is_empty());
}

#[test]
fn extract_whitespace_yields_empty() {
    assert!(OpaqueToken::extract("   \t ").is_empty());
}

#[test]
fn extract_percent_decodes_query_value() {
    let token = OpaqueToken::extract("https://h/re?c=A%2FB%3D");
    assert_eq!(token.as_str(), "A/B=");
}

#[test]
fn extract_custom_scheme_url() {
    let token = OpaqueToken::extract("myapp://redeem?c=Z9");
    assert_eq!(token.as_str(), "Z9");
}

#[test]
fn extract_ignores_other_parameters() {
    let token = OpaqueToken::extract("https://h/re?a=1&c=CODE&b=2");
    assert_eq!(token.as_str(), "CODE");
}

#[test]
fn extract_empty_c_parameter_falls_through() {
    // An empty `c=` is not a code; with nothing else to find, the trimmed
    // literal wins.
    let token = OpaqueToken::extract("https://h/re?c=");
    assert_eq!(token.as_str(), "https://h/re?c=");
}

#[test]
fn extract_fragment_from_loose_text() {
    let token = OpaqueToken::extract("visit example ?c=AB%26CD now");
    assert_eq!(token.as_str(), "AB&CD now");
}

#[test]
fn extract_fragment_after_ampersand() {
    let token = OpaqueToken::extract("x&c=QQ&d=1");
    assert_eq!(token.as_str(), "QQ");
}

#[test]
fn extract_c_without_separator_is_literal() {
    // "c=..." with no introducing ? or & is just text.
    let token = OpaqueToken::extract("c=ABC");
    assert_eq!(token.as_str(), "c=ABC");
}

#[test]
fn extract_url_without_c_is_literal() {
    let token = OpaqueToken::extract("https://h/nothing?d=1");
    assert_eq!(token.as_str(), "https://h/nothing?d=1");
}

#[test]
fn from_literal_trims() {
    let token = OpaqueToken::from_literal(" CODE-1 ");
    assert_eq!(token.as_str(), "CODE-1");
}

#[test]
fn opaque_token_debug_is_truncated() {
    let token = OpaqueToken::from_literal("SECRETSECRETSECRET");
    let debug = format!("{token:?}");
    assert!(!debug.contains("SECRETSECRETSECRET"));
    assert!(debug.starts_with("OpaqueToken(SECRET"));
}

#[test]
fn short_token_preview_is_whole_value() {
    let token = OpaqueToken::from_literal("AB12");
    assert_eq!(token.preview(), "AB12");
}

#[test]
fn bearer_token_debug_is_truncated() {
    let token = BearerToken::new("eyJhbGciOiJSUzI1NiJ9.payload.sig");
    let debug = format!("{token:?}");
    assert!(!debug.contains("payload"));
}

#[test]
fn opaque_token_serde_is_transparent() {
    let token = OpaqueToken::from_literal("CODE-7");
    let json = serde_json::to_string(&token).unwrap();
    assert_eq!(json, "\"CODE-7\"");
    let parsed: OpaqueToken = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, token);
}

#[test]
fn device_id_display_roundtrip() {
    let id = DeviceId::new("d41d8cd98f00b204");
    assert_eq!(id.to_string(), "d41d8cd98f00b204");
    assert_eq!(id.as_str(), "d41d8cd98f00b204");
}

#[test]
fn content_id_deserializes_from_string() {
    let id: ContentId = serde_json::from_str("\"42\"").unwrap();
    assert_eq!(id, ContentId::new("42"));
}

#[test]
fn content_id_deserializes_from_integer() {
    let id: ContentId = serde_json::from_str("42").unwrap();
    assert_eq!(id, ContentId::new("42"));
}

#[test]
fn content_id_serializes_as_string() {
    let json = serde_json::to_string(&ContentId::new("42")).unwrap();
    assert_eq!(json, "\"42\"");
}
