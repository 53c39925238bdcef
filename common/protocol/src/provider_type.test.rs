use super::*;

#[test]
fn default_is_openai_compat() {
    assert_eq!(ProviderType::default(), ProviderType::OpenaiCompat);
}

#[test]
fn serde_round_trip() {
    let json = serde_json::to_string(&ProviderType::Anthropic).expect("serialize");
    assert_eq!(json, "\"anthropic\"");
    let parsed: ProviderType = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, ProviderType::Anthropic);
}

#[test]
fn display_matches_serde_name() {
    assert_eq!(ProviderType::Volcengine.to_string(), "volcengine");
}
