use relay_error::StatusCode;

use super::*;

#[test]
fn network_and_protocol_errors_are_eligible() {
    assert!(is_fallback_eligible(StatusCode::NetworkError));
    assert!(is_fallback_eligible(StatusCode::ProviderProtocol));
}

#[test]
fn other_provider_errors_are_not_eligible() {
    assert!(!is_fallback_eligible(StatusCode::ModelNotFound));
    assert!(!is_fallback_eligible(StatusCode::ProviderAuth));
    assert!(!is_fallback_eligible(StatusCode::ToolExecution));
}

#[test]
fn fallback_target_stores_provider_and_model() {
    let target = FallbackTarget::new("openai", "gpt-4.1-mini");
    assert_eq!(target.provider_id, "openai");
    assert_eq!(target.model_id, "gpt-4.1-mini");
}
