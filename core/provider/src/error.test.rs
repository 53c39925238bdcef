use super::*;

#[test]
fn not_configured_maps_to_invalid_config() {
    let err = provider_error::NotConfiguredSnafu { provider_id: "anthropic".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);
}

#[test]
fn network_error_is_retryable_category() {
    let err = provider_error::NetworkSnafu { provider_id: "anthropic".to_string(), message: "timed out".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::NetworkError);
    assert!(err.is_retryable());
}
