use super::*;

#[test]
fn provider_not_found_maps_to_provider_not_found_status() {
    let err = ProviderNotFoundSnafu { provider_id: "openai".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ProviderNotFound);
}

#[test]
fn invalid_json_maps_to_invalid_json_status() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = InvalidJsonSnafu { path: "config.json".to_string() }.into_error(parse_err);
    assert_eq!(err.status_code(), StatusCode::InvalidJson);
}
