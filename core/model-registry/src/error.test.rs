use super::*;

#[test]
fn unknown_provider_maps_to_provider_not_found() {
    let err = model_registry_error::UnknownProviderSnafu { provider_id: "acme".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ProviderNotFound);
}

#[test]
fn unknown_model_maps_to_model_not_found() {
    let err = model_registry_error::UnknownModelSnafu { model_id: "acme/gpt".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ModelNotFound);
}
