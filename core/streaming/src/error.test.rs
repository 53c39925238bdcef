use relay_error::ErrorExt;
use relay_error::StatusCode;

use super::*;
use crate::error::streaming_error::SessionBusySnafu;
use crate::error::streaming_error::SessionNotFoundSnafu;
use crate::error::streaming_error::UnknownProviderSnafu;

#[test]
fn session_not_found_maps_to_not_found() {
    let err = SessionNotFoundSnafu { session_id: "s1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::NotFound);
}

#[test]
fn session_busy_maps_to_session_busy() {
    let err = SessionBusySnafu { session_id: "s1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::SessionBusy);
}

#[test]
fn unknown_provider_maps_to_provider_not_found() {
    let err = UnknownProviderSnafu { provider_id: "acme".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ProviderNotFound);
}
