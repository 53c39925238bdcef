use relay_error::ErrorExt;
use relay_error::StatusCode;

use super::*;
use crate::error::compaction_error::EmptySessionSnafu;
use crate::error::compaction_error::SessionNotFoundSnafu;

#[test]
fn session_not_found_maps_to_not_found() {
    let err = SessionNotFoundSnafu { session_id: "s1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::NotFound);
}

#[test]
fn empty_session_maps_to_invalid_arguments() {
    let err = EmptySessionSnafu { session_id: "s1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);
    assert!(!err.should_log_error());
}
