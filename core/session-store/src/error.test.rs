use super::*;

#[test]
fn not_found_variants_map_to_not_found_status() {
    let err = session_store_error::SessionNotFoundSnafu {
        session_id: "s1".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::NotFound);
}

#[test]
fn invariant_violated_maps_to_invariant_violated_status() {
    let err = session_store_error::InvariantViolatedSnafu {
        message: "non-monotone status transition".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::InvariantViolated);
}
