use super::*;

#[test]
fn storage_failed_maps_to_storage_failed_status() {
    let err = event_log_error::StorageFailedSnafu {
        channel: "session:1".to_string(),
        message: "disk full".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::StorageFailed);
}

#[test]
fn corrupt_record_maps_to_parse_error_status() {
    let err = event_log_error::CorruptSnafu {
        message: "bad json".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::ParseError);
}
