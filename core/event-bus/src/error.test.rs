use super::*;

#[test]
fn unknown_channel_maps_to_not_found() {
    let err = event_bus_error::UnknownChannelSnafu {
        channel: "session:1".to_string(),
    }
    .build();
    assert_eq!(err.status_code(), StatusCode::NotFound);
}
