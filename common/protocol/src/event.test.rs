use super::*;

#[test]
fn new_derives_id_from_timestamp_and_sequence() {
    let event = Event::new("sess_1", "message.delta", 1_000, 3, serde_json::json!({}));
    assert_eq!(event.id, "evt_1000_3");
}

#[test]
fn cursor_orders_by_timestamp_then_sequence() {
    let earlier = Cursor::new(100, 5);
    let later_same_ts = Cursor::new(100, 6);
    let later_ts = Cursor::new(101, 0);
    assert!(earlier < later_same_ts);
    assert!(later_same_ts < later_ts);
}

#[test]
fn cursor_matches_event_fields() {
    let event = Event::new("sess_1", "message.delta", 50, 2, serde_json::json!({"foo": "bar"}));
    assert_eq!(event.cursor(), Cursor::new(50, 2));
}
