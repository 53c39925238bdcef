use super::*;

#[test]
fn formats_sub_second_as_millis() {
    assert_eq!(format_elapsed_millis(250), "250ms");
}

#[test]
fn formats_sub_minute_with_two_decimals() {
    assert_eq!(format_elapsed_millis(1_500), "1.50s");
    assert_eq!(format_elapsed_millis(59_999), "60.00s");
}

#[test]
fn formats_minutes_and_seconds() {
    assert_eq!(format_elapsed_millis(60_000), "1m 00s");
    assert_eq!(format_elapsed_millis(75_000), "1m 15s");
}

#[test]
fn format_duration_matches_millis_helper() {
    assert_eq!(
        format_duration(Duration::from_millis(75_000)),
        format_elapsed_millis(75_000)
    );
}
