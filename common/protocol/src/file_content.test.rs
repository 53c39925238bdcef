use super::*;

#[test]
fn new_derives_size_from_content_length() {
    let file = FileContent::new("file_1", vec![0u8; 16], "image/png");
    assert_eq!(file.size, 16);
    assert_eq!(file.media_type, "image/png");
}

#[test]
fn serde_round_trip() {
    let file = FileContent::new("file_1", b"hello".to_vec(), "text/plain");
    let json = serde_json::to_string(&file).expect("serialize");
    let parsed: FileContent = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, file);
}
