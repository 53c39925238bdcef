use super::*;

#[test]
fn text_helper_builds_text_variant() {
    assert_eq!(
        ContentPart::text("hi"),
        ContentPart::Text {
            text: "hi".to_string()
        }
    );
}

#[test]
fn serializes_with_type_tag() {
    let part = ContentPart::File {
        data: "base64==".to_string(),
        media_type: "image/png".to_string(),
        filename: "a.png".to_string(),
    };
    let json = serde_json::to_value(&part).unwrap();
    assert_eq!(json["type"], "file");
    assert_eq!(json["media_type"], "image/png");
}
