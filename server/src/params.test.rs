use serde::Deserialize;

use super::*;
use crate::error::RpcError;

#[derive(Debug, Deserialize)]
struct Point {
    x: i32,
}

#[test]
fn parses_valid_params() {
    let point: Point = parse("demo", "proc", serde_json::json!({"x": 1})).unwrap();
    assert_eq!(point.x, 1);
}

#[test]
fn reports_invalid_params() {
    let err = parse::<Point>("demo", "proc", serde_json::json!({"y": 1})).expect_err("missing field x");
    assert!(matches!(err, RpcError::InvalidParams { .. }));
}
