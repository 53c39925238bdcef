use super::*;

#[test]
fn validation_maps_to_tool_validation_status() {
    let err = tool_error::ValidationSnafu { tool_id: "read_file".to_string(), message: "missing path".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ToolValidation);
}

#[test]
fn execution_failure_is_logged() {
    let err = tool_error::ExecutionSnafu { tool_id: "shell".to_string(), message: "exit 1".to_string() }.build();
    assert!(err.should_log_error());
}
