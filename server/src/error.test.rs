use relay_error::ErrorExt;
use relay_error::StatusCode;

use super::*;

#[test]
fn unknown_router_maps_to_not_found() {
    let err = UnknownRouterSnafu { router: "bogus".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::NotFound);
}

#[test]
fn unknown_procedure_maps_to_unsupported() {
    let err = UnknownProcedureSnafu { router: "session".to_string(), procedure: "bogus".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::Unsupported);
}

#[test]
fn invalid_params_maps_to_invalid_arguments() {
    let err = InvalidParamsSnafu { router: "session".to_string(), procedure: "create".to_string(), message: "missing provider".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);
}
