use std::sync::Arc;

use relay_error::ErrorExt;
use relay_error::StatusCode;

use super::*;

#[test]
fn second_acquire_on_same_session_is_rejected() {
    let locks = Arc::new(StreamLocks::new());
    let _guard = locks.try_acquire("s1").expect("first acquire succeeds");
    let err = locks.try_acquire("s1").expect_err("second acquire must fail");
    assert_eq!(err.status_code(), StatusCode::SessionBusy);
}

#[test]
fn releasing_a_guard_frees_the_session() {
    let locks = Arc::new(StreamLocks::new());
    {
        let _guard = locks.try_acquire("s1").expect("first acquire succeeds");
    }
    locks.try_acquire("s1").expect("slot was released on drop");
}

#[test]
fn different_sessions_do_not_contend() {
    let locks = Arc::new(StreamLocks::new());
    let _a = locks.try_acquire("s1").expect("acquire s1");
    let _b = locks.try_acquire("s2").expect("acquire s2");
}
