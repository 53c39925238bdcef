use super::*;

#[test]
fn public_is_always_satisfied() {
    assert!(SecurityContext::anonymous().satisfies(SecurityLevel::Public));
}

#[test]
fn moderate_requires_caller_identity() {
    assert!(!SecurityContext::anonymous().satisfies(SecurityLevel::Moderate));
    assert!(SecurityContext::with_caller("user-1").satisfies(SecurityLevel::Moderate));
}

#[test]
fn strict_requires_caller_identity() {
    assert!(!SecurityContext::anonymous().satisfies(SecurityLevel::Strict));
    assert!(SecurityContext::with_caller("user-1").satisfies(SecurityLevel::Strict));
}
