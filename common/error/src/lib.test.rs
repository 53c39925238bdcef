use super::*;

#[derive(Debug)]
struct Leaf;

impl std::fmt::Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leaf failure")
    }
}

impl std::error::Error for Leaf {}

impl StackError for Leaf {
    fn location_opt(&self) -> Option<Location> {
        None
    }

    fn next(&self) -> Option<&dyn StackError> {
        None
    }
}

struct Wrapper {
    location: Location,
    source: Leaf,
}

impl std::fmt::Display for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wrapper failure")
    }
}

impl std::fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_error_chain(self, f)
    }
}

impl std::error::Error for Wrapper {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl StackError for Wrapper {
    fn location_opt(&self) -> Option<Location> {
        Some(self.location)
    }

    fn next(&self) -> Option<&dyn StackError> {
        Some(&self.source as &dyn StackError)
    }
}

#[test]
fn chain_renders_display_then_location_then_cause() {
    let err = Wrapper {
        location: Location::new("test.rs", 1, 1),
        source: Leaf,
    };
    let rendered = format!("{err:?}");
    assert!(rendered.starts_with("wrapper failure\n"));
    assert!(rendered.contains("at test.rs:1:1"));
    assert!(rendered.contains("caused by [1]: leaf failure"));
}

#[test]
fn chain_with_no_location_skips_at_line() {
    let err = Leaf;
    let rendered = {
        struct DebugLeaf<'a>(&'a Leaf);
        impl std::fmt::Debug for DebugLeaf<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write_error_chain(self.0, f)
            }
        }
        format!("{:?}", DebugLeaf(&err))
    };
    assert_eq!(rendered, "leaf failure\n");
}
