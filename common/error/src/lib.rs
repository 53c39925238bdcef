//! Shared error machinery used by every crate in the workspace.
//!
//! Each crate defines its own `snafu`-based error enum and implements
//! [`ErrorExt`] and (via `#[relay_error::stack_trace_debug]`) [`StackError`]
//! for it. Together these give every error in the system:
//! - a [`StatusCode`] for classification (retry policy, logging policy,
//!   whether the message is safe to hand back to a caller);
//! - a chained `{:?}` rendering across crate boundaries, so a
//!   `RpcError` caused by a `StreamingError` caused by a `ProviderError`
//!   prints as one readable stack instead of an opaque wrapper.

mod ext;
mod status_code;

pub use ext::ErrorExt;
pub use ext::PlainError;
pub use ext::boxed;
pub use snafu::Location;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use status_code::StatusMeta;

pub use relay_stack_trace_macro::stack_trace_debug;

/// Implemented (generated by `#[stack_trace_debug]`) for every error enum in
/// the workspace so the chain can be walked without knowing concrete types.
pub trait StackError: std::error::Error {
    /// The source location captured at the point this error was raised, if
    /// the variant carries a `#[snafu(implicit)]` [`Location`] field.
    fn location_opt(&self) -> Option<Location>;

    /// The next error in the chain, if this variant wraps another
    /// `StackError` (as opposed to a foreign error type or nothing).
    fn next(&self) -> Option<&dyn StackError>;
}

/// Render `err` and its full causal chain into `f`, one line per level,
/// including source locations where available. Used by the `Debug` impl
/// that `#[stack_trace_debug]` generates.
pub fn write_error_chain(
    err: &dyn StackError,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{err}")?;
    if let Some(location) = err.location_opt() {
        writeln!(f, "  at {location}")?;
    }
    let mut cursor = err.next();
    let mut depth = 1;
    while let Some(next) = cursor {
        writeln!(f, "caused by [{depth}]: {next}")?;
        if let Some(location) = next.location_opt() {
            writeln!(f, "  at {location}")?;
        }
        cursor = next.next();
        depth += 1;
    }
    Ok(())
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
