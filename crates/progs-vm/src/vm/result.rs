//! Execution result types

/// Result of dispatching a single statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionResult {
    /// Continue to the next statement
    Continue,
    /// A frame was left; the loop checks the exit depth
    Returned,
}
