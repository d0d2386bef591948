//! Logging and debugging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_select_core=debug,horizon_select=trace")
//!     .init();
//! ```

/// Span names used throughout Horizon Select for tracing.
pub mod span_names {
    /// Pointer event dispatch span.
    pub const DISPATCH: &str = "horizon_select::dispatch";
    /// Deferred task flush span.
    pub const TASK: &str = "horizon_select::task";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Node tree target.
    pub const NODE: &str = "horizon_select_core::node";
    /// Document host target.
    pub const DOCUMENT: &str = "horizon_select_core::document";
    /// Deferred task target.
    pub const TASK: &str = "horizon_select_core::task";
}

/// Performance span guard for timing operations.
///
/// The span stays entered until the guard is dropped.
///
/// ```ignore
/// let _span = PerfSpan::new("recompute_position");
/// // ... timed work ...
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_select::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
