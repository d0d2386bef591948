//! Tracing targets for the select widget.
//!
//! Enable them with a filter such as
//! `horizon_select=debug,horizon_select::content=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Shared state transitions (open, selection, anchor).
    pub const STATE: &str = "horizon_select::state";
    /// Trigger part.
    pub const TRIGGER: &str = "horizon_select::trigger";
    /// Content part: listeners, visibility and positioning.
    pub const CONTENT: &str = "horizon_select::content";
    /// Option part.
    pub const OPTION: &str = "horizon_select::option";
}
