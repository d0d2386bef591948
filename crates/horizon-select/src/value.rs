//! Display of the current selection.

use std::fmt::Display;
use std::sync::Arc;

use crate::option_id::OptionContent;
use crate::state::SelectState;

/// What the value part should display.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueProjection<C> {
    /// Content of the selected option.
    Selected(C),
    /// Nothing selected; the configured placeholder.
    Placeholder(String),
    /// Nothing selected and no placeholder.
    Empty,
}

/// Read-only view of the selection.
pub struct Value<C: OptionContent> {
    state: Arc<SelectState<C>>,
}

impl<C: OptionContent> Value<C> {
    pub(crate) fn new(state: Arc<SelectState<C>>) -> Self {
        Self { state }
    }

    pub fn project(&self) -> ValueProjection<C> {
        if let Some(entry) = self.state.selection() {
            return ValueProjection::Selected(entry.content);
        }
        match &self.state.config().placeholder {
            Some(placeholder) => ValueProjection::Placeholder(placeholder.clone()),
            None => ValueProjection::Empty,
        }
    }
}

impl<C: OptionContent + Display> Value<C> {
    /// The projection as text. `None` when there is nothing to show.
    pub fn text(&self) -> Option<String> {
        match self.project() {
            ValueProjection::Selected(content) => Some(content.to_string()),
            ValueProjection::Placeholder(placeholder) => Some(placeholder),
            ValueProjection::Empty => None,
        }
    }
}
