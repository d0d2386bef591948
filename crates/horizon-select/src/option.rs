//! A selectable entry inside the content panel.

use std::sync::Arc;

use horizon_select_core::{ConnectionGuard, NodeId, PointerEvent};
use parking_lot::Mutex;

use crate::error::SelectResult;
use crate::logging::targets;
use crate::option_id::{OptionContent, OptionEntry, OptionId};
use crate::state::SelectState;

struct Attachment {
    node: NodeId,
    _click: ConnectionGuard<PointerEvent>,
}

struct OptionShared<C: OptionContent> {
    state: Arc<SelectState<C>>,
    panel: NodeId,
    id: OptionId,
    content: C,
    attachment: Mutex<Option<Attachment>>,
    /// Default value this option last applied itself for.
    applied_default: Mutex<Option<OptionId>>,
}

impl<C: OptionContent> OptionShared<C> {
    fn select(&self) {
        self.state.set_open(false);
        if self.state.selected_id().as_ref() == Some(&self.id) {
            tracing::trace!(target: targets::OPTION, id = %self.id, "re-clicked selected option");
            return;
        }
        self.state
            .commit_selection(OptionEntry::new(self.id.clone(), self.content.clone()));
    }
}

/// One option of a select.
///
/// Created through [`Content::option`](crate::Content::option); attaching it
/// registers it with the select and adds its node to the panel.
pub struct SelectOption<C: OptionContent> {
    shared: Arc<OptionShared<C>>,
}

impl<C: OptionContent> SelectOption<C> {
    pub(crate) fn new(state: Arc<SelectState<C>>, panel: NodeId, id: OptionId, content: C) -> Self {
        Self {
            shared: Arc::new(OptionShared {
                state,
                panel,
                id,
                content,
                attachment: Mutex::new(None),
                applied_default: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> &OptionId {
        &self.shared.id
    }

    pub fn content(&self) -> &C {
        &self.shared.content
    }

    /// The option's node once attached.
    pub fn node(&self) -> Option<NodeId> {
        self.shared.attachment.lock().as_ref().map(|a| a.node)
    }

    pub fn is_attached(&self) -> bool {
        self.shared.attachment.lock().is_some()
    }

    pub fn is_selected(&self) -> bool {
        self.shared.state.selected_id().as_ref() == Some(&self.shared.id)
    }

    /// Register the option, create its node in the panel and apply the
    /// default selection if it matches.
    ///
    /// Attaching twice is a no-op.
    pub fn attach(&self) -> SelectResult<()> {
        let shared = &self.shared;
        {
            let mut attachment = shared.attachment.lock();
            if attachment.is_some() {
                return Ok(());
            }

            let host = &shared.state.host;
            let node = host.create_node(Some(shared.panel), "select-option")?;
            let weak = Arc::downgrade(shared);
            let click = host.on_click(
                node,
                Box::new(move |_: &PointerEvent| {
                    if let Some(shared) = weak.upgrade() {
                        shared.select();
                    }
                }),
            );
            let click = match click {
                Ok(click) => click,
                Err(err) => {
                    if let Err(cleanup) = host.remove_node(node) {
                        tracing::trace!(target: targets::OPTION, %cleanup, "option node already removed");
                    }
                    return Err(err.into());
                }
            };

            shared
                .state
                .register_option(shared.id.clone(), shared.content.clone());
            *attachment = Some(Attachment {
                node,
                _click: click,
            });
        }
        tracing::trace!(target: targets::OPTION, id = %shared.id, "option attached");
        self.sync_default();
        Ok(())
    }

    /// Select this option and close the select, as a click would.
    ///
    /// Clicking the option that is already selected only closes.
    pub fn click(&self) {
        self.shared.select();
    }

    /// Apply the container's default value if it names this option.
    ///
    /// Runs at most once per distinct default value and never opens or
    /// closes the select. Returns `true` if the selection was committed.
    pub fn sync_default(&self) -> bool {
        let shared = &self.shared;
        let Some(default) = shared.state.config().default_value.clone() else {
            return false;
        };
        if default != shared.id {
            return false;
        }
        {
            let mut applied = shared.applied_default.lock();
            if applied.as_ref() == Some(&default) {
                return false;
            }
            *applied = Some(default);
        }
        tracing::debug!(target: targets::OPTION, id = %shared.id, "applying default selection");
        shared
            .state
            .commit_selection(OptionEntry::new(shared.id.clone(), shared.content.clone()))
    }

    /// Remove the option's node. The registry entry stays.
    pub fn detach(&self) {
        let Some(attachment) = self.shared.attachment.lock().take() else {
            return;
        };
        if let Err(err) = self.shared.state.host.remove_node(attachment.node) {
            tracing::trace!(target: targets::OPTION, %err, "option node already removed");
        }
    }
}

impl<C: OptionContent> Drop for SelectOption<C> {
    fn drop(&mut self) {
        self.detach();
    }
}
