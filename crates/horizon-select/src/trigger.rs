//! The button that opens and closes the select.

use std::sync::Arc;

use horizon_select_core::{ConnectionGuard, FocusChange, NodeId, PointerEvent, Property, Signal};
use parking_lot::Mutex;

use crate::error::{SelectError, SelectResult};
use crate::logging::targets;
use crate::option_id::OptionContent;
use crate::state::SelectState;

struct TriggerGuards {
    _click: ConnectionGuard<PointerEvent>,
    _focus: ConnectionGuard<FocusChange>,
}

struct TriggerShared<C: OptionContent> {
    state: Arc<SelectState<C>>,
    node: NodeId,
    focused: Property<bool>,
    focus_changed: Arc<Signal<bool>>,
    guards: Mutex<Option<TriggerGuards>>,
}

impl<C: OptionContent> TriggerShared<C> {
    fn activate(&self) {
        if self.state.config().disabled {
            tracing::trace!(target: targets::TRIGGER, "trigger disabled, ignoring click");
            return;
        }
        let open = self.state.toggle();
        tracing::debug!(target: targets::TRIGGER, open, "trigger toggled");
    }

    fn handle_focus(&self, change: &FocusChange) {
        let focused = if change.gained(self.node) {
            true
        } else if change.lost(self.node) {
            false
        } else {
            return;
        };
        if self.focused.set(focused) {
            self.focus_changed.emit(focused);
        }
    }
}

/// Toggles the select and serves as the anchor the content is placed against.
///
/// The content treats a press on its own trigger as inside, so the trigger's
/// click alone decides whether the select opens or closes. A press on another
/// select's trigger is outside and dismisses this select first. An enabled
/// trigger stops its click from reaching the handlers of ancestor nodes.
pub struct Trigger<C: OptionContent> {
    shared: Arc<TriggerShared<C>>,
}

impl<C: OptionContent> Trigger<C> {
    pub(crate) fn new(state: Arc<SelectState<C>>) -> SelectResult<Self> {
        let node = state.host.create_node(Some(state.root), "select-trigger")?;
        Ok(Self {
            shared: Arc::new(TriggerShared {
                state,
                node,
                focused: Property::new(false),
                focus_changed: Arc::new(Signal::new()),
                guards: Mutex::new(None),
            }),
        })
    }

    /// The trigger's node, for layout and focus.
    pub fn node(&self) -> NodeId {
        self.shared.node
    }

    /// Hook up click and focus handling and publish the anchor.
    ///
    /// Attaching twice is a no-op.
    pub fn attach(&self) -> SelectResult<()> {
        let mut guards = self.shared.guards.lock();
        if guards.is_some() {
            return Ok(());
        }
        let host = &self.shared.state.host;

        let weak = Arc::downgrade(&self.shared);
        let click = host.on_click(
            self.shared.node,
            Box::new(move |event: &PointerEvent| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if !shared.state.config().disabled {
                    event.stop_propagation();
                }
                shared.activate();
            }),
        )?;

        let weak = Arc::downgrade(&self.shared);
        let focus = ConnectionGuard::connect(host.focus_changed(), move |change| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_focus(change);
            }
        });

        *guards = Some(TriggerGuards {
            _click: click,
            _focus: focus,
        });
        drop(guards);

        tracing::trace!(target: targets::TRIGGER, node = ?self.shared.node, "trigger attached");
        self.shared.state.publish_anchor(Some(self.shared.node));
        Ok(())
    }

    /// Republish the anchor. Call once per render pass.
    pub fn render(&self) -> SelectResult<()> {
        if !self.is_attached() {
            return Err(SelectError::PartDetached);
        }
        self.shared.state.publish_anchor(Some(self.shared.node));
        Ok(())
    }

    /// Remove the handlers and withdraw the anchor.
    pub fn detach(&self) {
        if self.shared.guards.lock().take().is_none() {
            return;
        }
        if self.shared.state.anchor() == Some(self.shared.node) {
            self.shared.state.publish_anchor(None);
        }
        tracing::trace!(target: targets::TRIGGER, node = ?self.shared.node, "trigger detached");
    }

    pub fn is_attached(&self) -> bool {
        self.shared.guards.lock().is_some()
    }

    /// Toggle the select as a click on the trigger would.
    pub fn click(&self) {
        self.shared.activate();
    }

    pub fn is_focused(&self) -> bool {
        self.shared.focused.get()
    }

    /// Whether the trigger should render its invalid style.
    pub fn is_invalid(&self) -> bool {
        self.shared.state.is_invalid()
    }

    /// Emitted with the new focus state when the trigger gains or loses focus.
    pub fn focus_changed(&self) -> &Arc<Signal<bool>> {
        &self.shared.focus_changed
    }
}

impl<C: OptionContent> Drop for Trigger<C> {
    fn drop(&mut self) {
        self.detach();
        if let Err(err) = self.shared.state.host.remove_node(self.shared.node) {
            tracing::trace!(target: targets::TRIGGER, %err, "trigger node already removed");
        }
    }
}
