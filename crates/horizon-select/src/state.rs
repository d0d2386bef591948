//! Shared state of one select instance.

use std::sync::Arc;

use horizon_select_core::{Host, NodeId, Property, Signal};
use parking_lot::RwLock;

use crate::config::SelectConfig;
use crate::logging::targets;
use crate::option_id::{OptionContent, OptionEntry, OptionId};
use crate::registry::OptionRegistry;

/// The single source of truth shared by a container and its parts.
///
/// Mutators return whether anything changed and emit the matching signal
/// after all locks are released, so slots may call back into the state.
pub(crate) struct SelectState<C: OptionContent> {
    pub(crate) host: Arc<dyn Host>,
    pub(crate) root: NodeId,
    config: SelectConfig,
    open: Property<bool>,
    selection: Property<Option<OptionEntry<C>>>,
    registry: RwLock<OptionRegistry<C>>,
    anchor: Property<Option<NodeId>>,
    invalid: Property<bool>,
    pub(crate) open_changed: Arc<Signal<bool>>,
    pub(crate) selection_changed: Arc<Signal<Option<OptionId>>>,
    pub(crate) anchor_changed: Arc<Signal<Option<NodeId>>>,
    pub(crate) invalid_changed: Arc<Signal<bool>>,
}

impl<C: OptionContent> SelectState<C> {
    pub(crate) fn new(host: Arc<dyn Host>, root: NodeId, config: SelectConfig) -> Self {
        Self {
            host,
            root,
            invalid: Property::new(config.invalid),
            config,
            open: Property::new(false),
            selection: Property::new(None),
            registry: RwLock::new(OptionRegistry::new()),
            anchor: Property::new(None),
            open_changed: Arc::new(Signal::new()),
            selection_changed: Arc::new(Signal::new()),
            anchor_changed: Arc::new(Signal::new()),
            invalid_changed: Arc::new(Signal::new()),
        }
    }

    pub(crate) fn config(&self) -> &SelectConfig {
        &self.config
    }

    // =========================================================================
    // Open state
    // =========================================================================

    pub(crate) fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Returns `true` if the open flag changed.
    pub(crate) fn set_open(&self, open: bool) -> bool {
        if !self.open.set(open) {
            return false;
        }
        tracing::debug!(target: targets::STATE, open, "open state changed");
        self.open_changed.emit(open);
        true
    }

    /// Flip the open flag and return the new value.
    pub(crate) fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub(crate) fn selection(&self) -> Option<OptionEntry<C>> {
        self.selection.get()
    }

    pub(crate) fn selected_id(&self) -> Option<OptionId> {
        self.selection.with(|selection| selection.as_ref().map(|entry| entry.id.clone()))
    }

    /// Replace the selection with `entry` unless it already holds that id.
    ///
    /// Returns `true` if the selection changed.
    pub(crate) fn commit_selection(&self, entry: OptionEntry<C>) -> bool {
        let already_selected = self
            .selection
            .with(|selection| selection.as_ref().is_some_and(|current| current.id == entry.id));
        if already_selected {
            tracing::trace!(target: targets::STATE, id = %entry.id, "option already selected");
            return false;
        }

        let id = entry.id.clone();
        self.selection.set_silent(Some(entry));
        tracing::debug!(target: targets::STATE, id = %id, "selection changed");
        self.selection_changed.emit(Some(id));
        true
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Returns `true` if the id was new.
    pub(crate) fn register_option(&self, id: OptionId, content: C) -> bool {
        let inserted = self.registry.write().insert(id.clone(), content);
        tracing::trace!(target: targets::STATE, id = %id, inserted, "registered option");
        inserted
    }

    pub(crate) fn with_registry<R>(&self, f: impl FnOnce(&OptionRegistry<C>) -> R) -> R {
        f(&self.registry.read())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub(crate) fn is_invalid(&self) -> bool {
        self.invalid.get()
    }

    /// Returns `true` if the validation state changed.
    pub(crate) fn set_invalid(&self, invalid: bool) -> bool {
        if !self.invalid.set(invalid) {
            return false;
        }
        tracing::debug!(target: targets::STATE, invalid, "validation state changed");
        self.invalid_changed.emit(invalid);
        true
    }

    // =========================================================================
    // Anchor
    // =========================================================================

    pub(crate) fn anchor(&self) -> Option<NodeId> {
        self.anchor.get()
    }

    /// Publish the node the panel is positioned against.
    pub(crate) fn publish_anchor(&self, node: Option<NodeId>) {
        if self.anchor.set(node) {
            tracing::trace!(target: targets::STATE, ?node, "anchor changed");
            self.anchor_changed.emit(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_select_core::{Document, Size};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state() -> SelectState<&'static str> {
        let doc = Document::new(Size::new(800.0, 600.0));
        let root = doc.create_node(None, "select").unwrap();
        SelectState::new(doc, root, SelectConfig::default())
    }

    #[test]
    fn test_starts_closed_and_empty() {
        let state = state();
        assert!(!state.is_open());
        assert!(state.selection().is_none());
        assert!(state.anchor().is_none());
    }

    #[test]
    fn test_set_open_emits_once_per_change() {
        let state = state();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        state.open_changed.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(state.set_open(true));
        assert!(!state.set_open(true));
        assert!(!state.toggle());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_commit_selection_replaces() {
        let state = state();
        assert!(state.commit_selection(OptionEntry::new("a", "A")));
        assert!(!state.commit_selection(OptionEntry::new("a", "A")));
        assert!(state.commit_selection(OptionEntry::new("b", "B")));
        assert_eq!(state.selection(), Some(OptionEntry::new("b", "B")));
    }

    #[test]
    fn test_invalid_seeded_from_config() {
        let doc = Document::new(Size::new(800.0, 600.0));
        let root = doc.create_node(None, "select").unwrap();
        let state: SelectState<&'static str> =
            SelectState::new(doc, root, SelectConfig::new().with_invalid(true));
        assert!(state.is_invalid());
        assert!(!state.set_invalid(true));
        assert!(state.set_invalid(false));
        assert!(!state.is_invalid());
        assert!(state.config().invalid);
    }

    #[test]
    fn test_publish_anchor_notifies_on_change() {
        let state = state();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let s = seen.clone();
        state.anchor_changed.connect(move |&node| s.lock().push(node));

        let node = state.host.create_node(None, "trigger").unwrap();
        state.publish_anchor(Some(node));
        state.publish_anchor(Some(node));
        state.publish_anchor(None);
        assert_eq!(*seen.lock(), vec![Some(node), None]);
    }
}
