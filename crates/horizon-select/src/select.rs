//! The select container.

use std::sync::Arc;

use horizon_select_core::{Host, NodeId, Signal};

use crate::config::{ContentConfig, SelectConfig};
use crate::content::Content;
use crate::error::{SelectError, SelectResult};
use crate::logging::targets;
use crate::option_id::{OptionContent, OptionEntry, OptionId};
use crate::state::SelectState;
use crate::trigger::Trigger;
use crate::value::Value;

/// A headless select.
///
/// The container owns the shared state and is the only way to create parts,
/// so parts of different selects never see each other's state.
///
/// # Example
///
/// ```
/// use horizon_select::{ContentConfig, Select, SelectConfig, ValueProjection};
/// use horizon_select_core::{Document, Size};
///
/// let doc = Document::new(Size::new(800.0, 600.0));
/// let select = Select::new(doc.clone(), SelectConfig::new().with_default_value("modelY")).unwrap();
///
/// let trigger = select.trigger().unwrap();
/// let value = select.value();
/// let content = select.content(ContentConfig::default()).unwrap();
/// let model3 = content.option("model3", "Model 3");
/// let model_y = content.option("modelY", "Model Y");
///
/// trigger.attach().unwrap();
/// content.attach().unwrap();
/// model3.attach().unwrap();
/// model_y.attach().unwrap();
///
/// assert_eq!(value.project(), ValueProjection::Selected("Model Y"));
/// assert!(!select.is_open());
///
/// trigger.click();
/// model3.click();
/// assert_eq!(value.text().as_deref(), Some("Model 3"));
/// assert!(!select.is_open());
/// ```
pub struct Select<C: OptionContent> {
    state: Arc<SelectState<C>>,
}

impl<C: OptionContent> Select<C> {
    /// Create a closed select with no selection.
    pub fn new(host: Arc<dyn Host>, config: SelectConfig) -> SelectResult<Self> {
        let root = host.create_node(None, "select")?;
        tracing::debug!(target: targets::STATE, ?root, ?config, "created select");
        Ok(Self {
            state: Arc::new(SelectState::new(host, root, config)),
        })
    }

    // =========================================================================
    // Parts
    // =========================================================================

    pub fn trigger(&self) -> SelectResult<Trigger<C>> {
        Trigger::new(self.state.clone())
    }

    pub fn value(&self) -> Value<C> {
        Value::new(self.state.clone())
    }

    pub fn content(&self, config: ContentConfig) -> SelectResult<Content<C>> {
        Content::new(self.state.clone(), config)
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn config(&self) -> &SelectConfig {
        self.state.config()
    }

    /// The container's root node.
    pub fn root_node(&self) -> NodeId {
        self.state.root
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn selection(&self) -> Option<OptionEntry<C>> {
        self.state.selection()
    }

    pub fn selected_id(&self) -> Option<OptionId> {
        self.state.selected_id()
    }

    /// Registered options in registration order.
    pub fn options(&self) -> Vec<OptionEntry<C>> {
        self.state.with_registry(|registry| registry.iter().cloned().collect())
    }

    pub fn option_count(&self) -> usize {
        self.state.with_registry(|registry| registry.len())
    }

    /// Open the select. Returns `false` if it was already open or is disabled.
    pub fn open(&self) -> bool {
        if self.state.config().disabled {
            return false;
        }
        self.state.set_open(true)
    }

    /// Close the select. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.state.set_open(false)
    }

    /// Whether the select is marked invalid. Starts from
    /// [`SelectConfig::invalid`].
    pub fn is_invalid(&self) -> bool {
        self.state.is_invalid()
    }

    /// Mark the select valid or invalid. Open state and selection are not
    /// affected. Returns `false` if nothing changed.
    pub fn set_invalid(&self, invalid: bool) -> bool {
        self.state.set_invalid(invalid)
    }

    /// Select a registered option by id without changing the open state.
    pub fn select(&self, id: impl Into<OptionId>) -> SelectResult<bool> {
        let id = id.into();
        let content = self
            .state
            .with_registry(|registry| registry.get(&id).cloned())
            .ok_or_else(|| SelectError::UnknownOption(id.clone()))?;
        Ok(self.state.commit_selection(OptionEntry { id, content }))
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with the new open flag.
    pub fn open_changed(&self) -> &Arc<Signal<bool>> {
        &self.state.open_changed
    }

    /// Emitted with the newly selected id.
    pub fn selection_changed(&self) -> &Arc<Signal<Option<OptionId>>> {
        &self.state.selection_changed
    }

    /// Emitted with the new validation state.
    pub fn invalid_changed(&self) -> &Arc<Signal<bool>> {
        &self.state.invalid_changed
    }
}

impl<C: OptionContent> Drop for Select<C> {
    fn drop(&mut self) {
        self.state.set_open(false);
        if let Err(err) = self.state.host.remove_node(self.state.root) {
            tracing::trace!(target: targets::STATE, %err, "select root already removed");
        }
    }
}
