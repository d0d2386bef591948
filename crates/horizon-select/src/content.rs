//! The floating panel holding the options.
//!
//! The panel node is mounted in the host's portal layer when the content
//! attaches and stays mounted until it detaches; opening and closing only
//! toggle its visibility. This keeps options attached (and able to apply the
//! default selection) while the panel is closed.
//!
//! While the content is *active* (attached and the select open) it holds
//! three document listeners:
//!
//! - pointer-down, closing the select when the target is outside both the
//!   panel and the select's own anchor
//! - viewport resize, re-running placement
//! - layout changes of the anchor or panel, re-running placement
//!
//! The listeners are connection guards owned by the content. They are
//! installed on activation and dropped on deactivation, so at most one set
//! exists per content at any time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_select_core::{
    ConnectionGuard, LayoutChange, NodeId, PerfSpan, PointerEvent, PortalHandle, Property, Size,
    TaskId, VersionedProperty,
};
use parking_lot::Mutex;

use crate::config::{ContentConfig, HorizontalAlign};
use crate::error::{SelectError, SelectResult};
use crate::logging::targets;
use crate::option::SelectOption;
use crate::option_id::{OptionContent, OptionId};
use crate::position::{compute_position, AnchorRect, Placement};
use crate::state::SelectState;

/// A value together with the version it was published at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub version: u64,
}

// =============================================================================
// Runtime
// =============================================================================

/// Listeners on shared state, held while attached.
struct StateListeners {
    _open: ConnectionGuard<bool>,
    _anchor: ConnectionGuard<Option<NodeId>>,
}

/// Document listeners, held while active.
struct ActiveListeners {
    _pointer_down: ConnectionGuard<PointerEvent>,
    _resized: ConnectionGuard<Size>,
    _layout: ConnectionGuard<LayoutChange>,
}

#[derive(Default)]
struct ContentRuntime {
    portal: Option<PortalHandle>,
    state_listeners: Option<StateListeners>,
    active: Option<ActiveListeners>,
    remeasure: Option<TaskId>,
}

struct ContentShared<C: OptionContent> {
    state: Arc<SelectState<C>>,
    panel: NodeId,
    align: Property<HorizontalAlign>,
    runtime: Mutex<ContentRuntime>,
    visible: AtomicBool,
    placement: VersionedProperty<Placement>,
    anchor_rect: VersionedProperty<Option<AnchorRect>>,
}

impl<C: OptionContent> ContentShared<C> {
    fn is_attached(&self) -> bool {
        self.runtime.lock().portal.is_some()
    }

    fn is_active(&self) -> bool {
        self.runtime.lock().active.is_some()
    }

    fn set_visible(&self, visible: bool) {
        let Some(handle) = self.runtime.lock().portal else {
            return;
        };
        match self.state.host.set_visible(handle, visible) {
            Ok(()) => {
                self.visible.store(visible, Ordering::SeqCst);
            }
            Err(err) => {
                tracing::warn!(target: targets::CONTENT, %err, visible, "failed to toggle panel visibility");
            }
        }
    }

    /// Measure the anchor and panel and store a new placement.
    fn recompute(&self) -> Placement {
        let _span = PerfSpan::new("select_content_position");
        let host = &self.state.host;

        let anchor = self
            .state
            .anchor()
            .and_then(|node| host.bounding_rect(node))
            .map(|rect| AnchorRect::new(rect, host.scroll_offset()));
        self.anchor_rect.set(anchor);

        let panel_size = host.bounding_rect(self.panel).map(|rect| rect.size);
        let placement = compute_position(anchor.as_ref(), panel_size, self.align.get());
        if self.placement.set(placement) {
            tracing::trace!(target: targets::CONTENT, ?placement, "panel placement changed");
        }
        placement
    }

    /// The anchor counts as inside: its own click handler decides whether a
    /// press on it closes the select.
    fn is_inside(&self, target: NodeId) -> bool {
        let host = &self.state.host;
        host.contains_node(self.panel, target)
            || self
                .state
                .anchor()
                .is_some_and(|anchor| host.contains_node(anchor, target))
    }

    fn handle_pointer_down(&self, event: &PointerEvent) {
        if event.target().is_some_and(|target| self.is_inside(target)) {
            tracing::trace!(target: targets::CONTENT, "pointer-down inside panel or anchor");
            return;
        }
        tracing::debug!(
            target: targets::CONTENT,
            node = ?event.target(),
            position = ?event.position(),
            "pointer-down outside panel, closing"
        );
        self.state.set_open(false);
    }

    fn tracks_layout_of(&self, change: &LayoutChange) -> bool {
        change.node == self.panel || Some(change.node) == self.state.anchor()
    }
}

/// Install document listeners that forward to `shared` while it lives.
fn install_active_listeners<C: OptionContent>(shared: &Arc<ContentShared<C>>) -> ActiveListeners {
    let host = &shared.state.host;

    let weak = Arc::downgrade(shared);
    let pointer_down = ConnectionGuard::connect(host.pointer_down(), move |event| {
        if let Some(shared) = weak.upgrade() {
            shared.handle_pointer_down(event);
        }
    });

    let weak = Arc::downgrade(shared);
    let resized = ConnectionGuard::connect(host.resized(), move |_| {
        if let Some(shared) = weak.upgrade() {
            refresh(&shared);
        }
    });

    let weak = Arc::downgrade(shared);
    let layout = ConnectionGuard::connect(host.layout_changed(), move |change| {
        if let Some(shared) = weak.upgrade() {
            if shared.tracks_layout_of(change) {
                refresh(&shared);
            }
        }
    });

    tracing::trace!(target: targets::CONTENT, panel = ?shared.panel, "installed document listeners");
    ActiveListeners {
        _pointer_down: pointer_down,
        _resized: resized,
        _layout: layout,
    }
}

/// Recompute placement and, if it still waits on the panel width, schedule
/// another measurement for the next task flush.
fn refresh<C: OptionContent>(shared: &Arc<ContentShared<C>>) {
    if shared.recompute() == Placement::Pending {
        schedule_remeasure(shared);
    }
}

fn schedule_remeasure<C: OptionContent>(shared: &Arc<ContentShared<C>>) {
    let mut runtime = shared.runtime.lock();
    if runtime.remeasure.is_some() {
        return;
    }
    let weak = Arc::downgrade(shared);
    let id = shared.state.host.post_task(Box::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.runtime.lock().remeasure = None;
        if shared.is_active() {
            tracing::trace!(target: targets::CONTENT, "deferred re-measure");
            refresh(&shared);
        }
    }));
    runtime.remeasure = Some(id);
}

fn cancel_remeasure<C: OptionContent>(shared: &ContentShared<C>) {
    let pending = shared.runtime.lock().remeasure.take();
    if let Some(id) = pending {
        shared.state.host.cancel_task(id);
    }
}

/// Activate or deactivate according to the attached and open flags.
fn sync_active<C: OptionContent>(shared: &Arc<ContentShared<C>>) {
    let should_be_active = shared.is_attached() && shared.state.is_open();

    let mut runtime = shared.runtime.lock();
    if should_be_active && runtime.active.is_none() {
        runtime.active = Some(install_active_listeners(shared));
        drop(runtime);

        tracing::debug!(target: targets::CONTENT, panel = ?shared.panel, "content activated");
        shared.set_visible(true);
        shared.recompute();
        schedule_remeasure(shared);
    } else if !should_be_active && runtime.active.is_some() {
        let listeners = runtime.active.take();
        drop(runtime);
        drop(listeners);

        tracing::debug!(target: targets::CONTENT, panel = ?shared.panel, "content deactivated");
        shared.set_visible(false);
        cancel_remeasure(shared);
    }
}

// =============================================================================
// Content
// =============================================================================

/// The floating panel part.
pub struct Content<C: OptionContent> {
    shared: Arc<ContentShared<C>>,
}

impl<C: OptionContent> Content<C> {
    pub(crate) fn new(state: Arc<SelectState<C>>, config: ContentConfig) -> SelectResult<Self> {
        let panel = state.host.create_node(Some(state.root), "select-content")?;
        Ok(Self {
            shared: Arc::new(ContentShared {
                state,
                panel,
                align: Property::new(config.align),
                runtime: Mutex::new(ContentRuntime::default()),
                visible: AtomicBool::new(false),
                placement: VersionedProperty::new(Placement::Unanchored),
                anchor_rect: VersionedProperty::new(None),
            }),
        })
    }

    /// Create an option rendered inside this panel.
    pub fn option(&self, id: impl Into<OptionId>, content: C) -> SelectOption<C> {
        SelectOption::new(self.shared.state.clone(), self.shared.panel, id.into(), content)
    }

    /// The panel's root node. Lay it out to give right-aligned placement a
    /// width to work with.
    pub fn panel_node(&self) -> NodeId {
        self.shared.panel
    }

    /// Mount the panel in the portal layer and start following the select.
    ///
    /// Attaching twice is a no-op.
    pub fn attach(&self) -> SelectResult<()> {
        let shared = &self.shared;
        {
            let mut runtime = shared.runtime.lock();
            if runtime.portal.is_some() {
                return Ok(());
            }
            runtime.portal = Some(shared.state.host.mount(shared.panel)?);

            let weak = Arc::downgrade(shared);
            let open = ConnectionGuard::connect(&shared.state.open_changed, move |_| {
                if let Some(shared) = weak.upgrade() {
                    sync_active(&shared);
                }
            });
            let weak = Arc::downgrade(shared);
            let anchor = ConnectionGuard::connect(&shared.state.anchor_changed, move |_| {
                if let Some(shared) = weak.upgrade() {
                    if shared.is_active() {
                        refresh(&shared);
                    }
                }
            });
            runtime.state_listeners = Some(StateListeners {
                _open: open,
                _anchor: anchor,
            });
        }
        tracing::debug!(target: targets::CONTENT, panel = ?shared.panel, "content attached");
        sync_active(shared);
        Ok(())
    }

    /// Unmount the panel and drop every listener.
    pub fn detach(&self) -> SelectResult<()> {
        let shared = &self.shared;
        let (portal, state_listeners, active) = {
            let mut runtime = shared.runtime.lock();
            (
                runtime.portal.take(),
                runtime.state_listeners.take(),
                runtime.active.take(),
            )
        };
        drop(state_listeners);
        drop(active);
        cancel_remeasure(shared);

        let Some(handle) = portal else {
            return Ok(());
        };
        shared.visible.store(false, Ordering::SeqCst);
        shared.state.host.unmount(handle)?;
        tracing::debug!(target: targets::CONTENT, panel = ?shared.panel, "content detached");
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.shared.is_attached()
    }

    /// Whether the document listeners are installed.
    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    /// Whether the panel is shown in the portal layer.
    pub fn is_visible(&self) -> bool {
        self.shared.visible.load(Ordering::SeqCst)
    }

    pub fn align(&self) -> HorizontalAlign {
        self.shared.align.get()
    }

    /// Change the alignment. While active, the listeners are re-installed and
    /// the placement recomputed.
    pub fn set_align(&self, align: HorizontalAlign) {
        if !self.shared.align.set(align) {
            return;
        }
        tracing::debug!(target: targets::CONTENT, ?align, "alignment changed");

        let mut runtime = self.shared.runtime.lock();
        if runtime.active.is_none() {
            return;
        }
        let old = runtime.active.take();
        drop(old);
        runtime.active = Some(install_active_listeners(&self.shared));
        drop(runtime);
        refresh(&self.shared);
    }

    /// Last computed placement.
    pub fn position(&self) -> Snapshot<Placement> {
        let (value, version) = self.shared.placement.snapshot();
        Snapshot { value, version }
    }

    /// Anchor rectangle measured by the last placement pass.
    pub fn anchor_rect(&self) -> Snapshot<Option<AnchorRect>> {
        let (value, version) = self.shared.anchor_rect.snapshot();
        Snapshot { value, version }
    }

    /// Re-run placement now.
    pub fn relayout(&self) -> SelectResult<Placement> {
        if !self.shared.is_attached() {
            return Err(SelectError::PartDetached);
        }
        let placement = self.shared.recompute();
        if placement == Placement::Pending && self.shared.is_active() {
            schedule_remeasure(&self.shared);
        }
        Ok(placement)
    }
}

impl<C: OptionContent> Drop for Content<C> {
    fn drop(&mut self) {
        if let Err(err) = self.detach() {
            tracing::warn!(target: targets::CONTENT, %err, "failed to detach content on drop");
        }
        if let Err(err) = self.shared.state.host.remove_node(self.shared.panel) {
            tracing::trace!(target: targets::CONTENT, %err, "panel node already removed");
        }
    }
}
