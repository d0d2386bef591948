//! In-process reference host.
//!
//! [`Document`] owns a node tree, the laid-out rectangles of its nodes, the
//! page scroll offset and viewport size, keyboard focus, a portal layer for
//! floating panels, and a deferred task queue. It is driven from the outside:
//! whoever embeds it feeds in layout results, resizes, focus moves and
//! pointer clicks, and calls [`Document::flush_tasks`] once per frame.
//!
//! # Click dispatch
//!
//! [`Document::click`] first fires the document-level
//! [`pointer_down`](Host::pointer_down) signal, the way a press precedes the
//! click it produces. Nothing a click handler does can hide the press from
//! document listeners. The click is then delivered to the handlers of the
//! target node and of each ancestor up to the document root, until one stops
//! propagation. A click with no target is a click on the page background and
//! only reaches the document-level listeners.
//!
//! # Example
//!
//! ```
//! use horizon_select_core::{Document, Host, Point, PointerEvent, Rect, Size};
//!
//! let doc = Document::new(Size::new(800.0, 600.0));
//! let button = doc.create_node(None, "button").unwrap();
//! doc.set_layout(button, Rect::new(10.0, 10.0, 80.0, 24.0));
//!
//! let _guard = doc
//!     .on_click(button, Box::new(|event: &PointerEvent| event.stop_propagation()))
//!     .unwrap();
//! let event = doc.click(Some(button), Point::new(20.0, 20.0));
//! assert!(event.is_propagation_stopped());
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use slotmap::{SecondaryMap, SlotMap};

use crate::error::{HostError, Result};
use crate::event::{FocusChange, LayoutChange, PointerEvent};
use crate::geometry::{Point, Rect, Size};
use crate::host::{ClickHandler, Host, LayoutHost, PortalHandle, RenderTarget};
use crate::logging::{span_names, targets};
use crate::node::{NodeError, NodeId, NodeTree};
use crate::property::Property;
use crate::signal::{ConnectionGuard, Signal};
use crate::task::{BoxedTask, TaskId, TaskQueue};

#[derive(Debug, Clone, Copy)]
struct PortalEntry {
    panel: NodeId,
    visible: bool,
}

/// The reference [`Host`] implementation.
pub struct Document {
    tree: RwLock<NodeTree>,
    root: NodeId,
    portal_root: NodeId,
    layout: RwLock<SecondaryMap<NodeId, Rect>>,
    scroll: Property<Point>,
    viewport: Property<Size>,
    focused: Property<Option<NodeId>>,
    portals: Mutex<SlotMap<PortalHandle, PortalEntry>>,
    click_signals: Mutex<SecondaryMap<NodeId, Arc<Signal<PointerEvent>>>>,
    pointer_down: Arc<Signal<PointerEvent>>,
    resized: Arc<Signal<Size>>,
    layout_changed: Arc<Signal<LayoutChange>>,
    focus_changed: Arc<Signal<FocusChange>>,
    tasks: Mutex<TaskQueue>,
}

impl Document {
    /// Create an empty document with the given viewport size.
    pub fn new(viewport: Size) -> Arc<Self> {
        let mut tree = NodeTree::new();
        let root = tree.create("document");
        let portal_root = tree.create("portal-layer");

        Arc::new(Self {
            tree: RwLock::new(tree),
            root,
            portal_root,
            layout: RwLock::new(SecondaryMap::new()),
            scroll: Property::new(Point::ZERO),
            viewport: Property::new(viewport),
            focused: Property::new(None),
            portals: Mutex::new(SlotMap::with_key()),
            click_signals: Mutex::new(SecondaryMap::new()),
            pointer_down: Arc::new(Signal::new()),
            resized: Arc::new(Signal::new()),
            layout_changed: Arc::new(Signal::new()),
            focus_changed: Arc::new(Signal::new()),
            tasks: Mutex::new(TaskQueue::new()),
        })
    }

    /// The document root. Nodes created without a parent live under it.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Parent of every mounted panel.
    pub fn portal_root(&self) -> NodeId {
        self.portal_root
    }

    /// Run `f` with read access to the node tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&NodeTree) -> R) -> R {
        f(&self.tree.read())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Record the laid-out rectangle of `node`.
    ///
    /// Emits `layout_changed` when the rectangle differs from the previous one.
    pub fn set_layout(&self, node: NodeId, rect: Rect) {
        if !self.tree.read().contains(node) {
            tracing::debug!(target: targets::DOCUMENT, ?node, "ignoring layout for unknown node");
            return;
        }
        let changed = self.layout.write().insert(node, rect) != Some(rect);
        if changed {
            tracing::trace!(target: targets::DOCUMENT, ?node, ?rect, "layout changed");
            self.layout_changed.emit(LayoutChange {
                node,
                rect: Some(rect),
            });
        }
    }

    /// Forget the rectangle of `node`, as when it is taken out of layout.
    pub fn clear_layout(&self, node: NodeId) {
        if self.layout.write().remove(node).is_some() {
            self.layout_changed.emit(LayoutChange { node, rect: None });
        }
    }

    /// Scroll the page. Listeners pick up the new offset the next time they
    /// measure.
    pub fn set_scroll_offset(&self, offset: Point) {
        self.scroll.set(offset);
    }

    /// Resize the viewport, emitting `resized` if the size changed.
    pub fn resize(&self, size: Size) {
        if self.viewport.set(size) {
            tracing::debug!(target: targets::DOCUMENT, width = size.width, height = size.height, "viewport resized");
            self.resized.emit(size);
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move keyboard focus, emitting `focus_changed` if it moved.
    pub fn set_focus(&self, node: Option<NodeId>) {
        if let Some(previous) = self.focused.replace(node) {
            self.focus_changed.emit(FocusChange {
                previous,
                current: node,
            });
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    // =========================================================================
    // Pointer dispatch
    // =========================================================================

    /// Press and click at `position` on `target` (`None` for the page
    /// background).
    ///
    /// Returns the dispatched click event so callers can inspect whether
    /// propagation was stopped.
    pub fn click(&self, target: Option<NodeId>, position: Point) -> PointerEvent {
        let _span = tracing::trace_span!(target: targets::DOCUMENT, span_names::DISPATCH, clicked = ?target).entered();
        self.pointer_down.emit(PointerEvent::new(target, position));

        let event = PointerEvent::new(target, position);

        let path: Vec<NodeId> = match target {
            Some(node) => {
                let tree = self.tree.read();
                match tree.ancestors(node) {
                    Ok(ancestors) => std::iter::once(node).chain(ancestors).collect(),
                    Err(_) => {
                        tracing::debug!(target: targets::DOCUMENT, ?node, "click on unknown node treated as background");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        for node in path {
            if event.is_propagation_stopped() {
                tracing::trace!(target: targets::DOCUMENT, ?node, "propagation stopped");
                break;
            }
            let signal = self.click_signals.lock().get(node).cloned();
            if let Some(signal) = signal {
                signal.emit(event.clone());
            }
        }
        event
    }

    // =========================================================================
    // Portals
    // =========================================================================

    /// Whether the panel behind `handle` is mounted and visible.
    pub fn is_portal_visible(&self, handle: PortalHandle) -> bool {
        self.portals.lock().get(handle).is_some_and(|entry| entry.visible)
    }

    /// Panels currently shown in the portal layer, in mount order.
    pub fn visible_panels(&self) -> Vec<NodeId> {
        self.portals
            .lock()
            .values()
            .filter(|entry| entry.visible)
            .map(|entry| entry.panel)
            .collect()
    }

    /// Number of mounted panels, visible or not.
    pub fn portal_count(&self) -> usize {
        self.portals.lock().len()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Run every task posted before this call.
    ///
    /// Tasks posted while flushing wait for the next flush. Returns the number
    /// of tasks run.
    pub fn flush_tasks(&self) -> usize {
        let _span = tracing::trace_span!(target: targets::TASK, span_names::TASK).entered();
        let batch = self.tasks.lock().drain();
        let count = batch.len();
        for task in batch {
            task();
        }
        if count > 0 {
            tracing::trace!(target: targets::TASK, count, "flushed deferred tasks");
        }
        count
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.lock().pending_count()
    }
}

impl LayoutHost for Document {
    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.layout.read().get(node).copied()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll.get()
    }
}

impl RenderTarget for Document {
    fn mount(&self, panel: NodeId) -> Result<PortalHandle> {
        self.tree.write().set_parent(panel, Some(self.portal_root))?;
        let handle = self.portals.lock().insert(PortalEntry {
            panel,
            visible: false,
        });
        tracing::debug!(target: targets::DOCUMENT, ?panel, ?handle, "mounted portal");
        Ok(handle)
    }

    fn unmount(&self, handle: PortalHandle) -> Result<()> {
        let entry = self
            .portals
            .lock()
            .remove(handle)
            .ok_or(HostError::InvalidPortal)?;
        tracing::debug!(target: targets::DOCUMENT, panel = ?entry.panel, ?handle, "unmounted portal");
        Ok(())
    }

    fn set_visible(&self, handle: PortalHandle, visible: bool) -> Result<()> {
        let mut portals = self.portals.lock();
        let entry = portals.get_mut(handle).ok_or(HostError::InvalidPortal)?;
        entry.visible = visible;
        Ok(())
    }
}

impl Host for Document {
    fn create_node(&self, parent: Option<NodeId>, name: &str) -> Result<NodeId> {
        let parent = parent.unwrap_or(self.root);
        Ok(self.tree.write().create_child(parent, name)?)
    }

    fn remove_node(&self, node: NodeId) -> Result<()> {
        if node == self.root || node == self.portal_root {
            return Err(NodeError::InvalidNodeId.into());
        }
        let focus_lost = {
            let mut tree = self.tree.write();
            let focus_inside = self
                .focused
                .get()
                .is_some_and(|focused| tree.is_inclusive_descendant(focused, node));
            let node_name = tree.name(node)?.to_owned();
            tree.destroy(node)?;
            tracing::trace!(target: targets::DOCUMENT, ?node, %node_name, "removed node subtree");

            self.click_signals.lock().retain(|id, _| tree.contains(id));
            self.layout.write().retain(|id, _| tree.contains(id));
            self.portals.lock().retain(|_, entry| tree.contains(entry.panel));
            focus_inside
        };
        if focus_lost {
            self.set_focus(None);
        }
        Ok(())
    }

    fn contains_node(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.read().is_inclusive_descendant(node, ancestor)
    }

    fn on_click(&self, node: NodeId, handler: ClickHandler) -> Result<ConnectionGuard<PointerEvent>> {
        if !self.tree.read().contains(node) {
            return Err(NodeError::InvalidNodeId.into());
        }
        let signal = {
            let mut signals = self.click_signals.lock();
            match signals.get(node) {
                Some(signal) => signal.clone(),
                None => {
                    let signal = Arc::new(Signal::new());
                    signals.insert(node, signal.clone());
                    signal
                }
            }
        };
        Ok(ConnectionGuard::connect(&signal, move |event| handler(event)))
    }

    fn pointer_down(&self) -> &Arc<Signal<PointerEvent>> {
        &self.pointer_down
    }

    fn resized(&self) -> &Arc<Signal<Size>> {
        &self.resized
    }

    fn layout_changed(&self) -> &Arc<Signal<LayoutChange>> {
        &self.layout_changed
    }

    fn focus_changed(&self) -> &Arc<Signal<FocusChange>> {
        &self.focus_changed
    }

    fn post_task(&self, task: BoxedTask) -> TaskId {
        self.tasks.lock().post(task)
    }

    fn cancel_task(&self, id: TaskId) -> bool {
        self.tasks.lock().cancel(id)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.read().node_count())
            .field("portals", &self.portal_count())
            .field("viewport", &self.viewport.get())
            .field("scroll", &self.scroll.get())
            .finish()
    }
}
