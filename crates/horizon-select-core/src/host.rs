//! The surface widgets are written against.
//!
//! Widgets never talk to a concrete document. They hold an `Arc<dyn Host>`
//! and use it to create nodes, listen to clicks and document-wide events,
//! measure nodes, render panels in the portal layer, and defer work to the
//! next task flush. [`Document`](crate::Document) is the in-process
//! implementation.

use std::sync::Arc;

use slotmap::new_key_type;

use crate::error::Result;
use crate::event::{FocusChange, LayoutChange, PointerEvent};
use crate::geometry::{Point, Rect, Size};
use crate::node::NodeId;
use crate::signal::{ConnectionGuard, Signal};
use crate::task::{BoxedTask, TaskId};

new_key_type! {
    /// Handle to a panel mounted in the portal layer.
    pub struct PortalHandle;
}

/// A per-node click handler.
pub type ClickHandler = Box<dyn Fn(&PointerEvent) + Send + Sync>;

/// Measures laid-out nodes.
pub trait LayoutHost {
    /// Current bounding rectangle of `node` in viewport coordinates, or `None`
    /// if the node has not been laid out.
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    /// Current scroll offset of the page.
    fn scroll_offset(&self) -> Point;
}

/// Renders panels outside the normal node hierarchy.
pub trait RenderTarget {
    /// Mount `panel` in the portal layer. The panel starts hidden.
    fn mount(&self, panel: NodeId) -> Result<PortalHandle>;

    /// Remove a mounted panel from the portal layer.
    fn unmount(&self, handle: PortalHandle) -> Result<()>;

    /// Show or hide a mounted panel.
    fn set_visible(&self, handle: PortalHandle, visible: bool) -> Result<()>;
}

/// Everything a widget needs from its document.
pub trait Host: LayoutHost + RenderTarget + Send + Sync {
    /// Create a node, appended to `parent` or under the document root when
    /// `parent` is `None`.
    fn create_node(&self, parent: Option<NodeId>, name: &str) -> Result<NodeId>;

    /// Remove a node and its subtree along with their click handlers.
    fn remove_node(&self, node: NodeId) -> Result<()>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains_node(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Install a click handler on `node`. The handler stays installed until
    /// the returned guard is dropped.
    fn on_click(&self, node: NodeId, handler: ClickHandler) -> Result<ConnectionGuard<PointerEvent>>;

    /// Document-level pointer-down, delivered for every press before any
    /// node click handler runs. Click handlers cannot suppress it.
    fn pointer_down(&self) -> &Arc<Signal<PointerEvent>>;

    /// Viewport resized.
    fn resized(&self) -> &Arc<Signal<Size>>;

    /// A node's bounding rectangle changed.
    fn layout_changed(&self) -> &Arc<Signal<LayoutChange>>;

    /// Keyboard focus moved.
    fn focus_changed(&self) -> &Arc<Signal<FocusChange>>;

    /// Defer `task` to the next task flush.
    fn post_task(&self, task: BoxedTask) -> TaskId;

    /// Cancel a deferred task that has not run yet.
    fn cancel_task(&self, id: TaskId) -> bool;
}
