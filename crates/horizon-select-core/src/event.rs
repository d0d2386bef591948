//! Events delivered by the host document.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::geometry::{Point, Rect};
use crate::node::NodeId;

/// A pointer press or click routed through the document.
///
/// Clones share the propagation flag, so a handler that calls
/// [`stop_propagation`](Self::stop_propagation) on its copy stops the
/// dispatch of every other copy as well.
#[derive(Debug, Clone)]
pub struct PointerEvent {
    target: Option<NodeId>,
    position: Point,
    propagation_stopped: Arc<AtomicBool>,
}

impl PointerEvent {
    /// Create a new event. A `None` target is the page background.
    pub fn new(target: Option<NodeId>, position: Point) -> Self {
        Self {
            target,
            position,
            propagation_stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The innermost node under the pointer, if any.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Pointer position in viewport coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Stop the click from reaching the handlers of ancestor nodes.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::SeqCst)
    }
}

/// A node's bounding rectangle changed. `rect` is `None` once the node has
/// no layout anymore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutChange {
    pub node: NodeId,
    pub rect: Option<Rect>,
}

/// Keyboard focus moved between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<NodeId>,
    pub current: Option<NodeId>,
}

impl FocusChange {
    /// Whether `node` gained focus with this change.
    pub fn gained(&self, node: NodeId) -> bool {
        self.current == Some(node) && self.previous != Some(node)
    }

    /// Whether `node` lost focus with this change.
    pub fn lost(&self, node: NodeId) -> bool {
        self.previous == Some(node) && self.current != Some(node)
    }
}
