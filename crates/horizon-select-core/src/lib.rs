//! Core systems for Horizon Select.
//!
//! This crate provides the building blocks the select widget is assembled
//! from:
//!
//! - [`Signal`] / [`ConnectionGuard`]: type-safe notifications with RAII
//!   disconnection
//! - [`Property`] / [`VersionedProperty`]: shared values with change detection
//! - [`NodeTree`]: the element hierarchy used for hit-testing
//! - [`Host`]: the surface widgets are written against ([`LayoutHost`] for
//!   measuring, [`RenderTarget`] for the portal layer, plus events and
//!   deferred tasks)
//! - [`Document`]: the in-process reference host
//!
//! Everything is driven synchronously from a single event loop. Types are
//! `Send + Sync`, but no parallel mutation is assumed.

pub mod document;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod node;
pub mod property;
pub mod signal;
pub mod task;

pub use document::Document;
pub use error::{HostError, Result};
pub use event::{FocusChange, LayoutChange, PointerEvent};
pub use geometry::{Point, Rect, Size};
pub use host::{ClickHandler, Host, LayoutHost, PortalHandle, RenderTarget};
pub use logging::PerfSpan;
pub use node::{NodeError, NodeId, NodeResult, NodeTree};
pub use property::{Property, VersionedProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{BoxedTask, TaskId, TaskQueue};
