//! Horizon Select: a composable, headless select widget.
//!
//! A select is assembled from five parts that share one state:
//!
//! - [`Select`]: the container. Owns the state and creates the other parts.
//! - [`Trigger`]: toggles the select and is the anchor the panel is placed
//!   against.
//! - [`Value`]: projects the current selection (or placeholder).
//! - [`Content`]: the floating panel, rendered in the host's portal layer,
//!   dismissed by pointer-downs outside of it.
//! - [`SelectOption`]: one selectable entry inside the panel.
//!
//! Parts render into an [`horizon_select_core::Host`]; the reference
//! [`Document`](horizon_select_core::Document) is enough to drive a select
//! in tests or headless tools. Option content is an arbitrary cloneable type
//! chosen by the caller.
//!
//! Parts are attached explicitly. Every listener a part installs is a
//! connection guard it owns, so detaching or dropping a part removes its
//! listeners.

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod option;
pub mod option_id;
pub mod position;
pub mod registry;
pub mod select;
mod state;
pub mod trigger;
pub mod value;

pub use config::{ContentConfig, HorizontalAlign, SelectConfig};
pub use content::{Content, Snapshot};
pub use error::{SelectError, SelectResult};
pub use option::SelectOption;
pub use option_id::{OptionContent, OptionEntry, OptionId};
pub use position::{compute_position, AnchorRect, PanelPosition, Placement};
pub use registry::OptionRegistry;
pub use select::Select;
pub use trigger::Trigger;
pub use value::{Value, ValueProjection};
