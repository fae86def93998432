pub mod error;
pub mod id;
pub mod layout;
pub mod model;
pub mod partition;
pub mod preference;
pub mod view;

pub use error::{SeatError, SeatResult};
pub use id::ObjectId;
pub use layout::{ResolvedLayout, Viewport, resolve_custom, resolve_layout};
pub use model::*;
pub use partition::{Partition, Zone, ZoneKind, partition};
pub use preference::{FileStore, KeyValueStore, LayoutPreference, MemoryStore};
pub use view::{ViewState, VisibilityFilter};
