pub mod catalog;
pub mod compositor;
pub mod config;
pub mod drawing;
mod error;
pub mod host;
pub mod icon_cache;
pub mod layer;
pub mod map_data;
pub mod memory;
pub mod render;
pub mod selector;
pub mod sync;

pub use catalog::{Catalog, CustomTypeInfo, PoiInstance, PrefabDescriptor, TypeRegistry};
pub use compositor::{OverlayCompositor, PassSummary, RecordOutcome, SkipReason};
pub use config::OverlayConfig;
pub use error::OverlayError;
pub use host::{OverlayHost, OverlayManager};
pub use icon_cache::IconCache;
pub use layer::OverlayLayer;
pub use map_data::{CoordMapper, MapInfo, OverlayPos};
pub use render::{ICON_SIZE, IconRenderer, ISOMETRIC_ROTATION, RenderRequest};
pub use sync::{PeerId, Role, SyncController, SyncState, Transport};
