pub mod codec;
mod error;
pub mod types;

pub use error::*;
pub use types::*;

/// Name of the logical transport channel carrying location packages.
/// Both peers must register the same channel name.
pub const LOCATIONS_CHANNEL: &str = "locations";
