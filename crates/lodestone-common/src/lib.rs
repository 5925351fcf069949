pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::LodestoneError;
pub use types::{BlockPos, Position, Result};
