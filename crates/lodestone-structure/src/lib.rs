//! Structure template documents decoded from NBT streams: a 3D block grid
//! with a resolved palette, an entity list, a 90-degree rotation transform
//! and the seams toward the placement and schema-migration collaborators.

pub mod document;
pub mod place;
pub mod rotation;
pub mod upgrade;

pub use document::{BlockState, EntityRecord, StructureDocument, AIR};
pub use place::StructureSink;
pub use rotation::Direction;
pub use upgrade::{DataUpgrader, NoopUpgrader, CURRENT_DATA_VERSION};
