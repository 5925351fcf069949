//! Named binary tag (NBT) model and streaming codec.
//!
//! The value model is the closed [`Tag`] enum; [`CompoundTag`] and
//! [`ListTag`] layer the container semantics on top, and the codec in
//! [`codec`] reads and writes the big-endian wire format under size and
//! depth guards.

pub mod codec;
pub mod compound;
pub mod list;
pub mod size_tracker;
pub mod tag;

pub use codec::{NbtFile, MAX_DEPTH};
pub use compound::CompoundTag;
pub use list::ListTag;
pub use size_tracker::SizeTracker;
pub use tag::Tag;
