use crate::document::{canonical_id, BlockState, StructureDocument};
use lodestone_common::BlockPos;
use lodestone_nbt::CompoundTag;

/// Placement collaborator: whatever applies a decoded document to a live
/// world. Block mutation and entity spawning stay on the other side of this
/// seam.
pub trait StructureSink {
    fn set_block(&mut self, position: BlockPos, state: &BlockState);

    /// `kind` is the canonical entity identifier resolved from the record's
    /// "id" payload field; `nbt` is the full opaque payload.
    fn spawn_entity(&mut self, kind: &str, position: BlockPos, nbt: &CompoundTag);
}

impl StructureDocument {
    /// Walks the document into a sink: blocks first, then entities at
    /// origin plus their grid-relative position.
    pub fn place(&self, origin: BlockPos, sink: &mut dyn StructureSink) {
        for (position, state) in &self.blocks {
            sink.set_block(origin.offset(*position), state);
        }

        for entity in &self.entities {
            let kind = canonical_id(entity.nbt.get_str("id"));
            sink.spawn_entity(&kind, origin.offset(entity.block_position), &entity.nbt);
        }
    }
}
