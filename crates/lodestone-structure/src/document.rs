use crate::upgrade::DataUpgrader;
use lodestone_common::{BlockPos, LodestoneError, Position, Result};
use lodestone_logger::{log, LogSeverity};
use lodestone_nbt::{CompoundTag, ListTag, NbtFile, SizeTracker};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Sentinel material for palette entries with no "Name" key and for names
/// that resolve to nothing.
pub const AIR: &str = "air";

/// A resolved palette entry: material identifier plus named string
/// properties (facing direction, waterlogged, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockState {
    pub material: String,
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(material: impl Into<String>) -> Self {
        BlockState {
            material: material.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        BlockState::new(AIR)
    }

    /// Resolves one raw palette compound (`{Name, Properties?}`).
    fn from_palette_entry(entry: &CompoundTag) -> Result<Self> {
        if !entry.contains("Name") {
            return Ok(BlockState::air());
        }

        let mut state = BlockState::new(canonical_id(entry.get_str("Name")));

        if entry.contains("Properties") {
            for (key, value) in entry.get_compound("Properties") {
                let value = value.as_str().ok_or_else(|| {
                    LodestoneError::StructuralError(format!(
                        "block property {} is not a string",
                        key
                    ))
                })?;
                state.properties.insert(key.clone(), value.to_string());
            }
        }

        Ok(state)
    }
}

/// One free-form entity entry. The payload compound is opaque to the
/// decoder; downstream placement reads its "id" to resolve the entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub position: Position,
    pub block_position: BlockPos,
    pub nbt: CompoundTag,
}

/// Decoded structure template: dimensions, a position-keyed block map and
/// the entity list. Built once by [`StructureDocument::from_compound`];
/// rotation produces a new document rather than mutating this one.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDocument {
    pub dimensions: (i32, i32, i32),
    pub blocks: HashMap<BlockPos, BlockState>,
    pub entities: Vec<EntityRecord>,
}

impl StructureDocument {
    /// Interprets a decoded root compound as a structure document.
    ///
    /// "size" and "blocks" are required; the palette comes either as the
    /// flat "palette" list or the legacy "palettes" list-of-lists, where
    /// every sub-palette is applied against the shared block list and later
    /// entries overwrite earlier positions.
    pub fn from_compound(data: &CompoundTag) -> Result<Self> {
        if !data.contains("size") {
            return Err(LodestoneError::StructuralError(
                "missing required key: size".to_string(),
            ));
        }
        let size = data.get_list("size");
        let dimensions = (size.get_int(0), size.get_int(1), size.get_int(2));

        if !data.contains("blocks") {
            return Err(LodestoneError::StructuralError(
                "missing required key: blocks".to_string(),
            ));
        }
        let block_entries = data.get_list("blocks");

        let mut blocks = HashMap::new();
        if data.contains("palette") {
            apply_palette(data.get_list("palette"), block_entries, &mut blocks)?;
        } else if data.contains("palettes") {
            let palettes = data.get_list("palettes");
            for i in 0..palettes.len() {
                apply_palette(palettes.get_list(i), block_entries, &mut blocks)?;
            }
        } else {
            return Err(LodestoneError::StructuralError(
                "missing required key: palette or palettes".to_string(),
            ));
        }

        let entities = decode_entities(data.get_list("entities"));

        Ok(StructureDocument {
            dimensions,
            blocks,
            entities,
        })
    }

    /// Decodes a raw byte buffer (plain or gzip-wrapped) into a document,
    /// running the migration collaborator once before interpretation.
    pub fn load(
        bytes: &[u8],
        tracker: &mut SizeTracker,
        upgrader: &dyn DataUpgrader,
    ) -> Result<Self> {
        let file = NbtFile::read_detect(bytes, tracker)?;
        let root = file.root.as_compound().ok_or_else(|| {
            LodestoneError::StructuralError("root tag is not a compound".to_string())
        })?;

        let declared_version = root.get_int("DataVersion");
        let upgraded = upgrader.upgrade(root.clone(), declared_version)?;

        let document = Self::from_compound(&upgraded)?;
        log(
            format!(
                "Decoded structure: {:?} dimensions, {} blocks, {} entities",
                document.dimensions,
                document.blocks.len(),
                document.entities.len()
            ),
            LogSeverity::Debug,
        );
        Ok(document)
    }

    /// File-loading convenience with an unbounded size budget.
    pub fn load_file(path: impl AsRef<Path>, upgrader: &dyn DataUpgrader) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        Self::load(&bytes, &mut SizeTracker::unbounded(), upgrader)
    }
}

fn apply_palette(
    palette: &ListTag,
    block_entries: &ListTag,
    blocks: &mut HashMap<BlockPos, BlockState>,
) -> Result<()> {
    for entry in block_entries {
        let entry = entry.as_compound().ok_or_else(|| {
            LodestoneError::StructuralError("block entry is not a compound".to_string())
        })?;

        let pos = entry.get_list("pos");
        let position = BlockPos::new(pos.get_int(0), pos.get_int(1), pos.get_int(2));

        let index = entry.get_int("state");
        if index < 0 || index as usize >= palette.len() {
            return Err(LodestoneError::StructuralError(format!(
                "palette index {} out of range for palette of {} entries",
                index,
                palette.len()
            )));
        }

        let state = BlockState::from_palette_entry(palette.get_compound(index as usize))?;
        blocks.insert(position, state);
    }
    Ok(())
}

fn decode_entities(entries: &ListTag) -> Vec<EntityRecord> {
    let mut entities = Vec::new();
    for entry in entries {
        let Some(entry) = entry.as_compound() else {
            continue;
        };

        // Entries without an "nbt" payload carry nothing placeable; drop
        // them without erroring.
        if !entry.contains("nbt") {
            continue;
        }

        let pos = entry.get_list("pos");
        let block_pos = entry.get_list("blockPos");

        entities.push(EntityRecord {
            position: Position::new(pos.get_double(0), pos.get_double(1), pos.get_double(2)),
            block_position: BlockPos::new(
                block_pos.get_int(0),
                block_pos.get_int(1),
                block_pos.get_int(2),
            ),
            nbt: entry.get_compound("nbt").clone(),
        });
    }
    entities
}

/// Strips a leading `namespace:` prefix and case-folds, so
/// "minecraft:Chest" becomes "chest".
pub(crate) fn canonical_id(name: &str) -> String {
    let stripped = name.split_once(':').map_or(name, |(_, rest)| rest);
    stripped.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrade::NoopUpgrader;
    use assert_matches::assert_matches;
    use lodestone_nbt::Tag;

    fn int_list(values: &[i32]) -> Tag {
        let mut list = ListTag::new();
        for &v in values {
            assert!(list.push(Tag::Int(v)));
        }
        Tag::List(list)
    }

    fn double_list(values: &[f64]) -> Tag {
        let mut list = ListTag::new();
        for &v in values {
            assert!(list.push(Tag::Double(v)));
        }
        Tag::List(list)
    }

    fn palette_entry(name: Option<&str>, properties: &[(&str, &str)]) -> Tag {
        let mut entry = CompoundTag::new();
        if let Some(name) = name {
            entry.set_str("Name", name);
        }
        if !properties.is_empty() {
            let mut props = CompoundTag::new();
            for (key, value) in properties {
                props.set_str(*key, *value);
            }
            entry.insert("Properties", Tag::Compound(props));
        }
        Tag::Compound(entry)
    }

    fn block_entry(pos: [i32; 3], state: i32) -> Tag {
        let mut entry = CompoundTag::new();
        entry.insert("pos", int_list(&pos));
        entry.set_int("state", state);
        Tag::Compound(entry)
    }

    /// A minimal 1x1x1 structure: a single chest facing north.
    fn chest_structure() -> CompoundTag {
        let mut root = CompoundTag::new();
        root.set_int("DataVersion", 1631);
        root.insert("size", int_list(&[1, 1, 1]));

        let mut palette = ListTag::new();
        assert!(palette.push(palette_entry(
            Some("minecraft:chest"),
            &[("facing", "north")]
        )));
        root.insert("palette", Tag::List(palette));

        let mut blocks = ListTag::new();
        assert!(blocks.push(block_entry([0, 0, 0], 0)));
        root.insert("blocks", Tag::List(blocks));

        root.insert("entities", Tag::List(ListTag::new()));
        root
    }

    #[test]
    fn test_decode_chest_structure() {
        let document = StructureDocument::from_compound(&chest_structure()).unwrap();

        assert_eq!(document.dimensions, (1, 1, 1));
        assert_eq!(document.blocks.len(), 1);
        assert!(document.entities.is_empty());

        let state = &document.blocks[&BlockPos::new(0, 0, 0)];
        assert_eq!(state.material, "chest");
        assert_eq!(state.properties.get("facing").map(String::as_str), Some("north"));
    }

    #[test]
    fn test_missing_name_resolves_to_air() {
        let mut root = chest_structure();
        let mut palette = ListTag::new();
        assert!(palette.push(palette_entry(None, &[])));
        root.insert("palette", Tag::List(palette));

        let document = StructureDocument::from_compound(&root).unwrap();
        let state = &document.blocks[&BlockPos::new(0, 0, 0)];
        assert_eq!(state.material, AIR);
        assert!(state.properties.is_empty());
    }

    #[test]
    fn test_missing_size_is_structural_error() {
        let mut root = chest_structure();
        root.remove("size");
        assert_matches!(
            StructureDocument::from_compound(&root),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_missing_blocks_is_structural_error() {
        let mut root = chest_structure();
        root.remove("blocks");
        assert_matches!(
            StructureDocument::from_compound(&root),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_missing_palette_is_structural_error() {
        let mut root = chest_structure();
        root.remove("palette");
        assert_matches!(
            StructureDocument::from_compound(&root),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_palette_index_out_of_range() {
        let mut root = chest_structure();
        let mut blocks = ListTag::new();
        assert!(blocks.push(block_entry([0, 0, 0], 4)));
        root.insert("blocks", Tag::List(blocks));

        assert_matches!(
            StructureDocument::from_compound(&root),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_non_string_property_is_structural_error() {
        let mut root = chest_structure();
        let mut entry = CompoundTag::new();
        entry.set_str("Name", "minecraft:chest");
        let mut props = CompoundTag::new();
        props.set_int("facing", 2);
        entry.insert("Properties", Tag::Compound(props));

        let mut palette = ListTag::new();
        assert!(palette.push(Tag::Compound(entry)));
        root.insert("palette", Tag::List(palette));

        assert_matches!(
            StructureDocument::from_compound(&root),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_legacy_palettes_merge_against_shared_blocks() {
        let mut root = chest_structure();
        root.remove("palette");

        let mut first = ListTag::new();
        assert!(first.push(palette_entry(Some("minecraft:stone"), &[])));
        let mut second = ListTag::new();
        assert!(second.push(palette_entry(Some("minecraft:dirt"), &[])));

        let mut palettes = ListTag::new();
        assert!(palettes.push(Tag::List(first)));
        assert!(palettes.push(Tag::List(second)));
        root.insert("palettes", Tag::List(palettes));

        let document = StructureDocument::from_compound(&root).unwrap();
        // Later palettes win at the shared position
        assert_eq!(document.blocks[&BlockPos::new(0, 0, 0)].material, "dirt");
    }

    #[test]
    fn test_entities_without_nbt_are_dropped() {
        let mut root = chest_structure();

        let mut with_nbt = CompoundTag::new();
        with_nbt.insert("pos", double_list(&[0.5, 0.0, 0.5]));
        with_nbt.insert("blockPos", int_list(&[0, 0, 0]));
        let mut payload = CompoundTag::new();
        payload.set_str("id", "minecraft:creeper");
        with_nbt.insert("nbt", Tag::Compound(payload));

        let mut without_nbt = CompoundTag::new();
        without_nbt.insert("pos", double_list(&[1.5, 0.0, 1.5]));
        without_nbt.insert("blockPos", int_list(&[1, 0, 1]));

        let mut entities = ListTag::new();
        assert!(entities.push(Tag::Compound(with_nbt)));
        assert!(entities.push(Tag::Compound(without_nbt)));
        root.insert("entities", Tag::List(entities));

        let document = StructureDocument::from_compound(&root).unwrap();
        assert_eq!(document.entities.len(), 1);

        let entity = &document.entities[0];
        assert_eq!(entity.position, Position::new(0.5, 0.0, 0.5));
        assert_eq!(entity.block_position, BlockPos::new(0, 0, 0));
        assert_eq!(entity.nbt.get_str("id"), "minecraft:creeper");
    }

    #[test]
    fn test_load_round_trip_with_gzip() {
        let root = Tag::Compound(chest_structure());
        let file = NbtFile::new(String::new(), root);

        let mut bytes = Vec::new();
        file.write_gzip(&mut bytes).unwrap();

        let document =
            StructureDocument::load(&bytes, &mut SizeTracker::unbounded(), &NoopUpgrader)
                .unwrap();
        assert_eq!(document.dimensions, (1, 1, 1));
        assert_eq!(document.blocks.len(), 1);
    }

    #[test]
    fn test_load_rejects_non_compound_root() {
        let file = NbtFile::new(String::new(), Tag::Int(1));
        let mut bytes = Vec::new();
        file.write(&mut bytes).unwrap();

        assert_matches!(
            StructureDocument::load(&bytes, &mut SizeTracker::unbounded(), &NoopUpgrader),
            Err(LodestoneError::StructuralError(_))
        );
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(canonical_id("minecraft:Chest"), "chest");
        assert_eq!(canonical_id("mod:some_block"), "some_block");
        assert_eq!(canonical_id("STONE"), "stone");
    }
}
