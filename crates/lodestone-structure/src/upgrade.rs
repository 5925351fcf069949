use lodestone_common::Result;
use lodestone_nbt::CompoundTag;

/// Schema version this decoder understands.
pub const CURRENT_DATA_VERSION: i32 = 1631;

/// Migration collaborator: rewrites a tag tree declared at `from_version`
/// into the current schema. Invoked synchronously, once per load, before
/// the document decoder runs. Implementations are expected to be opaque and
/// already thread-safe; the version-specific rules are out of scope here.
pub trait DataUpgrader {
    fn upgrade(&self, data: CompoundTag, from_version: i32) -> Result<CompoundTag>;
}

/// Identity upgrader for streams already at [`CURRENT_DATA_VERSION`].
pub struct NoopUpgrader;

impl DataUpgrader for NoopUpgrader {
    fn upgrade(&self, data: CompoundTag, _from_version: i32) -> Result<CompoundTag> {
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_upgrader_is_identity() {
        let mut data = CompoundTag::new();
        data.set_int("DataVersion", 500);
        data.set_str("marker", "unchanged");

        let upgraded = NoopUpgrader.upgrade(data.clone(), 500).unwrap();
        assert_eq!(upgraded, data);
    }
}
