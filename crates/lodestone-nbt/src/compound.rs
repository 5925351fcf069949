use crate::list::{ListTag, EMPTY_LIST};
use crate::tag::{Tag, TYPE_ANY_NUMERIC};
use once_cell::sync::Lazy;
use std::collections::hash_map;
use std::collections::HashMap;

static EMPTY_COMPOUND: Lazy<CompoundTag> = Lazy::new(CompoundTag::new);

/// A keyed, unordered tag container. Keys are unique; inserting under an
/// existing key replaces the previous value.
///
/// The typed getters are deliberately lenient: an absent key or a value of
/// the wrong type yields the type's zero value instead of an error, so
/// forward-incompatible or partially-specified trees can still be read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundTag {
    entries: HashMap<String, Tag>,
}

impl CompoundTag {
    pub fn new() -> Self {
        CompoundTag {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    /// Inserts a tag, returning the previous value if the key was taken.
    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.entries.insert(key.into(), tag)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Type id of the value under `key`, or 0 when absent.
    pub fn type_of(&self, key: &str) -> u8 {
        self.entries.get(key).map_or(0, Tag::get_type_id)
    }

    /// True when `key` holds a value of the given type id. Id 99 matches
    /// any numeric variant.
    pub fn contains_type(&self, key: &str, type_id: u8) -> bool {
        match self.entries.get(key) {
            Some(tag) if type_id == TYPE_ANY_NUMERIC => tag.is_numeric(),
            Some(tag) => tag.get_type_id() == type_id,
            None => false,
        }
    }

    pub fn set_byte(&mut self, key: impl Into<String>, value: i8) {
        self.entries.insert(key.into(), Tag::Byte(value));
    }

    pub fn set_short(&mut self, key: impl Into<String>, value: i16) {
        self.entries.insert(key.into(), Tag::Short(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.entries.insert(key.into(), Tag::Int(value));
    }

    pub fn set_long(&mut self, key: impl Into<String>, value: i64) {
        self.entries.insert(key.into(), Tag::Long(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.entries.insert(key.into(), Tag::Float(value));
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) {
        self.entries.insert(key.into(), Tag::Double(value));
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Tag::String(value.into()));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set_byte(key, value as i8);
    }

    pub fn set_byte_array(&mut self, key: impl Into<String>, value: Vec<i8>) {
        self.entries.insert(key.into(), Tag::ByteArray(value));
    }

    pub fn set_int_array(&mut self, key: impl Into<String>, value: Vec<i32>) {
        self.entries.insert(key.into(), Tag::IntArray(value));
    }

    pub fn set_long_array(&mut self, key: impl Into<String>, value: Vec<i64>) {
        self.entries.insert(key.into(), Tag::LongArray(value));
    }

    pub fn get_byte(&self, key: &str) -> i8 {
        self.entries.get(key).and_then(Tag::as_i8).unwrap_or(0)
    }

    pub fn get_short(&self, key: &str) -> i16 {
        self.entries.get(key).and_then(Tag::as_i16).unwrap_or(0)
    }

    pub fn get_int(&self, key: &str) -> i32 {
        self.entries.get(key).and_then(Tag::as_i32).unwrap_or(0)
    }

    pub fn get_long(&self, key: &str) -> i64 {
        self.entries.get(key).and_then(Tag::as_i64).unwrap_or(0)
    }

    pub fn get_float(&self, key: &str) -> f32 {
        self.entries.get(key).and_then(Tag::as_f32).unwrap_or(0.0)
    }

    pub fn get_double(&self, key: &str) -> f64 {
        self.entries.get(key).and_then(Tag::as_f64).unwrap_or(0.0)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get_byte(key) != 0
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.entries.get(key).and_then(Tag::as_str).unwrap_or("")
    }

    pub fn get_byte_array(&self, key: &str) -> &[i8] {
        match self.entries.get(key) {
            Some(Tag::ByteArray(bytes)) => bytes,
            _ => &[],
        }
    }

    pub fn get_int_array(&self, key: &str) -> &[i32] {
        match self.entries.get(key) {
            Some(Tag::IntArray(ints)) => ints,
            _ => &[],
        }
    }

    pub fn get_long_array(&self, key: &str) -> &[i64] {
        match self.entries.get(key) {
            Some(Tag::LongArray(longs)) => longs,
            _ => &[],
        }
    }

    pub fn get_compound(&self, key: &str) -> &CompoundTag {
        match self.entries.get(key) {
            Some(Tag::Compound(compound)) => compound,
            _ => &EMPTY_COMPOUND,
        }
    }

    pub fn get_list(&self, key: &str) -> &ListTag {
        match self.entries.get(key) {
            Some(Tag::List(list)) => list,
            _ => &EMPTY_LIST,
        }
    }
}

impl<'a> IntoIterator for &'a CompoundTag {
    type Item = (&'a String, &'a Tag);
    type IntoIter = hash_map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_write_wins() {
        let mut compound = CompoundTag::new();
        assert!(compound.insert("key", Tag::Int(1)).is_none());
        assert_eq!(compound.insert("key", Tag::Int(2)), Some(Tag::Int(1)));
        assert_eq!(compound.len(), 1);
        assert_eq!(compound.get_int("key"), 2);
    }

    #[test]
    fn test_remove_drops_mapping() {
        let mut compound = CompoundTag::new();
        compound.set_str("name", "stone");
        assert_eq!(compound.remove("name"), Some(Tag::String("stone".to_string())));
        assert!(!compound.contains("name"));
        assert!(compound.is_empty());
    }

    #[test]
    fn test_lenient_getters_default_on_missing() {
        let compound = CompoundTag::new();
        assert_eq!(compound.get_int("missing"), 0);
        assert_eq!(compound.get_long("missing"), 0);
        assert_eq!(compound.get_double("missing"), 0.0);
        assert_eq!(compound.get_str("missing"), "");
        assert!(!compound.get_bool("missing"));
        assert!(compound.get_byte_array("missing").is_empty());
        assert!(compound.get_compound("missing").is_empty());
        assert!(compound.get_list("missing").is_empty());
    }

    #[test]
    fn test_lenient_getters_default_on_mismatch() {
        let mut compound = CompoundTag::new();
        compound.set_str("wrongtype", "not a compound");
        assert!(compound.get_compound("wrongtype").is_empty());
        assert_eq!(compound.get_int("wrongtype"), 0);
        assert!(compound.get_list("wrongtype").is_empty());

        compound.set_int("number", 5);
        assert_eq!(compound.get_str("number"), "");
    }

    #[test]
    fn test_numeric_getters_coerce_across_family() {
        let mut compound = CompoundTag::new();
        compound.set_double("d", -1.5);
        assert_eq!(compound.get_int("d"), -2);
        assert_eq!(compound.get_byte("d"), -2);

        compound.set_byte("b", 3);
        assert_eq!(compound.get_long("b"), 3);
        assert_eq!(compound.get_float("b"), 3.0);
    }

    #[test]
    fn test_contains_type_numeric_family() {
        let mut compound = CompoundTag::new();
        compound.set_short("n", 7);
        compound.set_str("s", "x");

        assert!(compound.contains_type("n", 2));
        assert!(compound.contains_type("n", TYPE_ANY_NUMERIC));
        assert!(!compound.contains_type("n", 3));
        assert!(!compound.contains_type("s", TYPE_ANY_NUMERIC));
        assert!(compound.contains_type("s", 8));
        assert!(!compound.contains_type("absent", TYPE_ANY_NUMERIC));
    }

    #[test]
    fn test_bool_round_trip() {
        let mut compound = CompoundTag::new();
        compound.set_bool("flag", true);
        assert_eq!(compound.type_of("flag"), 1);
        assert!(compound.get_bool("flag"));
    }
}
