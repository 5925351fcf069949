use crate::compound::CompoundTag;
use crate::tag::Tag;
use lodestone_logger::{log, LogSeverity};
use once_cell::sync::Lazy;
use std::slice;

pub(crate) static EMPTY_LIST: Lazy<ListTag> = Lazy::new(ListTag::new);
static EMPTY_COMPOUND: Lazy<CompoundTag> = Lazy::new(CompoundTag::new);

/// An ordered, homogeneously-typed tag container. The element type is fixed
/// by the first successful push and only resets once the list is emptied.
///
/// `push` and `set` report rejection through their return value instead of
/// raising; positional getters are lenient the same way compound getters are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListTag {
    elements: Vec<Tag>,
    element_type: u8,
}

impl ListTag {
    pub fn new() -> Self {
        ListTag {
            elements: Vec::new(),
            element_type: 0,
        }
    }

    /// Builds a list from already-validated homogeneous elements. The codec
    /// uses this after checking the wire-declared element type.
    pub(crate) fn from_raw(elements: Vec<Tag>, element_type: u8) -> Self {
        // An empty list has no fixed type regardless of the wire byte.
        let element_type = if elements.is_empty() { 0 } else { element_type };
        ListTag {
            elements,
            element_type,
        }
    }

    /// Element type id, or 0 while the list is empty.
    pub fn element_type(&self) -> u8 {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    /// Appends a tag if it matches the list's element type. End tags and
    /// mismatched types are rejected, leaving the list unchanged.
    #[must_use]
    pub fn push(&mut self, tag: Tag) -> bool {
        let type_id = tag.get_type_id();
        if type_id == 0 {
            log("Invalid TAG_End added to ListTag".to_string(), LogSeverity::Warning);
            return false;
        }

        if self.element_type == 0 {
            self.element_type = type_id;
        } else if self.element_type != type_id {
            log(
                "Adding mismatching tag types to tag list".to_string(),
                LogSeverity::Warning,
            );
            return false;
        }

        self.elements.push(tag);
        true
    }

    /// Replaces the element at `index` under the same rules as `push`.
    /// Out-of-range indices are rejected.
    #[must_use]
    pub fn set(&mut self, index: usize, tag: Tag) -> bool {
        let type_id = tag.get_type_id();
        if type_id == 0 || index >= self.elements.len() {
            return false;
        }
        if self.element_type != type_id {
            log(
                "Adding mismatching tag types to tag list".to_string(),
                LogSeverity::Warning,
            );
            return false;
        }

        self.elements[index] = tag;
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index >= self.elements.len() {
            return None;
        }
        let tag = self.elements.remove(index);
        if self.elements.is_empty() {
            self.element_type = 0;
        }
        Some(tag)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.element_type = 0;
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.elements.get(index)
    }

    pub fn get_int(&self, index: usize) -> i32 {
        self.elements.get(index).and_then(Tag::as_i32).unwrap_or(0)
    }

    pub fn get_double(&self, index: usize) -> f64 {
        self.elements.get(index).and_then(Tag::as_f64).unwrap_or(0.0)
    }

    pub fn get_str(&self, index: usize) -> &str {
        self.elements.get(index).and_then(Tag::as_str).unwrap_or("")
    }

    pub fn get_compound(&self, index: usize) -> &CompoundTag {
        match self.elements.get(index) {
            Some(Tag::Compound(compound)) => compound,
            _ => &EMPTY_COMPOUND,
        }
    }

    pub fn get_list(&self, index: usize) -> &ListTag {
        match self.elements.get(index) {
            Some(Tag::List(list)) => list,
            _ => &EMPTY_LIST,
        }
    }
}

impl<'a> IntoIterator for &'a ListTag {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
