//! A single dictionary entry: `(tag, tagEnd, num, numValid, type, format,
//! description, parent)` (spec §3 "Dictionary entry").

use crate::data_type::DataType;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    TagNum,
    TagOnly,
    TagRange,
}

#[derive(Clone, Debug)]
pub struct DictEntry {
    pub name: String,
    pub tag: u16,
    pub tag_end: u16,
    pub num: u8,
    pub num_valid: bool,
    pub data_type: Option<DataType>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub parent: Option<Rc<DictEntry>>,
}

impl DictEntry {
    pub fn kind(&self) -> EntryKind {
        if self.tag_end > 0 && self.tag_end != self.tag {
            EntryKind::TagRange
        } else if self.num_valid {
            EntryKind::TagNum
        } else {
            EntryKind::TagOnly
        }
    }

    /// Composite-key equality: tag/tagEnd/num/numValid/kind match, and when
    /// both entries have a parent, the parent keys also match (this is what
    /// lets identical `(tag,num)` pairs live in different hierarchical
    /// contexts — spec §3).
    pub fn key_eq(&self, other: &DictEntry) -> bool {
        if self.tag != other.tag || self.tag_end != other.tag_end || self.num != other.num || self.num_valid != other.num_valid {
            return false;
        }
        match (&self.parent, &other.parent) {
            (Some(a), Some(b)) => a.key_eq(b),
            (None, None) => true,
            _ => true,
        }
    }

    pub fn range_width(&self) -> u32 {
        if self.kind() == EntryKind::TagRange {
            (self.tag_end as u32).abs_diff(self.tag as u32)
        } else {
            0
        }
    }

    pub fn contains_tag(&self, tag: u16) -> bool {
        let (lo, hi) = if self.tag <= self.tag_end { (self.tag, self.tag_end) } else { (self.tag_end, self.tag) };
        tag >= lo && tag <= hi
    }
}
