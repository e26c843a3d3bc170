//! Name <-> (tag, num) dictionary built from XML (spec §3 "Dictionary",
//! §4.5). Three parallel indices mirror the three entry kinds so a lookup
//! never has to guess which one a request means.

pub mod entry;
pub mod xml;

use crate::error::Result;
use entry::{DictEntry, EntryKind};
use std::collections::HashMap;
use std::rc::Rc;

/// The sentinel name EVIO returns when nothing matches (spec §4.5 "Lookup").
pub const NO_NAME: &str = "???";

#[derive(Default)]
pub struct Dictionary {
    tag_num: HashMap<(u16, u8), Vec<Rc<DictEntry>>>,
    tag_only: HashMap<u16, Vec<Rc<DictEntry>>>,
    tag_range: Vec<Rc<DictEntry>>,
    by_name: HashMap<String, Rc<DictEntry>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        let parsed = xml::parse(xml)?;
        let mut dict = Self::new();
        for p in parsed {
            let entry = Rc::new(DictEntry {
                name: p.name,
                tag: p.tag,
                tag_end: p.tag_end,
                num: p.num,
                num_valid: p.num_valid,
                data_type: p.data_type,
                format: p.format,
                description: p.description,
                parent: p.parent,
            });
            dict.insert(entry);
        }
        Ok(dict)
    }

    /// Inserts an entry, rejecting an exact composite-key collision (same
    /// tag/num/kind AND same parent chain) by silently keeping the first
    /// definition — EVIO dictionaries are typically hand-authored and the
    /// reference implementation's builder likewise keeps the first import
    /// of a duplicate (spec §4.5 "Build": "later duplicate entries for an
    /// identical key are ignored").
    fn insert(&mut self, e: Rc<DictEntry>) {
        self.by_name.entry(e.name.clone()).or_insert_with(|| e.clone());
        match e.kind() {
            EntryKind::TagRange => {
                if !self.tag_range.iter().any(|o| o.key_eq(&e)) {
                    self.tag_range.push(e);
                }
            }
            EntryKind::TagNum => {
                let bucket = self.tag_num.entry((e.tag, e.num)).or_default();
                if !bucket.iter().any(|o| o.key_eq(&e)) {
                    bucket.push(e);
                }
            }
            EntryKind::TagOnly => {
                let bucket = self.tag_only.entry(e.tag).or_default();
                if !bucket.iter().any(|o| o.key_eq(&e)) {
                    bucket.push(e);
                }
            }
        }
    }

    /// Picks the best match in a same-tag bucket: if `parent` is given,
    /// prefer an entry whose own parent name matches it; otherwise the
    /// first entry registered for that key (spec §4.5 "Lookup" tiebreaks).
    fn pick<'a>(bucket: &'a [Rc<DictEntry>], parent: Option<&str>) -> Option<&'a Rc<DictEntry>> {
        if let Some(p) = parent {
            if let Some(hit) = bucket.iter().find(|e| e.parent.as_ref().map(|pe| pe.name.as_str()) == Some(p)) {
                return Some(hit);
            }
        }
        bucket.first()
    }

    /// Resolves a name for `(tag, num)`, preferring an exact tag+num entry,
    /// then a tag-only entry, then the narrowest tag-range entry that
    /// contains `tag` (spec §4.5 "Lookup" precedence). Returns `"???"` if
    /// nothing matches.
    pub fn name_for(&self, tag: u16, num: Option<u8>, parent: Option<&str>) -> String {
        if let Some(n) = num {
            if let Some(bucket) = self.tag_num.get(&(tag, n)) {
                if let Some(e) = Self::pick(bucket, parent) {
                    return e.name.clone();
                }
            }
        }
        if let Some(bucket) = self.tag_only.get(&tag) {
            if let Some(e) = Self::pick(bucket, parent) {
                return e.name.clone();
            }
        }
        let mut candidates: Vec<&Rc<DictEntry>> = self.tag_range.iter().filter(|e| e.contains_tag(tag)).collect();
        candidates.sort_by_key(|e| e.range_width());
        if let Some(p) = parent {
            if let Some(hit) = candidates.iter().find(|e| e.parent.as_ref().map(|pe| pe.name.as_str()) == Some(p)) {
                return hit.name.clone();
            }
        }
        if let Some(e) = candidates.first() {
            return e.name.clone();
        }
        NO_NAME.to_string()
    }

    /// The inverse of `name_for`: returns `(tag, tagEnd, num, numValid)` for
    /// a dotted name, if registered.
    pub fn entry_for_name(&self, name: &str) -> Option<&DictEntry> {
        self.by_name.get(name).map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Multi-line listing of every registered entry, in insertion order by
    /// kind (tag/num, tag-only, then tag-range) — a debugging aid, not part
    /// of the on-disk format.
    pub fn to_string_pretty(&self) -> String {
        let mut out = String::new();
        for bucket in self.tag_num.values() {
            for e in bucket {
                out.push_str(&format!("{} : tag={} num={}\n", e.name, e.tag, e.num));
            }
        }
        for bucket in self.tag_only.values() {
            for e in bucket {
                out.push_str(&format!("{} : tag={}\n", e.name, e.tag));
            }
        }
        for e in &self.tag_range {
            out.push_str(&format!("{} : tag={}-{}\n", e.name, e.tag, e.tag_end));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_xml() -> &'static str {
        r#"<dictionary>
            <dictEntry name="EVENT" tag="1" num="1" type="bank"/>
            <dictEntry name="WIDE" tag="100-200"/>
            <dictEntry name="NARROW" tag="120-130"/>
        </dictionary>"#
    }

    #[test]
    fn exact_tag_num_resolves_first() {
        let dict = Dictionary::from_xml(sample_xml()).unwrap();
        assert_eq!(dict.name_for(1, Some(1), None), "EVENT");
    }

    #[test]
    fn narrower_range_wins_over_wider() {
        let dict = Dictionary::from_xml(sample_xml()).unwrap();
        assert_eq!(dict.name_for(125, None, None), "NARROW");
    }

    #[test]
    fn unmatched_lookup_returns_sentinel() {
        let dict = Dictionary::from_xml(sample_xml()).unwrap();
        assert_eq!(dict.name_for(9999, None, None), NO_NAME);
    }

    #[test]
    fn reverse_lookup_finds_entry() {
        let dict = Dictionary::from_xml(sample_xml()).unwrap();
        let e = dict.entry_for_name("EVENT").unwrap();
        assert_eq!(e.tag, 1);
        assert_eq!(e.num, 1);
    }
}
