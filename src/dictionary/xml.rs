//! XML parsing for the dictionary (spec §4.5). XML itself is treated as an
//! opaque DOM (spec §1 non-goal) — all tree-walking here goes through
//! `roxmltree`'s element/attribute accessors only.

use crate::data_type::DataType;
use crate::dictionary::entry::DictEntry;
use crate::error::{Result, Status};
use roxmltree::{Document, Node as XmlNode};
use std::rc::Rc;

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn local_name_is(node: &XmlNode, name: &str) -> bool {
    eq_ignore_case(node.tag_name().name(), name)
}

fn attr<'a>(node: &'a XmlNode, name: &str) -> Option<&'a str> {
    node.attributes().find(|a| eq_ignore_case(a.name(), name)).map(|a| a.value())
}

/// Parses a `tag` or `num` attribute, which may be a bare integer or a
/// `N-M` range (optional surrounding whitespace).
fn parse_range(raw: &str) -> Result<(u32, u32)> {
    let raw = raw.trim();
    if let Some((lo, hi)) = raw.split_once('-') {
        let lo: u32 = lo.trim().parse().map_err(|_| bad_format("bad range lower bound"))?;
        let hi: u32 = hi.trim().parse().map_err(|_| bad_format("bad range upper bound"))?;
        Ok((lo, hi))
    } else {
        let v: u32 = raw.parse().map_err(|_| bad_format("bad integer attribute"))?;
        Ok((v, v))
    }
}

fn bad_format(msg: &str) -> crate::error::EvioError {
    crate::error::EvioError::new(Status::BadFormat, Some(msg))
}

fn parse_data_type(raw: &str) -> Option<DataType> {
    Some(match raw.to_ascii_lowercase().as_str() {
        "int32" | "int" => DataType::Int32,
        "uint32" | "uint" => DataType::UInt32,
        "float32" | "float" => DataType::Float32,
        "double64" | "double" => DataType::Double64,
        "long64" | "long" => DataType::Long64,
        "ulong64" | "ulong" => DataType::ULong64,
        "short16" | "short" => DataType::Short16,
        "ushort16" | "ushort" => DataType::UShort16,
        "char8" | "char" => DataType::Char8,
        "uchar8" | "uchar" => DataType::UChar8,
        "charstar8" | "string" => DataType::CharStar8,
        "composite" => DataType::Composite,
        "bank" => DataType::Bank,
        "segment" => DataType::Segment,
        "tagsegment" => DataType::TagSegment,
        _ => return None,
    })
}

/// One leaf entry built while walking the XML tree, plus the names of every
/// `(tag, num)` pair a range attribute expands into.
pub struct ParsedEntry {
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

fn build_entry(node: &XmlNode, parent_name: &str, parent: Option<Rc<DictEntry>>) -> Result<Vec<ParsedEntry>> {
    let own_name = attr(node, "name").ok_or_else(|| bad_format("dictionary entry missing name attribute"))?;
    let full_name = if parent_name.is_empty() { own_name.to_string() } else { format!("{}.{}", parent_name, own_name) };

    let tag_attr = attr(node, "tag").ok_or_else(|| bad_format("dictionary entry missing tag attribute"))?;
    let (tag_lo, tag_hi) = parse_range(tag_attr)?;

    let description = attr(node, "description").map(|s| s.to_string());
    let format = attr(node, "format").map(|s| s.to_string());
    let data_type = attr(node, "type").and_then(parse_data_type);

    let mut out = Vec::new();
    if tag_lo != tag_hi {
        // A tag range: one TAG_RANGE entry, `num` is not expanded.
        out.push(ParsedEntry {
            name: full_name,
            tag: tag_lo as u16,
            tag_end: tag_hi as u16,
            num: 0,
            num_valid: false,
            data_type,
            format,
            description,
            parent,
        });
        return Ok(out);
    }

    match attr(node, "num") {
        Some(num_attr) => {
            let (num_lo, num_hi) = parse_range(num_attr)?;
            for n in num_lo..=num_hi {
                let name = if num_lo == num_hi { full_name.clone() } else { format!("{}{}", full_name, n - num_lo) };
                out.push(ParsedEntry {
                    name,
                    tag: tag_lo as u16,
                    tag_end: 0,
                    num: n as u8,
                    num_valid: true,
                    data_type,
                    format: format.clone(),
                    description: description.clone(),
                    parent: parent.clone(),
                });
            }
        }
        None => {
            out.push(ParsedEntry {
                name: full_name,
                tag: tag_lo as u16,
                tag_end: 0,
                num: 0,
                num_valid: false,
                data_type,
                format,
                description,
                parent,
            });
        }
    }
    Ok(out)
}

/// Depth-first walk of the XML, collecting every leaf entry in document
/// order (spec §4.5 "Build").
pub fn parse(xml: &str) -> Result<Vec<ParsedEntry>> {
    let doc = Document::parse(xml).map_err(|e| crate::error::EvioError::with_source(Status::BadFormat, "invalid dictionary XML", XmlParseError(e.to_string())))?;
    let root = doc
        .descendants()
        .find(|n| n.is_element() && local_name_is(n, "dictionary"))
        .ok_or_else(|| bad_format("no <dictionary> root element found"))?;

    let mut out = Vec::new();
    walk(&root, "", None, &mut out)?;
    Ok(out)
}

fn walk(node: &XmlNode, parent_name: &str, parent_entry: Option<Rc<DictEntry>>, out: &mut Vec<ParsedEntry>) -> Result<()> {
    for child in node.children().filter(|c| c.is_element()) {
        let tag_name = child.tag_name().name();
        if eq_ignore_case(tag_name, "dictentry") || eq_ignore_case(tag_name, "xmldumpdictentry") {
            let entries = build_entry(&child, parent_name, parent_entry.clone())?;
            out.extend(entries);
        } else if eq_ignore_case(tag_name, "bank") || eq_ignore_case(tag_name, "leaf") {
            let entries = build_entry(&child, parent_name, parent_entry.clone())?;
            let own_name = entries.first().map(|e| e.name.clone()).unwrap_or_default();
            let as_parent = entries.first().map(|e| {
                Rc::new(DictEntry {
                    name: e.name.clone(),
                    tag: e.tag,
                    tag_end: e.tag_end,
                    num: e.num,
                    num_valid: e.num_valid,
                    data_type: e.data_type,
                    format: e.format.clone(),
                    description: e.description.clone(),
                    parent: e.parent.clone(),
                })
            });
            out.extend(entries);
            walk(&child, &own_name, as_parent, out)?;
        }
    }
    Ok(())
}

#[derive(Debug)]
struct XmlParseError(String);
impl std::fmt::Display for XmlParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for XmlParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_dictionary() {
        let xml = r#"<dictionary><dictEntry name="E1" tag="1" num="2" type="int32"/><dictEntry name="R" tag="5-7"/></dictionary>"#;
        let entries = parse(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "E1");
        assert_eq!(entries[0].tag, 1);
        assert_eq!(entries[0].num, 2);
        assert_eq!(entries[1].tag, 5);
        assert_eq!(entries[1].tag_end, 7);
    }

    #[test]
    fn nested_bank_forms_dotted_names() {
        let xml = r#"<dictionary><bank name="EVENT" tag="10"><leaf name="HIT" tag="1" num="1"/></bank></dictionary>"#;
        let entries = parse(xml).unwrap();
        assert!(entries.iter().any(|e| e.name == "EVENT"));
        assert!(entries.iter().any(|e| e.name == "EVENT.HIT"));
    }
}
