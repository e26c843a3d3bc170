//! A slightly larger dictionary than the unit tests cover: nested banks,
//! a tag-only entry, and a tag-range entry, exercised through the public
//! `Dictionary` API only.

use evio_hipo::Dictionary;

const XML: &str = r#"
<dictionary>
    <bank name="EVENT" tag="20">
        <leaf name="TIME" tag="1" num="1" type="double64"/>
        <leaf name="ADC" tag="2" num="1" type="int32"/>
    </bank>
    <dictEntry name="HEADER" tag="5"/>
    <dictEntry name="CALIB_RANGE" tag="300-399"/>
</dictionary>
"#;

#[test]
fn nested_entries_resolve_by_tag_and_num() {
    let dict = Dictionary::from_xml(XML).unwrap();

    assert_eq!(dict.name_for(20, None, None), "EVENT");
    assert_eq!(dict.name_for(1, Some(1), Some("EVENT")), "EVENT.TIME");
    assert_eq!(dict.name_for(2, Some(1), Some("EVENT")), "EVENT.ADC");
    assert_eq!(dict.name_for(5, None, None), "HEADER");
    assert_eq!(dict.name_for(350, None, None), "CALIB_RANGE");
}

#[test]
fn reverse_lookup_round_trips() {
    let dict = Dictionary::from_xml(XML).unwrap();
    let entry = dict.entry_for_name("EVENT.ADC").unwrap();
    assert_eq!(entry.tag, 2);
    assert_eq!(entry.num, 1);
    assert!(entry.num_valid);
}

#[test]
fn unknown_tag_returns_sentinel() {
    let dict = Dictionary::from_xml(XML).unwrap();
    assert_eq!(dict.name_for(65000, None, None), evio_hipo::dictionary::NO_NAME);
}
