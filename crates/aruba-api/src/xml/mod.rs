// Streaming XML entry parser
//
// Device responses wrap their payload in arbitrarily nested section
// elements, but every record of interest is an `<Entry>` (or, for writes,
// an `<ActionStatus>`) whose leaf children carry the data. The parser makes
// one forward pass with quick-xml, keeping an element stack plus a stack of
// open record frames, and flattens each record into tag -> trimmed text.

mod records;

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::trace;

use crate::error::Error;
use crate::models::ActionStatus;

pub use records::{action_status, logs, mac_table, poe_ports, ports, system_info, vlans};

const ENTRY: &str = "Entry";
const ACTION_STATUS: &str = "ActionStatus";

/// One flattened record: leaf element name -> trimmed text.
///
/// Nested structure is discarded. If the same tag appears twice inside one
/// record, the later value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    fields: HashMap<String, String>,
}

impl Entry {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// First present value among `keys`, tried in order.
    ///
    /// Firmware is inconsistent about tag names across sections, so several
    /// builders accept alternates for the same field.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Parse the value under `key`, `None` when absent or unparseable.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        self.fields.insert(key, value);
    }

    /// Convert an `<ActionStatus>` accumulator into a status record.
    ///
    /// Missing or non-numeric codes default to 0, a missing string to "Unknown".
    fn into_action_status(self) -> ActionStatus {
        ActionStatus {
            status_code: self.parse("statusCode").unwrap_or(0),
            status_string: self
                .get("statusString")
                .map_or_else(|| "Unknown".to_owned(), str::to_owned),
            device_status_code: self.parse("deviceStatusCode").unwrap_or(0),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Everything one pass over a response yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// All `<Entry>` records, in document order.
    pub entries: Vec<Entry>,
    /// The last `<ActionStatus>` block, if any.
    pub action_status: Option<ActionStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Entry,
    ActionStatus,
}

/// An open `<Entry>` / `<ActionStatus>` accumulating leaf values.
struct Frame {
    kind: FrameKind,
    fields: Entry,
}

/// An open element on the name stack.
struct OpenElement {
    name: String,
    text: String,
    has_children: bool,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            has_children: false,
        }
    }
}

fn frame_kind(name: &str) -> Option<FrameKind> {
    match name {
        ENTRY => Some(FrameKind::Entry),
        ACTION_STATUS => Some(FrameKind::ActionStatus),
        _ => None,
    }
}

fn tag_name(raw: &[u8]) -> Result<String, Error> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|e| Error::Parse {
            details: format!("invalid UTF-8 in element name: {e}"),
        })
}

/// Parse a device response into its entries and optional action status.
///
/// A well-formed document without any `<Entry>` yields an empty list, not an
/// error. Input the tokenizer rejects (or that has no root element at all)
/// fails with [`Error::Parse`].
pub fn parse_document(xml: &[u8]) -> Result<Document, Error> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut elements: Vec<OpenElement> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut doc = Document::default();
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = tag_name(e.name().as_ref())?;
                if let Some(parent) = elements.last_mut() {
                    parent.has_children = true;
                }
                if let Some(kind) = frame_kind(&name) {
                    frames.push(Frame {
                        kind,
                        fields: Entry::default(),
                    });
                }
                saw_root = true;
                elements.push(OpenElement::new(name));
            }
            Event::Empty(e) => {
                // `<tag/>` opens and closes at once; it carries no text.
                let name = tag_name(e.name().as_ref())?;
                if let Some(parent) = elements.last_mut() {
                    parent.has_children = true;
                }
                saw_root = true;
                match frame_kind(&name) {
                    Some(FrameKind::Entry) => doc.entries.push(Entry::default()),
                    Some(FrameKind::ActionStatus) => {
                        doc.action_status = Some(Entry::default().into_action_status());
                    }
                    None => {}
                }
            }
            Event::Text(e) => {
                if let Some(current) = elements.last_mut() {
                    let text = e.unescape().map_err(|err| Error::Parse {
                        details: err.to_string(),
                    })?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = elements.last_mut() {
                    let text = std::str::from_utf8(e.as_ref()).map_err(|err| Error::Parse {
                        details: format!("invalid UTF-8 in CDATA: {err}"),
                    })?;
                    current.text.push_str(text);
                }
            }
            Event::End(_) => {
                let element = elements.pop().ok_or_else(|| Error::Parse {
                    details: "closing tag without open tag".into(),
                })?;
                close_element(element, &mut frames, &mut doc);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !elements.is_empty() {
        return Err(Error::Parse {
            details: "unclosed element(s) at end of document".into(),
        });
    }
    if !saw_root {
        return Err(Error::Parse {
            details: "no root element found".into(),
        });
    }

    trace!(entries = doc.entries.len(), "parsed device response");
    Ok(doc)
}

fn close_element(element: OpenElement, frames: &mut Vec<Frame>, doc: &mut Document) {
    if let Some(kind) = frame_kind(&element.name) {
        // The matching frame is always the innermost one.
        let Some(frame) = frames.pop() else {
            return;
        };
        debug_assert_eq!(frame.kind, kind);
        match frame.kind {
            FrameKind::Entry => doc.entries.push(frame.fields),
            FrameKind::ActionStatus => {
                doc.action_status = Some(frame.fields.into_action_status());
            }
        }
        return;
    }

    if element.has_children {
        return;
    }
    let value = element.text.trim();
    if value.is_empty() {
        return;
    }
    if let Some(frame) = frames.last_mut() {
        frame.fields.insert(element.name, value.to_owned());
    }
}

/// Parse a device response and return only its entries.
pub fn parse_entries(xml: &[u8]) -> Result<Vec<Entry>, Error> {
    parse_document(xml).map(|doc| doc.entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entries_keep_document_order_and_trim_text() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" ?>
            <ResponseData>
              <DeviceConfiguration>
                <ForwardingTable type="section">
                  <Entry><a>  first  </a></Entry>
                  <Entry><a>second</a><b>x</b></Entry>
                  <Entry><a>third</a></Entry>
                </ForwardingTable>
              </DeviceConfiguration>
            </ResponseData>"#;

        let entries = parse_entries(xml).unwrap();
        let firsts: Vec<_> = entries.iter().map(|e| e.get("a").unwrap()).collect();
        assert_eq!(firsts, vec!["first", "second", "third"]);
        assert_eq!(entries[1].get("b"), Some("x"));
    }

    #[test]
    fn structural_elements_are_not_fields() {
        let xml = b"<R><Entry><outer><inner>v</inner></outer><leaf>1</leaf></Entry></R>";
        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("inner"), Some("v"));
        assert_eq!(entries[0].get("leaf"), Some("1"));
        assert_eq!(entries[0].get("outer"), None);
        assert_eq!(entries[0].get("Entry"), None);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let xml = b"<R><Entry><k>1</k><k>2</k></Entry></R>";
        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].get("k"), Some("2"));
    }

    #[test]
    fn whitespace_only_and_empty_leaves_are_ignored() {
        let xml = b"<R><Entry><a>   </a><b/><c>x</c></Entry></R>";
        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].len(), 1);
        assert_eq!(entries[0].get("c"), Some("x"));
    }

    #[test]
    fn leaves_outside_entries_are_dropped() {
        let xml = b"<R><version>1.0</version><Entry><a>1</a></Entry></R>";
        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("version"), None);
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let xml = b"<R><Entry><msg>a &amp; b</msg></Entry></R>";
        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].get("msg"), Some("a & b"));
    }

    #[test]
    fn valid_document_without_entries_is_empty_not_error() {
        let xml = b"<ResponseData><DeviceConfiguration><ForwardingTable type=\"section\">\
                    </ForwardingTable></DeviceConfiguration></ResponseData>";
        assert!(parse_entries(xml).unwrap().is_empty());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_entries(b"<R><Entry><a>1</b></Entry></R>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "got {err:?}");

        let err = parse_entries(b"<R><Entry><a>1</a>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn input_without_root_is_a_parse_error() {
        assert!(matches!(parse_entries(b""), Err(Error::Parse { .. })));
        assert!(matches!(
            parse_entries(b"not xml at all"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn action_status_block_is_captured_separately() {
        let xml = b"<ResponseData><ActionStatus><version>1.0</version>\
                    <statusCode>0</statusCode><statusString>OK</statusString>\
                    <deviceStatusCode>0</deviceStatusCode></ActionStatus></ResponseData>";
        let doc = parse_document(xml).unwrap();
        assert!(doc.entries.is_empty());
        let status = doc.action_status.unwrap();
        assert_eq!(status.status_code, 0);
        assert_eq!(status.status_string, "OK");
    }

    #[test]
    fn action_status_defaults_for_missing_fields() {
        let doc = parse_document(b"<R><ActionStatus><version>1.0</version></ActionStatus></R>")
            .unwrap();
        let status = doc.action_status.unwrap();
        assert_eq!(status.status_code, 0);
        assert_eq!(status.status_string, "Unknown");
        assert_eq!(status.device_status_code, 0);
    }

    #[test]
    fn entry_first_of_tries_keys_in_order() {
        let entry: Entry = [("modelName", "JL812A"), ("swVersion", "1.0")]
            .into_iter()
            .collect();
        assert_eq!(entry.first_of(&["model", "modelName"]), Some("JL812A"));
        assert_eq!(entry.first_of(&["missing", "also-missing"]), None);
    }
}
