//! XML ingestion.
//!
//! Turns nmap's `-oX` output into a generic element tree. Children are kept as
//! an ordered list per element, so a tag that appears once and a tag that
//! appears many times are read through the same [`XmlElement::children`]
//! iterator. Traversal code never has to branch on "one vs. many".

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ParseError;

/// One XML element with its attributes, concatenated text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Text content (trimmed), empty when the element has none.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All direct children with the given tag name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Text of the `<elem key="...">` child with the given key. The last one wins
    /// when the key repeats.
    pub fn elem_text(&self, key: &str) -> Option<&str> {
        self.children("elem")
            .filter(|e| e.attr("key") == Some(key))
            .last()
            .map(|e| e.text.as_str())
    }
}

/// Parse a complete XML document and return its root element.
pub fn parse_document(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| xml_error(position, e))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(xml_error(position, "multiple root elements"));
                }
                stack.push(open_element(&start, position)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error(position, "closing tag without opening tag"))?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| xml_error(position, e))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(xml_error(position, "text outside the root element")),
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, doctype, comments and processing instructions
            _ => {}
        }
    }

    let position = reader.buffer_position() as u64;
    if let Some(open) = stack.last() {
        return Err(xml_error(position, format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| xml_error(position, "document has no elements"))
}

fn open_element(start: &BytesStart<'_>, position: u64) -> Result<XmlElement, ParseError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(position, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(position, e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(xml_error(position, "multiple root elements"));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn xml_error(position: u64, err: impl std::fmt::Display) -> ParseError {
    ParseError::Xml {
        message: err.to_string(),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_text_and_children() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
<!DOCTYPE nmaprun>
<nmaprun args="nmap -sV">
  <host><address addr="10.0.0.5" addrtype="ipv4"/></host>
  <elem key="cvss">7.5</elem>
</nmaprun>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "nmaprun");
        assert_eq!(doc.attr("args"), Some("nmap -sV"));
        assert_eq!(doc.attr("missing"), None);
        let host = doc.child("host").unwrap();
        assert_eq!(host.child("address").unwrap().attr("addr"), Some("10.0.0.5"));
        assert_eq!(doc.elem_text("cvss"), Some("7.5"));
    }

    #[test]
    fn single_and_repeated_children_iterate_alike() {
        let one = parse_document("<ports><port portid=\"22\"/></ports>").unwrap();
        let many = parse_document("<ports><port portid=\"22\"/><port portid=\"80\"/></ports>").unwrap();

        let ids: Vec<_> = one.children("port").filter_map(|p| p.attr("portid")).collect();
        assert_eq!(ids, vec!["22"]);
        let ids: Vec<_> = many.children("port").filter_map(|p| p.attr("portid")).collect();
        assert_eq!(ids, vec!["22", "80"]);
        assert_eq!(one.children("script").count(), 0);
    }

    #[test]
    fn unescapes_entities() {
        let doc = parse_document(r#"<script output="&#xa;  a &amp; b">x &lt; y</script>"#).unwrap();
        assert_eq!(doc.attr("output"), Some("\n  a & b"));
        assert_eq!(doc.text, "x < y");
    }

    #[test]
    fn elem_text_last_key_wins() {
        let doc = parse_document(
            r#"<table><elem key="id">first</elem><elem key="id">second</elem><elem>nokey</elem></table>"#,
        )
        .unwrap();
        assert_eq!(doc.elem_text("id"), Some("second"));
        assert_eq!(doc.elem_text("type"), None);
    }

    #[test]
    fn rejects_unclosed_element() {
        let err = parse_document("<nmaprun><host>").unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(parse_document("<nmaprun><host></port></nmaprun>").is_err());
    }

    #[test]
    fn rejects_empty_and_multiple_roots() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<a/><b/>").is_err());
        assert!(parse_document("not xml at all").is_err());
    }
}
