//! Owned XML tree for TEI corpus files.
//!
//! The corpus is parsed once at startup into an owned [`Element`] tree that
//! the rest of the crate reads but never mutates. Rendering and text
//! extraction always build fresh output, so a subtree can be processed any
//! number of times (display variant, plain variant) with identical results.
//!
//! Tag matching throughout the crate uses [`Element::local_name`], which
//! ignores any namespace prefix the source file may carry.

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One node in the parsed tree: an element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element: tag name, attributes in source order, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Element {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// True when the element's local name matches `name`.
    pub fn is(&self, name: &str) -> bool {
        self.local_name() == name
    }

    /// Value of the first attribute with the given name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Node> = self.children.iter().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First descendant with the given local name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(name))
    }

    /// First descendant with the given local name and `type` attribute.
    pub fn find_typed(&self, name: &str, ty: &str) -> Option<&Element> {
        self.descendants()
            .find(|e| e.is(name) && e.attr("type") == Some(ty))
    }

    /// Concatenated character data of the whole subtree, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Depth-first, document-order iterator over element descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                for child in el.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some(el);
            }
        }
        None
    }
}

/// Parses a complete XML document into a synthetic root element whose
/// children are the document's top-level nodes.
///
/// Any well-formedness violation (unbalanced tags, broken attributes,
/// invalid entities) is an error; the loader treats that as fatal.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = vec![Element::new(String::new())];

    loop {
        let event = reader
            .read_event()
            .context("malformed XML in corpus file")?;
        match event {
            Event::Start(tag) => {
                stack.push(element_from_tag(&tag)?);
            }
            Event::Empty(tag) => {
                let el = element_from_tag(&tag)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(el)),
                    None => bail!("malformed XML: element outside document"),
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                match (closed, stack.last_mut()) {
                    (Some(el), Some(parent)) => parent.children.push(Node::Element(el)),
                    _ => bail!("malformed XML: unmatched closing tag"),
                }
            }
            Event::Text(t) => {
                let text = t.unescape().context("malformed XML character data")?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no corpus content.
            _ => {}
        }
    }

    let root = stack.pop();
    match root {
        Some(el) if stack.is_empty() => Ok(el),
        _ => bail!("malformed XML: unclosed element at end of input"),
    }
}

fn element_from_tag(tag: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in tag.attributes() {
        let attr = attr.context("malformed XML attribute")?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .context("malformed XML attribute value")?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_elements() {
        let root = parse("<a><b n=\"1\">hi</b><c/></a>").unwrap();
        assert_eq!(root.children.len(), 1);
        let a = root.find("a").unwrap();
        assert_eq!(a.children.len(), 2);
        let b = a.find("b").unwrap();
        assert_eq!(b.attr("n"), Some("1"));
        assert_eq!(b.text(), "hi");
    }

    #[test]
    fn parse_unescapes_entities() {
        let root = parse("<a ref=\"x&amp;y\">a &lt; b</a>").unwrap();
        let a = root.find("a").unwrap();
        assert_eq!(a.attr("ref"), Some("x&y"));
        assert_eq!(a.text(), "a < b");
    }

    #[test]
    fn parse_rejects_unbalanced_tags() {
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a>").is_err());
        assert!(parse("</a>").is_err());
    }

    #[test]
    fn local_name_ignores_prefix() {
        let root = parse("<tei:div xmlns:tei=\"urn:x\">t</tei:div>").unwrap();
        let div = root.find("div").unwrap();
        assert_eq!(div.name, "tei:div");
        assert_eq!(div.local_name(), "div");
    }

    #[test]
    fn descendants_are_document_order() {
        let root = parse("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<&str> = root.descendants().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn find_typed_matches_type_attribute() {
        let root = parse("<r><ab type=\"summary\">s</ab><ab type=\"source\">x</ab></r>").unwrap();
        assert_eq!(root.find_typed("ab", "source").unwrap().text(), "x");
        assert!(root.find_typed("ab", "date-place").is_none());
    }

    #[test]
    fn text_flattens_mixed_content() {
        let root = parse("<p>one <b>two</b> three</p>").unwrap();
        assert_eq!(root.find("p").unwrap().text(), "one two three");
    }
}
