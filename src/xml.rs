use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{Error, Result};

/// An XML document as an ordered tree of nodes.
///
/// The tree is lossless for the parts of XML a feed uses: element names,
/// attributes, text content, CDATA, comments, and nesting order all survive a
/// parse/serialize round trip. Formatting whitespace between elements does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Whether the source carried an XML declaration
    pub decl: bool,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First direct child element with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// First text-type content (text or CDATA) of this element, if any
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Text(text) | Node::CData(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Replace the first text-type child, or append one if none exists
    pub fn set_text(&mut self, text: &str) {
        for node in &mut self.children {
            match node {
                Node::Text(existing) | Node::CData(existing) => {
                    *existing = text.to_string();
                    return;
                }
                _ => {}
            }
        }
        self.children.push(Node::Text(text.to_string()));
    }

    /// Set or add an attribute value
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        for (k, v) in &mut self.attributes {
            if k == key {
                *v = value.to_string();
                return;
            }
        }
        self.attributes.push((key.to_string(), value.to_string()));
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Document {
    /// The document's root element (the `rss` element for a feed)
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }
}

/// Parse XML text into a [`Document`].
///
/// Text and attribute values are unescaped on the way in; whitespace-only text
/// nodes between elements are dropped. Malformed XML (mismatched or unclosed
/// tags, bad entities) yields [`Error::Parse`].
pub fn parse(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    let mut doc = Document {
        decl: false,
        nodes: Vec::new(),
    };
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Decl(_) => doc.decl = true,
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                append(&mut doc, &mut stack, Node::Element(element));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or(Error::MalformedFeed("closing tag without opener"))?;
                append(&mut doc, &mut stack, Node::Element(element));
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                if !text.trim().is_empty() {
                    append(&mut doc, &mut stack, Node::Text(text));
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append(&mut doc, &mut stack, Node::CData(text));
            }
            Event::Comment(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append(&mut doc, &mut stack, Node::Comment(text));
            }
            Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(Error::MalformedFeed("unclosed element"));
    }
    if doc.root().is_none() {
        return Err(Error::MalformedFeed("no root element"));
    }

    Ok(doc)
}

fn element_from_start(e: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append(doc: &mut Document, stack: &mut Vec<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => doc.nodes.push(node),
    }
}

/// Serialize a [`Document`] back to XML text, re-escaping text and attributes.
pub fn serialize(doc: &Document) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    if doc.decl {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    for node in &doc.nodes {
        write_node(&mut writer, node)?;
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(el) => {
            let mut start = BytesStart::new(el.name.as_str());
            for (key, value) in &el.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            if el.children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for child in &el.children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
            }
        }
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Node::CData(text) => {
            writer.write_event(Event::CData(BytesCData::new(text.as_str())))?;
        }
        Node::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
    }
    Ok(())
}
