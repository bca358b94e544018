//! Minimal owned XML document model.
//!
//! Responses are small, so they are read eagerly into a tree of
//! [`XmlElement`]s. The reader rejects anything that is not a single,
//! properly nested root element.

use crate::error::{RazorgatorError, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A parsed XML document with exactly one root element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

/// One element with its attributes (in document order), children and text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Qualified name, including any namespace prefix
    pub name: String,
    /// Name without the namespace prefix
    pub local_name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlDocument {
    /// Parse a complete document held in a string
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_bytes(xml.as_bytes())
    }

    /// Parse a raw body. The character encoding is taken from a BOM or the
    /// XML declaration and defaults to UTF-8.
    pub fn from_bytes(body: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(XmlElement::from_start(&start, reader.decoder())?)
                }
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start, reader.decoder())?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| RazorgatorError::malformed_xml("unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    append_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    let data = data.decode().map_err(quick_xml::Error::from)?;
                    append_text(&mut stack, &data)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(RazorgatorError::malformed_xml(format!(
                "unclosed element <{}>",
                open.name
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| RazorgatorError::malformed_xml("document has no root element"))
    }

    /// The root element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Qualified name of the root element
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Consume the document and return its root element
    pub fn into_root(self) -> XmlElement {
        self.root
    }
}

impl std::str::FromStr for XmlDocument {
    type Err = RazorgatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let name = decode(decoder, start.name().as_ref())?;
        let local_name = decode(decoder, start.local_name().as_ref())?;
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::InvalidAttr)?;
            let key = decode(decoder, attribute.key.as_ref())?;
            let value = attribute.decode_and_unescape_value(decoder)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            local_name,
            attributes,
            ..Default::default()
        })
    }

    /// Name without the namespace prefix
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Attributes other than namespace declarations (`xmlns`, `xmlns:*`)
    pub fn plain_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|(key, _)| key != "xmlns" && !key.starts_with("xmlns:"))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Value of the named attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given qualified or local name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|child| child.name == name || child.local_name == name)
    }

    /// First child element, whatever its name
    pub fn first_child(&self) -> Option<&XmlElement> {
        self.children.first()
    }

    /// Text content (trimmed, concatenated)
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn decode(decoder: Decoder, bytes: &[u8]) -> Result<String> {
    let decoded = decoder.decode(bytes).map_err(quick_xml::Error::from)?;
    Ok(decoded.into_owned())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(RazorgatorError::malformed_xml(format!(
                "second root element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(RazorgatorError::malformed_xml("text outside the root element")),
    }
    Ok(())
}
