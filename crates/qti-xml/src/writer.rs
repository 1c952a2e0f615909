//! Serialization of [`XmlElement`] trees with quick-xml.

use crate::{Error, Result, XmlChild, XmlElement};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Output settings for [`to_string_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` before the root.
    pub declaration: bool,
    /// Indent nested elements by this many spaces.
    pub indent: Option<usize>,
}

enum Step<'a> {
    Open(&'a XmlElement),
    Close(&'a XmlElement),
    Text(&'a str),
    Raw(&'a str),
}

/// Write `root` and its subtree to `writer`.
///
/// The tree is walked with an explicit stack. Elements without children are
/// written self-closing, text is escaped, and [`XmlChild::Raw`] fragments are
/// written verbatim.
pub fn write_element<W: Write>(writer: &mut Writer<W>, root: &XmlElement) -> Result<()> {
    let mut stack = vec![Step::Open(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(element) => {
                let mut start = BytesStart::new(element.qualified_name());
                for attr in &element.attributes {
                    let key = attr.qualified_name();
                    start.push_attribute((key.as_str(), attr.value.as_str()));
                }

                if element.children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                    continue;
                }

                writer.write_event(Event::Start(start))?;
                stack.push(Step::Close(element));
                for child in element.children.iter().rev() {
                    stack.push(match child {
                        XmlChild::Element(e) => Step::Open(e),
                        XmlChild::Text { content, .. } => Step::Text(content),
                        XmlChild::Raw(fragment) => Step::Raw(fragment),
                    });
                }
            }
            Step::Close(element) => {
                writer.write_event(Event::End(BytesEnd::new(element.qualified_name())))?;
            }
            Step::Text(content) => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                    content,
                ))))?;
            }
            Step::Raw(fragment) => {
                writer.write_event(Event::Text(BytesText::from_escaped(fragment)))?;
            }
        }
    }

    Ok(())
}

/// Serialize the content of `element` without its own start and end tags.
pub fn inner_to_string(element: &XmlElement) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    for child in &element.children {
        match child {
            XmlChild::Element(e) => write_element(&mut writer, e)?,
            XmlChild::Text { content, .. } => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                    content.as_str(),
                ))))?;
            }
            XmlChild::Raw(fragment) => {
                writer.write_event(Event::Text(BytesText::from_escaped(fragment.as_str())))?;
            }
        }
    }
    String::from_utf8(writer.into_inner()).map_err(|err| Error::Write {
        message: err.to_string(),
    })
}

/// Serialize `root` compactly, without an XML declaration.
pub fn to_string(root: &XmlElement) -> Result<String> {
    to_string_with_options(root, &WriteOptions::default())
}

/// Serialize `root` with nested elements indented by `indent` spaces.
///
/// Indentation adds whitespace between elements, so mixed content does not
/// survive a pretty round trip byte-for-byte.
pub fn to_string_pretty(root: &XmlElement, indent: usize) -> Result<String> {
    to_string_with_options(
        root,
        &WriteOptions {
            declaration: false,
            indent: Some(indent),
        },
    )
}

pub fn to_string_with_options(root: &XmlElement, options: &WriteOptions) -> Result<String> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    };

    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if options.indent.is_none() {
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }
    }

    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(|err| Error::Write {
        message: err.to_string(),
    })
}
