//! XML parser that builds [`XmlDocument`] trees.

use crate::{Error, Result, XmlAttribute, XmlChild, XmlDocument, XmlElement};
use qti_source_map::{FileId, SourceInfo};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string.
///
/// # Example
///
/// ```rust
/// use qti_xml::parse;
///
/// let doc = parse("<itemBody><p>Pick one</p></itemBody>").unwrap();
/// assert_eq!(doc.root.name, "itemBody");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse(content: &str) -> Result<XmlDocument> {
    parse_with_file_id(content, FileId(0))
}

/// Parse XML from a string with an associated file ID.
///
/// The file ID is used in source location information for error reporting.
pub fn parse_with_file_id(content: &str, file_id: FileId) -> Result<XmlDocument> {
    XmlParser::new(content, file_id).parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    source: &'a str,

    reader: Reader<&'a [u8]>,

    file_id: FileId,

    /// Open elements, innermost last.
    stack: Vec<BuildNode>,
}

/// An element whose end tag has not been seen yet.
struct BuildNode {
    name: String,

    name_source: SourceInfo,

    prefix: Option<String>,

    attributes: Vec<XmlAttribute>,

    /// Byte offset of the `<` of the start tag.
    start_offset: usize,

    /// Byte offset just past the `>` of the start tag.
    inner_start: usize,

    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, file_id: FileId) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            file_id,
            stack: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<XmlDocument> {
        let mut root: Option<XmlElement> = None;

        loop {
            // Position of the `<` (or first text byte) of the next event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(&e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(&e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(&e, event_start);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", qualified(&node.prefix, &node.name)),
                location: Some(node.name_source.clone()),
            });
        }

        let root = root.ok_or(Error::EmptyDocument)?;
        let source_info = self.make_source_info(0, self.source.len());

        Ok(XmlDocument::new(root, source_info, self.source.to_string()))
    }

    /// Hand a completed element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::MultipleRoots {
                location: element.source_info.clone(),
            }),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_source = self.name_source(e, event_start);
        let attributes = self.parse_attributes(e, event_start)?;

        self.stack.push(BuildNode {
            name,
            name_source,
            prefix,
            attributes,
            start_offset: event_start,
            inner_start: self.reader.buffer_position() as usize,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>, event_start: usize) -> Result<XmlElement> {
        let (end_name, end_prefix) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!(
                "Unexpected closing tag </{}>",
                qualified(&end_prefix, &end_name)
            ),
            location: Some(self.make_source_info(
                event_start,
                self.reader.buffer_position() as usize,
            )),
        })?;

        if node.name != end_name || node.prefix != end_prefix {
            return Err(Error::MismatchedEndTag {
                expected: qualified(&node.prefix, &node.name),
                found: qualified(&end_prefix, &end_name),
                location: Some(node.name_source),
            });
        }

        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name: node.name,
            name_source: Some(node.name_source),
            prefix: node.prefix,
            attributes: node.attributes,
            children: node.children,
            source_info: Some(self.make_source_info(node.start_offset, end_offset)),
            inner_source: Some(self.make_source_info(node.inner_start, event_start)),
        })
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_source = self.name_source(e, event_start);
        let attributes = self.parse_attributes(e, event_start)?;
        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name,
            name_source: Some(name_source),
            prefix,
            attributes,
            children: Vec::new(),
            source_info: Some(self.make_source_info(event_start, end_offset)),
            inner_source: None,
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start as u64),
        })?;

        let end_offset = self.reader.buffer_position() as usize;

        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(Error::InvalidStructure {
                message: "Text content outside of the root element".to_string(),
                location: Some(self.make_source_info(event_start, end_offset)),
            });
        }
        self.push_text(&text, event_start, end_offset);
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>, event_start: usize) {
        let text = String::from_utf8_lossy(e.as_ref());
        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(&text, event_start, end_offset);
    }

    /// Append character data to the open element.
    ///
    /// Text split by comments, processing instructions or CDATA sections is
    /// joined into one text child spanning all of its pieces.
    fn push_text(&mut self, text: &str, start: usize, end: usize) {
        let Some(node) = self.stack.last_mut() else {
            return;
        };
        if let Some(XmlChild::Text {
            content,
            source_info,
        }) = node.children.last_mut()
        {
            content.push_str(text);
            let joined_start = source_info.as_ref().map_or(start, |s| s.start_offset());
            *source_info = Some(SourceInfo::original(self.file_id, joined_start, end));
            return;
        }
        node.children.push(XmlChild::Text {
            content: text.to_string(),
            source_info: Some(SourceInfo::original(self.file_id, start, end)),
        });
    }

    fn name_source(&self, e: &BytesStart<'_>, event_start: usize) -> SourceInfo {
        let name_start = event_start + 1; // skip '<'
        self.make_source_info(name_start, name_start + e.name().as_ref().len())
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        // Offsets inside `tag` are relative to the byte after '<'
        let content_start = tag_start + 1;
        let tag = String::from_utf8_lossy(e.as_ref());
        let mut search_from = e.name().as_ref().len();

        for attr_result in e.attributes() {
            let attr = attr_result?;

            let full_name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let (name, prefix) = split_name(full_name.as_bytes());

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start as u64),
            })?;

            let (name_source, value_source) =
                match attribute_spans(&tag, search_from, &full_name) {
                    Some(spans) => {
                        search_from = spans.value_end;
                        (
                            Some(self.make_source_info(
                                content_start + spans.name_start,
                                content_start + spans.name_end,
                            )),
                            Some(self.make_source_info(
                                content_start + spans.value_start,
                                content_start + spans.value_end,
                            )),
                        )
                    }
                    None => (None, None),
                };

            attributes.push(XmlAttribute {
                name,
                name_source,
                prefix,
                value: value.into_owned(),
                value_source,
            });
        }

        Ok(attributes)
    }

    fn make_source_info(&self, start: usize, end: usize) -> SourceInfo {
        SourceInfo::original(self.file_id, start, end)
    }
}

/// Byte spans of one attribute inside the raw tag content.
struct AttributeSpans {
    name_start: usize,
    name_end: usize,
    /// Includes the opening quote.
    value_start: usize,
    /// Just past the closing quote.
    value_end: usize,
}

/// Locate `name="value"` in `tag`, starting the search at `from`.
///
/// The name must be preceded by whitespace and followed by `=` so that a
/// match inside an earlier value or a longer name is skipped.
fn attribute_spans(tag: &str, from: usize, name: &str) -> Option<AttributeSpans> {
    let mut search = from;
    loop {
        let name_start = search + tag.get(search..)?.find(name)?;
        let name_end = name_start + name.len();

        let preceded_by_space = tag[..name_start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let rest = &tag[name_end..];
        let after_name = rest.trim_start();

        if preceded_by_space && after_name.starts_with('=') {
            let eq = name_end + (rest.len() - after_name.len());
            let after_eq = &tag[eq + 1..];
            let value_start = eq + 1 + (after_eq.len() - after_eq.trim_start().len());
            let quote = tag[value_start..].chars().next()?;
            if quote != '"' && quote != '\'' {
                return None;
            }
            let value_end = tag[value_start + 1..]
                .find(quote)
                .map_or(tag.len(), |p| value_start + 1 + p + 1);
            return Some(AttributeSpans {
                name_start,
                name_end,
                value_start,
                value_end,
            });
        }

        search = name_end;
    }
}

fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw);
    match full_name.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full_name.into_owned(), None),
    }
}

fn qualified(prefix: &Option<String>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}
