//! Error types for XML parsing and serialization.

use qti_diagnostics::{DiagnosticMessage, DiagnosticMessageBuilder};
use qti_source_map::SourceInfo;

/// Result type alias for qti-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing XML.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", position_suffix(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
        location: Option<SourceInfo>,
    },

    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        location: Option<SourceInfo>,
    },

    #[error("Invalid XML structure: {message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },

    /// Empty document (no root element).
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    #[error("Invalid XML: multiple root elements")]
    MultipleRoots { location: Option<SourceInfo> },

    /// Serialization failed in the underlying writer.
    #[error("Failed to write XML: {message}")]
    Write { message: String },
}

fn position_suffix(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {}", pos),
        None => String::new(),
    }
}

impl Error {
    /// Source location of the error, when known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::UnexpectedEof { location, .. }
            | Error::MismatchedEndTag { location, .. }
            | Error::InvalidStructure { location, .. }
            | Error::MultipleRoots { location } => location.as_ref(),
            Error::XmlSyntax { .. } | Error::EmptyDocument | Error::Write { .. } => None,
        }
    }

    /// Convert this error to a DiagnosticMessage with the appropriate QTI-1-* code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self {
            Error::XmlSyntax { message, position } => {
                let builder = DiagnosticMessageBuilder::error("XML Syntax Error")
                    .with_code("QTI-1-1")
                    .problem(message.clone());
                match position {
                    Some(pos) => builder.add_detail(format!("Error at byte offset {}", pos)),
                    None => builder,
                }
            }

            Error::UnexpectedEof { expected, .. } => {
                DiagnosticMessageBuilder::error("Unexpected End of XML Input")
                    .with_code("QTI-1-2")
                    .problem(format!(
                        "The XML document ended unexpectedly; expected {}",
                        expected
                    ))
            }

            Error::MismatchedEndTag {
                expected, found, ..
            } => DiagnosticMessageBuilder::error("Mismatched XML End Tag")
                .with_code("QTI-1-3")
                .problem(format!(
                    "End tag </{}> does not match start tag <{}>",
                    found, expected
                ))
                .add_detail(format!("Expected: </{}>", expected))
                .add_detail(format!("Found: </{}>", found))
                .add_hint("Check that all opening tags have matching closing tags?"),

            Error::InvalidStructure { message, .. } => {
                DiagnosticMessageBuilder::error("Invalid XML Structure")
                    .with_code("QTI-1-4")
                    .problem(message.clone())
            }

            Error::EmptyDocument => DiagnosticMessageBuilder::error("Empty XML Document")
                .with_code("QTI-1-5")
                .problem("The XML document contains no root element")
                .add_hint("Add a root element such as <assessmentItem> to the document?"),

            Error::MultipleRoots { .. } => {
                DiagnosticMessageBuilder::error("Multiple XML Root Elements")
                    .with_code("QTI-1-6")
                    .problem("The XML document contains multiple root elements")
                    .add_detail("XML documents must have exactly one root element")
            }

            Error::Write { message } => DiagnosticMessageBuilder::error("XML Write Error")
                .with_code("QTI-1-7")
                .problem(message.clone()),
        };

        builder
            .with_optional_location(self.location().cloned())
            .build()
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Write {
            message: err.to_string(),
        }
    }
}
