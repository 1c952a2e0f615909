//! Error types for marshalling.

use crate::profile::Profile;
use qti_diagnostics::{DiagnosticMessage, DiagnosticMessageBuilder};
use qti_model::{Component, ComponentKind, ModelError};
use qti_source_map::SourceInfo;
use qti_xml::{XmlAttribute, XmlElement};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The node an error is about: an element or kind name, and where it was
/// parsed from when it came from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub name: String,
    pub location: Option<SourceInfo>,
}

impl NodeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    pub fn element(element: &XmlElement) -> Self {
        Self {
            name: element.name.clone(),
            location: element.source_info.clone(),
        }
    }

    /// Points at the attribute's value when its location is known.
    pub fn attribute(element: &XmlElement, attr: &XmlAttribute) -> Self {
        Self {
            name: element.name.clone(),
            location: attr
                .value_source
                .clone()
                .or_else(|| element.source_info.clone()),
        }
    }

    pub fn component(component: &Component) -> Self {
        Self::kind(component.kind)
    }

    pub fn kind(kind: ComponentKind) -> Self {
        Self::named(kind.class_name())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// Errors raised while converting between XML and components.
///
/// Any error aborts the whole conversion; there are no partial results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("No converter registered for <{tag}> in the {profile} profile")]
    ConverterNotFound {
        tag: String,
        profile: Profile,
        location: Option<SourceInfo>,
    },

    #[error("Malformed {family}: {node} {message}")]
    MalformedFamilyShape {
        family: &'static str,
        node: NodeRef,
        message: String,
    },

    #[error("{node} requires attribute '{attribute}'")]
    MissingRequiredAttribute { node: NodeRef, attribute: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on {node}: expected {expected}")]
    InvalidAttributeValue {
        node: NodeRef,
        attribute: String,
        value: String,
        expected: String,
    },

    #[error("Attribute '{attribute}' is not defined for {node}")]
    UnexpectedAttribute { node: NodeRef, attribute: String },

    #[error("{parent} cannot contain {child}")]
    DisallowedChild { parent: NodeRef, child: NodeRef },

    #[error("Unexpected content in {node}: {message}")]
    UnexpectedContent { node: NodeRef, message: String },

    #[error("Conversion of the {family} family ended without producing a result")]
    TrailExhausted { family: &'static str },

    #[error(transparent)]
    Xml(#[from] qti_xml::Error),

    #[error("{node}: {source}")]
    Model {
        node: NodeRef,
        #[source]
        source: ModelError,
    },
}

impl Error {
    /// Attach `node` to a collection error.
    ///
    /// Rejected children become [`Error::DisallowedChild`] so that both
    /// sides are named.
    pub fn from_model(node: NodeRef, err: ModelError) -> Self {
        match err {
            ModelError::DisallowedChild { child, .. } => Error::DisallowedChild {
                parent: node,
                child: NodeRef::kind(child),
            },
            source => Error::Model { node, source },
        }
    }

    /// Source location of the offending node, when known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ConverterNotFound { location, .. } => location.as_ref(),
            Error::MalformedFamilyShape { node, .. }
            | Error::MissingRequiredAttribute { node, .. }
            | Error::InvalidAttributeValue { node, .. }
            | Error::UnexpectedAttribute { node, .. }
            | Error::UnexpectedContent { node, .. }
            | Error::Model { node, .. } => node.location.as_ref(),
            Error::DisallowedChild { parent, child } => {
                child.location.as_ref().or(parent.location.as_ref())
            }
            Error::TrailExhausted { .. } => None,
            Error::Xml(err) => err.location(),
        }
    }

    /// Convert this error to a DiagnosticMessage with the appropriate QTI-2-* code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self {
            Error::ConverterNotFound { tag, profile, .. } => {
                DiagnosticMessageBuilder::error("Converter Not Found")
                    .with_code("QTI-2-1")
                    .problem(format!("No converter is registered for <{}>", tag))
                    .add_info(format!("Active profile: {}", profile))
                    .add_hint("Is the element spelled for the document's QTI version?")
            }

            Error::MalformedFamilyShape {
                family,
                node,
                message,
            } => DiagnosticMessageBuilder::error("Malformed Structure")
                .with_code("QTI-2-2")
                .problem(format!("{} {}", node, message))
                .add_info(format!("While converting {}", family)),

            Error::MissingRequiredAttribute { node, attribute } => {
                DiagnosticMessageBuilder::error("Missing Required Attribute")
                    .with_code("QTI-2-3")
                    .problem(format!("{} requires attribute '{}'", node, attribute))
                    .add_hint(format!("Add {}=\"...\" to the element?", attribute))
            }

            Error::InvalidAttributeValue {
                node,
                attribute,
                value,
                expected,
            } => DiagnosticMessageBuilder::error("Invalid Attribute Value")
                .with_code("QTI-2-4")
                .problem(format!(
                    "Invalid value '{}' for attribute '{}' on {}",
                    value, attribute, node
                ))
                .add_detail(format!("Expected: {}", expected)),

            Error::UnexpectedAttribute { node, attribute } => {
                DiagnosticMessageBuilder::error("Unexpected Attribute")
                    .with_code("QTI-2-5")
                    .problem(format!("Attribute '{}' is not defined for {}", attribute, node))
                    .add_hint("Remove the attribute, or turn off strict attribute checking?")
            }

            Error::DisallowedChild { parent, child } => {
                DiagnosticMessageBuilder::error("Disallowed Child")
                    .with_code("QTI-2-6")
                    .problem(format!("{} cannot contain {}", parent, child))
            }

            Error::UnexpectedContent { node, message } => {
                DiagnosticMessageBuilder::error("Unexpected Content")
                    .with_code("QTI-2-7")
                    .problem(format!("Unexpected content in {}", node))
                    .add_detail(message.clone())
            }

            Error::TrailExhausted { family } => {
                DiagnosticMessageBuilder::error("Conversion Did Not Complete")
                    .with_code("QTI-2-8")
                    .problem(format!(
                        "Conversion of the {} family ended without producing a result",
                        family
                    ))
            }

            Error::Xml(err) => return err.to_diagnostic(),

            Error::Model { node, source } => {
                let mut diagnostic = source.to_diagnostic();
                diagnostic.location = node.location.clone();
                return diagnostic;
            }
        };

        builder
            .with_optional_location(self.location().cloned())
            .build()
    }
}
