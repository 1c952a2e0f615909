//! The converter trait and the context converters run in.

use crate::error::{Error, Result};
use crate::options::MarshalOptions;
use crate::profile::Profile;
use crate::registry::ConverterRegistry;
use qti_model::{AttributeValue, Component, ComponentKind};
use qti_xml::{XmlChild, XmlDocument, XmlElement};
use std::fmt::Debug;
use std::sync::Arc;

/// Converts one element to a component and back.
///
/// Converters are shared between threads through the registry, so they
/// hold no per-conversion state; anything a conversion needs travels in the
/// [`MarshalContext`].
pub trait Converter: Send + Sync + Debug {
    /// The kind this converter produces and consumes.
    fn kind(&self) -> ComponentKind;

    fn unmarshal(&self, element: &XmlElement, ctx: &MarshalContext<'_>) -> Result<Component>;

    fn marshal(&self, component: &Component, ctx: &MarshalContext<'_>) -> Result<XmlElement>;
}

/// Everything a converter may consult during a single call.
#[derive(Debug, Clone, Copy)]
pub struct MarshalContext<'a> {
    pub registry: &'a ConverterRegistry,
    pub options: &'a MarshalOptions,
    /// The parsed document, when unmarshalling one. Blob content is sliced
    /// from its source text.
    pub source: Option<&'a XmlDocument>,
}

impl<'a> MarshalContext<'a> {
    pub fn new(registry: &'a ConverterRegistry, options: &'a MarshalOptions) -> Self {
        Self {
            registry,
            options,
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'a XmlDocument) -> Self {
        self.source = Some(source);
        self
    }

    pub fn profile(&self) -> Profile {
        self.registry.profile()
    }

    /// Convert an element with whichever converter its tag resolves to.
    pub fn unmarshal_element(&self, element: &XmlElement) -> Result<Component> {
        self.registry
            .resolve_element(element)?
            .unmarshal(element, self)
    }

    /// Convert a component with the converter registered for its kind.
    ///
    /// Text runs become XML text.
    pub fn marshal_component(&self, component: &Component) -> Result<XmlChild> {
        if component.kind == ComponentKind::TextRun {
            return Ok(XmlChild::Text {
                content: component.text.clone().unwrap_or_default(),
                source_info: None,
            });
        }
        if let Some(converter) = self.extension_converter(component) {
            return converter.marshal(component, self).map(XmlChild::Element);
        }
        let (_, converter) = self.registry.resolve_kind(component.kind)?;
        converter.marshal(component, self).map(XmlChild::Element)
    }

    /// The converter for a `customOperator` read from an extension element,
    /// so it is written back under that element's name.
    fn extension_converter(&self, component: &Component) -> Option<Arc<dyn Converter>> {
        if component.kind != ComponentKind::CustomOperator {
            return None;
        }
        let class = match component.attribute("class")? {
            AttributeValue::String(class) => class.as_str(),
            _ => return None,
        };
        if self.registry.tag_for(ComponentKind::CustomOperator) == Some(class) {
            return None;
        }
        self.registry
            .resolve(class)
            .ok()
            .filter(|converter| converter.kind() == ComponentKind::CustomOperator)
    }

    /// The element name `kind` is written with under the active registry.
    pub fn tag_for(&self, kind: ComponentKind) -> Result<&'a str> {
        self.registry
            .tag_for(kind)
            .ok_or_else(|| Error::ConverterNotFound {
                tag: self.profile().tag_for(kind).into_owned(),
                profile: self.profile(),
                location: None,
            })
    }

    pub(crate) fn strict(&self) -> bool {
        self.options.strict_attributes
    }
}
