//! Conversion between QTI XML and the QTI component model.
//!
//! A [`Marshaller`] turns parsed QTI documents into [`Component`] trees and
//! back, in either the QTI 2 or QTI 3 spelling. Kinds that nest without
//! bound (operators, body content, rule conditions, sections) are converted
//! by an iterative [`engine`], so document depth is limited by memory rather
//! than by the call stack.
//!
//! ```
//! use qti_marshal::{MarshalOptions, Profile, marshal_to_string, unmarshal_str};
//! use qti_model::ComponentKind;
//!
//! let options = MarshalOptions::default();
//! let and = unmarshal_str(
//!     r#"<and><variable identifier="A"/><variable identifier="B"/></and>"#,
//!     &options,
//! )
//! .unwrap();
//! assert_eq!(and.kind, ComponentKind::And);
//! assert_eq!(and.children().len(), 2);
//!
//! let options = MarshalOptions {
//!     xml_declaration: false,
//!     ..MarshalOptions::default().with_profile(Profile::Qti3)
//! };
//! assert_eq!(
//!     marshal_to_string(&and, &options).unwrap(),
//!     r#"<qti-and><qti-variable identifier="A"/><qti-variable identifier="B"/></qti-and>"#
//! );
//! ```

pub mod converter;
pub mod element;
pub mod engine;
pub mod error;
pub mod families;
pub mod options;
pub mod policy;
pub mod profile;
pub mod registry;

pub use converter::{Converter, MarshalContext};
pub use element::{CustomTagConverter, ElementConverter, read_attributes, write_attributes};
pub use engine::{TraversalPolicy, convert};
pub use error::{Error, NodeRef, Result};
pub use families::{Family, family_of};
pub use options::MarshalOptions;
pub use policy::{MarshalPolicy, RecursiveConverter, UnmarshalPolicy};
pub use profile::{Profile, QTI2_NAMESPACE, QTI3_NAMESPACE};
pub use registry::{ConverterFactory, ConverterRegistry, default_converter_name};

use qti_model::Component;
use qti_xml::{XmlDocument, XmlElement};
use std::borrow::Cow;
use std::sync::Arc;

/// Converts documents with one registry per profile.
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Marshaller {
    options: MarshalOptions,
    registries: Vec<Arc<ConverterRegistry>>,
}

impl Marshaller {
    /// A marshaller with the built-in QTI 2 and QTI 3 registries.
    pub fn new(options: MarshalOptions) -> Self {
        let registries = Profile::ALL
            .into_iter()
            .map(|profile| Arc::new(ConverterRegistry::for_profile(profile)))
            .collect();
        Self {
            options,
            registries,
        }
    }

    /// Use `registry` for its profile instead of the built-in one.
    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        let profile = registry.profile();
        self.registries.retain(|r| r.profile() != profile);
        self.registries.push(Arc::new(registry));
        self
    }

    pub fn options(&self) -> &MarshalOptions {
        &self.options
    }

    pub fn registry(&self, profile: Profile) -> Option<&ConverterRegistry> {
        self.registries
            .iter()
            .find(|r| r.profile() == profile)
            .map(|r| r.as_ref())
    }

    fn registry_or_default(&self, profile: Profile) -> Cow<'_, ConverterRegistry> {
        match self.registry(profile) {
            Some(registry) => Cow::Borrowed(registry),
            None => Cow::Owned(ConverterRegistry::for_profile(profile)),
        }
    }

    /// Convert a parsed document, detecting its profile from the root.
    ///
    /// Falls back to the configured profile when detection fails.
    pub fn unmarshal_document(&self, document: &XmlDocument) -> Result<Component> {
        let profile = Profile::detect(&document.root).unwrap_or(self.options.profile);
        self.unmarshal_document_as(document, profile)
    }

    /// Convert a parsed document with the registry for `profile`.
    pub fn unmarshal_document_as(
        &self,
        document: &XmlDocument,
        profile: Profile,
    ) -> Result<Component> {
        tracing::debug!(profile = %profile, root = %document.root.name, "Unmarshalling document");
        let registry = self.registry_or_default(profile);
        let ctx = MarshalContext::new(&registry, &self.options).with_source(document);
        ctx.unmarshal_element(&document.root)
    }

    pub fn unmarshal_str(&self, content: &str) -> Result<Component> {
        let document = qti_xml::parse(content)?;
        self.unmarshal_document(&document)
    }

    /// Convert a component tree to an element in the configured profile.
    pub fn marshal(&self, component: &Component) -> Result<XmlElement> {
        let registry = self.registry_or_default(self.options.profile);
        let ctx = MarshalContext::new(&registry, &self.options);
        match ctx.marshal_component(component)? {
            qti_xml::XmlChild::Element(element) => Ok(element),
            _ => Err(Error::UnexpectedContent {
                node: NodeRef::component(component),
                message: "a text run cannot be a document root".to_string(),
            }),
        }
    }

    pub fn marshal_to_string(&self, component: &Component) -> Result<String> {
        let element = self.marshal(component)?;
        Ok(qti_xml::to_string_with_options(
            &element,
            &self.options.write_options(),
        )?)
    }
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new(MarshalOptions::default())
    }
}

/// Parse and convert `content` with a one-off [`Marshaller`].
pub fn unmarshal_str(content: &str, options: &MarshalOptions) -> Result<Component> {
    Marshaller::new(options.clone()).unmarshal_str(content)
}

/// Convert and serialize `component` with a one-off [`Marshaller`].
pub fn marshal_to_string(component: &Component, options: &MarshalOptions) -> Result<String> {
    Marshaller::new(options.clone()).marshal_to_string(component)
}
