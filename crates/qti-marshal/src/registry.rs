//! Tag to converter dispatch.

use crate::converter::Converter;
use crate::element::{CustomTagConverter, ElementConverter};
use crate::error::{Error, Result};
use crate::families::family_of;
use crate::policy::RecursiveConverter;
use crate::profile::Profile;
use qti_model::ComponentKind;
use qti_xml::XmlElement;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a converter for a tag that has no direct registration.
pub type ConverterFactory = Arc<dyn Fn(&str) -> Arc<dyn Converter> + Send + Sync>;

/// Maps element names to the converters responsible for them.
///
/// A registry is built once per profile and is read-only while converting,
/// so one registry can serve any number of concurrent conversions.
#[derive(Clone)]
pub struct ConverterRegistry {
    profile: Profile,
    by_tag: HashMap<String, Arc<dyn Converter>>,
    tags_by_kind: HashMap<ComponentKind, String>,
    fallbacks: HashMap<String, ConverterFactory>,
}

impl ConverterRegistry {
    /// An empty registry.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            by_tag: HashMap::new(),
            tags_by_kind: HashMap::new(),
            fallbacks: HashMap::new(),
        }
    }

    /// A registry holding the built-in converters under `profile`'s spellings.
    pub fn for_profile(profile: Profile) -> Self {
        let mut registry = Self::qti2();
        if profile == Profile::Qti3 {
            registry.profile = Profile::Qti3;
            for &kind in ComponentKind::ALL {
                if kind.is_xhtml() {
                    continue;
                }
                if let Some(converter) = registry.unregister(kind.class_name()) {
                    registry.register(Profile::Qti3.tag_for(kind), converter);
                }
            }
        }
        tracing::debug!(
            profile = %profile,
            converters = registry.len(),
            "Built converter registry"
        );
        registry
    }

    fn qti2() -> Self {
        let mut registry = Self::new(Profile::Qti2);
        for &kind in ComponentKind::ALL {
            if kind == ComponentKind::TextRun {
                continue;
            }
            let converter: Arc<dyn Converter> = match family_of(kind) {
                Some(family) => Arc::new(RecursiveConverter::new(kind, family)),
                None => Arc::new(ElementConverter::new(kind)),
            };
            registry.register(kind.class_name(), converter);
        }
        registry.register_fallback(
            "CustomTagConverter",
            Arc::new(|tag: &str| Arc::new(CustomTagConverter::new(tag)) as Arc<dyn Converter>),
        );
        registry
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Register `converter` for `tag`, returning the converter it replaces.
    ///
    /// `tag` becomes the output tag of the converter's kind only when that
    /// kind has no other tag registered. Extra tags for a kind are read-only
    /// aliases.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        converter: Arc<dyn Converter>,
    ) -> Option<Arc<dyn Converter>> {
        let tag = tag.into();
        let kind = converter.kind();
        let previous = self.by_tag.insert(tag.clone(), converter);
        let spelled_elsewhere = self.tags_by_kind.get(&kind).is_some_and(|current| {
            *current != tag && self.by_tag.get(current).is_some_and(|c| c.kind() == kind)
        });
        if !spelled_elsewhere {
            self.tags_by_kind.insert(kind, tag);
        }
        if let Some(previous) = previous.as_ref().filter(|p| p.kind() != kind) {
            // The replaced converter's kind may now be spelled differently.
            let previous_kind = previous.kind();
            self.refresh_kind(previous_kind);
        }
        previous
    }

    pub fn unregister(&mut self, tag: &str) -> Option<Arc<dyn Converter>> {
        let converter = self.by_tag.remove(tag)?;
        self.refresh_kind(converter.kind());
        Some(converter)
    }

    /// Register a factory consulted when a tag has no direct converter.
    ///
    /// `name` is the conventional converter name derived from the tag: the
    /// tag in UpperCamelCase followed by `Converter`.
    pub fn register_fallback(&mut self, name: impl Into<String>, factory: ConverterFactory) {
        self.fallbacks.insert(name.into(), factory);
    }

    /// Find the converter for `tag`, consulting the fallback table on a miss.
    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn Converter>> {
        if let Some(converter) = self.by_tag.get(tag) {
            return Ok(Arc::clone(converter));
        }
        let name = default_converter_name(tag);
        if let Some(factory) = self.fallbacks.get(&name) {
            tracing::debug!(tag, converter = %name, "Using fallback converter");
            return Ok(factory(tag));
        }
        Err(Error::ConverterNotFound {
            tag: tag.to_string(),
            profile: self.profile,
            location: None,
        })
    }

    /// [`resolve`](Self::resolve) by element name, reporting the element's location.
    pub fn resolve_element(&self, element: &XmlElement) -> Result<Arc<dyn Converter>> {
        self.resolve(&element.name).map_err(|err| match err {
            Error::ConverterNotFound { tag, profile, .. } => Error::ConverterNotFound {
                tag,
                profile,
                location: element.name_source.clone().or(element.source_info.clone()),
            },
            other => other,
        })
    }

    /// The tag and converter used to write `kind`.
    pub fn resolve_kind(&self, kind: ComponentKind) -> Result<(&str, Arc<dyn Converter>)> {
        let not_found = || Error::ConverterNotFound {
            tag: self.profile.tag_for(kind).into_owned(),
            profile: self.profile,
            location: None,
        };
        let tag = self.tag_for(kind).ok_or_else(not_found)?;
        let converter = self.by_tag.get(tag).ok_or_else(not_found)?;
        Ok((tag, Arc::clone(converter)))
    }

    pub fn tag_for(&self, kind: ComponentKind) -> Option<&str> {
        self.tags_by_kind.get(&kind).map(String::as_str)
    }

    pub fn kind_for_tag(&self, tag: &str) -> Option<ComponentKind> {
        self.by_tag.get(tag).map(|converter| converter.kind())
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    fn refresh_kind(&mut self, kind: ComponentKind) {
        let current = self.tags_by_kind.get(&kind);
        if current.is_some_and(|tag| self.by_tag.get(tag).is_some_and(|c| c.kind() == kind)) {
            return;
        }
        let mut tags: Vec<&String> = self
            .by_tag
            .iter()
            .filter(|(_, converter)| converter.kind() == kind)
            .map(|(tag, _)| tag)
            .collect();
        tags.sort();
        match tags.first() {
            Some(tag) => {
                let tag = (*tag).clone();
                self.tags_by_kind.insert(kind, tag);
            }
            None => {
                self.tags_by_kind.remove(&kind);
            }
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fallbacks: Vec<&String> = self.fallbacks.keys().collect();
        fallbacks.sort();
        f.debug_struct("ConverterRegistry")
            .field("profile", &self.profile)
            .field("converters", &self.by_tag.len())
            .field("fallbacks", &fallbacks)
            .finish()
    }
}

/// `customTag` -> `CustomTagConverter`, `qti-custom-tag` -> `CustomTagConverter`.
pub fn default_converter_name(tag: &str) -> String {
    let local = tag.strip_prefix("qti-").unwrap_or(tag);
    let mut name = String::with_capacity(local.len() + 9);
    let mut upper = true;
    for c in local.chars() {
        if c == '-' || c == '_' || c == ':' {
            upper = true;
            continue;
        }
        if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name.push_str("Converter");
    name
}
