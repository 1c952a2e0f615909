//! Schema-driven one-shot converters.

use crate::converter::{Converter, MarshalContext};
use crate::error::{Error, NodeRef, Result};
use qti_model::{
    AttributeType, AttributeValue, Attributes, Component, ComponentKind, ContentModel,
};
use qti_xml::{XmlChild, XmlElement, XmlNode};

/// Converts one kind by following its schema tables.
///
/// Children are converted through the registry with ordinary recursion,
/// which is bounded by how deeply the schema lets non-family kinds nest.
/// Families that nest without bound use
/// [`RecursiveConverter`](crate::RecursiveConverter) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementConverter {
    kind: ComponentKind,
}

impl ElementConverter {
    pub fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }
}

impl Converter for ElementConverter {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn unmarshal(&self, element: &XmlElement, ctx: &MarshalContext<'_>) -> Result<Component> {
        let mut component = Component::new(self.kind);
        component.attributes = read_attributes(self.kind, element, ctx)?;

        match self.kind.content() {
            ContentModel::Empty => {
                for node in element.nodes() {
                    match node {
                        XmlNode::Text(_) if node.is_whitespace() => {}
                        XmlNode::Text(text) => return Err(stray_text(element, text)),
                        XmlNode::Element(child) => {
                            return Err(Error::UnexpectedContent {
                                node: NodeRef::element(child),
                                message: format!("<{}> holds no child elements", element.name),
                            });
                        }
                    }
                }
            }
            ContentModel::Text => {
                if let Some(child) = element.elements().next() {
                    return Err(Error::UnexpectedContent {
                        node: NodeRef::element(child),
                        message: format!("<{}> holds only text", element.name),
                    });
                }
                component.text = Some(element.text());
            }
            ContentModel::Blob => {
                component.blob = Some(blob_of(element, ctx)?);
            }
            ContentModel::Children(accepts) => {
                let inline = accepts.accepts_inline();
                for node in element.nodes() {
                    match node {
                        XmlNode::Text(text) if inline => {
                            push_child(&mut component, element, None, Component::text_run(text))?;
                        }
                        XmlNode::Text(_) if node.is_whitespace() => {}
                        XmlNode::Text(text) => return Err(stray_text(element, text)),
                        XmlNode::Element(child) => {
                            let converted = ctx.unmarshal_element(child)?;
                            push_child(&mut component, element, Some(child), converted)?;
                        }
                    }
                }
                component
                    .check_arity()
                    .map_err(|err| Error::from_model(NodeRef::element(element), err))?;
            }
        }

        Ok(component)
    }

    fn marshal(&self, component: &Component, ctx: &MarshalContext<'_>) -> Result<XmlElement> {
        let mut element = open_element(component, ctx)?;
        match self.kind.content() {
            ContentModel::Empty => {}
            ContentModel::Text => {
                if let Some(text) = component.text.as_deref().filter(|t| !t.is_empty()) {
                    element.push_text(text);
                }
            }
            ContentModel::Blob => {
                if let Some(blob) = component.blob.as_deref().filter(|b| !b.is_empty()) {
                    element.push_raw(blob);
                }
            }
            ContentModel::Children(_) => {
                component
                    .check_arity()
                    .map_err(|err| Error::from_model(NodeRef::component(component), err))?;
                for child in component.children() {
                    element.children.push(ctx.marshal_component(child)?);
                }
            }
        }
        Ok(element)
    }
}

/// Converts vendor extension elements, reached through the fallback table.
///
/// The element becomes a `customOperator` whose `class` is the element
/// name and whose content is kept as an opaque blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTagConverter {
    tag: String,
}

impl CustomTagConverter {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Converter for CustomTagConverter {
    fn kind(&self) -> ComponentKind {
        ComponentKind::CustomOperator
    }

    fn unmarshal(&self, element: &XmlElement, ctx: &MarshalContext<'_>) -> Result<Component> {
        tracing::debug!(tag = %self.tag, "Keeping extension element as a blob");
        let mut component = Component::new(ComponentKind::CustomOperator)
            .with_attribute("class", AttributeValue::String(element.name.clone()))
            .with_blob(blob_of(element, ctx)?);
        let definition = ctx.profile().attribute_name("definition");
        if let Some(value) = element.get_attribute(&definition) {
            component
                .attributes
                .set("definition", AttributeValue::String(value.to_string()));
        }
        Ok(component)
    }

    fn marshal(&self, component: &Component, ctx: &MarshalContext<'_>) -> Result<XmlElement> {
        let mut element = XmlElement::new(self.tag.clone());
        if let Some(definition) = component.attribute("definition") {
            element.set_attribute(ctx.profile().attribute_name("definition"), definition.to_string());
        }
        if let Some(blob) = component.blob.as_deref().filter(|b| !b.is_empty()) {
            element.push_raw(blob);
        }
        Ok(element)
    }
}

/// Start the element for `component`: tag, root namespace and attributes.
pub(crate) fn open_element(component: &Component, ctx: &MarshalContext<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(ctx.tag_for(component.kind)?);
    if matches!(
        component.kind,
        ComponentKind::AssessmentItem | ComponentKind::AssessmentTest
    ) {
        element.set_attribute("xmlns", ctx.profile().namespace());
    }
    write_attributes(component, &mut element, ctx)?;
    Ok(element)
}

/// Read and coerce the attributes `kind` defines.
///
/// Namespace declarations and prefixed attributes are skipped. Attributes
/// the schema does not know are dropped, or rejected in strict mode.
pub fn read_attributes(
    kind: ComponentKind,
    element: &XmlElement,
    ctx: &MarshalContext<'_>,
) -> Result<Attributes> {
    let profile = ctx.profile();
    let specs = kind.attributes();
    let mut attributes = Attributes::new();

    for attr in &element.attributes {
        if attr.is_namespace_declaration() || attr.prefix.is_some() {
            continue;
        }
        let Some(spec) = specs
            .iter()
            .find(|spec| profile.attribute_name(spec.name) == attr.name)
        else {
            if ctx.options.strict_attributes {
                return Err(Error::UnexpectedAttribute {
                    node: NodeRef::attribute(element, attr),
                    attribute: attr.name.clone(),
                });
            }
            tracing::debug!(
                element = %element.name,
                attribute = %attr.name,
                "Dropping unknown attribute"
            );
            continue;
        };
        let value = AttributeValue::parse(spec.ty, &attr.value).ok_or_else(|| {
            Error::InvalidAttributeValue {
                node: NodeRef::attribute(element, attr),
                attribute: attr.name.clone(),
                value: attr.value.clone(),
                expected: describe_type(spec.ty),
            }
        })?;
        attributes.set(spec.name, value);
    }

    if let Some(missing) = specs
        .iter()
        .find(|spec| spec.required && !attributes.contains(spec.name))
    {
        return Err(Error::MissingRequiredAttribute {
            node: NodeRef::element(element),
            attribute: profile.attribute_name(missing.name).into_owned(),
        });
    }

    Ok(attributes)
}

/// Write `component`'s attributes onto `element` in the active profile's spelling.
pub fn write_attributes(
    component: &Component,
    element: &mut XmlElement,
    ctx: &MarshalContext<'_>,
) -> Result<()> {
    let kind = component.kind;
    let profile = ctx.profile();

    if let Some(missing) = kind
        .attributes()
        .iter()
        .find(|spec| spec.required && !component.attributes.contains(spec.name))
    {
        return Err(Error::MissingRequiredAttribute {
            node: NodeRef::component(component),
            attribute: missing.name.to_string(),
        });
    }

    for (name, value) in component.attributes.iter() {
        match kind.attribute(name) {
            Some(spec) => element.set_attribute(profile.attribute_name(spec.name), value.to_string()),
            None if ctx.options.strict_attributes => {
                return Err(Error::UnexpectedAttribute {
                    node: NodeRef::component(component),
                    attribute: name.to_string(),
                });
            }
            None => {
                tracing::debug!(kind = %kind, attribute = name, "Dropping unknown attribute");
            }
        }
    }
    Ok(())
}

/// The opaque content of a blob element.
///
/// Parsed elements are sliced from the document source so the bytes come
/// back exactly as written.
pub(crate) fn blob_of(element: &XmlElement, ctx: &MarshalContext<'_>) -> Result<String> {
    if let [XmlChild::Raw(raw)] = element.children.as_slice() {
        return Ok(raw.clone());
    }
    if let Some(inner) = ctx.source.and_then(|doc| doc.inner_text(element)) {
        return Ok(inner.to_string());
    }
    if element.children.is_empty() {
        return Ok(String::new());
    }
    Ok(qti_xml::inner_to_string(element)?)
}

fn push_child(
    parent: &mut Component,
    element: &XmlElement,
    child_element: Option<&XmlElement>,
    child: Component,
) -> Result<()> {
    let kind = child.kind;
    parent.push_child(child).map_err(|err| match child_element {
        Some(child_element) => Error::DisallowedChild {
            parent: NodeRef::element(element),
            child: NodeRef::element(child_element),
        },
        None if kind == ComponentKind::TextRun => Error::UnexpectedContent {
            node: NodeRef::element(element),
            message: "text is not allowed here".to_string(),
        },
        None => Error::from_model(NodeRef::element(element), err),
    })
}

pub(crate) fn stray_text(element: &XmlElement, text: &str) -> Error {
    let text = text.trim();
    let shown: String = text.chars().take(20).collect();
    let ellipsis = if shown.len() < text.len() { "..." } else { "" };
    Error::UnexpectedContent {
        node: NodeRef::element(element),
        message: format!("text \"{}{}\" is not allowed here", shown, ellipsis),
    }
}

fn describe_type(ty: AttributeType) -> String {
    match ty {
        AttributeType::String => "a string".to_string(),
        AttributeType::Identifier => "an identifier".to_string(),
        AttributeType::Integer => "an integer".to_string(),
        AttributeType::Float => "a number".to_string(),
        AttributeType::Boolean => "true or false".to_string(),
        AttributeType::OneOf(values) => format!("one of {}", values.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MarshalOptions;
    use crate::profile::Profile;
    use crate::registry::ConverterRegistry;

    #[test]
    fn test_read_attributes_in_qti3_spelling() {
        let registry = ConverterRegistry::for_profile(Profile::Qti3);
        let options = MarshalOptions::default();
        let ctx = MarshalContext::new(&registry, &options);

        let element = XmlElement::new("qti-choice-interaction")
            .with_attribute("response-identifier", "R")
            .with_attribute("shuffle", "true")
            .with_attribute("max-choices", "2");
        let attributes = read_attributes(ComponentKind::ChoiceInteraction, &element, &ctx).unwrap();

        assert_eq!(
            attributes.get("responseIdentifier"),
            Some(&AttributeValue::Identifier("R".into()))
        );
        assert_eq!(attributes.get("shuffle"), Some(&AttributeValue::Boolean(true)));
        assert_eq!(attributes.get("maxChoices"), Some(&AttributeValue::Integer(2)));

        // QTI 2 spellings mean nothing under QTI 3.
        let qti2_spelling = XmlElement::new("qti-choice-interaction")
            .with_attribute("responseIdentifier", "R")
            .with_attribute("shuffle", "true")
            .with_attribute("maxChoices", "2");
        assert_eq!(
            read_attributes(ComponentKind::ChoiceInteraction, &qti2_spelling, &ctx),
            Err(Error::MissingRequiredAttribute {
                node: NodeRef::named("qti-choice-interaction"),
                attribute: "response-identifier".to_string(),
            })
        );
    }

    #[test]
    fn test_blob_without_source() {
        let registry = ConverterRegistry::for_profile(Profile::Qti2);
        let options = MarshalOptions::default();
        let ctx = MarshalContext::new(&registry, &options);

        let mut built = XmlElement::new("customOperator");
        built.push_element(XmlElement::new("x").with_attribute("a", "1 < 2"));
        assert_eq!(blob_of(&built, &ctx).unwrap(), r#"<x a="1 &lt; 2"/>"#);

        let mut raw = XmlElement::new("customOperator");
        raw.push_raw("<y/>");
        assert_eq!(blob_of(&raw, &ctx).unwrap(), "<y/>");

        assert_eq!(blob_of(&XmlElement::new("customOperator"), &ctx).unwrap(), "");
    }

    #[test]
    fn test_empty_content_rejects_children() {
        let registry = ConverterRegistry::for_profile(Profile::Qti2);
        let options = MarshalOptions::default();
        let ctx = MarshalContext::new(&registry, &options);

        let mut element = XmlElement::new("null");
        element.push_text("  \n");
        assert!(ElementConverter::new(ComponentKind::Null).unmarshal(&element, &ctx).is_ok());

        element.push_element(XmlElement::new("null"));
        assert!(matches!(
            ElementConverter::new(ComponentKind::Null).unmarshal(&element, &ctx),
            Err(Error::UnexpectedContent { .. })
        ));
    }
}
