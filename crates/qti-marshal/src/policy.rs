//! Family policies for both directions, and the converter that runs them.

use crate::converter::{Converter, MarshalContext};
use crate::element::{ElementConverter, open_element, read_attributes, stray_text};
use crate::engine::{self, TraversalPolicy};
use crate::error::{Error, NodeRef, Result};
use crate::families::Family;
use qti_model::{Component, ComponentCollection, ComponentKind};
use qti_xml::{XmlChild, XmlElement, XmlNode};

/// XML to components for one family.
#[derive(Debug, Clone, Copy)]
pub struct UnmarshalPolicy<'a> {
    family: &'static dyn Family,
    ctx: MarshalContext<'a>,
}

impl<'a> UnmarshalPolicy<'a> {
    pub fn new(family: &'static dyn Family, ctx: MarshalContext<'a>) -> Self {
        Self { family, ctx }
    }

    fn kind_of(&self, element: &XmlElement) -> Option<ComponentKind> {
        self.ctx.registry.kind_for_tag(&element.name)
    }

    fn composite_kind(&self, element: &XmlElement) -> Result<ComponentKind> {
        self.kind_of(element)
            .ok_or_else(|| Error::ConverterNotFound {
                tag: element.name.clone(),
                profile: self.ctx.profile(),
                location: element.source_info.clone(),
            })
    }

    fn malformed(&self, node: NodeRef, message: String) -> Error {
        Error::MalformedFamilyShape {
            family: self.family.name(),
            node,
            message,
        }
    }
}

impl<'a> TraversalPolicy for UnmarshalPolicy<'a> {
    type Node = XmlNode<'a>;
    type Output = Component;
    type Collection = ComponentCollection;

    fn name(&self) -> &'static str {
        self.family.name()
    }

    fn is_leaf(&self, node: XmlNode<'a>) -> bool {
        match node {
            XmlNode::Text(_) => true,
            XmlNode::Element(element) => !self
                .kind_of(element)
                .is_some_and(|kind| self.family.is_composite(kind)),
        }
    }

    fn children_of(&self, node: XmlNode<'a>) -> Result<Vec<XmlNode<'a>>> {
        let XmlNode::Element(element) = node else {
            return Ok(Vec::new());
        };
        let kind = self.composite_kind(element)?;
        let inline = kind.accepts().is_some_and(|accepts| accepts.accepts_inline());

        let mut children = Vec::new();
        let mut position = 0;
        for child in element.nodes() {
            match child {
                XmlNode::Text(_) if inline => children.push(child),
                XmlNode::Text(_) if child.is_whitespace() => {}
                XmlNode::Text(text) => return Err(stray_text(element, text)),
                XmlNode::Element(child_element) => {
                    let child_kind = self.kind_of(child_element);
                    let structural = self.family.is_structural(kind, position, child_kind);
                    position += 1;
                    if structural {
                        continue;
                    }
                    self.family
                        .check_member(kind, child_kind)
                        .map_err(|message| self.malformed(NodeRef::element(child_element), message))?;
                    children.push(child);
                }
            }
        }
        Ok(children)
    }

    fn collection_for(&self, node: XmlNode<'a>) -> Result<ComponentCollection> {
        let XmlNode::Element(element) = node else {
            return Err(Error::TrailExhausted {
                family: self.family.name(),
            });
        };
        let kind = self.composite_kind(element)?;
        ComponentCollection::for_kind(kind)
            .map_err(|err| Error::from_model(NodeRef::element(element), err))
    }

    fn append(
        &self,
        node: XmlNode<'a>,
        collection: &mut ComponentCollection,
        child: Component,
    ) -> Result<()> {
        let parent = match node {
            XmlNode::Element(element) => NodeRef::element(element),
            XmlNode::Text(_) => NodeRef::kind(collection.parent()),
        };
        collection
            .push(child)
            .map_err(|err| Error::from_model(parent, err))
    }

    fn finalize_with_children(
        &self,
        node: XmlNode<'a>,
        collection: ComponentCollection,
    ) -> Result<Component> {
        let XmlNode::Element(element) = node else {
            return Err(Error::TrailExhausted {
                family: self.family.name(),
            });
        };
        let kind = self.composite_kind(element)?;

        let mut component = Component::new(kind);
        component.attributes = read_attributes(kind, element, &self.ctx)?;
        component
            .set_collection(collection)
            .map_err(|err| Error::from_model(NodeRef::element(element), err))?;

        let mut insert_at = 0;
        for (position, child) in element.elements().enumerate() {
            if !self.family.is_structural(kind, position, self.kind_of(child)) {
                continue;
            }
            let converted = self.ctx.unmarshal_element(child)?;
            component
                .insert_child(insert_at, converted)
                .map_err(|_| Error::DisallowedChild {
                    parent: NodeRef::element(element),
                    child: NodeRef::element(child),
                })?;
            insert_at += 1;
        }

        let kinds: Vec<ComponentKind> = component.children().iter().map(|c| c.kind).collect();
        self.family
            .check_shape(kind, &kinds)
            .map_err(|message| self.malformed(NodeRef::element(element), message))?;

        Ok(component)
    }

    fn convert_leaf(&self, node: XmlNode<'a>) -> Result<Component> {
        match node {
            XmlNode::Text(text) => Ok(Component::text_run(text)),
            XmlNode::Element(element) => self.ctx.unmarshal_element(element),
        }
    }

    fn describe(&self, node: XmlNode<'a>) -> String {
        match node {
            XmlNode::Element(element) => format!("<{}>", element.name),
            XmlNode::Text(_) => "text".to_string(),
        }
    }
}

/// Components to XML for one family.
#[derive(Debug, Clone, Copy)]
pub struct MarshalPolicy<'a> {
    family: &'static dyn Family,
    ctx: MarshalContext<'a>,
}

impl<'a> MarshalPolicy<'a> {
    pub fn new(family: &'static dyn Family, ctx: MarshalContext<'a>) -> Self {
        Self { family, ctx }
    }

    /// Element children of `component` with their element positions.
    fn positioned(component: &Component) -> impl Iterator<Item = (usize, &Component)> {
        component
            .children()
            .iter()
            .filter(|child| child.kind != ComponentKind::TextRun)
            .enumerate()
    }
}

impl<'a> TraversalPolicy for MarshalPolicy<'a> {
    type Node = &'a Component;
    type Output = XmlChild;
    type Collection = Vec<XmlChild>;

    fn name(&self) -> &'static str {
        self.family.name()
    }

    fn is_leaf(&self, node: &'a Component) -> bool {
        !self.family.is_composite(node.kind)
    }

    fn children_of(&self, node: &'a Component) -> Result<Vec<&'a Component>> {
        let kinds: Vec<ComponentKind> = node.children().iter().map(|c| c.kind).collect();
        self.family
            .check_shape(node.kind, &kinds)
            .map_err(|message| Error::MalformedFamilyShape {
                family: self.family.name(),
                node: NodeRef::component(node),
                message,
            })?;

        let mut children = Vec::with_capacity(kinds.len());
        let mut position = 0;
        for child in node.children() {
            if child.kind != ComponentKind::TextRun {
                let structural = self.family.is_structural(node.kind, position, Some(child.kind));
                position += 1;
                if structural {
                    continue;
                }
                self.family
                    .check_member(node.kind, Some(child.kind))
                    .map_err(|message| Error::MalformedFamilyShape {
                        family: self.family.name(),
                        node: NodeRef::component(child),
                        message,
                    })?;
            }
            children.push(child);
        }
        Ok(children)
    }

    fn collection_for(&self, node: &'a Component) -> Result<Vec<XmlChild>> {
        Ok(Vec::with_capacity(node.children().len()))
    }

    fn append(
        &self,
        _node: &'a Component,
        collection: &mut Vec<XmlChild>,
        child: XmlChild,
    ) -> Result<()> {
        collection.push(child);
        Ok(())
    }

    fn finalize_with_children(
        &self,
        node: &'a Component,
        collection: Vec<XmlChild>,
    ) -> Result<XmlChild> {
        let mut element = open_element(node, &self.ctx)?;
        for (position, child) in Self::positioned(node) {
            if self.family.is_structural(node.kind, position, Some(child.kind)) {
                element.children.push(self.ctx.marshal_component(child)?);
            }
        }
        element.children.extend(collection);
        Ok(XmlChild::Element(element))
    }

    fn convert_leaf(&self, node: &'a Component) -> Result<XmlChild> {
        self.ctx.marshal_component(node)
    }

    fn describe(&self, node: &'a Component) -> String {
        format!("<{}>", node.kind)
    }
}

/// Converts a family's composite kinds with the iterative engine.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveConverter {
    kind: ComponentKind,
    family: &'static dyn Family,
}

impl RecursiveConverter {
    pub fn new(kind: ComponentKind, family: &'static dyn Family) -> Self {
        Self { kind, family }
    }

    pub fn family(&self) -> &'static dyn Family {
        self.family
    }
}

impl Converter for RecursiveConverter {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn unmarshal(&self, element: &XmlElement, ctx: &MarshalContext<'_>) -> Result<Component> {
        let tagged = ctx.registry.kind_for_tag(&element.name);
        if !tagged.is_some_and(|kind| self.family.is_composite(kind)) {
            return ElementConverter::new(self.kind).unmarshal(element, ctx);
        }
        let policy = UnmarshalPolicy::new(self.family, *ctx);
        engine::convert(&policy, XmlNode::Element(element))
    }

    fn marshal(&self, component: &Component, ctx: &MarshalContext<'_>) -> Result<XmlElement> {
        if !self.family.is_composite(component.kind) {
            return ElementConverter::new(component.kind).marshal(component, ctx);
        }
        let policy = MarshalPolicy::new(self.family, *ctx);
        match engine::convert(&policy, component)? {
            XmlChild::Element(element) => Ok(element),
            _ => Err(Error::TrailExhausted {
                family: self.family.name(),
            }),
        }
    }
}
