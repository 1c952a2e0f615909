//! Core types for source-tracked XML trees.

use qti_source_map::SourceInfo;

/// A parsed XML document.
///
/// Keeps the original text alongside the tree so that the exact bytes of an
/// element's content can be recovered with [`XmlDocument::inner_text`].
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// The root element of the document.
    pub root: XmlElement,

    /// Source location of the entire document.
    pub source_info: SourceInfo,

    /// The text the document was parsed from.
    pub source: String,
}

/// An XML element with source location tracking.
///
/// Elements built in memory (for serialization) carry no source locations.
/// Dropping an element releases its subtree with an explicit stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Source location of the element name.
    pub name_source: Option<SourceInfo>,

    /// Namespace prefix, if any (e.g., "m" in `<m:math>`).
    pub prefix: Option<String>,

    /// Attributes of this element, in document order.
    pub attributes: Vec<XmlAttribute>,

    /// Child content of this element, in document order.
    pub children: Vec<XmlChild>,

    /// Source location of the entire element, from `<` to the closing `>`.
    pub source_info: Option<SourceInfo>,

    /// Source location of the content between the start and end tags.
    ///
    /// `None` for self-closing elements and for elements built in memory.
    pub inner_source: Option<SourceInfo>,
}

/// An XML attribute with source location tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Source location of the attribute name.
    pub name_source: Option<SourceInfo>,

    /// Namespace prefix, if any.
    pub prefix: Option<String>,

    /// The attribute value (after unescaping XML entities).
    pub value: String,

    /// Source location of the attribute value (including quotes).
    pub value_source: Option<SourceInfo>,
}

/// A single child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    /// A child element.
    Element(XmlElement),

    /// Text content (after unescaping XML entities; CDATA is folded in here).
    Text {
        content: String,
        source_info: Option<SourceInfo>,
    },

    /// A pre-serialized fragment written out verbatim.
    ///
    /// Never produced by the parser.
    Raw(String),
}

/// A borrowed view of an element or a text node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XmlNode<'a> {
    Element(&'a XmlElement),
    Text(&'a str),
}

impl XmlDocument {
    pub fn new(root: XmlElement, source_info: SourceInfo, source: String) -> Self {
        Self {
            root,
            source_info,
            source,
        }
    }

    /// The exact source text between the start and end tags of `element`.
    ///
    /// Returns `None` for self-closing elements and elements that were not
    /// parsed from this document.
    pub fn inner_text(&self, element: &XmlElement) -> Option<&str> {
        let inner = element.inner_source.as_ref()?;
        if inner.file_id != self.source_info.file_id {
            return None;
        }
        self.source.get(inner.start_offset()..inner.end_offset())
    }
}

impl XmlElement {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_source: None,
            prefix: None,
            attributes: Vec::new(),
            children: Vec::new(),
            source_info: None,
            inner_source: None,
        }
    }

    /// Builder-style variant of [`XmlElement::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an unprefixed attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.prefix.is_none() && a.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute::new(name, value)),
        }
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlChild::Element(element));
    }

    pub fn push_text(&mut self, content: impl Into<String>) {
        self.children.push(XmlChild::Text {
            content: content.into(),
            source_info: None,
        });
    }

    pub fn push_raw(&mut self, fragment: impl Into<String>) {
        self.children.push(XmlChild::Raw(fragment.into()));
    }

    /// The name as written in the document, `prefix:name` when prefixed.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Get an attribute value by local name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get an attribute by name, returning the full attribute with source info.
    pub fn get_attribute_full(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Iterate over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Get child elements by name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.elements().filter(|e| e.name == name).collect()
    }

    /// Iterate over element and text children as borrowed nodes.
    pub fn nodes(&self) -> impl Iterator<Item = XmlNode<'_>> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(XmlNode::Element(e)),
            XmlChild::Text { content, .. } => Some(XmlNode::Text(content)),
            XmlChild::Raw(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            if let XmlChild::Text { content, .. } = child {
                text.push_str(content);
            }
        }
        text
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Nesting depth of the subtree, counting this element as 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((element, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(element.elements().map(|e| (e, depth + 1)));
        }
        max
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let XmlChild::Element(mut element) = child {
                pending.append(&mut element.children);
            }
        }
    }
}

impl XmlAttribute {
    /// Create an unprefixed attribute without source locations.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_source: None,
            prefix: None,
            value: value.into(),
            value_source: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// `xmlns` and `xmlns:*` declarations.
    pub fn is_namespace_declaration(&self) -> bool {
        self.prefix.as_deref() == Some("xmlns") || (self.prefix.is_none() && self.name == "xmlns")
    }
}

impl<'a> XmlNode<'a> {
    pub fn as_element(&self) -> Option<&'a XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        }
    }

    /// Element name, or `None` for text.
    pub fn name(&self) -> Option<&'a str> {
        self.as_element().map(|e| e.name.as_str())
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_get_attribute() {
        let element = XmlElement::new("baseValue").with_attribute("baseType", "integer");

        assert_eq!(element.get_attribute("baseType"), Some("integer"));
        assert_eq!(element.get_attribute("missing"), None);
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = XmlElement::new("a")
            .with_attribute("first", "1")
            .with_attribute("second", "2");
        element.set_attribute("first", "one");

        let names: Vec<_> = element.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(element.get_attribute("first"), Some("one"));
    }

    #[test]
    fn test_element_children() {
        let mut parent = XmlElement::new("p");
        parent.push_text("Hello ");
        parent.push_element(XmlElement::new("em"));
        parent.push_raw("<!-- kept -->");

        assert!(parent.has_elements());
        assert_eq!(parent.elements().count(), 1);
        assert_eq!(parent.text(), "Hello ");
        assert_eq!(parent.nodes().count(), 2);
    }

    #[test]
    fn test_qualified_names() {
        let mut element = XmlElement::new("math");
        element.prefix = Some("m".to_string());
        assert_eq!(element.qualified_name(), "m:math");

        let decl = XmlAttribute {
            prefix: Some("xmlns".to_string()),
            ..XmlAttribute::new("m", "http://www.w3.org/1998/Math/MathML")
        };
        assert!(decl.is_namespace_declaration());
        assert!(XmlAttribute::new("xmlns", "x").is_namespace_declaration());
        assert!(!XmlAttribute::new("identifier", "x").is_namespace_declaration());
    }

    #[test]
    fn test_node_views() {
        let element = XmlElement::new("br");
        let node = XmlNode::Element(&element);
        assert_eq!(node.name(), Some("br"));
        assert!(!node.is_whitespace());

        let text = XmlNode::Text("  \n ");
        assert_eq!(text.name(), None);
        assert!(text.is_whitespace());
    }

    #[test]
    fn test_deep_tree_depth_and_drop() {
        let mut root = XmlElement::new("not");
        for _ in 0..50_000 {
            let mut parent = XmlElement::new("not");
            parent.push_element(root);
            root = parent;
        }
        assert_eq!(root.depth(), 50_001);
        drop(root);
    }
}
