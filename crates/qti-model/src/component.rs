//! The component tree.

use crate::attributes::{AttributeValue, Attributes};
use crate::collection::ComponentCollection;
use crate::error::ModelError;
use crate::kind::ComponentKind;

/// A node of the object model.
///
/// Container kinds always carry a (possibly empty) collection whose accepted
/// kinds are fixed by `kind`; other kinds never do. Comparison, depth
/// measurement and dropping all walk the tree with an explicit stack.
#[derive(Debug)]
pub struct Component {
    pub kind: ComponentKind,
    pub attributes: Attributes,
    children: Option<ComponentCollection>,
    /// Character content of text-bearing kinds.
    pub text: Option<String>,
    /// Opaque pass-through fragment of extension kinds.
    pub blob: Option<String>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            attributes: Attributes::new(),
            children: ComponentCollection::for_kind(kind).ok(),
            text: None,
            blob: None,
        }
    }

    /// A run of character data inside body content.
    pub fn text_run(text: impl Into<String>) -> Self {
        Component::new(ComponentKind::TextRun).with_text(text)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_blob(mut self, blob: impl Into<String>) -> Self {
        self.blob = Some(blob.into());
        self
    }

    /// Builder-style [`Component::push_child`].
    pub fn with_child(mut self, child: Component) -> Result<Self, ModelError> {
        self.push_child(child)?;
        Ok(self)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Children in order; empty for non-container kinds.
    pub fn children(&self) -> &[Component] {
        match &self.children {
            Some(collection) => collection.as_slice(),
            None => &[],
        }
    }

    pub fn collection(&self) -> Option<&ComponentCollection> {
        self.children.as_ref()
    }

    pub fn push_child(&mut self, child: Component) -> Result<(), ModelError> {
        self.children
            .as_mut()
            .ok_or(ModelError::NotAContainer { kind: self.kind })?
            .push(child)
    }

    /// Insert a child at `index`, shifting later children right.
    pub fn insert_child(&mut self, index: usize, child: Component) -> Result<(), ModelError> {
        let collection = self
            .children
            .as_mut()
            .ok_or(ModelError::NotAContainer { kind: self.kind })?;
        if index > collection.len() {
            return collection.push(child);
        }
        collection.insert(index, child)
    }

    /// Replace all children, checking each against the accepted kinds.
    ///
    /// On error the existing children are left untouched.
    pub fn set_children(&mut self, children: Vec<Component>) -> Result<(), ModelError> {
        let collection = self
            .children
            .as_mut()
            .ok_or(ModelError::NotAContainer { kind: self.kind })?;
        for child in &children {
            collection.check(child.kind)?;
        }
        collection.items = children;
        Ok(())
    }

    /// Replace all children with those of `collection`.
    pub fn set_collection(&mut self, collection: ComponentCollection) -> Result<(), ModelError> {
        if collection.parent() == self.kind && self.children.is_some() {
            self.children = Some(collection);
            Ok(())
        } else {
            self.set_children(collection.into_items())
        }
    }

    /// Remove and return all children, leaving an empty collection.
    pub fn take_children(&mut self) -> Vec<Component> {
        self.children
            .as_mut()
            .map(|c| std::mem::take(&mut c.items))
            .unwrap_or_default()
    }

    /// Check the number of children against the kind's arity.
    pub fn check_arity(&self) -> Result<(), ModelError> {
        let arity = self.kind.arity();
        let found = self.children().len();
        if !self.kind.is_container() || arity.allows(found) {
            Ok(())
        } else {
            Err(ModelError::ChildCount {
                kind: self.kind,
                arity,
                found,
            })
        }
    }

    /// Nesting depth of the subtree, counting this component as 1.
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    /// Pre-order traversal yielding each component with its depth below `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Pre-order iterator returned by [`Component::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Component)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Component);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, component) = self.stack.pop()?;
        self.stack
            .extend(component.children().iter().rev().map(|c| (depth + 1, c)));
        Some((depth, component))
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.kind != b.kind
                || a.attributes != b.attributes
                || a.text != b.text
                || a.blob != b.blob
                || a.children().len() != b.children().len()
            {
                return false;
            }
            pending.extend(a.children().iter().zip(b.children()));
        }
        true
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        let Some(collection) = self.children.as_mut() else {
            return;
        };
        let mut pending = std::mem::take(&mut collection.items);
        while let Some(mut child) = pending.pop() {
            if let Some(grandchildren) = child.children.as_mut() {
                pending.append(&mut grandchildren.items);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(value: &str) -> AttributeValue {
        AttributeValue::Identifier(value.to_string())
    }

    #[test]
    fn test_new_container_and_leaf() {
        let and = Component::new(ComponentKind::And);
        assert!(and.collection().is_some());
        assert!(and.children().is_empty());

        let variable = Component::new(ComponentKind::Variable);
        assert!(variable.collection().is_none());
        assert_eq!(
            Component::new(ComponentKind::Variable)
                .push_child(Component::new(ComponentKind::Null))
                .unwrap_err(),
            ModelError::NotAContainer {
                kind: ComponentKind::Variable
            }
        );
    }

    #[test]
    fn test_set_children_is_all_or_nothing() {
        let mut and = Component::new(ComponentKind::And)
            .with_child(Component::new(ComponentKind::Null))
            .unwrap();

        let err = and
            .set_children(vec![
                Component::new(ComponentKind::Null),
                Component::new(ComponentKind::Div),
            ])
            .unwrap_err();
        assert!(matches!(err, ModelError::DisallowedChild { .. }));
        assert_eq!(and.children().len(), 1);

        and.set_children(vec![
            Component::new(ComponentKind::Variable).with_attribute("identifier", identifier("A")),
            Component::new(ComponentKind::Variable).with_attribute("identifier", identifier("B")),
        ])
        .unwrap();
        assert_eq!(and.children().len(), 2);
    }

    #[test]
    fn test_set_collection_from_other_parent_is_checked() {
        let mut coll = ComponentCollection::for_kind(ComponentKind::Div).unwrap();
        coll.push(Component::new(ComponentKind::P)).unwrap();

        let mut and = Component::new(ComponentKind::And);
        assert!(and.set_collection(coll).is_err());

        let mut coll = ComponentCollection::for_kind(ComponentKind::And).unwrap();
        coll.push(Component::new(ComponentKind::Null)).unwrap();
        and.set_collection(coll).unwrap();
        assert_eq!(and.children()[0].kind, ComponentKind::Null);
    }

    #[test]
    fn test_check_arity() {
        let not = Component::new(ComponentKind::Not);
        assert_eq!(
            not.check_arity().unwrap_err(),
            ModelError::ChildCount {
                kind: ComponentKind::Not,
                arity: ComponentKind::Not.arity(),
                found: 0
            }
        );
        let not = not.with_child(Component::new(ComponentKind::Null)).unwrap();
        assert!(not.check_arity().is_ok());
        assert!(Component::new(ComponentKind::Null).check_arity().is_ok());
    }

    #[test]
    fn test_equality_compares_subtrees() {
        let build = |id: &str| {
            Component::new(ComponentKind::Not)
                .with_child(
                    Component::new(ComponentKind::Variable)
                        .with_attribute("identifier", identifier(id)),
                )
                .unwrap()
        };
        assert_eq!(build("A"), build("A"));
        assert_ne!(build("A"), build("B"));
    }

    #[test]
    fn test_walk_is_pre_order() {
        let tree = Component::new(ComponentKind::P)
            .with_child(Component::text_run("a "))
            .unwrap()
            .with_child(
                Component::new(ComponentKind::Em)
                    .with_child(Component::text_run("b"))
                    .unwrap(),
            )
            .unwrap();

        let visited: Vec<_> = tree
            .walk()
            .map(|(depth, c)| (depth, c.kind, c.text.clone()))
            .collect();
        assert_eq!(
            visited,
            vec![
                (0, ComponentKind::P, None),
                (1, ComponentKind::TextRun, Some("a ".to_string())),
                (1, ComponentKind::Em, None),
                (2, ComponentKind::TextRun, Some("b".to_string())),
            ]
        );
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_deep_tree_compare_and_drop() {
        let build = || {
            let mut root = Component::new(ComponentKind::Null);
            for _ in 0..100_000 {
                let mut parent = Component::new(ComponentKind::Not);
                parent.push_child(root).unwrap();
                root = parent;
            }
            root
        };
        let a = build();
        let b = build();
        assert_eq!(a.depth(), 100_001);
        assert!(a == b);
        drop(a);
        drop(b);
    }
}
