//! Kind-constrained child collections.

use crate::component::Component;
use crate::error::ModelError;
use crate::kind::ComponentKind;
use crate::schema::Accepts;

/// The ordered children of a container component.
///
/// The accepted kinds are fixed by the parent kind when the collection is
/// created; every insertion is checked against them.
#[derive(Debug, PartialEq)]
pub struct ComponentCollection {
    parent: ComponentKind,
    accepts: Accepts,
    pub(crate) items: Vec<Component>,
}

impl ComponentCollection {
    /// An empty collection for children of `parent`.
    pub fn for_kind(parent: ComponentKind) -> Result<Self, ModelError> {
        let accepts = parent
            .accepts()
            .ok_or(ModelError::NotAContainer { kind: parent })?;
        Ok(Self {
            parent,
            accepts,
            items: Vec::new(),
        })
    }

    pub fn parent(&self) -> ComponentKind {
        self.parent
    }

    pub fn accepts(&self) -> Accepts {
        self.accepts
    }

    pub fn check(&self, child: ComponentKind) -> Result<(), ModelError> {
        if self.accepts.accepts(child) {
            Ok(())
        } else {
            Err(ModelError::DisallowedChild {
                parent: self.parent,
                child,
            })
        }
    }

    pub fn push(&mut self, child: Component) -> Result<(), ModelError> {
        self.check(child.kind)?;
        self.items.push(child);
        Ok(())
    }

    /// Insert at `index`, shifting later children right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, child: Component) -> Result<(), ModelError> {
        self.check(child.kind)?;
        self.items.insert(index, child);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Component] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Component> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ComponentCollection {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
