//! Object model for QTI assessment content.
//!
//! A [`Component`] is one node of the model: a [`ComponentKind`], typed
//! attributes, and either children, character data, or an opaque blob,
//! depending on the kind's [`ContentModel`]. Each kind's attributes, content
//! and child arity are described by tables in [`schema`].
//!
//! ```
//! use qti_model::{AttributeValue, Component, ComponentKind};
//!
//! let mut and = Component::new(ComponentKind::And)
//!     .with_child(
//!         Component::new(ComponentKind::Variable)
//!             .with_attribute("identifier", AttributeValue::Identifier("A".into())),
//!     )
//!     .unwrap();
//!
//! assert_eq!(and.children().len(), 1);
//! assert!(and.push_child(Component::new(ComponentKind::Div)).is_err());
//! ```

pub mod attributes;
pub mod collection;
pub mod component;
pub mod error;
pub mod kind;
pub mod schema;

pub use attributes::{AttributeValue, Attributes};
pub use collection::ComponentCollection;
pub use component::{Component, Walk};
pub use error::ModelError;
pub use kind::{Category, ComponentKind};
pub use schema::{Accepts, Arity, AttributeSpec, AttributeType, ContentModel};
