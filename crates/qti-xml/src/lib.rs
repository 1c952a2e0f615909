//! Source-tracked XML trees for QTI documents.
//!
//! This crate wraps [`quick-xml`] in both directions. [`parse`] builds a tree
//! of [`XmlElement`]s where each element, attribute and text node tracks its
//! position in the original source, and [`write_element`] / [`to_string`]
//! serialize a tree back to text.
//!
//! Both directions walk the tree with an explicit stack, so arbitrarily deep
//! documents never exhaust the call stack. Dropping a tree is iterative too.
//!
//! # Example
//!
//! ```rust
//! use qti_xml::parse;
//!
//! let doc = parse(r#"<and><baseValue baseType="boolean">true</baseValue><null/></and>"#).unwrap();
//!
//! assert_eq!(doc.root.name, "and");
//! let children: Vec<_> = doc.root.elements().collect();
//! assert_eq!(children.len(), 2);
//! assert_eq!(children[0].get_attribute("baseType"), Some("boolean"));
//! assert_eq!(children[0].text(), "true");
//!
//! assert_eq!(
//!     qti_xml::to_string(&doc.root).unwrap(),
//!     r#"<and><baseValue baseType="boolean">true</baseValue><null/></and>"#
//! );
//! ```
//!
//! # Source Location Tracking
//!
//! ```rust
//! use qti_xml::parse;
//!
//! let content = "<p>Hello <em>you</em></p>";
//! let doc = parse(content).unwrap();
//!
//! let info = doc.root.source_info.as_ref().unwrap();
//! assert_eq!(info.start_offset(), 0);
//! assert_eq!(info.end_offset(), content.len());
//! assert_eq!(doc.inner_text(&doc.root), Some("Hello <em>you</em>"));
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{parse, parse_with_file_id};
pub use qti_source_map::SourceInfo;
pub use types::{XmlAttribute, XmlChild, XmlDocument, XmlElement, XmlNode};
pub use writer::{
    WriteOptions, inner_to_string, to_string, to_string_pretty, to_string_with_options,
    write_element,
};
