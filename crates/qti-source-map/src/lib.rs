//! Source locations for parsed QTI documents.
//!
//! Every node produced by `qti-xml` carries a [`SourceInfo`] describing the
//! byte range it was parsed from. The marshalling layer attaches these to its
//! errors so diagnostics can point back into the original document.
//!
//! # Example
//!
//! ```rust
//! use qti_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("item.xml".into(), Some("<assessmentItem/>".into()));
//!
//! let info = SourceInfo::original(file_id, 0, 17);
//! assert_eq!(info.start_offset(), 0);
//! assert_eq!(info.end_offset(), 17);
//! assert_eq!(ctx.get_file(file_id).unwrap().path, "item.xml");
//! ```

pub mod context;
pub mod source_info;
pub mod types;
pub mod utils;

pub use context::{SourceContext, SourceFile};
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
pub use utils::{offset_to_location, range_from_offsets};
