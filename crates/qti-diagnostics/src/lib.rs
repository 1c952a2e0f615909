//! Structured diagnostic messages for QTI marshalling.
//!
//! Every error raised while reading, converting or writing QTI content can be
//! turned into a [`DiagnosticMessage`]: a stable error code, a short title, a
//! problem statement, bulleted details, hints, and an optional source
//! location. Messages render either as terminal text (with an ariadne source
//! snippet when the document text is available) or as JSON.
//!
//! ```
//! use qti_diagnostics::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Missing Required Attribute")
//!     .with_code("QTI-2-3")
//!     .problem("Element <baseValue> requires attribute 'baseType'")
//!     .add_hint("Add baseType=\"...\" to the element?")
//!     .build();
//!
//! let text = msg.to_text(None);
//! assert!(text.contains("[QTI-2-3]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
