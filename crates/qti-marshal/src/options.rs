//! Conversion options.

use crate::profile::Profile;
use qti_xml::WriteOptions;
use serde::{Deserialize, Serialize};

/// Options for a [`Marshaller`](crate::Marshaller).
///
/// Deserializable from TOML, e.g.
///
/// ```toml
/// profile = "qti3"
/// strict-attributes = true
/// indent = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MarshalOptions {
    /// Profile used for output, and for input whose profile cannot be detected.
    pub profile: Profile,
    /// Reject attributes the schema does not define instead of dropping them.
    pub strict_attributes: bool,
    /// Emit an XML declaration when serializing.
    pub xml_declaration: bool,
    /// Indentation width for pretty output.
    pub indent: Option<usize>,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Qti2,
            strict_attributes: false,
            xml_declaration: true,
            indent: None,
        }
    }
}

impl MarshalOptions {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            declaration: self.xml_declaration,
            indent: self.indent,
        }
    }
}
