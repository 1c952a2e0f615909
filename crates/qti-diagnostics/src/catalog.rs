//! Error code catalog and lookup.
//!
//! Codes follow `QTI-<subsystem>-<number>`: 0 internal, 1 XML reading and
//! writing, 2 marshalling, 3 object model.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name ("xml", "marshal", "model", "internal")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message
    pub message_template: String,
}

/// Global error catalog, embedded at compile time.
///
/// # Panics
///
/// Panics on first access if the embedded JSON is invalid.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get the subsystem name for an error code.
///
/// ```
/// use qti_diagnostics::catalog::get_subsystem;
///
/// assert_eq!(get_subsystem("QTI-2-1"), Some("marshal"));
/// ```
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_codes_match_subsystems() {
        for (code, info) in ERROR_CATALOG.iter() {
            let expected = match code.split('-').nth(1) {
                Some("0") => "internal",
                Some("1") => "xml",
                Some("2") => "marshal",
                Some("3") => "model",
                other => panic!("unexpected subsystem number {:?} in {}", other, code),
            };
            assert_eq!(info.subsystem, expected, "code {}", code);
        }
    }

    #[test]
    fn test_nonexistent_code() {
        assert!(get_error_info("QTI-9-99").is_none());
        assert_eq!(get_subsystem("QTI-9-99"), None);
    }
}
