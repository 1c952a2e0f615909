//! Loading `MarshalOptions` from a TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use qti_marshal::MarshalOptions;

/// Read options from `path`, or use the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<MarshalOptions> {
    let Some(path) = path else {
        return Ok(MarshalOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let options = parse_options(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    tracing::debug!(config = %path.display(), ?options, "Loaded options");
    Ok(options)
}

fn parse_options(text: &str) -> Result<MarshalOptions> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qti_marshal::Profile;

    #[test]
    fn test_parse_options() {
        let options = parse_options(
            r#"
profile = "qti3"
xml-declaration = false
"#,
        )
        .unwrap();
        assert_eq!(options.profile, Profile::Qti3);
        assert!(!options.xml_declaration);
        assert!(!options.strict_attributes);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_options("strict = true").is_err());
    }

    #[test]
    fn test_no_config_file() {
        assert_eq!(load_options(None).unwrap(), MarshalOptions::default());
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_options(Some(Path::new("/nonexistent/qti.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
