//! Schema-version profiles: element and attribute spellings per QTI version.

use qti_model::ComponentKind;
use qti_xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub const QTI2_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsqti_v2p1";
pub const QTI3_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsqtiasi_v3p0";

/// A QTI schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// QTI 2.x: camelCase element and attribute names.
    #[default]
    Qti2,
    /// QTI 3: `qti-` prefixed kebab-case elements, kebab-case attributes.
    Qti3,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Qti2, Profile::Qti3];

    pub fn namespace(self) -> &'static str {
        match self {
            Profile::Qti2 => QTI2_NAMESPACE,
            Profile::Qti3 => QTI3_NAMESPACE,
        }
    }

    /// The element name `kind` is written with.
    pub fn tag_for(self, kind: ComponentKind) -> Cow<'static, str> {
        if self == Profile::Qti2 || kind.is_xhtml() {
            return Cow::Borrowed(kind.class_name());
        }
        let kebab = kebab_case(kind.class_name());
        if kebab.starts_with("qti-") {
            Cow::Owned(kebab)
        } else {
            Cow::Owned(format!("qti-{}", kebab))
        }
    }

    /// The attribute name a canonical (QTI 2) attribute is written with.
    pub fn attribute_name(self, canonical: &'static str) -> Cow<'static, str> {
        match self {
            Profile::Qti2 => Cow::Borrowed(canonical),
            Profile::Qti3 => Cow::Owned(kebab_case(canonical)),
        }
    }

    /// Guess the profile of a document from its root element.
    ///
    /// The default namespace wins; otherwise the spelling of the root tag
    /// decides. Returns `None` when neither is recognized.
    pub fn detect(root: &XmlElement) -> Option<Profile> {
        if let Some(ns) = root.get_attribute("xmlns") {
            if let Some(profile) = Profile::ALL.into_iter().find(|p| p.namespace() == ns) {
                return Some(profile);
            }
        }
        if root.name.starts_with("qti-") {
            return Some(Profile::Qti3);
        }
        // XHTML tags are spelled the same in both profiles.
        ComponentKind::from_class_name(&root.name)
            .filter(|kind| !kind.is_xhtml())
            .map(|_| Profile::Qti2)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Qti2 => write!(f, "qti2"),
            Profile::Qti3 => write!(f, "qti3"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qti2" | "2" | "2.1" => Ok(Profile::Qti2),
            "qti3" | "3" | "3.0" => Ok(Profile::Qti3),
            other => Err(format!("unknown profile '{}' (expected qti2 or qti3)", other)),
        }
    }
}

/// `durationGTE` -> `duration-gte`, `anyN` -> `any-n`.
///
/// A hyphen goes before an uppercase letter that follows a lowercase letter
/// or digit, or that starts a new word after an acronym.
pub(crate) fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("assessmentItem"), "assessment-item");
        assert_eq!(kebab_case("durationGTE"), "duration-gte");
        assert_eq!(kebab_case("durationLT"), "duration-lt");
        assert_eq!(kebab_case("anyN"), "any-n");
        assert_eq!(kebab_case("and"), "and");
        assert_eq!(kebab_case("qtiUsagedataRef"), "qti-usagedata-ref");
    }

    #[test]
    fn test_qti3_tags() {
        let p = Profile::Qti3;
        assert_eq!(p.tag_for(ComponentKind::AssessmentItem), "qti-assessment-item");
        assert_eq!(p.tag_for(ComponentKind::ResponseElseIf), "qti-response-else-if");
        assert_eq!(p.tag_for(ComponentKind::QtiUsagedataRef), "qti-usagedata-ref");
        assert_eq!(p.tag_for(ComponentKind::Div), "div");
        assert_eq!(Profile::Qti2.tag_for(ComponentKind::AnyN), "anyN");
    }

    #[test]
    fn test_qti3_tags_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for &kind in ComponentKind::ALL {
            assert!(seen.insert(Profile::Qti3.tag_for(kind)), "{}", kind);
        }
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(Profile::Qti3.attribute_name("responseIdentifier"), "response-identifier");
        assert_eq!(Profile::Qti3.attribute_name("identifier"), "identifier");
        assert_eq!(Profile::Qti2.attribute_name("baseType"), "baseType");
    }

    #[test]
    fn test_detect() {
        let ns3 = XmlElement::new("assessmentItem").with_attribute("xmlns", QTI3_NAMESPACE);
        assert_eq!(Profile::detect(&ns3), Some(Profile::Qti3));
        assert_eq!(
            Profile::detect(&XmlElement::new("qti-assessment-item")),
            Some(Profile::Qti3)
        );
        assert_eq!(Profile::detect(&XmlElement::new("and")), Some(Profile::Qti2));
        assert_eq!(Profile::detect(&XmlElement::new("html")), None);
        assert_eq!(Profile::detect(&XmlElement::new("div")), None);
        assert_eq!(Profile::detect(&XmlElement::new("p")), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("QTI3".parse::<Profile>(), Ok(Profile::Qti3));
        assert_eq!(Profile::Qti2.to_string(), "qti2");
        assert!("qti4".parse::<Profile>().is_err());
    }
}
