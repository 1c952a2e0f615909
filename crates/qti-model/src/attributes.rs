//! Typed attribute values.

use crate::schema::AttributeType;
use std::fmt;

/// An attribute value coerced to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Identifier(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl AttributeValue {
    /// Coerce `raw` to `ty`, or `None` if it is not a valid value of that type.
    pub fn parse(ty: AttributeType, raw: &str) -> Option<Self> {
        match ty {
            AttributeType::String => Some(AttributeValue::String(raw.to_string())),
            AttributeType::Identifier => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
                    None
                } else {
                    Some(AttributeValue::Identifier(trimmed.to_string()))
                }
            }
            AttributeType::Integer => raw.trim().parse().ok().map(AttributeValue::Integer),
            AttributeType::Float => parse_float(raw.trim()).map(AttributeValue::Float),
            AttributeType::Boolean => match raw.trim() {
                "true" | "1" => Some(AttributeValue::Boolean(true)),
                "false" | "0" => Some(AttributeValue::Boolean(false)),
                _ => None,
            },
            AttributeType::OneOf(values) => values
                .contains(&raw.trim())
                .then(|| AttributeValue::String(raw.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::Identifier(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    match raw {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ if raw.bytes().any(|b| b.is_ascii_digit()) => raw.parse().ok(),
        _ => None,
    }
}

/// Serialized form, as written to XML.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) | AttributeValue::Identifier(s) => f.write_str(s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "INF" } else { "-INF" })
            }
            AttributeValue::Float(x) => write!(f, "{}", x),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Attributes keyed by canonical name, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Insert or replace; a replaced value keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_type() {
        assert_eq!(
            AttributeValue::parse(AttributeType::Integer, " 42 "),
            Some(AttributeValue::Integer(42))
        );
        assert_eq!(AttributeValue::parse(AttributeType::Integer, "4.2"), None);
        assert_eq!(
            AttributeValue::parse(AttributeType::Float, "0.5"),
            Some(AttributeValue::Float(0.5))
        );
        assert_eq!(
            AttributeValue::parse(AttributeType::Float, "-INF"),
            Some(AttributeValue::Float(f64::NEG_INFINITY))
        );
        assert_eq!(AttributeValue::parse(AttributeType::Float, "infinity"), None);
        assert_eq!(
            AttributeValue::parse(AttributeType::Boolean, "1"),
            Some(AttributeValue::Boolean(true))
        );
        assert_eq!(AttributeValue::parse(AttributeType::Boolean, "yes"), None);
        assert_eq!(AttributeValue::parse(AttributeType::Identifier, "a b"), None);
        assert_eq!(
            AttributeValue::parse(AttributeType::OneOf(&["pi", "e"]), "pi"),
            Some(AttributeValue::String("pi".to_string()))
        );
        assert_eq!(AttributeValue::parse(AttributeType::OneOf(&["pi", "e"]), "tau"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::Float(1.0).to_string(), "1");
        assert_eq!(AttributeValue::Float(2.5).to_string(), "2.5");
        assert_eq!(AttributeValue::Float(f64::INFINITY).to_string(), "INF");
        assert_eq!(AttributeValue::Boolean(false).to_string(), "false");
        assert_eq!(AttributeValue::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_attributes_keep_order() {
        let mut attrs = Attributes::new();
        attrs.set("identifier", AttributeValue::Identifier("A".into()));
        attrs.set("baseType", AttributeValue::String("float".into()));
        attrs.set("identifier", AttributeValue::Identifier("B".into()));

        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["identifier", "baseType"]);
        assert_eq!(attrs.get("identifier").and_then(|v| v.as_str()), Some("B"));

        assert!(attrs.remove("identifier").is_some());
        assert_eq!(attrs.len(), 1);
        assert!(!attrs.contains("identifier"));
    }
}
