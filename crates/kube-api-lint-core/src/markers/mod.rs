//! Markers: structured annotations carried in doc comments.
//!
//! A marker is a comment line starting with `+`, e.g.
//! `// +kubebuilder:validation:MaxLength=64`. This module parses those lines
//! ([`parse_line`]), indexes them per declaration ([`MarkerSet`]) and
//! provides the structural identities ([`MarkerKey`], [`MarkerPattern`])
//! that conflict, dependency and uniqueness checks compare with.

pub mod known;
mod parser;
mod set;

pub use parser::{parse_line, unquote, ParseFailure};
pub use set::MarkerSet;

use crate::types::Location;
use std::fmt;

/// A single parsed marker. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Namespaced identifier, e.g. `kubebuilder:validation:Enum`.
    pub identifier: String,
    /// Named attributes, in source order.
    pub attributes: Vec<(String, String)>,
    /// Scalar payload (`=value` or `:=value`), kept as written.
    pub value: Option<String>,
    /// The full comment line as written.
    pub raw: String,
    /// Where the comment line is.
    pub location: Location,
}

impl Marker {
    /// Returns the value of a named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the scalar value with surrounding quotes removed.
    #[must_use]
    pub fn unquoted_value(&self) -> Option<&str> {
        self.value.as_deref().map(unquote)
    }

    /// Parses the scalar value as a number.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        self.unquoted_value()?.trim().parse::<f64>().ok()
    }

    /// The identity used to detect exact duplicates: identifier, every
    /// attribute (order-insensitive) and the scalar value.
    #[must_use]
    pub fn full_key(&self) -> MarkerKey {
        let mut attributes: Vec<(String, String)> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), unquote(v).to_string()))
            .collect();
        attributes.sort();
        MarkerKey {
            identifier: self.identifier.clone(),
            attributes,
            value: self.unquoted_value().map(str::to_string),
        }
    }

    /// The identity restricted to the given key attributes.
    ///
    /// Missing attributes are recorded with an empty value so that
    /// "attribute absent" is its own identity.
    #[must_use]
    pub fn key_for(&self, attributes: &[String]) -> MarkerKey {
        MarkerKey {
            identifier: self.identifier.clone(),
            attributes: attributes
                .iter()
                .map(|name| {
                    let value = self.attribute(name).map(unquote).unwrap_or_default();
                    (name.clone(), value.to_string())
                })
                .collect(),
            value: None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, ":{}", attrs.join(","))?;
        }
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        Ok(())
    }
}

/// Structural marker identity: identifier plus a snapshot of attributes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerKey {
    /// Marker identifier.
    pub identifier: String,
    /// Key attributes and their values.
    pub attributes: Vec<(String, String)>,
    /// Scalar value, when part of the identity.
    pub value: Option<String>,
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, ":{}", attrs.join(","))?;
        }
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        Ok(())
    }
}

/// A marker reference as written in configuration, e.g.
/// `custom:OtherMarker:attribute=apple` or `kubebuilder:validation:MinLength`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerPattern {
    /// Identifier the pattern matches.
    pub identifier: String,
    /// Attribute values the marker must carry.
    pub attributes: Vec<(String, String)>,
}

impl MarkerPattern {
    /// Parses a configuration reference.
    ///
    /// An `=` makes the last `:`-separated segment before it an attribute
    /// name, so `a:B:attr=x` is identifier `a:B` with `attr=x`. Multiple
    /// attributes are comma separated: `a:B:x=1,y=2`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim().trim_start_matches('+');
        let Some(eq) = text.find('=') else {
            return Self {
                identifier: text.to_string(),
                attributes: Vec::new(),
            };
        };
        let Some(split) = text[..eq].rfind(':') else {
            return Self {
                identifier: text[..eq].to_string(),
                attributes: vec![(String::new(), unquote(&text[eq + 1..]).to_string())],
            };
        };
        let identifier = text[..split].to_string();
        let attributes = text[split + 1..]
            .split(',')
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=')?;
                Some((k.trim().to_string(), unquote(v.trim()).to_string()))
            })
            .collect();
        Self {
            identifier,
            attributes,
        }
    }

    /// Returns true when the pattern is attribute-qualified.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Returns true if the marker satisfies this pattern.
    ///
    /// A qualified pattern also matches a scalar marker whose identifier is
    /// `identifier:attr` and whose value equals the attribute value, so
    /// `kubebuilder:object:root=true` matches however it was parsed.
    #[must_use]
    pub fn matches(&self, marker: &Marker) -> bool {
        if marker.identifier == self.identifier {
            return self.attributes.iter().all(|(name, expected)| {
                if name.is_empty() {
                    return marker.unquoted_value() == Some(expected.as_str());
                }
                marker.attribute(name).map(unquote) == Some(expected.as_str())
            });
        }
        if let [(name, expected)] = self.attributes.as_slice() {
            let joined = format!("{}:{name}", self.identifier);
            return marker.identifier == joined
                && marker.unquoted_value() == Some(expected.as_str());
        }
        false
    }
}

impl fmt::Display for MarkerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        match self.attributes.as_slice() {
            [] => Ok(()),
            [(name, value)] if name.is_empty() => write!(f, "={value}"),
            attrs => {
                let rendered: Vec<String> =
                    attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, ":{}", rendered.join(","))
            }
        }
    }
}
