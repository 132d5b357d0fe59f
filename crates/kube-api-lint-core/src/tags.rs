//! Struct tag parsing.
//!
//! Tags follow the conventional `key:"value" key2:"value2"` layout. Only the
//! `json` key carries semantics for the analyzer; the others are looked up
//! verbatim by the rules that need them.

use crate::source::FieldDecl;
use crate::types::{Location, Replacement};
use crate::utils::case::lower_first;

/// Option that omits empty values when encoding.
pub const OMIT_EMPTY: &str = "omitempty";
/// Option that omits zero values (including zero structs) when encoding.
pub const OMIT_ZERO: &str = "omitzero";
/// Option that flattens an embedded struct into its parent.
pub const INLINE: &str = "inline";

/// Iterates over the `(key, value)` pairs of a raw struct tag.
///
/// Malformed trailing input stops the iteration rather than failing.
pub fn pairs(raw: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = raw.trim_start();
    while !rest.is_empty() {
        let Some(colon) = rest.find(':') else { break };
        let key = &rest[..colon];
        if key.is_empty() || key.contains(char::is_whitespace) {
            break;
        }
        let after = &rest[colon + 1..];
        let Some(body) = after.strip_prefix('"') else { break };
        let Some(end) = closing_quote(body) else { break };
        out.push((key, &body[..end]));
        rest = body[end + 1..].trim_start();
    }
    out
}

fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

/// Looks up a single key in a raw struct tag.
#[must_use]
pub fn lookup<'a>(raw: &'a str, key: &str) -> Option<&'a str> {
    pairs(raw).into_iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

/// The parsed `json` entry of a struct tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTag {
    /// Serialized property name (may be empty, e.g. `json:",inline"`).
    pub name: String,
    /// Options following the name, in declaration order.
    pub options: Vec<String>,
}

impl JsonTag {
    /// Parses the value of a `json` tag key.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        let options = parts
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { name, options }
    }

    /// Returns the JSON tag of a field, if it has one.
    #[must_use]
    pub fn of(field: &FieldDecl) -> Option<Self> {
        let tag = field.tag.as_ref()?;
        lookup(&tag.raw, "json").map(Self::parse)
    }

    /// Returns true if the option is present.
    #[must_use]
    pub fn has(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// `omitempty` is present.
    #[must_use]
    pub fn omit_empty(&self) -> bool {
        self.has(OMIT_EMPTY)
    }

    /// `omitzero` is present.
    #[must_use]
    pub fn omit_zero(&self) -> bool {
        self.has(OMIT_ZERO)
    }

    /// `inline` is present.
    #[must_use]
    pub fn inline(&self) -> bool {
        self.has(INLINE)
    }

    /// `json:"-"`: the field is never serialized.
    #[must_use]
    pub fn ignored(&self) -> bool {
        self.name == "-" && self.options.is_empty()
    }

    /// Renders the tag value back to `name,opt1,opt2`.
    #[must_use]
    pub fn render(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.options.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Rewrites the `json` entry of a raw tag, keeping every other key intact.
///
/// A tag without a `json` key gets one prepended, named after `fallback_name`.
#[must_use]
pub fn rewrite_json(raw: &str, fallback_name: &str, edit: impl FnOnce(&mut JsonTag)) -> String {
    let entries = pairs(raw);
    let mut json = entries
        .iter()
        .find(|(k, _)| *k == "json")
        .map_or_else(
            || JsonTag {
                name: fallback_name.to_string(),
                options: Vec::new(),
            },
            |(_, v)| JsonTag::parse(v),
        );
    edit(&mut json);

    let rendered = format!("json:\"{}\"", json.render());
    let mut parts = Vec::with_capacity(entries.len() + 1);
    let mut replaced = false;
    for (key, value) in &entries {
        if *key == "json" {
            parts.push(rendered.clone());
            replaced = true;
        } else {
            parts.push(format!("{key}:\"{value}\""));
        }
    }
    if !replaced {
        parts.insert(0, rendered);
    }
    parts.join(" ")
}

/// Builds a replacement that adds a JSON option to a field's tag.
///
/// Returns `None` when the field has no tag literal to rewrite.
#[must_use]
pub fn add_option_fix(field: &FieldDecl, option: &str) -> Option<Replacement> {
    let tag = field.tag.as_ref()?;
    let new_text = rewrite_json(&tag.raw, &lower_first(&field.name), |json| {
        if !json.has(option) {
            json.options.push(option.to_string());
        }
    });
    Some(tag_replacement(&tag.location, &tag.raw, new_text))
}

/// Builds a replacement that removes a JSON option from a field's tag.
#[must_use]
pub fn remove_option_fix(field: &FieldDecl, option: &str) -> Option<Replacement> {
    let tag = field.tag.as_ref()?;
    let new_text = rewrite_json(&tag.raw, &lower_first(&field.name), |json| {
        json.options.retain(|o| o != option);
    });
    Some(tag_replacement(&tag.location, &tag.raw, new_text))
}

fn tag_replacement(location: &Location, raw: &str, new_text: String) -> Replacement {
    Replacement::new(
        location.clone().with_span(location.offset, raw.len()),
        new_text,
    )
}
