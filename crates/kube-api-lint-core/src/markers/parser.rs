//! Marker line parser.

use super::Marker;
use crate::catalog::MarkerCatalog;
use crate::source::CommentLine;
use crate::types::Location;

/// A comment line that starts with `+` but is not a well-formed marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Why the line could not be parsed.
    pub reason: String,
    /// The full comment line as written.
    pub raw: String,
    /// Where the comment line is.
    pub location: Location,
}

/// Parses one doc-comment line.
///
/// Returns `None` for lines that are not markers at all (prose), and
/// `Some(Err(_))` for lines that look like markers but are malformed.
#[must_use]
pub fn parse_line(line: &CommentLine, catalog: &MarkerCatalog) -> Option<Result<Marker, ParseFailure>> {
    let rest = line.body().strip_prefix('+')?;
    Some(parse_marker(rest.trim(), line, catalog).map_err(|reason| ParseFailure {
        reason,
        raw: line.text.clone(),
        location: line.location.clone(),
    }))
}

fn parse_marker(text: &str, line: &CommentLine, catalog: &MarkerCatalog) -> Result<Marker, String> {
    if text.is_empty() {
        return Err("empty marker".to_string());
    }

    let build = |identifier: &str, attributes: Vec<(String, String)>, value: Option<String>| Marker {
        identifier: identifier.to_string(),
        attributes,
        value,
        raw: line.text.clone(),
        location: line.location.clone(),
    };

    if let Some(identifier) = catalog.attribute_marker_prefix(text) {
        let attributes = parse_attributes(&text[identifier.len() + 1..])?;
        return Ok(build(identifier, attributes, None));
    }

    let (identifier, value) = split_value(text)?;
    validate_identifier(identifier)?;

    if let Some(value) = value {
        if let Some((base, attribute)) = attribute_split(identifier) {
            let attributes = parse_attributes(&format!("{attribute}={value}"))?;
            return Ok(build(base, attributes, None));
        }
        return Ok(build(identifier, Vec::new(), Some(value.to_string())));
    }

    Ok(build(identifier, Vec::new(), None))
}

/// Splits `identifier=value` and `identifier:=value`.
fn split_value(text: &str) -> Result<(&str, Option<&str>), String> {
    let Some(eq) = text.find('=') else {
        return Ok((text.trim_end(), None));
    };
    let identifier = text[..eq].strip_suffix(':').unwrap_or(&text[..eq]).trim_end();
    let value = text[eq + 1..].trim();
    if value.is_empty() {
        return Err(format!("marker {identifier} has no value after '='"));
    }
    Ok((identifier, Some(value)))
}

fn validate_identifier(identifier: &str) -> Result<(), String> {
    if identifier.is_empty() {
        return Err("missing marker identifier".to_string());
    }
    if identifier.starts_with(':') || identifier.ends_with(':') || identifier.contains("::") {
        return Err(format!("marker identifier {identifier} has an empty segment"));
    }
    if let Some(bad) = identifier
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.' | '/')))
    {
        return Err(format!("invalid character {bad:?} in marker identifier {identifier}"));
    }
    Ok(())
}

/// Recognizes `prefix:Name:attr` shaped identifiers of markers that are not
/// in the catalog: a lower-case final segment directly after a PascalCase
/// segment is an attribute name.
fn attribute_split(identifier: &str) -> Option<(&str, &str)> {
    let (base, attribute) = identifier.rsplit_once(':')?;
    let owner = base.rsplit(':').next()?;
    let lower = attribute.chars().next()?.is_ascii_lowercase();
    let pascal = owner.chars().next()?.is_ascii_uppercase();
    (lower && pascal).then_some((base, attribute))
}

/// Parses `name=value,name2="quoted, value"`.
fn parse_attributes(text: &str) -> Result<Vec<(String, String)>, String> {
    let mut attributes = Vec::new();
    for piece in split_unquoted(text, ',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some((name, value)) = piece.split_once('=') else {
            return Err(format!("attribute {piece} has no value"));
        };
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("invalid attribute name {name:?}"));
        }
        attributes.push((name.to_string(), value.trim().to_string()));
    }
    if attributes.is_empty() {
        return Err("expected at least one attribute".to_string());
    }
    Ok(attributes)
}

fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(_), '\\') if !escaped => {
                escaped = true;
                continue;
            }
            (Some(q), c) if c == q && !escaped => quote = None,
            (None, '"' | '`') => quote = Some(c),
            (None, c) if c == separator => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        escaped = false;
    }
    parts.push(&text[start..]);
    parts
}

/// Removes one layer of matching `"` or `` ` `` quotes.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '`'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<Result<Marker, ParseFailure>> {
        let line = CommentLine::new(text, Location::new("types.go", 3, 2));
        parse_line(&line, &MarkerCatalog::builtin())
    }

    fn ok(text: &str) -> Marker {
        parse(text).unwrap().unwrap()
    }

    #[test]
    fn prose_is_not_a_marker() {
        assert!(parse("// name is the name of the widget.").is_none());
        assert!(parse("//").is_none());
    }

    #[test]
    fn flag_marker() {
        let m = ok("// +optional");
        assert_eq!(m.identifier, "optional");
        assert!(m.value.is_none());
        assert!(m.attributes.is_empty());
        assert_eq!(m.raw, "// +optional");
    }

    #[test]
    fn scalar_markers() {
        let m = ok("// +kubebuilder:validation:MaxLength=64");
        assert_eq!(m.identifier, "kubebuilder:validation:MaxLength");
        assert_eq!(m.numeric_value(), Some(64.0));

        let d = ok(r#"// +kubebuilder:default:="fast""#);
        assert_eq!(d.identifier, "kubebuilder:default");
        assert_eq!(d.unquoted_value(), Some("fast"));

        let e = ok("// +kubebuilder:validation:Enum=Fast;Slow");
        assert_eq!(e.value.as_deref(), Some("Fast;Slow"));
    }

    #[test]
    fn catalog_attribute_marker() {
        let m = ok(r#"// +kubebuilder:validation:XValidation:rule="self.a, self.b",message="must be set""#);
        assert_eq!(m.identifier, "kubebuilder:validation:XValidation");
        assert_eq!(m.attribute("rule").map(unquote), Some("self.a, self.b"));
        assert_eq!(m.attribute("message").map(unquote), Some("must be set"));
    }

    #[test]
    fn custom_attribute_marker() {
        let m = ok("// +custom:OtherMarker:attribute=apple");
        assert_eq!(m.identifier, "custom:OtherMarker");
        assert_eq!(m.attribute("attribute"), Some("apple"));

        let multi = ok("// +custom:Marker:fruit=apple,color=red");
        assert_eq!(multi.attributes.len(), 2);
    }

    #[test]
    fn lowercase_scalar_is_not_an_attribute() {
        let m = ok("// +kubebuilder:object:root=true");
        assert_eq!(m.identifier, "kubebuilder:object:root");
        assert_eq!(m.value.as_deref(), Some("true"));
    }

    #[test]
    fn tolerates_spacing() {
        let m = ok("//+required");
        assert_eq!(m.identifier, "required");
        let spaced = ok("// + optional");
        assert_eq!(spaced.identifier, "optional");
        assert_eq!(spaced.raw, "// + optional");
    }

    #[test]
    fn malformed_markers() {
        let empty = parse("// +").unwrap().unwrap_err();
        assert_eq!(empty.reason, "empty marker");

        let prose = parse("// +this is not a marker").unwrap().unwrap_err();
        assert!(prose.reason.contains("invalid character"));

        let no_value = parse("// +kubebuilder:validation:MinLength=").unwrap().unwrap_err();
        assert!(no_value.reason.contains("no value"));

        let bad_attr = parse("// +kubebuilder:validation:XValidation:rule").unwrap().unwrap_err();
        assert!(bad_attr.reason.contains("has no value"));
        assert_eq!(bad_attr.location.line, 3);
    }

    #[test]
    fn unquote_strips_one_layer() {
        assert_eq!(unquote(r#""a""#), "a");
        assert_eq!(unquote("`^[a-z]$`"), "^[a-z]$");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote(r#""unterminated"#), r#""unterminated"#);
    }
}
