//! Text edits shared by several rules.

use kube_api_lint_core::{Location, Marker, Replacement};

/// Deletes a marker's comment line, including its line break.
pub(crate) fn remove_marker(marker: &Marker) -> Replacement {
    let location = &marker.location;
    Replacement::new(
        location.clone().with_span(location.offset, marker.raw.len() + 1),
        "",
    )
}

/// Rewrites a marker's comment line to `// +{text}`.
pub(crate) fn replace_marker(marker: &Marker, text: &str) -> Replacement {
    let location = &marker.location;
    Replacement::new(
        location.clone().with_span(location.offset, marker.raw.len()),
        format!("// +{text}"),
    )
}

/// Inserts marker lines directly above the declaration at `location`.
pub(crate) fn insert_markers(location: &Location, markers: &[String]) -> Replacement {
    let indent = if location.column > 1 { "\t" } else { "" };
    let text: String = markers
        .iter()
        .map(|m| format!("// +{m}\n{indent}"))
        .collect();
    Replacement::new(location.clone().with_span(location.offset, 0), text)
}

/// Replaces the declared name at `location`.
pub(crate) fn rename(location: &Location, old: &str, new: &str) -> Replacement {
    Replacement::new(location.clone().with_span(location.offset, old.len()), new)
}

/// How a marker is named in messages: its identifier, plus its attributes
/// when it carries some.
pub(crate) fn marker_label(marker: &Marker) -> String {
    if marker.attributes.is_empty() {
        marker.identifier.clone()
    } else {
        marker.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(raw: &str) -> Marker {
        Marker {
            identifier: "optional".to_string(),
            attributes: Vec::new(),
            value: None,
            raw: raw.to_string(),
            location: Location::new("types.go", 4, 2).with_span(120, 0),
        }
    }

    #[test]
    fn remove_covers_the_line_break() {
        let fix = remove_marker(&marker("// +optional"));
        assert_eq!(fix.location.offset, 120);
        assert_eq!(fix.location.length, 13);
        assert!(fix.new_text.is_empty());
    }

    #[test]
    fn insert_keeps_field_indentation() {
        let fix = insert_markers(
            &Location::new("types.go", 9, 2),
            &["listType=map".to_string(), "listMapKey=type".to_string()],
        );
        assert_eq!(fix.new_text, "// +listType=map\n\t// +listMapKey=type\n\t");
        assert_eq!(fix.location.length, 0);
    }

    #[test]
    fn replace_rewrites_whole_line() {
        let fix = replace_marker(&marker("// +kubebuilder:validation:Optional"), "optional");
        assert_eq!(fix.new_text, "// +optional");
        assert_eq!(fix.location.length, "// +kubebuilder:validation:Optional".len());
    }
}
