//! Identifier casing helpers.

/// Splits an identifier into words at case changes, digits and
/// separators (`_`, `-`, `.`, spaces).
///
/// Runs of capitals stay together, so `HTTPServer` splits into
/// `HTTP` and `Server`.
#[must_use]
pub fn split_words(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | '.' | ' ' | '/') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if c.is_uppercase() => {
                p.is_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
            }
            Some(p) => c.is_ascii_digit() != p.is_ascii_digit() && p.is_alphabetic(),
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Returns true for `PascalCase` identifiers: an upper-case first letter and
/// only ASCII letters and digits.
#[must_use]
pub fn is_pascal_case(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Converts an identifier to `PascalCase`.
#[must_use]
pub fn to_pascal_case(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|word| {
            let lower = if word.chars().all(char::is_uppercase) && word.len() > 1 {
                word.to_lowercase()
            } else {
                word.clone()
            };
            let mut chars = lower.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Lower-cases the first character.
#[must_use]
pub fn lower_first(identifier: &str) -> String {
    let mut chars = identifier.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("fooBar"), vec!["foo", "Bar"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("snake_case-value"), vec!["snake", "case", "value"]);
        assert_eq!(split_words("Version2Beta"), vec!["Version", "2", "Beta"]);
    }

    #[test]
    fn test_is_pascal_case() {
        assert!(is_pascal_case("Running"));
        assert!(is_pascal_case("IPv4"));
        assert!(!is_pascal_case("running"));
        assert!(!is_pascal_case("Not_Pascal"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("running"), "Running");
        assert_eq!(to_pascal_case("in-progress"), "InProgress");
        assert_eq!(to_pascal_case("SUCCEEDED"), "Succeeded");
        assert_eq!(to_pascal_case("not_ready"), "NotReady");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("FooBar"), "fooBar");
        assert_eq!(lower_first(""), "");
    }
}
