//! Heading text to element id conversion.

/// Convert heading text to an element id.
///
/// Every maximal run of characters that are not ASCII letters becomes a
/// single hyphen, and consecutive hyphens collapse into one. Case is kept
/// and leading/trailing hyphens are not trimmed, so ids built by
/// concatenating slugs stay stable.
///
/// # Examples
///
/// ```
/// use mdsite_sections::slug;
///
/// assert_eq!(slug("A & B"), "A-B");
/// assert_eq!(slug("Quick Start!! 101"), "Quick-Start-");
/// assert_eq!(slug("¿Qué?"), "-Qu-");
/// ```
pub fn slug(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            id.push(c);
        } else if !id.ends_with('-') {
            id.push('-');
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_replaces_symbols() {
        assert_eq!(slug("A & B"), "A-B");
    }

    #[test]
    fn test_slug_digits_become_hyphens() {
        assert_eq!(slug("Quick Start!! 101"), "Quick-Start-");
    }

    #[test]
    fn test_slug_keeps_case() {
        assert_eq!(slug("Maven Setup"), "Maven-Setup");
    }

    #[test]
    fn test_slug_keeps_leading_and_trailing_hyphens() {
        assert_eq!(slug(" hello world "), "-hello-world-");
    }

    #[test]
    fn test_slug_collapses_existing_hyphens() {
        assert_eq!(slug("a--b - c"), "a-b-c");
    }

    #[test]
    fn test_slug_non_ascii_letters() {
        assert_eq!(slug("naïve café"), "na-ve-caf-");
    }

    #[test]
    fn test_slug_empty() {
        assert_eq!(slug(""), "");
    }

    #[test]
    fn test_slug_only_symbols() {
        assert_eq!(slug("!!! 42"), "-");
    }

    #[test]
    fn test_slug_idempotent() {
        for text in [
            "A & B",
            "Quick Start!! 101",
            " leading",
            "trailing ",
            "x.y.z",
            "conf/application.conf",
        ] {
            let once = slug(text);
            assert_eq!(slug(&once), once, "slug not idempotent for {text:?}");
        }
    }
}
