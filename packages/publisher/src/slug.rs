//! File-name slugs for composed images.

/// Longest slug emitted; keeps joined paths well under filesystem
/// name limits.
const MAX_LEN: usize = 80;

/// Turn arbitrary text into a safe lowercase file-name slug.
///
/// Total: never errors and never returns an empty string (falls back to
/// the `"image"` sentinel). Idempotent on its own output for ASCII
/// input. Non-ASCII characters are dropped rather than transliterated.
/// Output is capped at [`MAX_LEN`] bytes so arbitrarily long titles
/// still produce usable file names.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
        // everything else (punctuation, non-ASCII) is dropped
    }

    if out.len() > MAX_LEN {
        out.truncate(MAX_LEN);
        while out.ends_with('-') {
            out.pop();
        }
    }

    if out.is_empty() {
        "image".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Arsenal vs Chelsea: Preview!"), "arsenal-vs-chelsea-preview");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("under_score and-dash"), "under-score-and-dash");
    }

    #[test]
    fn test_sentinel_for_empty() {
        assert_eq!(slugify(""), "image");
        assert_eq!(slugify("!!! ???"), "image");
        assert_eq!(slugify("Đội bóng"), "i-bng");
    }

    #[test]
    fn test_no_edge_dashes() {
        assert_eq!(slugify("- leading and trailing -"), "leading-and-trailing");
    }

    #[test]
    fn test_long_input_is_capped() {
        let slug = slugify(&"a thoroughly overlong heading ".repeat(40));
        assert!(slug.len() <= MAX_LEN);
        assert!(!slug.ends_with('-'));
    }

    proptest! {
        #[test]
        fn prop_never_empty(s in ".*") {
            prop_assert!(!slugify(&s).is_empty());
        }

        #[test]
        fn prop_idempotent(s in ".*") {
            let once = slugify(&s);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn prop_bounded_length(s in ".*") {
            prop_assert!(slugify(&s).len() <= MAX_LEN);
        }

        #[test]
        fn prop_output_charset(s in ".*") {
            let slug = slugify(&s);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
