//! Product name → `data-test` token conversion.
//!
//! The storefront tags its per-product action buttons with tokens derived from
//! the product display name. Two schemes are in use: the inventory page only
//! lowercases and hyphenates, the cart page additionally strips punctuation.

use serde::{Deserialize, Serialize};

/// Characters removed by [`normalize`]. Extending this set changes the tokens of
/// existing products.
pub const STRIPPED_CHARS: [char; 5] = ['.', '(', ')', '\'', ','];

/// Token derivation scheme used by a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScheme {
    /// Lowercase + whitespace runs to `-` (inventory page)
    Hyphenated,
    /// Full [`normalize`] (cart page)
    Normalized,
}

impl TokenScheme {
    /// Derive the token for a display name
    #[must_use]
    pub fn token(self, name: &str) -> String {
        match self {
            Self::Hyphenated => hyphenate(name),
            Self::Normalized => normalize(name),
        }
    }
}

/// Lowercase the name and replace each whitespace run with a single `-`.
#[must_use]
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Map a product display name to its stable token.
///
/// Steps, in order: lowercase, whitespace runs to `-`, strip [`STRIPPED_CHARS`],
/// collapse `-` runs, trim one leading and one trailing `-`.
///
/// ```
/// use storefront_probe::normalize;
/// assert_eq!(
///     normalize("Test.allTheThings() T-Shirt (Red)"),
///     "test-allthethings-t-shirt-red"
/// );
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let stripped: String = hyphenate(name)
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    let mut collapsed = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.strip_prefix('-').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalize_tests {
        use super::*;

        #[test]
        fn test_catalog_names() {
            assert_eq!(normalize("Sauce Labs Backpack"), "sauce-labs-backpack");
            assert_eq!(normalize("Sauce Labs Bolt T-Shirt"), "sauce-labs-bolt-t-shirt");
            assert_eq!(
                normalize("Test.allTheThings() T-Shirt (Red)"),
                "test-allthethings-t-shirt-red"
            );
        }

        #[test]
        fn test_whitespace_runs() {
            assert_eq!(normalize("a \t\n b"), "a-b");
        }

        #[test]
        fn test_strips_only_the_listed_punctuation() {
            assert_eq!(normalize("it's, (really).x"), "its-reallyx");
            assert_eq!(normalize("a!b?c"), "a!b?c");
            assert_eq!(normalize("a/b"), "a/b");
        }

        #[test]
        fn test_collapses_dashes_created_by_stripping() {
            assert_eq!(normalize("a ( b"), "a-b");
            assert_eq!(normalize("a---b"), "a-b");
        }

        #[test]
        fn test_trims_edges() {
            assert_eq!(normalize("  padded  "), "padded");
            assert_eq!(normalize("(edge)"), "edge");
            assert_eq!(normalize("-x-"), "x");
        }

        #[test]
        fn test_total_on_degenerate_input() {
            assert_eq!(normalize(""), "");
            assert_eq!(normalize("   "), "");
            assert_eq!(normalize("().,'"), "");
            assert_eq!(normalize("-"), "");
        }

        #[test]
        fn test_idempotent_on_examples() {
            for name in ["Test.allTheThings() T-Shirt (Red)", " - a -- b - ", "X, Y."] {
                let once = normalize(name);
                assert_eq!(normalize(&once), once);
            }
        }
    }

    mod hyphenate_tests {
        use super::*;

        #[test]
        fn test_keeps_punctuation() {
            assert_eq!(
                hyphenate("Test.allTheThings() T-Shirt (Red)"),
                "test.allthethings()-t-shirt-(red)"
            );
        }

        #[test]
        fn test_does_not_trim() {
            assert_eq!(hyphenate(" a  b "), "-a-b-");
        }

        #[test]
        fn test_scheme_dispatch() {
            let name = "Sauce Labs Onesie";
            assert_eq!(TokenScheme::Hyphenated.token(name), "sauce-labs-onesie");
            assert_eq!(TokenScheme::Normalized.token(name), "sauce-labs-onesie");
            assert_ne!(
                TokenScheme::Hyphenated.token("Test.allTheThings() T-Shirt (Red)"),
                TokenScheme::Normalized.token("Test.allTheThings() T-Shirt (Red)")
            );
        }
    }
}
