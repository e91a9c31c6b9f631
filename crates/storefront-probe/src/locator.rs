//! Typed selectors and locators.
//!
//! Selectors are a tagged tree instead of interpolated selector strings, so a
//! product name containing quotes or parentheses can never change the shape of
//! the query. Rendering to a browser query happens in one place ([`Selector::to_js`])
//! and encodes every literal as a JSON string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::wait::WaitOptions;

/// Attribute key of the storefront's stable element identifiers
pub const TEST_ATTRIBUTE: &str = "data-test";

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// Attribute equality, e.g. `data-test="login-button"`
    Attribute {
        /// Attribute name
        key: String,
        /// Exact attribute value
        value: String,
    },
    /// CSS class membership
    Class(String),
    /// Element id
    Id(String),
    /// Elements matching `within` whose trimmed text equals (or contains) `text`
    Text {
        /// Base selector
        within: Box<Selector>,
        /// Text to match, verbatim
        text: String,
        /// Exact equality instead of containment
        exact: bool,
    },
    /// Elements matching `base` that contain a descendant matching `has`
    Has {
        /// Container selector
        base: Box<Selector>,
        /// Required descendant
        has: Box<Selector>,
    },
    /// Elements matching `target` below an element matching `ancestor`
    Descendant {
        /// Scope selector
        ancestor: Box<Selector>,
        /// Selector evaluated inside each scope
        target: Box<Selector>,
    },
}

impl Selector {
    /// Match the storefront's `data-test` attribute
    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self::Attribute {
            key: TEST_ATTRIBUTE.to_string(),
            value: value.into(),
        }
    }

    /// Match a CSS class
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// Match an element id
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::Id(name.into())
    }

    /// Narrow to elements whose trimmed text equals `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self::Text {
            within: Box::new(self),
            text: text.into(),
            exact: true,
        }
    }

    /// Narrow to elements whose text contains `text`
    #[must_use]
    pub fn containing_text(self, text: impl Into<String>) -> Self {
        Self::Text {
            within: Box::new(self),
            text: text.into(),
            exact: false,
        }
    }

    /// Narrow to elements that contain a match for `inner`
    #[must_use]
    pub fn has(self, inner: Self) -> Self {
        Self::Has {
            base: Box::new(self),
            has: Box::new(inner),
        }
    }

    /// Descend into matches of `self` and select `target`
    #[must_use]
    pub fn descendant(self, target: Self) -> Self {
        Self::Descendant {
            ancestor: Box::new(self),
            target: Box::new(target),
        }
    }

    /// JavaScript expression evaluating to an array of matching elements.
    #[must_use]
    pub fn to_js(&self) -> String {
        format!("({})(document)", self.to_js_fn())
    }

    /// JavaScript arrow function `root => Element[]` searching below `root`.
    fn to_js_fn(&self) -> String {
        match self {
            Self::Attribute { key, value } => format!(
                "root => Array.from(root.querySelectorAll('*')).filter(el => el.getAttribute({}) === {})",
                js_string(key),
                js_string(value)
            ),
            Self::Class(name) => format!(
                "root => Array.from(root.getElementsByClassName({}))",
                js_string(name)
            ),
            Self::Id(name) => format!(
                "root => Array.from(root.querySelectorAll('*')).filter(el => el.id === {})",
                js_string(name)
            ),
            Self::Text {
                within,
                text,
                exact,
            } => {
                let test = if *exact {
                    "t === needle"
                } else {
                    "t.includes(needle)"
                };
                format!(
                    "root => {{ const needle = {}; return ({})(root).filter(el => {{ const t = (el.textContent || '').trim(); return {test}; }}); }}",
                    js_string(text),
                    within.to_js_fn()
                )
            }
            Self::Has { base, has } => format!(
                "root => ({})(root).filter(el => ({})(el).length > 0)",
                base.to_js_fn(),
                has.to_js_fn()
            ),
            Self::Descendant { ancestor, target } => format!(
                "root => {{ const out = []; for (const scope of ({})(root)) {{ for (const el of ({})(scope)) {{ if (!out.includes(el)) out.push(el); }} }} return out; }}",
                ancestor.to_js_fn(),
                target.to_js_fn()
            ),
        }
    }
}

/// Encode a literal as a JS string (JSON string syntax is a subset of JS).
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute { key, value } => write!(f, "[{key}={value:?}]"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Text {
                within,
                text,
                exact: true,
            } => write!(f, "{within}:text-is({text:?})"),
            Self::Text { within, text, .. } => write!(f, "{within}:has-text({text:?})"),
            Self::Has { base, has } => write!(f, "{base}:has({has})"),
            Self::Descendant { ancestor, target } => write!(f, "{ancestor} {target}"),
        }
    }
}

/// A selector plus the wait budget used when it is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    wait: WaitOptions,
}

impl Locator {
    /// Create a locator with the default wait budget
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            wait: WaitOptions::default(),
        }
    }

    /// Shorthand for a `data-test` locator
    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self::new(Selector::test_id(value))
    }

    /// Shorthand for a class locator
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(Selector::class(name))
    }

    /// Replace the wait budget
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.wait.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the wait budget
    #[must_use]
    pub const fn wait(&self) -> &WaitOptions {
        &self.wait
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_test_id_uses_data_test() {
            let selector = Selector::test_id("login-button");
            assert_eq!(selector.to_string(), "[data-test=\"login-button\"]");
        }

        #[test]
        fn test_display_relation() {
            let selector = Selector::class("cart_item")
                .has(Selector::class("inventory_item_name").with_text("Sauce Labs Onesie"))
                .descendant(Selector::class("inventory_item_price"));
            assert_eq!(
                selector.to_string(),
                ".cart_item:has(.inventory_item_name:text-is(\"Sauce Labs Onesie\")) .inventory_item_price"
            );
        }

        #[test]
        fn test_js_starts_from_document() {
            let js = Selector::class("title").to_js();
            assert!(js.starts_with("(root => "));
            assert!(js.ends_with("(document)"));
            assert!(js.contains("getElementsByClassName(\"title\")"));
        }

        #[test]
        fn test_js_escapes_quotes_in_names() {
            let js = Selector::class("inventory_item_name")
                .with_text("Bob's \"Best\" (Red)")
                .to_js();
            assert!(js.contains(r#""Bob's \"Best\" (Red)""#));
        }

        #[test]
        fn test_js_escapes_backslashes_and_newlines() {
            let js = Selector::test_id("a\\b\nc").to_js();
            assert!(js.contains(r#""a\\b\nc""#));
        }

        #[test]
        fn test_exact_vs_containing_text() {
            let exact = Selector::class("x").with_text("Hi").to_js();
            let contains = Selector::class("x").containing_text("Hi").to_js();
            assert!(exact.contains("t === needle"));
            assert!(contains.contains("t.includes(needle)"));
        }

        #[test]
        fn test_selectors_are_comparable() {
            let a = Selector::test_id("remove-sauce-labs-onesie");
            let b = Selector::test_id("remove-sauce-labs-onesie");
            assert_eq!(a, b);
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_locator_default_wait() {
            let locator = Locator::test_id("finish");
            assert_eq!(locator.wait(), &WaitOptions::default());
        }

        #[test]
        fn test_locator_timeout() {
            let locator = Locator::class("title").with_timeout(Duration::from_secs(10));
            assert_eq!(locator.wait().timeout_ms, 10_000);
        }

        #[test]
        fn test_locator_display_matches_selector() {
            let locator = Locator::class("summary_info");
            assert_eq!(locator.to_string(), ".summary_info");
        }
    }
}
