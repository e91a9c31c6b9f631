//! Domain values read back from the storefront.
//!
//! Everything here is plain data plus pure derivations. Nothing in this module
//! talks to a driver, so derived checks can never race a second DOM read.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::fixtures::checkout_messages;
use crate::result::{ProbeError, ProbeResult};

/// A catalog product. Identity is the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Display name, unique within a catalog snapshot
    pub name: String,
    /// Unit price
    pub price: Decimal,
}

impl Product {
    /// Create a product
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// One product line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product on this line
    pub product: Product,
    /// Quantity shown on the line; always 1 on this storefront
    pub quantity: u32,
}

/// Cart contents keyed by product name.
///
/// Rebuilt from the page every time it is needed; never cached across pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    lines: BTreeMap<String, CartLine>,
}

impl CartState {
    /// Build a cart from lines read off a page.
    ///
    /// Fails if a product appears twice or a line has a quantity other than 1.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> ProbeResult<Self> {
        let mut map = BTreeMap::new();
        for line in lines {
            if line.quantity != 1 {
                return Err(ProbeError::CartInvariant {
                    message: format!(
                        "'{}' has quantity {}, expected 1",
                        line.product.name, line.quantity
                    ),
                });
            }
            let name = line.product.name.clone();
            if map.insert(name.clone(), line).is_some() {
                return Err(ProbeError::CartInvariant {
                    message: format!("'{name}' appears on more than one line"),
                });
            }
        }
        Ok(Self { lines: map })
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a product is in the cart
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    /// Product names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.lines.keys().map(String::as_str).collect()
    }

    /// Sum of line prices
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .values()
            .map(|l| l.product.price * Decimal::from(l.quantity))
            .sum()
    }

    /// Iterate over lines
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }
}

/// Checkout form fields, in the order the storefront validates them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Postal code
    PostalCode,
}

impl CheckoutField {
    /// Fields in validation priority order
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::PostalCode];

    /// `data-test` token of the input
    #[must_use]
    pub const fn test_id(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::PostalCode => "postalCode",
        }
    }

    /// Error the storefront shows when this field is the first one missing
    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::FirstName => checkout_messages::MISSING_FIRST_NAME,
            Self::LastName => checkout_messages::MISSING_LAST_NAME,
            Self::PostalCode => checkout_messages::MISSING_POSTAL_CODE,
        }
    }
}

/// Checkout information form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Postal code
    pub postal_code: String,
}

impl CheckoutForm {
    /// Create a form
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Value of one field
    #[must_use]
    pub fn field(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::FirstName => &self.first_name,
            CheckoutField::LastName => &self.last_name,
            CheckoutField::PostalCode => &self.postal_code,
        }
    }

    /// First empty field in priority order
    #[must_use]
    pub fn first_missing(&self) -> Option<CheckoutField> {
        CheckoutField::ALL
            .into_iter()
            .find(|f| self.field(*f).is_empty())
    }

    /// All three fields are non-empty
    #[must_use]
    pub fn are_all_fields_filled(&self) -> bool {
        self.first_missing().is_none()
    }

    /// All three fields are empty
    #[must_use]
    pub fn are_all_fields_empty(&self) -> bool {
        CheckoutField::ALL
            .into_iter()
            .all(|f| self.field(f).is_empty())
    }
}

/// Round to cents, half away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn money_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"\$(\d+\.\d{2})").expect("valid money pattern"))
}

/// Extract the first `$d.dd` amount from a label such as `"Tax: $4.48"`.
pub fn parse_money(text: &str) -> ProbeResult<Decimal> {
    money_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<Decimal>().ok())
        .ok_or_else(|| ProbeError::UnparsableAmount {
            text: text.to_string(),
        })
}

/// Parse an integer label such as a cart badge or a quantity cell.
pub fn parse_count(text: &str) -> ProbeResult<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| ProbeError::UnparsableCount {
            text: text.to_string(),
        })
}

/// Order summary as displayed on the overview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Sum of line prices
    pub item_total: Decimal,
    /// Tax
    pub tax: Decimal,
    /// Displayed total
    pub total: Decimal,
    /// Lines listed in the summary
    pub lines: Vec<CartLine>,
}

impl OrderSummary {
    /// `round2(item_total + tax)`
    #[must_use]
    pub fn expected_total(&self) -> Decimal {
        expected_total(self.item_total, self.tax)
    }

    /// Displayed total agrees with item total plus tax
    #[must_use]
    pub fn is_total_consistent(&self) -> bool {
        self.total == self.expected_total()
    }

    /// Sum of the listed line prices
    #[must_use]
    pub fn lines_subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.product.price * Decimal::from(l.quantity))
            .sum()
    }

    /// Product names as listed
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.product.name.as_str()).collect()
    }
}

/// `round2(item_total + tax)`
#[must_use]
pub fn expected_total(item_total: Decimal, tax: Decimal) -> Decimal {
    round2(item_total + tax)
}

/// Visibility of the overview page's summary parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryVisibility {
    /// At least one line is listed
    pub has_items: bool,
    /// Total label visible
    pub total_visible: bool,
    /// Tax label visible
    pub tax_visible: bool,
    /// Item total label visible
    pub item_total_visible: bool,
}

impl SummaryVisibility {
    /// Every part of the summary is present
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.has_items && self.total_visible && self.tax_visible && self.item_total_visible
    }
}

/// What the order-complete page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionSnapshot {
    /// Header text
    pub header: String,
    /// Body text
    pub text: String,
    /// Confirmation image visible
    pub image_visible: bool,
    /// Current URL
    pub url: String,
}

impl CompletionSnapshot {
    /// Any of the confirmation signals is present
    #[must_use]
    pub fn is_order_completed(&self) -> bool {
        self.header.contains("Thank you")
            || self.header.contains("complete")
            || self.text.contains("dispatched")
            || self.image_visible
    }

    /// URL is the checkout-complete route
    #[must_use]
    pub fn is_success_page(&self) -> bool {
        self.url.contains("checkout-complete")
    }
}
