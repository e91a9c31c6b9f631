//! Product-parameterized selectors.
//!
//! Two strategies locate per-product elements:
//!
//! - **attribute**: the action button's `data-test` token, derived from the name
//! - **containment**: the list row whose name label reads exactly the display name,
//!   then a field inside that row
//!
//! Both are pure functions of their inputs, evaluated on demand.

use serde::{Deserialize, Serialize};

use crate::locator::Selector;
use crate::normalize::TokenScheme;

/// Class of the product name label in every product list
pub const ITEM_NAME_CLASS: &str = "inventory_item_name";

/// Row class on the inventory page
pub const INVENTORY_ROW_CLASS: &str = "inventory_item";

/// Row class on the cart and overview pages
pub const CART_ROW_CLASS: &str = "cart_item";

/// Per-product button action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartAction {
    /// `add-to-cart-<token>`
    AddToCart,
    /// `remove-<token>`
    Remove,
}

impl CartAction {
    /// Token prefix
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::AddToCart => "add-to-cart-",
            Self::Remove => "remove-",
        }
    }
}

/// `data-test` value of a product's action button
#[must_use]
pub fn action_token(action: CartAction, scheme: TokenScheme, name: &str) -> String {
    format!("{}{}", action.prefix(), scheme.token(name))
}

/// Selector of a product's action button
#[must_use]
pub fn action_control(action: CartAction, scheme: TokenScheme, name: &str) -> Selector {
    Selector::test_id(action_token(action, scheme, name))
}

/// The name label reading exactly `name`
#[must_use]
pub fn item_name(name: &str) -> Selector {
    Selector::class(ITEM_NAME_CLASS).with_text(name)
}

/// The row of class `container_class` holding the product `name`
#[must_use]
pub fn item_row(container_class: &str, name: &str) -> Selector {
    Selector::class(container_class).has(item_name(name))
}

/// Field `field_class` inside the row holding the product `name`
#[must_use]
pub fn item_field(container_class: &str, name: &str, field_class: &str) -> Selector {
    item_row(container_class, name).descendant(Selector::class(field_class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::products;

    #[test]
    fn test_inventory_button_keeps_punctuation() {
        let selector = action_control(
            CartAction::AddToCart,
            TokenScheme::Hyphenated,
            products::ALL_THE_THINGS_T_SHIRT,
        );
        assert_eq!(
            selector,
            Selector::test_id("add-to-cart-test.allthethings()-t-shirt-(red)")
        );
    }

    #[test]
    fn test_cart_button_is_normalized() {
        assert_eq!(
            action_token(
                CartAction::Remove,
                TokenScheme::Normalized,
                products::ALL_THE_THINGS_T_SHIRT
            ),
            "remove-test-allthethings-t-shirt-red"
        );
    }

    #[test]
    fn test_item_field_shape() {
        let selector = item_field(CART_ROW_CLASS, products::ONESIE, "cart_quantity");
        assert_eq!(
            selector.to_string(),
            ".cart_item:has(.inventory_item_name:text-is(\"Sauce Labs Onesie\")) .cart_quantity"
        );
    }

    #[test]
    fn test_item_row_is_exact_match() {
        let selector = item_row(INVENTORY_ROW_CLASS, "Sauce Labs Bolt T-Shirt");
        assert!(selector.to_js().contains("t === needle"));
    }
}
