//! Cart page.
//!
//! Remove buttons carry [`TokenScheme::Normalized`] tokens here, unlike the
//! inventory page.

use crate::locator::{Locator, Selector};
use crate::model::{CartLine, CartState};
use crate::normalize::TokenScheme;
use crate::page_object::{self, PageContext, PageObject};
use crate::pages::cart_list::{CartList, CartListLocators};
use crate::resolver::{self, CartAction};
use crate::result::ProbeResult;
use crate::state::NavigationState;

const SCHEME: TokenScheme = TokenScheme::Normalized;

/// Locators of the cart page
#[derive(Debug, Clone)]
pub struct CartLocators {
    /// Page title
    pub title: Locator,
    /// Checkout button
    pub checkout: Locator,
    /// Continue shopping button
    pub continue_shopping: Locator,
    /// "QTY" column header
    pub quantity_label: Locator,
    /// Line items
    pub list: CartListLocators,
    title_landmark: Locator,
    checkout_landmark: Locator,
}

impl CartLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let title_landmark = ctx
            .title_landmark(NavigationState::Cart)
            .unwrap_or_else(|| ctx.landmark(Selector::class("title")));
        Self {
            title: ctx.element(Selector::class("title")),
            checkout: ctx.element(Selector::test_id("checkout")),
            continue_shopping: ctx.element(Selector::test_id("continue-shopping")),
            quantity_label: ctx.element(Selector::class("cart_quantity_label")),
            list: CartListLocators::new(ctx),
            title_landmark,
            checkout_landmark: ctx.landmark(Selector::test_id("checkout")),
        }
    }
}

/// The cart page
#[derive(Debug)]
pub struct CartPage<'a> {
    ctx: PageContext<'a>,
    locators: CartLocators,
}

impl PageObject for CartPage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::Cart
    }

    fn page_name(&self) -> &'static str {
        "cart"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.title_landmark, &self.locators.checkout_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> CartPage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = CartLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    fn list(&self) -> CartList<'_> {
        CartList {
            ctx: self.ctx,
            locators: &self.locators.list,
        }
    }

    /// Wait until the title and the checkout button are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether the title and the checkout button are visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        page_object::is_page_loaded(self).await
    }

    /// Click the line's "Remove" button
    pub async fn remove_item(&self, name: &str) -> ProbeResult<()> {
        let locator = self
            .ctx
            .element(resolver::action_control(CartAction::Remove, SCHEME, name));
        self.ctx.find(&locator).click().await
    }

    /// Click "Continue Shopping". Does not wait for the inventory page.
    pub async fn continue_shopping(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.continue_shopping).click().await
    }

    /// Click "Checkout". Does not wait for the information page.
    pub async fn proceed_to_checkout(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.checkout).click().await
    }

    /// Title text
    pub async fn get_page_title(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.title).text().await
    }

    /// Number of lines
    pub async fn get_cart_item_count(&self) -> ProbeResult<usize> {
        self.list().count().await
    }

    /// Product names, in display order
    pub async fn get_cart_items(&self) -> ProbeResult<Vec<String>> {
        self.list().names().await
    }

    /// Quantity on a product's line
    pub async fn get_item_quantity(&self, name: &str) -> ProbeResult<u32> {
        self.list().quantity(name).await
    }

    /// Price label on a product's line
    pub async fn get_item_price(&self, name: &str) -> ProbeResult<String> {
        self.list().price(name).await
    }

    /// Whether a line for the product is showing
    pub async fn is_item_in_cart(&self, name: &str) -> ProbeResult<bool> {
        self.list().contains(name).await
    }

    /// Whether there are no lines
    pub async fn is_cart_empty(&self) -> ProbeResult<bool> {
        Ok(self.get_cart_item_count().await? == 0)
    }

    /// Price labels, in display order
    pub async fn get_all_item_prices(&self) -> ProbeResult<Vec<String>> {
        self.list().prices().await
    }

    /// Whether the checkout button accepts clicks
    pub async fn is_checkout_button_enabled(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.checkout).is_enabled().await
    }

    /// Lines rebuilt from the page
    pub async fn cart_lines(&self) -> ProbeResult<Vec<CartLine>> {
        self.list().lines().await
    }

    /// Cart rebuilt from the page, validated
    pub async fn cart_state(&self) -> ProbeResult<CartState> {
        self.list().state().await
    }
}
