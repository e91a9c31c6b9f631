//! Checkout step two: order summary.
//!
//! Derived checks (`calculate_expected_total`, `is_summary_complete`) read each
//! label once and compute over the values read, so one check never mixes two
//! renderings of the page.

use rust_decimal::Decimal;

use crate::locator::{Locator, Selector};
use crate::model::{self, parse_money, CartLine, OrderSummary, SummaryVisibility};
use crate::page_object::{self, PageContext, PageObject};
use crate::pages::cart_list::{CartList, CartListLocators};
use crate::result::ProbeResult;
use crate::state::NavigationState;

/// Locators of checkout step two
#[derive(Debug, Clone)]
pub struct CheckoutOverviewLocators {
    /// Page title
    pub title: Locator,
    /// Finish button
    pub finish: Locator,
    /// Cancel button
    pub cancel: Locator,
    /// Payment line
    pub payment_info: Locator,
    /// Shipping line
    pub shipping_info: Locator,
    /// "Item total" label
    pub item_total: Locator,
    /// "Tax" label
    pub tax: Locator,
    /// "Total" label
    pub total: Locator,
    /// Summary block
    pub summary_info: Locator,
    /// Line items
    pub list: CartListLocators,
    title_landmark: Locator,
    summary_landmark: Locator,
}

impl CheckoutOverviewLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let title_landmark = ctx
            .title_landmark(NavigationState::CheckoutOverview)
            .unwrap_or_else(|| ctx.landmark(Selector::class("title")));
        Self {
            title: ctx.element(Selector::class("title")),
            finish: ctx.element(Selector::test_id("finish")),
            cancel: ctx.element(Selector::test_id("cancel")),
            payment_info: ctx.element(Selector::test_id("payment-info-value")),
            shipping_info: ctx.element(Selector::test_id("shipping-info-value")),
            item_total: ctx.element(Selector::class("summary_subtotal_label")),
            tax: ctx.element(Selector::class("summary_tax_label")),
            total: ctx.element(Selector::class("summary_total_label")),
            summary_info: ctx.element(Selector::class("summary_info")),
            list: CartListLocators::new(ctx),
            title_landmark,
            summary_landmark: ctx.landmark(Selector::class("summary_info")),
        }
    }
}

/// Checkout step two
#[derive(Debug)]
pub struct CheckoutOverviewPage<'a> {
    ctx: PageContext<'a>,
    locators: CheckoutOverviewLocators,
}

impl PageObject for CheckoutOverviewPage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::CheckoutOverview
    }

    fn page_name(&self) -> &'static str {
        "checkout-overview"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.title_landmark, &self.locators.summary_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> CheckoutOverviewPage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = CheckoutOverviewLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &CheckoutOverviewLocators {
        &self.locators
    }

    fn list(&self) -> CartList<'_> {
        CartList {
            ctx: self.ctx,
            locators: &self.locators.list,
        }
    }

    async fn text_of(&self, locator: &Locator) -> ProbeResult<String> {
        self.ctx.find(locator).text().await
    }

    /// Wait until the title and the summary block are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether the title and the summary block are visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        page_object::is_page_loaded(self).await
    }

    /// Click "Finish". Does not wait for the confirmation page.
    pub async fn click_finish(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.finish).click().await
    }

    /// Click "Cancel". Does not wait for the inventory page.
    pub async fn click_cancel(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.cancel).click().await
    }

    /// Title text
    pub async fn get_page_title(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.title).await
    }

    /// Number of lines
    pub async fn get_cart_item_count(&self) -> ProbeResult<usize> {
        self.list().count().await
    }

    /// Product names, in display order
    pub async fn get_cart_items(&self) -> ProbeResult<Vec<String>> {
        self.list().names().await
    }

    /// Price label on a product's line
    pub async fn get_item_price(&self, name: &str) -> ProbeResult<String> {
        self.list().price(name).await
    }

    /// Quantity on a product's line
    pub async fn get_item_quantity(&self, name: &str) -> ProbeResult<u32> {
        self.list().quantity(name).await
    }

    /// Price labels, in display order
    pub async fn get_all_item_prices(&self) -> ProbeResult<Vec<String>> {
        self.list().prices().await
    }

    /// Whether a line for the product is showing
    pub async fn is_item_in_summary(&self, name: &str) -> ProbeResult<bool> {
        self.list().contains(name).await
    }

    /// Payment line text
    pub async fn get_payment_information(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.payment_info).await
    }

    /// Shipping line text
    pub async fn get_shipping_information(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.shipping_info).await
    }

    /// "Item total: $x" label
    pub async fn get_item_total(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.item_total).await
    }

    /// "Tax: $x" label
    pub async fn get_tax(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.tax).await
    }

    /// "Total: $x" label
    pub async fn get_total_amount(&self) -> ProbeResult<String> {
        self.text_of(&self.locators.total).await
    }

    /// Item total amount
    pub async fn get_item_total_value(&self) -> ProbeResult<Decimal> {
        parse_money(&self.get_item_total().await?)
    }

    /// Tax amount
    pub async fn get_tax_value(&self) -> ProbeResult<Decimal> {
        parse_money(&self.get_tax().await?)
    }

    /// Total amount
    pub async fn get_total_value(&self) -> ProbeResult<Decimal> {
        parse_money(&self.get_total_amount().await?)
    }

    /// `round2(item total + tax)` from one read of each label
    pub async fn calculate_expected_total(&self) -> ProbeResult<Decimal> {
        let item_total = self.get_item_total_value().await?;
        let tax = self.get_tax_value().await?;
        Ok(model::expected_total(item_total, tax))
    }

    /// Lines rebuilt from the page
    pub async fn summary_lines(&self) -> ProbeResult<Vec<CartLine>> {
        self.list().lines().await
    }

    /// Amounts and lines, each read once
    pub async fn summary(&self) -> ProbeResult<OrderSummary> {
        Ok(OrderSummary {
            item_total: self.get_item_total_value().await?,
            tax: self.get_tax_value().await?,
            total: self.get_total_value().await?,
            lines: self.summary_lines().await?,
        })
    }

    /// Visibility of each summary part
    pub async fn summary_visibility(&self) -> ProbeResult<SummaryVisibility> {
        Ok(SummaryVisibility {
            has_items: self.get_cart_item_count().await? > 0,
            total_visible: self.ctx.find(&self.locators.total).is_visible().await?,
            tax_visible: self.ctx.find(&self.locators.tax).is_visible().await?,
            item_total_visible: self.ctx.find(&self.locators.item_total).is_visible().await?,
        })
    }

    /// Lines listed and every amount label showing
    pub async fn is_summary_complete(&self) -> ProbeResult<bool> {
        Ok(self.summary_visibility().await?.is_complete())
    }

    /// Whether "Finish" accepts clicks
    pub async fn is_finish_button_enabled(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.finish).is_enabled().await
    }
}
