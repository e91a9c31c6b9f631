//! Checkout step one: customer information.

use tracing::warn;

use crate::locator::{Locator, Selector};
use crate::model::{CheckoutField, CheckoutForm};
use crate::page_object::{self, PageContext, PageObject};
use crate::result::ProbeResult;
use crate::state::NavigationState;

/// Locators of checkout step one
#[derive(Debug, Clone)]
pub struct CheckoutInfoLocators {
    /// Page title
    pub title: Locator,
    /// First name input
    pub first_name: Locator,
    /// Last name input
    pub last_name: Locator,
    /// Postal code input
    pub postal_code: Locator,
    /// Continue button
    pub continue_button: Locator,
    /// Cancel button
    pub cancel_button: Locator,
    /// Error banner
    pub error: Locator,
    /// Close button of the error banner
    pub error_button: Locator,
    title_landmark: Locator,
    first_name_landmark: Locator,
}

impl CheckoutInfoLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let title_landmark = ctx
            .title_landmark(NavigationState::CheckoutInfo)
            .unwrap_or_else(|| ctx.landmark(Selector::class("title")));
        Self {
            title: ctx.element(Selector::class("title")),
            first_name: ctx.element(Selector::test_id(CheckoutField::FirstName.test_id())),
            last_name: ctx.element(Selector::test_id(CheckoutField::LastName.test_id())),
            postal_code: ctx.element(Selector::test_id(CheckoutField::PostalCode.test_id())),
            continue_button: ctx.element(Selector::test_id("continue")),
            cancel_button: ctx.element(Selector::test_id("cancel")),
            error: ctx.element(Selector::test_id("error")),
            error_button: ctx.element(Selector::test_id("error-button")),
            title_landmark,
            first_name_landmark: ctx
                .landmark(Selector::test_id(CheckoutField::FirstName.test_id())),
        }
    }

    /// Input for a field
    #[must_use]
    pub const fn field(&self, field: CheckoutField) -> &Locator {
        match field {
            CheckoutField::FirstName => &self.first_name,
            CheckoutField::LastName => &self.last_name,
            CheckoutField::PostalCode => &self.postal_code,
        }
    }
}

/// Checkout step one
#[derive(Debug)]
pub struct CheckoutInfoPage<'a> {
    ctx: PageContext<'a>,
    locators: CheckoutInfoLocators,
}

impl PageObject for CheckoutInfoPage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::CheckoutInfo
    }

    fn page_name(&self) -> &'static str {
        "checkout-info"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.title_landmark, &self.locators.first_name_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> CheckoutInfoPage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = CheckoutInfoLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &CheckoutInfoLocators {
        &self.locators
    }

    /// Wait until the title and the first name input are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether the title and the first name input are visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        page_object::is_page_loaded(self).await
    }

    /// Type into one field
    pub async fn fill_field(&self, field: CheckoutField, value: &str) -> ProbeResult<()> {
        self.ctx.find(self.locators.field(field)).fill(value).await
    }

    /// Type the first name
    pub async fn fill_first_name(&self, value: &str) -> ProbeResult<()> {
        self.fill_field(CheckoutField::FirstName, value).await
    }

    /// Type the last name
    pub async fn fill_last_name(&self, value: &str) -> ProbeResult<()> {
        self.fill_field(CheckoutField::LastName, value).await
    }

    /// Type the postal code
    pub async fn fill_postal_code(&self, value: &str) -> ProbeResult<()> {
        self.fill_field(CheckoutField::PostalCode, value).await
    }

    /// Type all three fields, empty values included
    pub async fn fill_checkout_information(&self, form: &CheckoutForm) -> ProbeResult<()> {
        for field in CheckoutField::ALL {
            self.fill_field(field, form.field(field)).await?;
        }
        Ok(())
    }

    /// Click "Continue". Does not wait for the outcome.
    pub async fn click_continue(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.continue_button).click().await
    }

    /// Click "Cancel". Does not wait for the cart page.
    pub async fn click_cancel(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.cancel_button).click().await
    }

    /// Empty all three fields
    pub async fn clear_form(&self) -> ProbeResult<()> {
        for field in CheckoutField::ALL {
            self.ctx.find(self.locators.field(field)).clear().await?;
        }
        Ok(())
    }

    /// Title text
    pub async fn get_page_title(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.title).text().await
    }

    /// First name value
    pub async fn get_first_name_value(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.first_name).value().await
    }

    /// Last name value
    pub async fn get_last_name_value(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.last_name).value().await
    }

    /// Postal code value
    pub async fn get_postal_code_value(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.postal_code).value().await
    }

    /// The three field values, read once each
    pub async fn form_values(&self) -> ProbeResult<CheckoutForm> {
        Ok(CheckoutForm {
            first_name: self.get_first_name_value().await?,
            last_name: self.get_last_name_value().await?,
            postal_code: self.get_postal_code_value().await?,
        })
    }

    /// Whether every field currently holds a value
    pub async fn are_all_fields_filled(&self) -> ProbeResult<bool> {
        Ok(self.form_values().await?.are_all_fields_filled())
    }

    /// Whether every field is currently empty
    pub async fn are_all_fields_empty(&self) -> ProbeResult<bool> {
        Ok(self.form_values().await?.are_all_fields_empty())
    }

    /// Text of the error banner, waiting for it to appear
    pub async fn get_error_message(&self) -> ProbeResult<String> {
        let message = self.ctx.find(&self.locators.error).text().await?;
        warn!(page = "checkout-info", message = %message, "error surfaced");
        Ok(message)
    }

    /// Close the error banner if one shows, and wait until it is gone
    pub async fn dismiss_error(&self) -> ProbeResult<()> {
        page_object::dismiss_banner(self.ctx, &self.locators.error, &self.locators.error_button)
            .await
    }

    /// Whether the error banner is showing
    pub async fn is_error_message_visible(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.error).is_visible().await
    }

    /// Whether "Continue" accepts clicks
    pub async fn is_continue_button_enabled(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.continue_button).is_enabled().await
    }

    /// Whether "Cancel" is showing
    pub async fn is_cancel_button_visible(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.cancel_button).is_visible().await
    }
}
