//! Order confirmation page.

use crate::locator::{Locator, Selector};
use crate::model::CompletionSnapshot;
use crate::page_object::{self, PageContext, PageObject};
use crate::result::ProbeResult;
use crate::state::NavigationState;

/// Locators of the confirmation page
#[derive(Debug, Clone)]
pub struct CheckoutCompleteLocators {
    /// Page title
    pub title: Locator,
    /// Confirmation header
    pub header: Locator,
    /// Confirmation body
    pub text: Locator,
    /// Pony Express image
    pub image: Locator,
    /// Back home button
    pub back_home: Locator,
    /// Page container
    pub container: Locator,
    title_landmark: Locator,
    header_landmark: Locator,
}

impl CheckoutCompleteLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let title_landmark = ctx
            .title_landmark(NavigationState::CheckoutComplete)
            .unwrap_or_else(|| ctx.landmark(Selector::class("title")));
        Self {
            title: ctx.element(Selector::class("title")),
            header: ctx.element(Selector::test_id("complete-header")),
            text: ctx.element(Selector::test_id("complete-text")),
            image: ctx.element(Selector::test_id("pony_express")),
            back_home: ctx.element(Selector::test_id("back-to-products")),
            container: ctx.element(Selector::class("checkout_complete_container")),
            title_landmark,
            header_landmark: ctx.landmark(Selector::test_id("complete-header")),
        }
    }
}

/// The confirmation page
#[derive(Debug)]
pub struct CheckoutCompletePage<'a> {
    ctx: PageContext<'a>,
    locators: CheckoutCompleteLocators,
}

impl PageObject for CheckoutCompletePage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::CheckoutComplete
    }

    fn page_name(&self) -> &'static str {
        "checkout-complete"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.title_landmark, &self.locators.header_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> CheckoutCompletePage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = CheckoutCompleteLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &CheckoutCompleteLocators {
        &self.locators
    }

    /// Wait until the title and the header are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether title, header and container are all visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        Ok(page_object::is_page_loaded(self).await?
            && self.ctx.find(&self.locators.container).is_visible().await?)
    }

    /// Click "Back Home". Does not wait for the inventory page.
    pub async fn click_back_home(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.back_home).click().await
    }

    /// Title text
    pub async fn get_page_title(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.title).text().await
    }

    /// Header text
    pub async fn get_complete_header(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.header).text().await
    }

    /// Body text
    pub async fn get_complete_text(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.text).text().await
    }

    /// Whether the confirmation image is showing
    pub async fn is_complete_image_visible(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.image).is_visible().await
    }

    /// Whether "Back Home" is showing
    pub async fn is_back_home_button_visible(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.back_home).is_visible().await
    }

    /// Whether "Back Home" accepts clicks
    pub async fn is_back_home_button_enabled(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.back_home).is_enabled().await
    }

    /// Current URL
    pub async fn get_complete_page_url(&self) -> ProbeResult<String> {
        self.ctx.driver().current_url().await
    }

    /// Header, body, image and URL, each read once
    pub async fn snapshot(&self) -> ProbeResult<CompletionSnapshot> {
        Ok(CompletionSnapshot {
            header: self.get_complete_header().await?,
            text: self.get_complete_text().await?,
            image_visible: self.is_complete_image_visible().await?,
            url: self.get_complete_page_url().await?,
        })
    }

    /// Any confirmation signal present
    pub async fn is_order_completed(&self) -> ProbeResult<bool> {
        Ok(self.snapshot().await?.is_order_completed())
    }

    /// URL is the confirmation route
    pub async fn is_success_page(&self) -> ProbeResult<bool> {
        let url = self.get_complete_page_url().await?;
        Ok(url.contains("checkout-complete"))
    }
}
