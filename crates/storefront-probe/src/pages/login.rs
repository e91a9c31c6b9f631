//! Login page.

use tracing::warn;

use crate::fixtures::Credentials;
use crate::locator::{Locator, Selector};
use crate::page_object::{self, PageContext, PageObject};
use crate::result::ProbeResult;
use crate::state::NavigationState;

/// Locators of the login page
#[derive(Debug, Clone)]
pub struct LoginLocators {
    /// Username input
    pub username: Locator,
    /// Password input
    pub password: Locator,
    /// Submit button
    pub login_button: Locator,
    /// Error banner
    pub error: Locator,
    /// Close button of the error banner
    pub error_button: Locator,
    /// Logo
    pub logo: Locator,
    logo_landmark: Locator,
    button_landmark: Locator,
}

impl LoginLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        Self {
            username: ctx.element(Selector::test_id("username")),
            password: ctx.element(Selector::test_id("password")),
            login_button: ctx.element(Selector::test_id("login-button")),
            error: ctx.element(Selector::test_id("error")),
            error_button: ctx.element(Selector::test_id("error-button")),
            logo: ctx.element(Selector::class("login_logo")),
            logo_landmark: ctx.landmark(Selector::class("login_logo")),
            button_landmark: ctx.landmark(Selector::test_id("login-button")),
        }
    }
}

/// The login page
#[derive(Debug)]
pub struct LoginPage<'a> {
    ctx: PageContext<'a>,
    locators: LoginLocators,
}

impl PageObject for LoginPage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::LoggedOut
    }

    fn page_name(&self) -> &'static str {
        "login"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.logo_landmark, &self.locators.button_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> LoginPage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = LoginLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Open the storefront origin and wait for the form
    pub async fn goto(&self) -> ProbeResult<()> {
        let url = self.ctx.config().url_for("");
        self.ctx.driver().navigate(&url).await?;
        self.wait_for_page_load().await
    }

    /// Wait until the logo and the submit button are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether the logo and the submit button are visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        page_object::is_page_loaded(self).await
    }

    /// Type the username
    pub async fn fill_username(&self, username: &str) -> ProbeResult<()> {
        self.ctx.find(&self.locators.username).fill(username).await
    }

    /// Type the password
    pub async fn fill_password(&self, password: &str) -> ProbeResult<()> {
        self.ctx.find(&self.locators.password).fill(password).await
    }

    /// Submit the form
    pub async fn click_login(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.login_button).click().await
    }

    /// Fill both fields and submit. Does not wait for the outcome.
    pub async fn login(&self, credentials: &Credentials) -> ProbeResult<()> {
        self.fill_username(&credentials.username).await?;
        self.fill_password(&credentials.password).await?;
        self.click_login().await
    }

    /// Empty both fields
    pub async fn clear_form(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.username).clear().await?;
        self.ctx.find(&self.locators.password).clear().await
    }

    /// Text of the error banner, waiting for it to appear
    pub async fn get_error_message(&self) -> ProbeResult<String> {
        let message = self.ctx.find(&self.locators.error).text().await?;
        warn!(page = "login", message = %message, "error surfaced");
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

    /// Whether the login form is showing
    pub async fn is_login_form_visible(&self) -> ProbeResult<bool> {
        self.ctx.find(&self.locators.logo).is_visible().await
    }

    /// Current username value
    pub async fn get_username_value(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.username).value().await
    }

    /// Current password value
    pub async fn get_password_value(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.password).value().await
    }
}
