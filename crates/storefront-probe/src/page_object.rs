//! Page Object Model support.
//!
//! A page object owns the locators of one page and exposes two kinds of
//! operations: actions, which wait for their target to become actionable and
//! then interact, and queries, which return plain values. Neither asserts.

use crate::config::SessionConfig;
use crate::driver::{find, ElementDriver, ElementRef};
use crate::locator::{Locator, Selector};
use crate::result::ProbeResult;
use crate::state::{url_matches, NavigationState};

/// Driver and configuration shared by the page objects of one session
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    driver: &'a dyn ElementDriver,
    config: &'a SessionConfig,
}

impl std::fmt::Debug for PageContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> PageContext<'a> {
    /// Bundle a driver with its configuration
    #[must_use]
    pub const fn new(driver: &'a dyn ElementDriver, config: &'a SessionConfig) -> Self {
        Self { driver, config }
    }

    /// The driver
    #[must_use]
    pub const fn driver(&self) -> &'a dyn ElementDriver {
        self.driver
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &'a SessionConfig {
        self.config
    }

    /// Bind a locator to the driver
    #[must_use]
    pub fn find<'l>(&self, locator: &'l Locator) -> ElementRef<'l>
    where
        'a: 'l,
    {
        find(self.driver, locator)
    }

    /// Locator with the element wait budget
    #[must_use]
    pub fn element(&self, selector: Selector) -> Locator {
        Locator::new(selector).with_wait(self.config.wait)
    }

    /// Locator with the page readiness budget
    #[must_use]
    pub fn landmark(&self, selector: Selector) -> Locator {
        Locator::new(selector).with_wait(self.config.load_wait)
    }

    /// The page title reading exactly `state`'s title
    #[must_use]
    pub fn title_landmark(&self, state: NavigationState) -> Option<Locator> {
        state
            .title()
            .map(|t| self.landmark(Selector::class("title").with_text(t)))
    }
}

/// A page of the storefront
pub trait PageObject {
    /// Navigation state this page corresponds to
    fn state(&self) -> NavigationState;

    /// Page name for logging
    fn page_name(&self) -> &'static str;

    /// Elements whose presence means the page is ready
    fn readiness(&self) -> Vec<&Locator>;

    /// Driver and configuration
    fn context(&self) -> PageContext<'_>;

    /// Fragment the URL of this page contains
    fn url_fragment(&self) -> Option<&'static str> {
        self.state().url_fragment()
    }
}

/// Wait until every readiness element is present.
///
/// # Errors
///
/// [`crate::ProbeError::ElementNotFound`] naming the first element that never appeared.
pub async fn wait_for_page_load<P: PageObject + ?Sized>(page: &P) -> ProbeResult<()> {
    let ctx = page.context();
    for locator in page.readiness() {
        ctx.find(locator).wait_present().await?;
    }
    tracing::debug!(page = page.page_name(), "page ready");
    Ok(())
}

/// Whether every readiness element is visible right now
pub async fn is_page_loaded<P: PageObject + ?Sized>(page: &P) -> ProbeResult<bool> {
    let ctx = page.context();
    for locator in page.readiness() {
        if !ctx.find(locator).is_visible().await? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Close a showing error banner with its dismiss button and wait until it is
/// gone. Does nothing when no banner shows.
pub(crate) async fn dismiss_banner(
    ctx: PageContext<'_>,
    banner: &Locator,
    dismiss: &Locator,
) -> ProbeResult<()> {
    let banner = ctx.find(banner);
    if !banner.is_visible().await? {
        return Ok(());
    }
    tracing::debug!(banner = %banner.locator(), "dismissing error");
    ctx.find(dismiss).click().await?;
    banner.wait_hidden().await
}

/// Whether the current URL matches the page.
///
/// Pages without a fragment (login) match any URL that no other page claims.
pub async fn is_on_page<P: PageObject + ?Sized>(page: &P) -> ProbeResult<bool> {
    let url = page.context().driver().current_url().await?;
    Ok(url_matches(page.url_fragment(), &url))
}
