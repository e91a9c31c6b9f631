//! Session orchestration over the navigation state machine.
//!
//! A [`Session`] owns one driver and tracks which page it is on. Every
//! transition is checked against [`NavigationState::apply`] before the page
//! action runs, and the new state is recorded only once the target page is
//! ready. Page accessors hand out page objects for the current page only.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::driver::ElementDriver;
use crate::fixtures::Credentials;
use crate::locator::Selector;
use crate::model::CheckoutForm;
use crate::page_object::PageContext;
use crate::pages::{
    CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, LoginPage,
    ProductsPage,
};
use crate::result::{ProbeError, ProbeResult};
use crate::state::{NavAction, NavigationState};
use crate::wait::poll_until;

/// Result of submitting the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The inventory page loaded
    LoggedIn,
    /// The store kept the user on the login page
    Rejected {
        /// Text of the error banner
        message: String,
    },
}

impl LoginOutcome {
    /// Whether the login went through
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

/// Result of continuing from checkout step one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinueOutcome {
    /// The overview page loaded
    Accepted,
    /// The store kept the form open
    Rejected {
        /// Text of the error banner
        message: String,
    },
}

impl ContinueOutcome {
    /// Whether the form went through
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Element whose presence means `state`'s page has replaced the previous one
fn arrival_marker(state: NavigationState) -> Selector {
    match state.title() {
        Some(title) => Selector::class("title").with_text(title),
        None => Selector::class("login_logo"),
    }
}

/// One browsing session against the storefront
pub struct Session<D: ElementDriver> {
    id: Uuid,
    driver: D,
    config: SessionConfig,
    state: NavigationState,
}

impl<D: ElementDriver> std::fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<D: ElementDriver> Session<D> {
    /// New session in [`NavigationState::LoggedOut`]. Nothing is loaded until [`Self::open`].
    #[must_use]
    pub fn new(driver: D, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            config,
            state: NavigationState::LoggedOut,
        }
    }

    /// Session identifier, carried on every span
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Page the session is on
    #[must_use]
    pub const fn state(&self) -> NavigationState {
        self.state
    }

    /// The driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Context for building page objects
    #[must_use]
    pub fn ctx(&self) -> PageContext<'_> {
        PageContext::new(&self.driver, &self.config)
    }

    fn expect_state(&self, expected: NavigationState) -> ProbeResult<PageContext<'_>> {
        if self.state == expected {
            Ok(self.ctx())
        } else {
            Err(ProbeError::WrongPage {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            })
        }
    }

    /// The login page
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the session is logged out.
    pub fn login_page(&self) -> ProbeResult<LoginPage<'_>> {
        self.expect_state(NavigationState::LoggedOut).map(LoginPage::new)
    }

    /// The inventory page
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the session is on the inventory.
    pub fn products(&self) -> ProbeResult<ProductsPage<'_>> {
        self.expect_state(NavigationState::Products).map(ProductsPage::new)
    }

    /// The cart page
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the session is on the cart.
    pub fn cart(&self) -> ProbeResult<CartPage<'_>> {
        self.expect_state(NavigationState::Cart).map(CartPage::new)
    }

    /// Checkout step one
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the session is on checkout step one.
    pub fn checkout_info(&self) -> ProbeResult<CheckoutInfoPage<'_>> {
        self.expect_state(NavigationState::CheckoutInfo)
            .map(CheckoutInfoPage::new)
    }

    /// Checkout step two
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the session is on checkout step two.
    pub fn checkout_overview(&self) -> ProbeResult<CheckoutOverviewPage<'_>> {
        self.expect_state(NavigationState::CheckoutOverview)
            .map(CheckoutOverviewPage::new)
    }

    /// The confirmation page
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] unless the order has been placed.
    pub fn checkout_complete(&self) -> ProbeResult<CheckoutCompletePage<'_>> {
        self.expect_state(NavigationState::CheckoutComplete)
            .map(CheckoutCompletePage::new)
    }

    /// Wait for the readiness elements of `state`'s page
    async fn wait_for(&self, state: NavigationState) -> ProbeResult<()> {
        let ctx = self.ctx();
        match state {
            NavigationState::LoggedOut => LoginPage::new(ctx).wait_for_page_load().await,
            NavigationState::Products => ProductsPage::new(ctx).wait_for_page_load().await,
            NavigationState::Cart => CartPage::new(ctx).wait_for_page_load().await,
            NavigationState::CheckoutInfo => CheckoutInfoPage::new(ctx).wait_for_page_load().await,
            NavigationState::CheckoutOverview => {
                CheckoutOverviewPage::new(ctx).wait_for_page_load().await
            }
            NavigationState::CheckoutComplete => {
                CheckoutCompletePage::new(ctx).wait_for_page_load().await
            }
        }
    }

    async fn arrive(&mut self, action: NavAction, next: NavigationState) -> ProbeResult<NavigationState> {
        self.wait_for(next).await?;
        info!(session = %self.id, from = %self.state, to = %next, action = %action, "transition");
        self.state = next;
        Ok(next)
    }

    /// Poll until either `next`'s page has arrived or the error banner shows.
    /// Returns the banner text when it showed. Callers dismiss any earlier
    /// banner before submitting, so a showing banner belongs to this attempt.
    async fn await_outcome(&self, next: NavigationState) -> ProbeResult<Option<String>> {
        let driver: &dyn ElementDriver = &self.driver;
        let arrived = arrival_marker(next);
        let error = Selector::test_id("error");
        let (arrived_ref, error_ref) = (&arrived, &error);
        let result = poll_until(&self.config.load_wait, || async move {
            Ok(driver.count(arrived_ref).await? > 0 || driver.is_visible(error_ref).await?)
        })
        .await?;
        if !result.success {
            return Err(ProbeError::Timeout {
                selector: format!("{arrived} or {error}"),
                ms: result.elapsed_ms(),
            });
        }
        if driver.count(&arrived).await? > 0 {
            return Ok(None);
        }
        Ok(driver.text(&error).await?.map(|t| t.trim().to_string()))
    }

    /// Navigate to the storefront origin and wait for the login form.
    ///
    /// Allowed from any state; the session is logged out afterwards.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn open(&mut self) -> ProbeResult<()> {
        LoginPage::new(self.ctx()).goto().await?;
        info!(session = %self.id, from = %self.state, "opened login page");
        self.state = NavigationState::LoggedOut;
        Ok(())
    }

    /// Submit the login form.
    ///
    /// A rejection is an outcome, not an error: the banner text is returned and
    /// the session stays logged out.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InvalidTransition`] when not logged out; wait and driver
    /// errors when neither the inventory nor the banner appears.
    #[instrument(skip(self, credentials), fields(session = %self.id, username = %credentials.username))]
    pub async fn login(&mut self, credentials: &Credentials) -> ProbeResult<LoginOutcome> {
        let accepted = NavAction::Login { accepted: true };
        let next = self.state.apply(accepted)?;
        let page = self.login_page()?;
        page.dismiss_error().await?;
        page.login(credentials).await?;
        match self.await_outcome(next).await? {
            None => {
                self.arrive(accepted, next).await?;
                Ok(LoginOutcome::LoggedIn)
            }
            Some(message) => {
                warn!(session = %self.id, message = %message, "login rejected");
                self.state = self.state.apply(NavAction::Login { accepted: false })?;
                Ok(LoginOutcome::Rejected { message })
            }
        }
    }

    /// Log out through the side menu
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn logout(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::Logout)?;
        self.products()?.logout().await?;
        self.arrive(NavAction::Logout, next).await
    }

    /// Open the cart from the inventory
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn go_to_cart(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::GoToCart)?;
        self.products()?.go_to_cart().await?;
        self.arrive(NavAction::GoToCart, next).await
    }

    /// Return from the cart to the inventory
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn continue_shopping(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::ContinueShopping)?;
        self.cart()?.continue_shopping().await?;
        self.arrive(NavAction::ContinueShopping, next).await
    }

    /// Start checkout. An empty cart is allowed.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn proceed_to_checkout(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::ProceedToCheckout)?;
        self.cart()?.proceed_to_checkout().await?;
        self.arrive(NavAction::ProceedToCheckout, next).await
    }

    /// Fill checkout step one with `form` and click continue.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AssertionFailure`] when the store accepts an incomplete
    /// form or rejects a complete one.
    #[instrument(skip(self, form), fields(session = %self.id))]
    pub async fn submit_checkout_information(
        &mut self,
        form: &CheckoutForm,
    ) -> ProbeResult<ContinueOutcome> {
        let complete = form.are_all_fields_filled();
        let action = NavAction::SubmitInformation { complete };
        let next = self.state.apply(action)?;
        let page = self.checkout_info()?;
        page.dismiss_error().await?;
        page.fill_checkout_information(form).await?;
        page.click_continue().await?;
        let target = self.state.apply(NavAction::SubmitInformation { complete: true })?;
        match (self.await_outcome(target).await?, complete) {
            (None, true) => {
                self.arrive(action, next).await?;
                Ok(ContinueOutcome::Accepted)
            }
            (Some(message), false) => {
                warn!(session = %self.id, message = %message, "checkout information rejected");
                self.state = next;
                Ok(ContinueOutcome::Rejected { message })
            }
            (None, false) => Err(ProbeError::assertion(
                "submit checkout information",
                format!("store accepted an incomplete form: {form:?}"),
            )),
            (Some(message), true) => Err(ProbeError::assertion(
                "submit checkout information",
                format!("store rejected a complete form: {message}"),
            )),
        }
    }

    /// Cancel checkout step one, back to the cart
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn cancel_checkout_information(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::CancelInformation)?;
        self.checkout_info()?.click_cancel().await?;
        self.arrive(NavAction::CancelInformation, next).await
    }

    /// Place the order
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn finish(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::Finish)?;
        self.checkout_overview()?.click_finish().await?;
        self.arrive(NavAction::Finish, next).await
    }

    /// Cancel checkout step two, back to the inventory
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn cancel_overview(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::CancelOverview)?;
        self.checkout_overview()?.click_cancel().await?;
        self.arrive(NavAction::CancelOverview, next).await
    }

    /// Leave the confirmation page
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn back_home(&mut self) -> ProbeResult<NavigationState> {
        let next = self.state.apply(NavAction::BackHome)?;
        self.checkout_complete()?.click_back_home().await?;
        self.arrive(NavAction::BackHome, next).await
    }

    /// Check the current URL against the tracked state.
    ///
    /// # Errors
    ///
    /// [`ProbeError::WrongPage`] when the browser is somewhere else.
    pub async fn verify_location(&self) -> ProbeResult<()> {
        let url = self.driver.current_url().await?;
        if self.state.matches_url(&url) {
            Ok(())
        } else {
            Err(ProbeError::WrongPage {
                expected: self.state.to_string(),
                actual: url,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{checkout_forms, login_messages, products, standard_user};
    use crate::mock::MockStorefront;
    use crate::wait::WaitOptions;

    fn quick_config() -> SessionConfig {
        let quick = WaitOptions::new().with_timeout(200).with_poll_interval(5);
        SessionConfig::default().with_wait(quick).with_load_wait(quick)
    }

    async fn logged_in() -> Session<MockStorefront> {
        let mut session = Session::new(MockStorefront::new(), quick_config());
        session.open().await.unwrap();
        assert_eq!(session.login(&standard_user()).await.unwrap(), LoginOutcome::LoggedIn);
        session
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_login_reaches_products() {
            let session = logged_in().await;
            assert_eq!(session.state(), NavigationState::Products);
            session.verify_location().await.unwrap();
        }

        #[tokio::test]
        async fn test_rejected_login_stays_logged_out() {
            let mut session = Session::new(MockStorefront::new(), quick_config());
            session.open().await.unwrap();
            let outcome = session
                .login(&crate::fixtures::locked_out_user())
                .await
                .unwrap();
            assert_eq!(
                outcome,
                LoginOutcome::Rejected {
                    message: login_messages::LOCKED_OUT_USER.to_string()
                }
            );
            assert_eq!(session.state(), NavigationState::LoggedOut);
        }

        #[tokio::test]
        async fn test_login_twice_is_invalid() {
            let mut session = logged_in().await;
            let err = session.login(&standard_user()).await.unwrap_err();
            assert!(matches!(err, ProbeError::InvalidTransition { .. }));
        }
    }

    mod transition_tests {
        use super::*;

        #[tokio::test]
        async fn test_wrong_page_accessor() {
            let session = logged_in().await;
            let err = session.cart().unwrap_err();
            assert!(matches!(err, ProbeError::WrongPage { .. }));
            assert!(session.products().is_ok());
        }

        #[tokio::test]
        async fn test_invalid_transition_does_not_touch_driver() {
            let mut session = logged_in().await;
            let before = session.driver().call_count();
            let err = session.finish().await.unwrap_err();
            assert_eq!(err.to_string(), "Cannot finish from Products");
            assert_eq!(session.driver().call_count(), before);
        }

        #[tokio::test]
        async fn test_cart_round_trip() {
            let mut session = logged_in().await;
            assert_eq!(session.go_to_cart().await.unwrap(), NavigationState::Cart);
            session.verify_location().await.unwrap();
            assert_eq!(session.continue_shopping().await.unwrap(), NavigationState::Products);
        }

        #[tokio::test]
        async fn test_logout_returns_to_login() {
            let mut session = logged_in().await;
            assert_eq!(session.logout().await.unwrap(), NavigationState::LoggedOut);
            assert!(session.login_page().unwrap().is_login_form_visible().await.unwrap());
        }

        #[tokio::test]
        async fn test_verify_location_detects_drift() {
            let mut session = logged_in().await;
            session.go_to_cart().await.unwrap();
            let url = session.config().url_for("/inventory.html");
            session.driver().navigate(&url).await.unwrap();
            let err = session.verify_location().await.unwrap_err();
            assert!(matches!(err, ProbeError::WrongPage { .. }));
        }
    }

    mod checkout_tests {
        use super::*;

        async fn at_information() -> Session<MockStorefront> {
            let mut session = logged_in().await;
            session
                .products()
                .unwrap()
                .add_product_to_cart(products::BACKPACK)
                .await
                .unwrap();
            session.go_to_cart().await.unwrap();
            session.proceed_to_checkout().await.unwrap();
            session
        }

        #[tokio::test]
        async fn test_incomplete_form_is_rejected_in_place() {
            let mut session = at_information().await;
            let outcome = session
                .submit_checkout_information(&checkout_forms::partial_missing_last())
                .await
                .unwrap();
            assert_eq!(
                outcome,
                ContinueOutcome::Rejected {
                    message: crate::fixtures::checkout_messages::MISSING_LAST_NAME.to_string()
                }
            );
            assert_eq!(session.state(), NavigationState::CheckoutInfo);
        }

        #[tokio::test]
        async fn test_full_checkout() {
            let mut session = at_information().await;
            let outcome = session
                .submit_checkout_information(&checkout_forms::valid())
                .await
                .unwrap();
            assert!(outcome.is_accepted());
            assert_eq!(session.finish().await.unwrap(), NavigationState::CheckoutComplete);
            assert!(session.checkout_complete().unwrap().is_success_page().await.unwrap());
            assert_eq!(session.back_home().await.unwrap(), NavigationState::Products);
        }

        #[tokio::test]
        async fn test_cancel_paths() {
            let mut session = at_information().await;
            assert_eq!(
                session.cancel_checkout_information().await.unwrap(),
                NavigationState::Cart
            );
            session.proceed_to_checkout().await.unwrap();
            session
                .submit_checkout_information(&checkout_forms::valid())
                .await
                .unwrap();
            assert_eq!(session.cancel_overview().await.unwrap(), NavigationState::Products);
        }
    }

    mod stale_banner_tests {
        use super::*;
        use crate::fixtures::{checkout_messages, locked_out_user};
        use async_trait::async_trait;
        use std::sync::Mutex;

        /// Queries a click waits out before it reaches the page
        const CLICK_LAG: u32 = 5;

        /// A storefront whose clicks land a few queries late, like a page that
        /// re-renders on a later event loop turn.
        struct LaggingClicks {
            inner: MockStorefront,
            pending: Mutex<Option<(Selector, u32)>>,
        }

        impl LaggingClicks {
            fn new() -> Self {
                Self {
                    inner: MockStorefront::new(),
                    pending: Mutex::new(None),
                }
            }

            async fn tick(&self) -> ProbeResult<()> {
                let due = {
                    let mut pending = self.pending.lock().unwrap();
                    if let Some((_, left)) = pending.as_mut() {
                        *left -= 1;
                    }
                    if pending.as_ref().is_some_and(|(_, left)| *left == 0) {
                        pending.take().map(|(selector, _)| selector)
                    } else {
                        None
                    }
                };
                if let Some(selector) = due {
                    self.inner.click(&selector).await?;
                }
                Ok(())
            }

            async fn flush(&self) -> ProbeResult<()> {
                let due = self.pending.lock().unwrap().take();
                if let Some((selector, _)) = due {
                    self.inner.click(&selector).await?;
                }
                Ok(())
            }
        }

        #[async_trait]
        impl ElementDriver for LaggingClicks {
            async fn navigate(&self, url: &str) -> ProbeResult<()> {
                self.flush().await?;
                self.inner.navigate(url).await
            }

            async fn current_url(&self) -> ProbeResult<String> {
                self.tick().await?;
                self.inner.current_url().await
            }

            async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
                self.tick().await?;
                self.inner.count(selector).await
            }

            async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
                self.tick().await?;
                self.inner.is_visible(selector).await
            }

            async fn is_enabled(&self, selector: &Selector) -> ProbeResult<bool> {
                self.tick().await?;
                self.inner.is_enabled(selector).await
            }

            async fn text(&self, selector: &Selector) -> ProbeResult<Option<String>> {
                self.tick().await?;
                self.inner.text(selector).await
            }

            async fn all_texts(&self, selector: &Selector) -> ProbeResult<Vec<String>> {
                self.tick().await?;
                self.inner.all_texts(selector).await
            }

            async fn value(&self, selector: &Selector) -> ProbeResult<Option<String>> {
                self.tick().await?;
                self.inner.value(selector).await
            }

            async fn click(&self, selector: &Selector) -> ProbeResult<()> {
                self.flush().await?;
                *self.pending.lock().unwrap() = Some((selector.clone(), CLICK_LAG));
                Ok(())
            }

            async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()> {
                self.flush().await?;
                self.inner.fill(selector, text).await
            }

            async fn select_option(&self, selector: &Selector, value: &str) -> ProbeResult<()> {
                self.flush().await?;
                self.inner.select_option(selector, value).await
            }
        }

        #[tokio::test]
        async fn test_login_after_rejection_ignores_old_banner() {
            let mut session = Session::new(LaggingClicks::new(), quick_config());
            session.open().await.unwrap();
            let refused = session.login(&locked_out_user()).await.unwrap();
            assert_eq!(
                refused,
                LoginOutcome::Rejected {
                    message: login_messages::LOCKED_OUT_USER.to_string()
                }
            );

            let outcome = session.login(&standard_user()).await.unwrap();
            assert_eq!(outcome, LoginOutcome::LoggedIn);
            assert_eq!(session.state(), NavigationState::Products);
        }

        #[tokio::test]
        async fn test_resubmit_reports_the_new_missing_field() {
            let mut session = Session::new(LaggingClicks::new(), quick_config());
            session.open().await.unwrap();
            assert!(session.login(&standard_user()).await.unwrap().is_logged_in());
            session.go_to_cart().await.unwrap();
            session.proceed_to_checkout().await.unwrap();

            let first = session
                .submit_checkout_information(&checkout_forms::partial_missing_first())
                .await
                .unwrap();
            assert_eq!(
                first,
                ContinueOutcome::Rejected {
                    message: checkout_messages::MISSING_FIRST_NAME.to_string()
                }
            );

            let second = session
                .submit_checkout_information(&checkout_forms::partial_missing_last())
                .await
                .unwrap();
            assert_eq!(
                second,
                ContinueOutcome::Rejected {
                    message: checkout_messages::MISSING_LAST_NAME.to_string()
                }
            );
        }
    }
}
