//! Verification scenarios.
//!
//! Each scenario drives a fresh [`Session`] through one user journey and checks
//! the storefront's behaviour along the way. Page objects never assert; every
//! check lives here and fails with [`ProbeError::AssertionFailure`] naming the
//! step. A passing run returns a [`ScenarioReport`] of the steps taken.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Debug;
use tracing::info;
use uuid::Uuid;

use crate::driver::ElementDriver;
use crate::fixtures::{
    checkout_forms, invalid_user, locked_out_user, login_messages, products, standard_user,
    Credentials, SortOption,
};
use crate::flow::{ContinueOutcome, LoginOutcome, Session};
use crate::model::{CheckoutField, CheckoutForm};
use crate::result::{ProbeError, ProbeResult};
use crate::state::NavigationState;

/// One completed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Step name
    pub name: String,
    /// What was observed
    pub detail: String,
}

/// Outcome of a passing scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Session the scenario ran in
    pub session: Uuid,
    /// Steps, in order
    pub steps: Vec<StepRecord>,
    /// Page the session ended on
    pub final_state: NavigationState,
}

impl ScenarioReport {
    fn new(name: &str, session: Uuid) -> Self {
        Self {
            name: name.to_string(),
            session,
            steps: Vec::new(),
            final_state: NavigationState::LoggedOut,
        }
    }

    fn step(&mut self, name: impl Into<String>, detail: impl Into<String>) {
        let record = StepRecord {
            name: name.into(),
            detail: detail.into(),
        };
        info!(scenario = %self.name, step = %record.name, detail = %record.detail, "step passed");
        self.steps.push(record);
    }

    fn finish<D: ElementDriver>(mut self, session: &Session<D>) -> Self {
        self.final_state = session.state();
        self
    }

    /// Names of the steps taken
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Report as pretty JSON
    pub fn to_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fail `step` with `message` unless `condition` holds
///
/// # Errors
///
/// [`ProbeError::AssertionFailure`] when `condition` is false.
pub fn ensure(condition: bool, step: &str, message: impl FnOnce() -> String) -> ProbeResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ProbeError::assertion(step, message()))
    }
}

/// Fail `step` unless `actual == expected`
///
/// # Errors
///
/// [`ProbeError::AssertionFailure`] showing both values.
pub fn ensure_eq<T: PartialEq + Debug>(step: &str, actual: &T, expected: &T) -> ProbeResult<()> {
    ensure(actual == expected, step, || {
        format!("expected {expected:?}, got {actual:?}")
    })
}

fn sorted(names: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort();
    names
}

/// Open the store and log in, requiring success
async fn sign_in<D: ElementDriver>(
    session: &mut Session<D>,
    credentials: &Credentials,
    report: &mut ScenarioReport,
) -> ProbeResult<()> {
    session.open().await?;
    let outcome = session.login(credentials).await?;
    ensure_eq("login", &outcome, &LoginOutcome::LoggedIn)?;
    report.step("login", format!("{} reached the inventory", credentials.username));
    Ok(())
}

/// Inputs of [`end_to_end_purchase`]
#[derive(Debug, Clone)]
pub struct PurchasePlan {
    /// Who buys
    pub credentials: Credentials,
    /// Products added from the inventory, in order
    pub add: Vec<String>,
    /// Products removed again from the inventory
    pub remove: Vec<String>,
    /// Checkout information
    pub form: CheckoutForm,
}

impl PurchasePlan {
    /// Standard user buys the backpack and bolt T-shirt after changing their
    /// mind about the bike light
    #[must_use]
    pub fn standard() -> Self {
        Self {
            credentials: standard_user(),
            add: vec![
                products::BACKPACK.to_string(),
                products::BIKE_LIGHT.to_string(),
                products::BOLT_T_SHIRT.to_string(),
            ],
            remove: vec![products::BIKE_LIGHT.to_string()],
            form: checkout_forms::valid(),
        }
    }

    /// Products expected to reach the order, in add order
    #[must_use]
    pub fn kept(&self) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        for name in &self.add {
            if !kept.contains(name) {
                kept.push(name.clone());
            }
        }
        kept.retain(|n| !self.remove.contains(n));
        kept
    }
}

/// Log in, fill the cart, check out and confirm the order.
///
/// # Errors
///
/// [`ProbeError::AssertionFailure`] naming the first check that failed, or the
/// driver/wait error that stopped the run.
pub async fn end_to_end_purchase<D: ElementDriver>(
    session: &mut Session<D>,
    plan: &PurchasePlan,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("end_to_end_purchase", session.id());
    sign_in(session, &plan.credentials, &mut report).await?;

    {
        let page = session.products()?;
        let mut in_cart = BTreeSet::new();
        for name in &plan.add {
            page.add_product_to_cart(name).await?;
            in_cart.insert(name.clone());
            ensure_eq(
                "add to cart",
                &(page.get_cart_item_count().await? as usize),
                &in_cart.len(),
            )?;
        }
        report.step("add to cart", format!("badge shows {}", in_cart.len()));

        for name in &plan.remove {
            page.remove_product_from_cart(name).await?;
            in_cart.remove(name);
            ensure_eq(
                "remove from inventory",
                &(page.get_cart_item_count().await? as usize),
                &in_cart.len(),
            )?;
            ensure(!page.is_product_in_cart(name).await?, "remove from inventory", || {
                format!("{name} still shows a remove button")
            })?;
        }
        report.step("remove from inventory", format!("badge shows {}", in_cart.len()));
    }

    let kept = plan.kept();
    session.go_to_cart().await?;
    {
        let cart = session.cart()?;
        let state = cart.cart_state().await?;
        ensure_eq(
            "review cart",
            &sorted(state.names()),
            &sorted(kept.iter().cloned()),
        )?;
        report.step("review cart", format!("{} lines", state.len()));
    }

    session.proceed_to_checkout().await?;
    let outcome = session.submit_checkout_information(&plan.form).await?;
    ensure_eq("checkout information", &outcome, &ContinueOutcome::Accepted)?;
    report.step("checkout information", "form accepted");

    {
        let overview = session.checkout_overview()?;
        let summary = overview.summary().await?;
        ensure_eq(
            "order summary",
            &sorted(summary.names()),
            &sorted(kept.iter().cloned()),
        )?;
        ensure_eq("order summary", &summary.lines_subtotal(), &summary.item_total)?;
        ensure(summary.is_total_consistent(), "order summary", || {
            format!(
                "total {} != round2({} + {})",
                summary.total, summary.item_total, summary.tax
            )
        })?;
        ensure(overview.is_summary_complete().await?, "order summary", || {
            "summary is missing a line or label".to_string()
        })?;
        report.step("order summary", format!("total ${:.2}", summary.total));
    }

    session.finish().await?;
    {
        let complete = session.checkout_complete()?;
        let snapshot = complete.snapshot().await?;
        ensure(snapshot.header.contains("Thank you"), "confirmation", || {
            format!("unexpected header {:?}", snapshot.header)
        })?;
        ensure(snapshot.is_success_page(), "confirmation", || {
            format!("unexpected url {}", snapshot.url)
        })?;
        ensure(snapshot.is_order_completed(), "confirmation", || {
            "no confirmation signal".to_string()
        })?;
        report.step("confirmation", snapshot.header.clone());
    }

    Ok(report.finish(session))
}

async fn rejected_login<D: ElementDriver>(
    session: &mut Session<D>,
    step: &str,
    credentials: &Credentials,
    expected: &str,
    report: &mut ScenarioReport,
) -> ProbeResult<()> {
    let outcome = session.login(credentials).await?;
    ensure_eq(
        step,
        &outcome,
        &LoginOutcome::Rejected {
            message: expected.to_string(),
        },
    )?;
    ensure_eq(step, &session.state(), &NavigationState::LoggedOut)?;
    let page = session.login_page()?;
    ensure(page.is_login_form_visible().await?, step, || {
        "login form disappeared".to_string()
    })?;
    report.step(step, expected);
    Ok(())
}

/// A locked-out account is refused with the lockout message
pub async fn locked_out_login<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("locked_out_login", session.id());
    session.open().await?;
    rejected_login(
        session,
        "locked out",
        &locked_out_user(),
        login_messages::LOCKED_OUT_USER,
        &mut report,
    )
    .await?;
    Ok(report.finish(session))
}

/// Unknown credentials are refused with the mismatch message
pub async fn invalid_credentials_login<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("invalid_credentials_login", session.id());
    session.open().await?;
    rejected_login(
        session,
        "invalid credentials",
        &invalid_user(),
        login_messages::INVALID_CREDENTIALS,
        &mut report,
    )
    .await?;
    Ok(report.finish(session))
}

/// Empty username, then empty password, each refused with its own message
pub async fn missing_credential_login<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("missing_credential_login", session.id());
    let user = standard_user();
    session.open().await?;
    rejected_login(
        session,
        "missing username",
        &Credentials::new("", user.password.clone()),
        login_messages::MISSING_USERNAME,
        &mut report,
    )
    .await?;
    session.open().await?;
    rejected_login(
        session,
        "missing password",
        &Credentials::new(user.username.clone(), ""),
        login_messages::MISSING_PASSWORD,
        &mut report,
    )
    .await?;
    Ok(report.finish(session))
}

/// Each incomplete form is refused naming its first missing field, then the
/// valid form goes through.
pub async fn checkout_information_validation<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("checkout_information_validation", session.id());
    sign_in(session, &standard_user(), &mut report).await?;
    session.products()?.add_product_to_cart(products::BACKPACK).await?;
    session.go_to_cart().await?;
    session.proceed_to_checkout().await?;
    report.step("reach checkout", "information form open");

    let cases = [
        ("all fields empty", checkout_forms::invalid()),
        ("missing first name", checkout_forms::partial_missing_first()),
        ("missing last name", checkout_forms::partial_missing_last()),
        ("missing postal code", checkout_forms::partial_missing_postal()),
    ];
    for (step, form) in &cases {
        let missing = form.first_missing().unwrap_or(CheckoutField::FirstName);
        ensure(
            session.checkout_info()?.is_continue_button_enabled().await?,
            step,
            || "continue button disabled".to_string(),
        )?;
        let outcome = session.submit_checkout_information(form).await?;
        ensure_eq(
            step,
            &outcome,
            &ContinueOutcome::Rejected {
                message: missing.error_message().to_string(),
            },
        )?;
        report.step(*step, missing.error_message());
    }

    let outcome = session
        .submit_checkout_information(&checkout_forms::valid())
        .await?;
    ensure_eq("valid form", &outcome, &ContinueOutcome::Accepted)?;
    report.step("valid form", "overview reached");
    Ok(report.finish(session))
}

/// One inventory action of [`cart_badge_consistency`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CartOp {
    /// Click "Add to cart"
    Add(String),
    /// Click "Remove"
    Remove(String),
}

/// After every add or remove the badge equals the number of products in the
/// cart, and the cart page lists exactly those products.
///
/// Operations that would not change the cart (adding a product already in
/// it, removing one that is not) are recorded as skipped; the inventory
/// offers no button for them.
pub async fn cart_badge_consistency<D: ElementDriver>(
    session: &mut Session<D>,
    ops: &[CartOp],
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("cart_badge_consistency", session.id());
    sign_in(session, &standard_user(), &mut report).await?;
    let mut model: BTreeSet<String> = BTreeSet::new();
    {
        let page = session.products()?;
        for op in ops {
            let (step, name) = match op {
                CartOp::Add(name) if model.contains(name) => {
                    report.step("skip", format!("{name} already in cart"));
                    continue;
                }
                CartOp::Remove(name) if !model.contains(name) => {
                    report.step("skip", format!("{name} not in cart"));
                    continue;
                }
                CartOp::Add(name) => {
                    page.add_product_to_cart(name).await?;
                    model.insert(name.clone());
                    ("add", name)
                }
                CartOp::Remove(name) => {
                    page.remove_product_from_cart(name).await?;
                    model.remove(name);
                    ("remove", name)
                }
            };
            let badge = page.get_cart_item_count().await? as usize;
            ensure_eq(step, &badge, &model.len())?;
            ensure_eq(step, &page.is_product_in_cart(name).await?, &model.contains(name))?;
            report.step(step, format!("{name}: badge {badge}"));
        }
    }
    session.go_to_cart().await?;
    let names = session.cart()?.get_cart_items().await?;
    ensure_eq("cart contents", &sorted(names), &sorted(model.iter().cloned()))?;
    report.step("cart contents", format!("{} lines", model.len()));
    Ok(report.finish(session))
}

/// Removing a line on the cart page drops it from every cart query at once.
pub async fn remove_from_cart_consistency<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("remove_from_cart_consistency", session.id());
    sign_in(session, &standard_user(), &mut report).await?;
    {
        let page = session.products()?;
        page.add_product_to_cart(products::BACKPACK).await?;
        page.add_product_to_cart(products::ALL_THE_THINGS_T_SHIRT).await?;
    }
    session.go_to_cart().await?;
    let cart = session.cart()?;
    ensure_eq("fill cart", &cart.get_cart_item_count().await?, &2)?;
    report.step("fill cart", "2 lines");

    cart.remove_item(products::ALL_THE_THINGS_T_SHIRT).await?;
    let step = "remove line";
    let items = cart.get_cart_items().await?;
    ensure(!items.iter().any(|n| n == products::ALL_THE_THINGS_T_SHIRT), step, || {
        format!("removed product still listed: {items:?}")
    })?;
    ensure(
        !cart.is_item_in_cart(products::ALL_THE_THINGS_T_SHIRT).await?,
        step,
        || "removed product still has a row".to_string(),
    )?;
    ensure_eq(step, &cart.get_cart_item_count().await?, &1)?;
    ensure_eq(step, &cart.cart_state().await?.names(), &vec![products::BACKPACK])?;
    report.step(step, products::ALL_THE_THINGS_T_SHIRT);
    Ok(report.finish(session))
}

/// Every sort option orders the inventory as its label says.
pub async fn sort_products_order<D: ElementDriver>(
    session: &mut Session<D>,
) -> ProbeResult<ScenarioReport> {
    let mut report = ScenarioReport::new("sort_products_order", session.id());
    sign_in(session, &standard_user(), &mut report).await?;
    let page = session.products()?;
    for option in SortOption::ALL {
        page.sort_products(option).await?;
        let step = option.label();
        ensure_eq(step, &page.get_current_sort_option().await?, &option.code().to_string())?;
        let listed = page.products().await?;
        let ordered = listed.windows(2).all(|w| match option {
            SortOption::NameAToZ => w[0].name <= w[1].name,
            SortOption::NameZToA => w[0].name >= w[1].name,
            SortOption::PriceLowToHigh => w[0].price <= w[1].price,
            SortOption::PriceHighToLow => w[0].price >= w[1].price,
        });
        ensure(ordered, step, || {
            let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
            format!("inventory out of order: {names:?}")
        })?;
        report.step(step, format!("{} products", listed.len()));
    }
    Ok(report.finish(session))
}
