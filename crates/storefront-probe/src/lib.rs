//! storefront-probe: page objects and flow verification for a retail storefront
//!
//! Drives the login → inventory → cart → checkout → confirmation journey of a
//! Swag Labs style storefront through typed page objects, tracks where the
//! session is with an explicit navigation state machine, and checks cart and
//! order-summary invariants in reusable scenarios.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 STOREFRONT-PROBE Architecture                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Scenarios  │    │ Session    │    │ Page objects       │    │
//! │   │ (checks)   │───►│ (state     │───►│ (locators,         │    │
//! │   │            │    │  machine)  │    │  actions, queries) │    │
//! │   └────────────┘    └────────────┘    └─────────┬──────────┘    │
//! │                                                 ▼               │
//! │                          ┌──────────────────────────────────┐   │
//! │                          │ ElementDriver                    │   │
//! │                          │  MockStorefront │ CdpDriver      │   │
//! │                          └──────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use storefront_probe::{scenario, MockStorefront, Session, SessionConfig};
//!
//! # async fn run() -> storefront_probe::ProbeResult<()> {
//! let mut session = Session::new(MockStorefront::new(), SessionConfig::default());
//! let report =
//!     scenario::end_to_end_purchase(&mut session, &scenario::PurchasePlan::standard()).await?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod browser;
mod config;
mod driver;
mod flow;
mod locator;
mod model;
mod normalize;
mod page_object;
mod resolver;
mod result;
mod state;
mod wait;

/// Test data: users, products, messages and checkout forms
pub mod fixtures;

/// Subscriber setup
pub mod logging;

/// In-memory storefront implementing [`ElementDriver`]
pub mod mock;

/// Page objects
pub mod pages;

/// Verification scenarios
pub mod scenario;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::CdpDriver;
pub use config::{SessionConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_POLL_MS, ENV_TIMEOUT_MS};
pub use driver::{find, ElementDriver, ElementRef};
pub use fixtures::{Credentials, FixtureSet, SortOption};
pub use flow::{ContinueOutcome, LoginOutcome, Session};
pub use locator::{Locator, Selector, TEST_ATTRIBUTE};
pub use mock::MockStorefront;
pub use model::{
    expected_total, parse_count, parse_money, round2, CartLine, CartState, CheckoutField,
    CheckoutForm, CompletionSnapshot, OrderSummary, Product, SummaryVisibility,
};
pub use normalize::{hyphenate, normalize, TokenScheme, STRIPPED_CHARS};
pub use page_object::{is_on_page, is_page_loaded, wait_for_page_load, PageContext, PageObject};
pub use resolver::{
    action_control, action_token, item_field, item_name, item_row, CartAction, CART_ROW_CLASS,
    INVENTORY_ROW_CLASS, ITEM_NAME_CLASS,
};
pub use result::{ProbeError, ProbeResult};
pub use state::{to_dot, NavAction, NavigationState};
pub use wait::{
    poll_until, WaitOptions, WaitResult, DEFAULT_LOAD_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
