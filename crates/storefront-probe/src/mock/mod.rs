//! In-memory storefront for tests and offline runs.
//!
//! [`MockStorefront`] renders each route into a [`dom::Node`] tree following
//! the same `data-test` tokens and classes as the live site, so page objects
//! and scenarios run against it unchanged.

pub mod dom;
mod store;

pub use store::{
    MockStorefront, Route, CALL_HISTORY_LIMIT, PAYMENT_INFO, SHIPPING_INFO, TAX_RATE,
};
