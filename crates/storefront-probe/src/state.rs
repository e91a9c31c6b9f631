//! Navigation state machine of the purchase flow.
//!
//! ```text
//! LoggedOut        --login (accepted)-->      Products
//! LoggedOut        --login (rejected)-->      LoggedOut
//! Products         --logout-->                LoggedOut
//! Products         --go to cart-->            Cart
//! Cart             --continue shopping-->     Products
//! Cart             --proceed to checkout-->   CheckoutInfo
//! CheckoutInfo     --continue (complete)-->   CheckoutOverview
//! CheckoutInfo     --continue (incomplete)--> CheckoutInfo
//! CheckoutInfo     --cancel-->                Cart
//! CheckoutOverview --finish-->                CheckoutComplete
//! CheckoutOverview --cancel-->                Products
//! CheckoutComplete --back home-->             Products
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::result::{ProbeError, ProbeResult};

/// Page the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationState {
    /// Login page
    LoggedOut,
    /// Inventory
    Products,
    /// Cart
    Cart,
    /// Checkout step one
    CheckoutInfo,
    /// Checkout step two
    CheckoutOverview,
    /// Order confirmation
    CheckoutComplete,
}

/// Action that may move the session between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavAction {
    /// Submit the login form; `accepted` is whether the store let the user in
    Login {
        /// Credentials were accepted
        accepted: bool,
    },
    /// Log out through the side menu
    Logout,
    /// Open the cart from the header
    GoToCart,
    /// Return from the cart to the inventory
    ContinueShopping,
    /// Start checkout from the cart
    ProceedToCheckout,
    /// Continue from checkout step one; `complete` is whether every field was filled
    SubmitInformation {
        /// Form had every field filled
        complete: bool,
    },
    /// Cancel checkout step one
    CancelInformation,
    /// Place the order
    Finish,
    /// Cancel checkout step two
    CancelOverview,
    /// Leave the confirmation page
    BackHome,
}

impl NavigationState {
    /// Every state, in flow order
    pub const ALL: [Self; 6] = [
        Self::LoggedOut,
        Self::Products,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
    ];

    /// State after `action`.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InvalidTransition`] when the action is not available here.
    pub fn apply(self, action: NavAction) -> ProbeResult<Self> {
        use NavAction as A;
        use NavigationState as S;
        let next = match (self, action) {
            (S::LoggedOut, A::Login { accepted: true }) => S::Products,
            (S::LoggedOut, A::Login { accepted: false }) => S::LoggedOut,
            (S::Products, A::Logout) => S::LoggedOut,
            (S::Products, A::GoToCart) => S::Cart,
            (S::Cart, A::ProceedToCheckout) => S::CheckoutInfo,
            (S::Cart, A::ContinueShopping) => S::Products,
            (S::CheckoutInfo, A::SubmitInformation { complete: true }) => S::CheckoutOverview,
            (S::CheckoutInfo, A::SubmitInformation { complete: false }) => S::CheckoutInfo,
            (S::CheckoutInfo, A::CancelInformation) => S::Cart,
            (S::CheckoutOverview, A::Finish) => S::CheckoutComplete,
            (S::CheckoutOverview, A::CancelOverview) => S::Products,
            (S::CheckoutComplete, A::BackHome) => S::Products,
            (from, action) => {
                return Err(ProbeError::InvalidTransition {
                    from: from.to_string(),
                    action: action.to_string(),
                })
            }
        };
        Ok(next)
    }

    /// Whether `action` is available here
    #[must_use]
    pub fn allows(self, action: NavAction) -> bool {
        self.apply(action).is_ok()
    }

    /// Actions that leave this state for a different one
    #[must_use]
    pub fn exits(self) -> Vec<(NavAction, Self)> {
        NavAction::ALL
            .into_iter()
            .filter_map(|a| self.apply(a).ok().map(|s| (a, s)))
            .filter(|(_, s)| *s != self)
            .collect()
    }

    /// Title text the page shows; the login page has none
    #[must_use]
    pub const fn title(self) -> Option<&'static str> {
        match self {
            Self::LoggedOut => None,
            Self::Products => Some("Products"),
            Self::Cart => Some("Your Cart"),
            Self::CheckoutInfo => Some("Checkout: Your Information"),
            Self::CheckoutOverview => Some("Checkout: Overview"),
            Self::CheckoutComplete => Some("Checkout: Complete!"),
        }
    }

    /// Fragment the page URL contains; the login page is the bare origin
    #[must_use]
    pub const fn url_fragment(self) -> Option<&'static str> {
        match self {
            Self::LoggedOut => None,
            Self::Products => Some("inventory"),
            Self::Cart => Some("cart"),
            Self::CheckoutInfo => Some("checkout-step-one"),
            Self::CheckoutOverview => Some("checkout-step-two"),
            Self::CheckoutComplete => Some("checkout-complete"),
        }
    }

    /// Whether `url` belongs to this page
    #[must_use]
    pub fn matches_url(self, url: &str) -> bool {
        url_matches(self.url_fragment(), url)
    }

    /// Whether the flow ends here
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CheckoutComplete)
    }
}

impl NavAction {
    /// Every action
    pub const ALL: [Self; 12] = [
        Self::Login { accepted: true },
        Self::Login { accepted: false },
        Self::Logout,
        Self::GoToCart,
        Self::ContinueShopping,
        Self::ProceedToCheckout,
        Self::SubmitInformation { complete: true },
        Self::SubmitInformation { complete: false },
        Self::CancelInformation,
        Self::Finish,
        Self::CancelOverview,
        Self::BackHome,
    ];
}

/// Whether `url` contains `fragment`. A page without a fragment (login)
/// matches any URL that no other page claims.
pub(crate) fn url_matches(fragment: Option<&str>, url: &str) -> bool {
    match fragment {
        Some(fragment) => url.contains(fragment),
        None => NavigationState::ALL
            .iter()
            .filter_map(|s| s.url_fragment())
            .all(|f| !url.contains(f)),
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoggedOut => "LoggedOut",
            Self::Products => "Products",
            Self::Cart => "Cart",
            Self::CheckoutInfo => "CheckoutInfo",
            Self::CheckoutOverview => "CheckoutOverview",
            Self::CheckoutComplete => "CheckoutComplete",
        };
        f.write_str(name)
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { accepted: true } => f.write_str("login"),
            Self::Login { accepted: false } => f.write_str("login (rejected)"),
            Self::Logout => f.write_str("logout"),
            Self::GoToCart => f.write_str("go to cart"),
            Self::ContinueShopping => f.write_str("continue shopping"),
            Self::ProceedToCheckout => f.write_str("proceed to checkout"),
            Self::SubmitInformation { complete: true } => f.write_str("continue checkout"),
            Self::SubmitInformation { complete: false } => {
                f.write_str("continue checkout (incomplete)")
            }
            Self::CancelInformation | Self::CancelOverview => f.write_str("cancel"),
            Self::Finish => f.write_str("finish"),
            Self::BackHome => f.write_str("back home"),
        }
    }
}

/// Render the machine as a Graphviz digraph.
#[must_use]
pub fn to_dot() -> String {
    let mut dot = String::from("digraph navigation {\n    rankdir=LR;\n");
    for state in NavigationState::ALL {
        for action in NavAction::ALL {
            if let Ok(next) = state.apply(action) {
                dot.push_str(&format!("    {state} -> {next} [label=\"{action}\"];\n"));
            }
        }
    }
    dot.push_str("}\n");
    dot
}
