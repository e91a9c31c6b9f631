//! Test data for the storefront: accounts, catalog, sort codes, expected messages
//! and checkout form sets.
//!
//! The built-in set mirrors the public demo store. [`FixtureSet::from_yaml`] loads
//! an override for deployments seeded with different data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::model::{CheckoutForm, Product};
use crate::result::{ProbeError, ProbeResult};

/// Username and password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Password shared by every seeded account
pub const SHARED_PASSWORD: &str = "secret_sauce";

/// Seeded account usernames
pub mod users {
    /// Regular shopper
    pub const STANDARD: &str = "standard_user";
    /// Account the store refuses to log in
    pub const LOCKED_OUT: &str = "locked_out_user";
    /// Account with broken product images
    pub const PROBLEM: &str = "problem_user";
    /// Account with slow responses
    pub const PERFORMANCE_GLITCH: &str = "performance_glitch_user";
    /// Username that does not exist
    pub const INVALID: &str = "invalid_user";
    /// Password that matches no account
    pub const INVALID_PASSWORD: &str = "wrong_password";
}

/// Catalog display names
pub mod products {
    /// Backpack
    pub const BACKPACK: &str = "Sauce Labs Backpack";
    /// Bike light
    pub const BIKE_LIGHT: &str = "Sauce Labs Bike Light";
    /// Bolt T-shirt
    pub const BOLT_T_SHIRT: &str = "Sauce Labs Bolt T-Shirt";
    /// Fleece jacket
    pub const FLEECE_JACKET: &str = "Sauce Labs Fleece Jacket";
    /// Onesie
    pub const ONESIE: &str = "Sauce Labs Onesie";
    /// The one name with punctuation, where the two token schemes diverge
    pub const ALL_THE_THINGS_T_SHIRT: &str = "Test.allTheThings() T-Shirt (Red)";

    /// Every catalog name, alphabetical
    pub const ALL: [&str; 6] = [
        BACKPACK,
        BIKE_LIGHT,
        BOLT_T_SHIRT,
        FLEECE_JACKET,
        ONESIE,
        ALL_THE_THINGS_T_SHIRT,
    ];
}

/// Login error banners
pub mod login_messages {
    /// Locked-out account
    pub const LOCKED_OUT_USER: &str = "Epic sadface: Sorry, this user has been locked out.";
    /// Unknown user or wrong password
    pub const INVALID_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    /// Empty username
    pub const MISSING_USERNAME: &str = "Epic sadface: Username is required";
    /// Empty password
    pub const MISSING_PASSWORD: &str = "Epic sadface: Password is required";
}

/// Checkout information error banners
pub mod checkout_messages {
    /// Empty first name
    pub const MISSING_FIRST_NAME: &str = "Error: First Name is required";
    /// Empty last name
    pub const MISSING_LAST_NAME: &str = "Error: Last Name is required";
    /// Empty postal code
    pub const MISSING_POSTAL_CODE: &str = "Error: Postal Code is required";
}

/// Order confirmation copy
pub mod success_messages {
    /// Confirmation header
    pub const ORDER_COMPLETE_HEADER: &str = "Thank you for your order!";
    /// Confirmation body
    pub const ORDER_COMPLETE_TEXT: &str =
        "Your order has been dispatched, and will arrive just as fast as the pony can get there!";
}

/// Product sort order offered by the inventory page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    /// Name ascending
    #[serde(rename = "az")]
    NameAToZ,
    /// Name descending
    #[serde(rename = "za")]
    NameZToA,
    /// Price ascending
    #[serde(rename = "lohi")]
    PriceLowToHigh,
    /// Price descending
    #[serde(rename = "hilo")]
    PriceHighToLow,
}

impl SortOption {
    /// Every option, in dropdown order
    pub const ALL: [Self; 4] = [
        Self::NameAToZ,
        Self::NameZToA,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
    ];

    /// Value of the `<option>`
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NameAToZ => "az",
            Self::NameZToA => "za",
            Self::PriceLowToHigh => "lohi",
            Self::PriceHighToLow => "hilo",
        }
    }

    /// Visible label of the `<option>`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAToZ => "Name (A to Z)",
            Self::NameZToA => "Name (Z to A)",
            Self::PriceLowToHigh => "Price (low to high)",
            Self::PriceHighToLow => "Price (high to low)",
        }
    }

    /// Parse an `<option>` value
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

/// The store's seeded catalog, alphabetical.
#[must_use]
pub fn catalog() -> Vec<Product> {
    [
        (products::BACKPACK, 2999),
        (products::BIKE_LIGHT, 999),
        (products::BOLT_T_SHIRT, 1599),
        (products::FLEECE_JACKET, 4999),
        (products::ONESIE, 799),
        (products::ALL_THE_THINGS_T_SHIRT, 1599),
    ]
    .into_iter()
    .map(|(name, cents)| Product::new(name, Decimal::new(cents, 2)))
    .collect()
}

/// Named checkout form sets
pub mod checkout_forms {
    use crate::model::CheckoutForm;

    /// Every field filled
    #[must_use]
    pub fn valid() -> CheckoutForm {
        CheckoutForm::new("John", "Doe", "12345")
    }

    /// Every field empty
    #[must_use]
    pub fn invalid() -> CheckoutForm {
        CheckoutForm::default()
    }

    /// First name missing
    #[must_use]
    pub fn partial_missing_first() -> CheckoutForm {
        CheckoutForm::new("", "Doe", "12345")
    }

    /// Last name missing
    #[must_use]
    pub fn partial_missing_last() -> CheckoutForm {
        CheckoutForm::new("John", "", "12345")
    }

    /// Postal code missing
    #[must_use]
    pub fn partial_missing_postal() -> CheckoutForm {
        CheckoutForm::new("John", "Doe", "")
    }
}

/// A complete, loadable set of test data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSet {
    /// Accounts by role (`standard`, `locked_out`, ...)
    pub users: BTreeMap<String, Credentials>,
    /// Catalog
    pub products: Vec<Product>,
    /// Checkout forms by name (`valid`, `invalid`, ...)
    pub checkout_forms: BTreeMap<String, CheckoutForm>,
}

impl Default for FixtureSet {
    fn default() -> Self {
        let users = [
            ("standard", users::STANDARD, SHARED_PASSWORD),
            ("locked_out", users::LOCKED_OUT, SHARED_PASSWORD),
            ("problem", users::PROBLEM, SHARED_PASSWORD),
            ("performance_glitch", users::PERFORMANCE_GLITCH, SHARED_PASSWORD),
            ("invalid", users::INVALID, users::INVALID_PASSWORD),
        ]
        .into_iter()
        .map(|(role, u, p)| (role.to_string(), Credentials::new(u, p)))
        .collect();

        let checkout_forms = [
            ("valid", checkout_forms::valid()),
            ("invalid", checkout_forms::invalid()),
            ("partial_missing_first", checkout_forms::partial_missing_first()),
            ("partial_missing_last", checkout_forms::partial_missing_last()),
            ("partial_missing_postal", checkout_forms::partial_missing_postal()),
        ]
        .into_iter()
        .map(|(name, form)| (name.to_string(), form))
        .collect();

        Self {
            users,
            products: catalog(),
            checkout_forms,
        }
    }
}

impl FixtureSet {
    /// Parse a fixture set from YAML. Missing sections keep the built-in data.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this shape, or
    /// [`ProbeError::Config`] if the catalog repeats a product name.
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let set: Self = serde_yaml_ng::from_str(yaml)?;
        set.validate()?;
        Ok(set)
    }

    /// Check that every catalog name is unique. Products are identified by
    /// name on every page, so two entries with one name cannot be told apart.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] naming the first repeated product.
    pub fn validate(&self) -> ProbeResult<()> {
        let mut seen = BTreeSet::new();
        for product in &self.products {
            if !seen.insert(product.name.as_str()) {
                return Err(ProbeError::Config {
                    message: format!("duplicate product name '{}' in catalog", product.name),
                });
            }
        }
        Ok(())
    }

    /// Load a fixture set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Account for a role
    #[must_use]
    pub fn user(&self, role: &str) -> Option<&Credentials> {
        self.users.get(role)
    }

    /// Checkout form by name
    #[must_use]
    pub fn checkout_form(&self, name: &str) -> Option<&CheckoutForm> {
        self.checkout_forms.get(name)
    }

    /// Catalog entry by display name
    #[must_use]
    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }
}

/// `standard_user` / `secret_sauce`
#[must_use]
pub fn standard_user() -> Credentials {
    Credentials::new(users::STANDARD, SHARED_PASSWORD)
}

/// `locked_out_user` / `secret_sauce`
#[must_use]
pub fn locked_out_user() -> Credentials {
    Credentials::new(users::LOCKED_OUT, SHARED_PASSWORD)
}

/// `invalid_user` / `wrong_password`
#[must_use]
pub fn invalid_user() -> Credentials {
    Credentials::new(users::INVALID, users::INVALID_PASSWORD)
}
