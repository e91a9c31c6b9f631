//! Page objects, one per storefront page.

mod cart;
mod cart_list;
mod checkout_complete;
mod checkout_info;
mod checkout_overview;
mod login;
mod products;

pub use cart::{CartLocators, CartPage};
pub use cart_list::CartListLocators;
pub use checkout_complete::{CheckoutCompleteLocators, CheckoutCompletePage};
pub use checkout_info::{CheckoutInfoLocators, CheckoutInfoPage};
pub use checkout_overview::{CheckoutOverviewLocators, CheckoutOverviewPage};
pub use login::{LoginLocators, LoginPage};
pub use products::{ProductsLocators, ProductsPage};
