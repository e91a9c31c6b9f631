//! In-memory storefront.
//!
//! Holds the application state (session, cart, sort order, forms) and renders
//! the page for the current route into a [`Node`] tree on every query. Clicks
//! are dispatched on the `data-test` token (or id) of the first match, the same
//! way the real pages wire their handlers.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

use super::dom::{select, Node};
use crate::config::DEFAULT_BASE_URL;
use crate::driver::ElementDriver;
use crate::fixtures::{login_messages, success_messages, FixtureSet, SortOption};
use crate::locator::{Selector, TEST_ATTRIBUTE};
use crate::model::{round2, CheckoutField, CheckoutForm, Product};
use crate::normalize::{hyphenate, TokenScheme};
use crate::result::{ProbeError, ProbeResult};

/// Sales tax applied on the overview page
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Payment line on the overview page
pub const PAYMENT_INFO: &str = "SauceCard #31337";

/// Shipping line on the overview page
pub const SHIPPING_INFO: &str = "Free Pony Express Delivery!";

/// Driver calls kept by [`MockStorefront::call_history`]
pub const CALL_HISTORY_LIMIT: usize = 1024;

/// Routes served by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unknown path
    NotFound,
    /// `/`
    Login,
    /// `/inventory.html`
    Inventory,
    /// `/cart.html`
    Cart,
    /// `/checkout-step-one.html`
    CheckoutInfo,
    /// `/checkout-step-two.html`
    CheckoutOverview,
    /// `/checkout-complete.html`
    CheckoutComplete,
}

impl Route {
    /// Path component
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NotFound => "/404.html",
            Self::Login => "/",
            Self::Inventory => "/inventory.html",
            Self::Cart => "/cart.html",
            Self::CheckoutInfo => "/checkout-step-one.html",
            Self::CheckoutOverview => "/checkout-step-two.html",
            Self::CheckoutComplete => "/checkout-complete.html",
        }
    }

    fn from_path(path: &str) -> Self {
        match path {
            "" | "/" => Self::Login,
            "/inventory.html" => Self::Inventory,
            "/cart.html" => Self::Cart,
            "/checkout-step-one.html" => Self::CheckoutInfo,
            "/checkout-step-two.html" => Self::CheckoutOverview,
            "/checkout-complete.html" => Self::CheckoutComplete,
            _ => Self::NotFound,
        }
    }

    const fn requires_login(self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    locked: bool,
}

#[derive(Debug)]
struct StoreState {
    route: Route,
    user: Option<String>,
    username: String,
    password: String,
    login_error: Option<String>,
    cart: Vec<String>,
    sort: SortOption,
    menu_open: bool,
    form: CheckoutForm,
    checkout_error: Option<String>,
    calls: VecDeque<String>,
    call_count: usize,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            route: Route::Login,
            user: None,
            username: String::new(),
            password: String::new(),
            login_error: None,
            cart: Vec::new(),
            sort: SortOption::NameAToZ,
            menu_open: false,
            form: CheckoutForm::default(),
            checkout_error: None,
            calls: VecDeque::new(),
            call_count: 0,
        }
    }
}

impl StoreState {
    /// Log a driver call, dropping the oldest entry once the log is full
    fn record(&mut self, entry: String) {
        if self.calls.len() == CALL_HISTORY_LIMIT {
            self.calls.pop_front();
        }
        self.calls.push_back(entry);
        self.call_count += 1;
    }
}

/// An in-memory storefront implementing [`ElementDriver`].
#[derive(Debug)]
pub struct MockStorefront {
    base_url: String,
    catalog: Vec<Product>,
    accounts: BTreeMap<String, Account>,
    cart_scheme: TokenScheme,
    static_page: Option<Node>,
    state: Mutex<StoreState>,
}

impl Default for MockStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorefront {
    /// Store seeded from the built-in fixtures
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(&FixtureSet::default())
    }

    /// Store seeded from a fixture set. The `locked_out` role is refused at login.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] if the catalog repeats a product name.
    pub fn from_fixtures(fixtures: &FixtureSet) -> ProbeResult<Self> {
        fixtures.validate()?;
        Ok(Self::seeded(fixtures))
    }

    fn seeded(fixtures: &FixtureSet) -> Self {
        let accounts = fixtures
            .users
            .iter()
            .filter(|(role, _)| role.as_str() != "invalid")
            .map(|(role, creds)| {
                (
                    creds.username.clone(),
                    Account {
                        password: creds.password.clone(),
                        locked: role == "locked_out",
                    },
                )
            })
            .collect();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog: fixtures.products.clone(),
            accounts,
            cart_scheme: TokenScheme::Normalized,
            static_page: None,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// A driver serving one fixed document, for element-level tests
    #[must_use]
    pub fn with_page(body: Node) -> Self {
        Self {
            static_page: Some(Node::new("body").child(body)),
            ..Self::new()
        }
    }

    /// Serve under a different origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Token scheme of the cart page's remove buttons
    #[must_use]
    pub const fn with_cart_token_scheme(mut self, scheme: TokenScheme) -> Self {
        self.cart_scheme = scheme;
        self
    }

    /// Current route
    #[must_use]
    pub fn route(&self) -> Route {
        self.lock().route
    }

    /// Product names in the cart, in the order they were added
    #[must_use]
    pub fn cart_contents(&self) -> Vec<String> {
        self.lock().cart.clone()
    }

    /// The most recent driver calls, oldest first, as `"<method> <selector>"`.
    /// At most [`CALL_HISTORY_LIMIT`] entries are kept.
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.lock().calls.iter().cloned().collect()
    }

    /// Number of driver calls since creation or the last [`Self::clear_history`]
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        let mut st = self.lock();
        st.calls.clear();
        st.call_count = 0;
    }

    /// Whether a driver method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock()
            .calls
            .iter()
            .any(|c| c.split(' ').next() == Some(method))
    }

    /// Render the current document
    #[must_use]
    pub fn document(&self) -> Node {
        let st = self.lock();
        self.render(&st)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn url_of(&self, route: Route) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    fn product(&self, name: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.name == name)
    }

    fn cart_products(&self, st: &StoreState) -> Vec<&Product> {
        st.cart.iter().filter_map(|n| self.product(n)).collect()
    }

    // ---------------------------------------------------------------
    // Behaviour
    // ---------------------------------------------------------------

    fn go(st: &mut StoreState, route: Route) {
        st.route = route;
        st.menu_open = false;
    }

    fn activate(&self, st: &mut StoreState, key: &str) {
        if st.route == Route::Login {
            match key {
                "login-button" => self.submit_login(st),
                "error-button" => st.login_error = None,
                _ => {}
            }
            return;
        }
        if st.route.requires_login() && self.activate_header(st, key) {
            return;
        }
        match st.route {
            Route::Inventory => {
                if let Some(token) = key.strip_prefix("add-to-cart-") {
                    let name = self
                        .catalog
                        .iter()
                        .find(|p| hyphenate(&p.name) == token)
                        .map(|p| p.name.clone());
                    if let Some(name) = name {
                        if !st.cart.contains(&name) {
                            st.cart.push(name);
                        }
                    }
                } else if let Some(token) = key.strip_prefix("remove-") {
                    st.cart.retain(|n| hyphenate(n) != token);
                }
            }
            Route::Cart => match key {
                "continue-shopping" => Self::go(st, Route::Inventory),
                "checkout" => {
                    st.form = CheckoutForm::default();
                    st.checkout_error = None;
                    Self::go(st, Route::CheckoutInfo);
                }
                _ => {
                    if let Some(token) = key.strip_prefix("remove-") {
                        let scheme = self.cart_scheme;
                        st.cart.retain(|n| scheme.token(n) != token);
                    }
                }
            },
            Route::CheckoutInfo => match key {
                "continue" => match st.form.first_missing() {
                    Some(field) => st.checkout_error = Some(field.error_message().to_string()),
                    None => {
                        st.checkout_error = None;
                        Self::go(st, Route::CheckoutOverview);
                    }
                },
                "cancel" => Self::go(st, Route::Cart),
                "error-button" => st.checkout_error = None,
                _ => {}
            },
            Route::CheckoutOverview => match key {
                "finish" => {
                    st.cart.clear();
                    Self::go(st, Route::CheckoutComplete);
                }
                "cancel" => Self::go(st, Route::Inventory),
                _ => {}
            },
            Route::CheckoutComplete => {
                if key == "back-to-products" {
                    Self::go(st, Route::Inventory);
                }
            }
            Route::Login | Route::NotFound => {}
        }
    }

    fn activate_header(&self, st: &mut StoreState, key: &str) -> bool {
        match key {
            "react-burger-menu-btn" => st.menu_open = true,
            "react-burger-cross-btn" => st.menu_open = false,
            "inventory_sidebar_link" => Self::go(st, Route::Inventory),
            "reset_sidebar_link" => st.cart.clear(),
            "logout_sidebar_link" => {
                st.user = None;
                st.username.clear();
                st.password.clear();
                st.login_error = None;
                Self::go(st, Route::Login);
            }
            "shopping-cart-link" => Self::go(st, Route::Cart),
            _ => return false,
        }
        true
    }

    fn submit_login(&self, st: &mut StoreState) {
        let error = if st.username.is_empty() {
            Some(login_messages::MISSING_USERNAME)
        } else if st.password.is_empty() {
            Some(login_messages::MISSING_PASSWORD)
        } else {
            match self.accounts.get(&st.username) {
                Some(account) if account.password == st.password => {
                    account.locked.then_some(login_messages::LOCKED_OUT_USER)
                }
                _ => Some(login_messages::INVALID_CREDENTIALS),
            }
        };
        match error {
            Some(message) => st.login_error = Some(message.to_string()),
            None => {
                st.login_error = None;
                st.user = Some(st.username.clone());
                Self::go(st, Route::Inventory);
            }
        }
    }

    fn input_slot<'s>(st: &'s mut StoreState, key: &str) -> Option<&'s mut String> {
        match (st.route, key) {
            (Route::Login, "username") => Some(&mut st.username),
            (Route::Login, "password") => Some(&mut st.password),
            (Route::CheckoutInfo, "firstName") => Some(&mut st.form.first_name),
            (Route::CheckoutInfo, "lastName") => Some(&mut st.form.last_name),
            (Route::CheckoutInfo, "postalCode") => Some(&mut st.form.postal_code),
            _ => None,
        }
    }

    // ---------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------

    fn render(&self, st: &StoreState) -> Node {
        if let Some(page) = &self.static_page {
            return page.clone();
        }
        let body = Node::new("body");
        match st.route {
            Route::NotFound => body.child(Node::new("h1").text("404 Not Found")),
            Route::Login => body.child(Self::render_login(st)),
            route => {
                let (title, content) = match route {
                    Route::Inventory => ("Products", self.render_inventory(st)),
                    Route::Cart => ("Your Cart", self.render_cart(st)),
                    Route::CheckoutInfo => ("Checkout: Your Information", Self::render_info(st)),
                    Route::CheckoutOverview => ("Checkout: Overview", self.render_overview(st)),
                    _ => ("Checkout: Complete!", Self::render_complete()),
                };
                body.child(
                    Node::new("div")
                        .id("page_wrapper")
                        .child(self.render_header(st, title))
                        .child(Node::new("div").id("contents_wrapper").child(content)),
                )
            }
        }
    }

    fn render_login(st: &StoreState) -> Node {
        let mut form = Node::new("form")
            .child(
                Node::new("input")
                    .id("user-name")
                    .test_id("username")
                    .value(st.username.clone()),
            )
            .child(
                Node::new("input")
                    .id("password")
                    .attr("type", "password")
                    .test_id("password")
                    .value(st.password.clone()),
            );
        if let Some(error) = &st.login_error {
            form = form.child(
                Node::new("div").class("error-message-container").child(
                    Node::new("h3")
                        .test_id("error")
                        .text(error.clone())
                        .child(Node::new("button").class("error-button").test_id("error-button")),
                ),
            );
        }
        form = form.child(
            Node::new("input")
                .id("login-button")
                .test_id("login-button")
                .value("Login"),
        );
        Node::new("div")
            .class("login_container")
            .child(Node::new("div").class("login_logo").text("Swag Labs"))
            .child(Node::new("div").class("login_wrapper").child(form))
    }

    fn render_header(&self, st: &StoreState, title: &str) -> Node {
        let open = st.menu_open;
        let menu_link = |id: &str, text: &str| Node::new("a").id(id).text(text).visible_if(open);
        let mut cart_link = Node::new("a")
            .class("shopping_cart_link")
            .test_id("shopping-cart-link");
        if !st.cart.is_empty() {
            cart_link = cart_link.child(
                Node::new("span")
                    .class("shopping_cart_badge")
                    .test_id("shopping-cart-badge")
                    .text(st.cart.len().to_string()),
            );
        }

        let mut secondary = Node::new("div")
            .class("header_secondary_container")
            .child(Node::new("span").class("title").test_id("title").text(title));
        if st.route == Route::Inventory {
            secondary = secondary.child(
                Node::new("select")
                    .class("product_sort_container")
                    .test_id("product_sort_container")
                    .value(st.sort.code())
                    .children(SortOption::ALL.into_iter().map(|o| {
                        Node::new("option").attr("value", o.code()).text(o.label())
                    })),
            );
        }

        Node::new("div")
            .id("header_container")
            .class("header_container")
            .child(
                Node::new("div")
                    .class("primary_header")
                    .child(
                        Node::new("div")
                            .id("menu_button_container")
                            .child(Node::new("button").id("react-burger-menu-btn").text("Open Menu"))
                            .child(
                                Node::new("nav")
                                    .class("bm-item-list")
                                    .visible_if(open)
                                    .child(menu_link("inventory_sidebar_link", "All Items"))
                                    .child(menu_link("logout_sidebar_link", "Logout"))
                                    .child(menu_link("reset_sidebar_link", "Reset App State")),
                            )
                            .child(
                                Node::new("button")
                                    .id("react-burger-cross-btn")
                                    .text("Close Menu")
                                    .visible_if(open),
                            ),
                    )
                    .child(Node::new("div").class("app_logo").text("Swag Labs"))
                    .child(
                        Node::new("div")
                            .id("shopping_cart_container")
                            .class("shopping_cart_container")
                            .child(cart_link),
                    ),
            )
            .child(secondary)
    }

    fn sorted_catalog(&self, sort: SortOption) -> Vec<&Product> {
        let mut items: Vec<&Product> = self.catalog.iter().collect();
        match sort {
            SortOption::NameAToZ => items.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOption::NameZToA => items.sort_by(|a, b| b.name.cmp(&a.name)),
            SortOption::PriceLowToHigh => {
                items.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
            }
            SortOption::PriceHighToLow => {
                items.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name)));
            }
        }
        items
    }

    fn render_inventory(&self, st: &StoreState) -> Node {
        let items = self.sorted_catalog(st.sort).into_iter().map(|p| {
            let token = hyphenate(&p.name);
            let button = if st.cart.contains(&p.name) {
                Node::new("button").test_id(format!("remove-{token}")).text("Remove")
            } else {
                Node::new("button")
                    .test_id(format!("add-to-cart-{token}"))
                    .text("Add to cart")
            };
            Node::new("div")
                .class("inventory_item")
                .test_id("inventory-item")
                .child(
                    Node::new("div").class("inventory_item_description").child(
                        Node::new("div").class("inventory_item_label").child(
                            Node::new("a").child(
                                Node::new("div")
                                    .class("inventory_item_name")
                                    .test_id("inventory-item-name")
                                    .text(p.name.clone()),
                            ),
                        ),
                    ),
                )
                .child(
                    Node::new("div")
                        .class("pricebar")
                        .child(price_node(p.price))
                        .child(button),
                )
        });
        Node::new("div")
            .id("inventory_container")
            .class("inventory_container")
            .child(Node::new("div").class("inventory_list").children(items))
    }

    fn cart_list(&self, st: &StoreState, with_remove: bool) -> Node {
        let scheme = self.cart_scheme;
        let lines = self.cart_products(st).into_iter().map(|p| {
            let mut pricebar = Node::new("div").class("item_pricebar").child(price_node(p.price));
            if with_remove {
                pricebar = pricebar.child(
                    Node::new("button")
                        .test_id(format!("remove-{}", scheme.token(&p.name)))
                        .text("Remove"),
                );
            }
            Node::new("div")
                .class("cart_item")
                .child(Node::new("div").class("cart_quantity").test_id("item-quantity").text("1"))
                .child(
                    Node::new("div")
                        .class("cart_item_label")
                        .child(
                            Node::new("a").child(
                                Node::new("div")
                                    .class("inventory_item_name")
                                    .test_id("inventory-item-name")
                                    .text(p.name.clone()),
                            ),
                        )
                        .child(pricebar),
                )
        });
        Node::new("div")
            .class("cart_list")
            .child(Node::new("div").class("cart_quantity_label").text("QTY"))
            .child(Node::new("div").class("cart_desc_label").text("Description"))
            .children(lines)
    }

    fn render_cart(&self, st: &StoreState) -> Node {
        Node::new("div")
            .id("cart_contents_container")
            .class("cart_contents_container")
            .child(self.cart_list(st, true))
            .child(
                Node::new("div")
                    .class("cart_footer")
                    .child(
                        Node::new("button")
                            .id("continue-shopping")
                            .test_id("continue-shopping")
                            .text("Continue Shopping"),
                    )
                    .child(Node::new("button").id("checkout").test_id("checkout").text("Checkout")),
            )
    }

    fn render_info(st: &StoreState) -> Node {
        let input = |field: CheckoutField| {
            Node::new("input")
                .id(field.test_id())
                .test_id(field.test_id())
                .value(st.form.field(field).to_string())
        };
        let mut info = Node::new("div")
            .class("checkout_info")
            .children(CheckoutField::ALL.into_iter().map(input));
        if let Some(error) = &st.checkout_error {
            info = info.child(
                Node::new("div")
                    .class("error-message-container")
                    .child(
                        Node::new("h3")
                            .test_id("error")
                            .text(error.clone())
                            .child(Node::new("button").class("error-button").test_id("error-button")),
                    ),
            );
        }
        Node::new("div")
            .id("checkout_info_container")
            .class("checkout_info_container")
            .child(
                Node::new("form").child(info).child(
                    Node::new("div")
                        .class("checkout_buttons")
                        .child(Node::new("button").id("cancel").test_id("cancel").text("Cancel"))
                        .child(
                            Node::new("input")
                                .id("continue")
                                .test_id("continue")
                                .value("Continue"),
                        ),
                ),
            )
    }

    fn render_overview(&self, st: &StoreState) -> Node {
        let subtotal: Decimal = self.cart_products(st).iter().map(|p| p.price).sum();
        let tax = round2(subtotal * TAX_RATE);
        let total = round2(subtotal + tax);
        let label = |class: &str, text: String| Node::new("div").class(class).text(text);
        Node::new("div")
            .id("checkout_summary_container")
            .class("checkout_summary_container")
            .child(self.cart_list(st, false))
            .child(
                Node::new("div")
                    .class("summary_info")
                    .child(label("summary_info_label", "Payment Information:".into()))
                    .child(
                        Node::new("div")
                            .class("summary_value_label")
                            .test_id("payment-info-value")
                            .text(PAYMENT_INFO),
                    )
                    .child(label("summary_info_label", "Shipping Information:".into()))
                    .child(
                        Node::new("div")
                            .class("summary_value_label")
                            .test_id("shipping-info-value")
                            .text(SHIPPING_INFO),
                    )
                    .child(label("summary_info_label", "Price Total".into()))
                    .child(label("summary_subtotal_label", format!("Item total: ${subtotal:.2}")))
                    .child(label("summary_tax_label", format!("Tax: ${tax:.2}")))
                    .child(label("summary_total_label", format!("Total: ${total:.2}")))
                    .child(
                        Node::new("div")
                            .class("cart_footer")
                            .child(Node::new("button").id("cancel").test_id("cancel").text("Cancel"))
                            .child(Node::new("button").id("finish").test_id("finish").text("Finish")),
                    ),
            )
    }

    fn render_complete() -> Node {
        Node::new("div")
            .id("checkout_complete_container")
            .class("checkout_complete_container")
            .child(Node::new("img").class("pony_express").test_id("pony_express"))
            .child(
                Node::new("h2")
                    .class("complete-header")
                    .test_id("complete-header")
                    .text(success_messages::ORDER_COMPLETE_HEADER),
            )
            .child(
                Node::new("div")
                    .class("complete-text")
                    .test_id("complete-text")
                    .text(success_messages::ORDER_COMPLETE_TEXT),
            )
            .child(
                Node::new("button")
                    .id("back-to-products")
                    .test_id("back-to-products")
                    .text("Back Home"),
            )
    }

    fn query<T>(&self, method: &str, selector: &Selector, f: impl FnOnce(Vec<&Node>) -> T) -> T {
        let mut st = self.lock();
        st.record(format!("{method} {selector}"));
        let page = self.render(&st);
        drop(st);
        f(select(&page, selector))
    }
}

fn price_node(price: Decimal) -> Node {
    Node::new("div")
        .class("inventory_item_price")
        .test_id("inventory-item-price")
        .text(format!("${price:.2}"))
}

fn no_match(selector: &Selector) -> ProbeError {
    ProbeError::driver(format!("no element matches {selector}"))
}

fn action_key(node: &Node) -> String {
    node.attribute(TEST_ATTRIBUTE)
        .or_else(|| node.id.clone())
        .unwrap_or_default()
}

#[async_trait]
impl ElementDriver for MockStorefront {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let path = url
            .strip_prefix(self.base_url.as_str())
            .ok_or_else(|| ProbeError::driver(format!("net::ERR_NAME_NOT_RESOLVED at {url}")))?;
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut st = self.lock();
        st.record(format!("navigate {url}"));
        let route = Route::from_path(path);
        if route == Route::Login {
            st.user = None;
            st.username.clear();
            st.password.clear();
            st.login_error = None;
        } else if route.requires_login() && st.user.is_none() {
            st.login_error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                route.path()
            ));
            Self::go(&mut st, Route::Login);
            return Ok(());
        }
        Self::go(&mut st, route);
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.url_of(self.route()))
    }

    async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
        Ok(self.query("count", selector, |nodes| nodes.len()))
    }

    async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
        Ok(self.query("is_visible", selector, |nodes| {
            nodes.first().is_some_and(|n| n.visible)
        }))
    }

    async fn is_enabled(&self, selector: &Selector) -> ProbeResult<bool> {
        Ok(self.query("is_enabled", selector, |nodes| {
            nodes.first().is_some_and(|n| n.enabled)
        }))
    }

    async fn text(&self, selector: &Selector) -> ProbeResult<Option<String>> {
        Ok(self.query("text", selector, |nodes| {
            nodes.first().map(|n| n.text_content())
        }))
    }

    async fn all_texts(&self, selector: &Selector) -> ProbeResult<Vec<String>> {
        Ok(self.query("all_texts", selector, |nodes| {
            nodes.into_iter().map(Node::text_content).collect()
        }))
    }

    async fn value(&self, selector: &Selector) -> ProbeResult<Option<String>> {
        Ok(self.query("value", selector, |nodes| {
            nodes.first().and_then(|n| n.value.clone())
        }))
    }

    async fn click(&self, selector: &Selector) -> ProbeResult<()> {
        let mut st = self.lock();
        st.record(format!("click {selector}"));
        let page = self.render(&st);
        let key = select(&page, selector)
            .first()
            .map(|n| action_key(n))
            .ok_or_else(|| no_match(selector))?;
        trace!(key = %key, route = ?st.route, "mock click");
        if self.static_page.is_none() {
            self.activate(&mut st, &key);
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()> {
        let mut st = self.lock();
        st.record(format!("fill {selector}"));
        let page = self.render(&st);
        let key = select(&page, selector)
            .first()
            .map(|n| action_key(n))
            .ok_or_else(|| no_match(selector))?;
        let slot = Self::input_slot(&mut st, &key)
            .ok_or_else(|| ProbeError::driver(format!("{selector} is not an editable input")))?;
        *slot = text.to_string();
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> ProbeResult<()> {
        let mut st = self.lock();
        st.record(format!("select_option {selector}"));
        let page = self.render(&st);
        let key = select(&page, selector)
            .first()
            .map(|n| action_key(n))
            .ok_or_else(|| no_match(selector))?;
        if key != "product_sort_container" {
            return Err(ProbeError::driver(format!("{selector} is not a <select>")));
        }
        st.sort = SortOption::from_code(value)
            .ok_or_else(|| ProbeError::driver(format!("no option with value {value:?}")))?;
        Ok(())
    }
}
