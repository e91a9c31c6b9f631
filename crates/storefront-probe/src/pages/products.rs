//! Inventory page.
//!
//! Per-product buttons carry [`TokenScheme::Hyphenated`] tokens here.

use rust_decimal::Decimal;

use crate::fixtures::SortOption;
use crate::locator::{Locator, Selector};
use crate::model::{parse_count, parse_money, Product};
use crate::normalize::TokenScheme;
use crate::page_object::{self, PageContext, PageObject};
use crate::resolver::{self, CartAction, INVENTORY_ROW_CLASS, ITEM_NAME_CLASS};
use crate::result::{ProbeError, ProbeResult};
use crate::state::NavigationState;

const SCHEME: TokenScheme = TokenScheme::Hyphenated;

/// Locators of the inventory page
#[derive(Debug, Clone)]
pub struct ProductsLocators {
    /// Page title
    pub title: Locator,
    /// Product list
    pub container: Locator,
    /// Sort dropdown
    pub sort_dropdown: Locator,
    /// Header cart link
    pub cart_link: Locator,
    /// Header cart badge
    pub cart_badge: Locator,
    /// Side menu button
    pub menu_button: Locator,
    /// Side menu logout link
    pub logout_link: Locator,
    /// Every product name label
    pub item_names: Locator,
    /// Every product price label
    pub item_prices: Locator,
    title_landmark: Locator,
    container_landmark: Locator,
}

impl ProductsLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let title_landmark = ctx
            .title_landmark(NavigationState::Products)
            .unwrap_or_else(|| ctx.landmark(Selector::class("title")));
        Self {
            title: ctx.element(Selector::class("title")),
            container: ctx.element(Selector::class("inventory_container")),
            sort_dropdown: ctx.element(Selector::test_id("product_sort_container")),
            cart_link: ctx.element(Selector::class("shopping_cart_link")),
            cart_badge: ctx.element(Selector::class("shopping_cart_badge")),
            menu_button: ctx.element(Selector::id("react-burger-menu-btn")),
            logout_link: ctx.element(Selector::id("logout_sidebar_link")),
            item_names: ctx.element(Selector::class(ITEM_NAME_CLASS)),
            item_prices: ctx.element(Selector::class("inventory_item_price")),
            title_landmark,
            container_landmark: ctx.landmark(Selector::class("inventory_container")),
        }
    }
}

/// The inventory page
#[derive(Debug)]
pub struct ProductsPage<'a> {
    ctx: PageContext<'a>,
    locators: ProductsLocators,
}

impl PageObject for ProductsPage<'_> {
    fn state(&self) -> NavigationState {
        NavigationState::Products
    }

    fn page_name(&self) -> &'static str {
        "products"
    }

    fn readiness(&self) -> Vec<&Locator> {
        vec![&self.locators.title_landmark, &self.locators.container_landmark]
    }

    fn context(&self) -> PageContext<'_> {
        self.ctx
    }
}

impl<'a> ProductsPage<'a> {
    /// Page object over `ctx`
    #[must_use]
    pub fn new(ctx: PageContext<'a>) -> Self {
        let locators = ProductsLocators::new(&ctx);
        Self { ctx, locators }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &ProductsLocators {
        &self.locators
    }

    fn control(&self, action: CartAction, name: &str) -> Locator {
        self.ctx.element(resolver::action_control(action, SCHEME, name))
    }

    /// Wait until the title and the product list are present
    pub async fn wait_for_page_load(&self) -> ProbeResult<()> {
        page_object::wait_for_page_load(self).await
    }

    /// Whether the title and the product list are visible
    pub async fn is_page_loaded(&self) -> ProbeResult<bool> {
        page_object::is_page_loaded(self).await
    }

    /// Click the product's "Add to cart" button
    pub async fn add_product_to_cart(&self, name: &str) -> ProbeResult<()> {
        let locator = self.control(CartAction::AddToCart, name);
        self.ctx.find(&locator).click().await
    }

    /// Click the product's "Remove" button
    pub async fn remove_product_from_cart(&self, name: &str) -> ProbeResult<()> {
        let locator = self.control(CartAction::Remove, name);
        self.ctx.find(&locator).click().await
    }

    /// Choose a sort order
    pub async fn sort_products(&self, option: SortOption) -> ProbeResult<()> {
        self.ctx
            .find(&self.locators.sort_dropdown)
            .select_option(option.code())
            .await
    }

    /// Click the header cart link. Does not wait for the cart page.
    pub async fn go_to_cart(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.cart_link).click().await
    }

    /// Open the side menu and click logout. Does not wait for the login page.
    pub async fn logout(&self) -> ProbeResult<()> {
        self.ctx.find(&self.locators.menu_button).click().await?;
        self.ctx.find(&self.locators.logout_link).click().await
    }

    /// Title text
    pub async fn get_page_title(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.title).text().await
    }

    /// Badge count; 0 when the badge is absent
    pub async fn get_cart_item_count(&self) -> ProbeResult<u32> {
        let badge = self.ctx.find(&self.locators.cart_badge);
        if !badge.is_visible().await? {
            return Ok(0);
        }
        parse_count(&badge.text().await?)
    }

    /// Price label of a product, e.g. `"$29.99"`
    pub async fn get_product_price_text(&self, name: &str) -> ProbeResult<String> {
        let locator = self.ctx.element(resolver::item_field(
            INVENTORY_ROW_CLASS,
            name,
            "inventory_item_price",
        ));
        self.ctx.find(&locator).text().await
    }

    /// Price of a product
    pub async fn get_product_price(&self, name: &str) -> ProbeResult<Decimal> {
        parse_money(&self.get_product_price_text(name).await?)
    }

    /// Whether the product's "Remove" button is showing
    pub async fn is_product_in_cart(&self, name: &str) -> ProbeResult<bool> {
        let locator = self.control(CartAction::Remove, name);
        self.ctx.find(&locator).is_visible().await
    }

    /// Product names, in display order
    pub async fn get_all_product_names(&self) -> ProbeResult<Vec<String>> {
        self.ctx.find(&self.locators.item_names).all_texts().await
    }

    /// Price labels, in display order
    pub async fn get_all_product_prices(&self) -> ProbeResult<Vec<String>> {
        self.ctx.find(&self.locators.item_prices).all_texts().await
    }

    /// Products with parsed prices, in display order
    pub async fn products(&self) -> ProbeResult<Vec<Product>> {
        let names = self.get_all_product_names().await?;
        let prices = self.get_all_product_prices().await?;
        if names.len() != prices.len() {
            return Err(ProbeError::driver(format!(
                "{} names but {} prices on the inventory page",
                names.len(),
                prices.len()
            )));
        }
        names
            .into_iter()
            .zip(prices)
            .map(|(name, price)| parse_money(&price).map(|p| Product::new(name.trim(), p)))
            .collect()
    }

    /// Value of the sort dropdown
    pub async fn get_current_sort_option(&self) -> ProbeResult<String> {
        self.ctx.find(&self.locators.sort_dropdown).value().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::fixtures::{products, standard_user};
    use crate::mock::MockStorefront;
    use crate::pages::LoginPage;
    use crate::wait::WaitOptions;

    fn config() -> SessionConfig {
        let quick = WaitOptions::new().with_timeout(100).with_poll_interval(5);
        SessionConfig::default().with_wait(quick).with_load_wait(quick)
    }

    async fn login(store: &MockStorefront, config: &SessionConfig) {
        let page = LoginPage::new(PageContext::new(store, config));
        page.goto().await.unwrap();
        page.login(&standard_user()).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let store = MockStorefront::new();
        let config = config();
        login(&store, &config).await;
        let page = ProductsPage::new(PageContext::new(&store, &config));
        page.wait_for_page_load().await.unwrap();

        assert_eq!(page.get_cart_item_count().await.unwrap(), 0);
        page.add_product_to_cart(products::BACKPACK).await.unwrap();
        page.add_product_to_cart(products::ALL_THE_THINGS_T_SHIRT).await.unwrap();
        assert_eq!(page.get_cart_item_count().await.unwrap(), 2);
        assert!(page.is_product_in_cart(products::ALL_THE_THINGS_T_SHIRT).await.unwrap());

        page.remove_product_from_cart(products::BACKPACK).await.unwrap();
        assert_eq!(page.get_cart_item_count().await.unwrap(), 1);
        assert!(!page.is_product_in_cart(products::BACKPACK).await.unwrap());
    }

    #[tokio::test]
    async fn test_adding_twice_is_not_found() {
        let store = MockStorefront::new();
        let config = config();
        login(&store, &config).await;
        let page = ProductsPage::new(PageContext::new(&store, &config));
        page.add_product_to_cart(products::ONESIE).await.unwrap();
        let err = page.add_product_to_cart(products::ONESIE).await.unwrap_err();
        assert!(matches!(err, ProbeError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_prices() {
        let store = MockStorefront::new();
        let config = config();
        login(&store, &config).await;
        let page = ProductsPage::new(PageContext::new(&store, &config));
        assert_eq!(
            page.get_product_price_text(products::FLEECE_JACKET).await.unwrap(),
            "$49.99"
        );
        assert_eq!(
            page.get_product_price(products::ONESIE).await.unwrap(),
            Decimal::new(799, 2)
        );
        assert_eq!(page.products().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_sort() {
        let store = MockStorefront::new();
        let config = config();
        login(&store, &config).await;
        let page = ProductsPage::new(PageContext::new(&store, &config));
        assert_eq!(page.get_current_sort_option().await.unwrap(), "az");
        page.sort_products(SortOption::PriceLowToHigh).await.unwrap();
        assert_eq!(page.get_current_sort_option().await.unwrap(), "lohi");
        let names = page.get_all_product_names().await.unwrap();
        assert_eq!(names.first().map(String::as_str), Some(products::ONESIE));
        assert_eq!(names.last().map(String::as_str), Some(products::FLEECE_JACKET));
    }
}
