//! Inventory and cart behaviour against the in-memory storefront.

use rust_decimal::Decimal;
use storefront_probe::fixtures::{self, products, standard_user};
use storefront_probe::scenario::{self, CartOp};
use storefront_probe::{
    MockStorefront, NavigationState, ProbeError, Session, SessionConfig, SortOption, TokenScheme,
    WaitOptions,
};

fn quick_config() -> SessionConfig {
    let quick = WaitOptions::new().with_timeout(250).with_poll_interval(5);
    SessionConfig::default().with_wait(quick).with_load_wait(quick)
}

async fn logged_in(store: MockStorefront) -> Session<MockStorefront> {
    let mut session = Session::new(store, quick_config());
    session.open().await.unwrap();
    assert!(session.login(&standard_user()).await.unwrap().is_logged_in());
    session
}

#[tokio::test]
async fn test_inventory_lists_catalog() {
    let session = logged_in(MockStorefront::new()).await;
    let page = session.products().unwrap();
    assert!(page.is_page_loaded().await.unwrap());
    assert_eq!(page.get_page_title().await.unwrap(), "Products");
    assert_eq!(page.get_cart_item_count().await.unwrap(), 0);

    let listed = page.products().await.unwrap();
    assert_eq!(listed.len(), fixtures::catalog().len());
    assert_eq!(
        page.get_product_price(products::BACKPACK).await.unwrap(),
        Decimal::new(2999, 2)
    );
    assert_eq!(
        page.get_product_price_text(products::ONESIE).await.unwrap(),
        "$7.99"
    );
}

#[tokio::test]
async fn test_sort_options() {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    let report = scenario::sort_products_order(&mut session).await.unwrap();
    assert_eq!(report.steps.len(), 1 + SortOption::ALL.len());
}

#[tokio::test]
async fn test_price_sort_puts_onesie_first() {
    let session = logged_in(MockStorefront::new()).await;
    let page = session.products().unwrap();
    page.sort_products(SortOption::PriceLowToHigh).await.unwrap();
    let names = page.get_all_product_names().await.unwrap();
    assert_eq!(names.first().map(String::as_str), Some(products::ONESIE));
    assert_eq!(names.last().map(String::as_str), Some(products::FLEECE_JACKET));
}

#[tokio::test]
async fn test_badge_tracks_adds_and_removes() {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    let ops = vec![
        CartOp::Add(products::BACKPACK.to_string()),
        CartOp::Add(products::ALL_THE_THINGS_T_SHIRT.to_string()),
        CartOp::Add(products::BACKPACK.to_string()),
        CartOp::Remove(products::BACKPACK.to_string()),
        CartOp::Remove(products::ONESIE.to_string()),
        CartOp::Add(products::FLEECE_JACKET.to_string()),
    ];
    let report = scenario::cart_badge_consistency(&mut session, &ops)
        .await
        .unwrap();
    let skipped = report.steps.iter().filter(|s| s.name == "skip").count();
    assert_eq!(skipped, 2);
    assert_eq!(report.final_state, NavigationState::Cart);
    assert_eq!(
        session.driver().cart_contents(),
        vec![products::ALL_THE_THINGS_T_SHIRT, products::FLEECE_JACKET]
    );
}

#[tokio::test]
async fn test_remove_from_cart_page() {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    let report = scenario::remove_from_cart_consistency(&mut session)
        .await
        .unwrap();
    assert_eq!(report.final_state, NavigationState::Cart);
}

#[tokio::test]
async fn test_cart_queries() {
    let mut session = logged_in(MockStorefront::new()).await;
    {
        let page = session.products().unwrap();
        page.add_product_to_cart(products::BOLT_T_SHIRT).await.unwrap();
        page.add_product_to_cart(products::BIKE_LIGHT).await.unwrap();
        assert!(page.is_product_in_cart(products::BIKE_LIGHT).await.unwrap());
    }
    session.go_to_cart().await.unwrap();
    let cart = session.cart().unwrap();
    assert_eq!(cart.get_page_title().await.unwrap(), "Your Cart");
    assert_eq!(
        cart.get_cart_items().await.unwrap(),
        vec![products::BOLT_T_SHIRT, products::BIKE_LIGHT]
    );
    assert_eq!(cart.get_item_quantity(products::BIKE_LIGHT).await.unwrap(), 1);
    assert_eq!(cart.get_item_price(products::BIKE_LIGHT).await.unwrap(), "$9.99");
    assert_eq!(
        cart.get_all_item_prices().await.unwrap(),
        vec!["$15.99", "$9.99"]
    );
    assert!(cart.is_checkout_button_enabled().await.unwrap());
    assert!(!cart.is_cart_empty().await.unwrap());
    assert_eq!(
        cart.cart_state().await.unwrap().subtotal(),
        Decimal::new(2598, 2)
    );
}

#[tokio::test]
async fn test_cart_remove_uses_normalized_token() {
    let store = MockStorefront::new().with_cart_token_scheme(TokenScheme::Hyphenated);
    let mut session = logged_in(store).await;
    session
        .products()
        .unwrap()
        .add_product_to_cart(products::ALL_THE_THINGS_T_SHIRT)
        .await
        .unwrap();
    session.go_to_cart().await.unwrap();
    let err = session
        .cart()
        .unwrap()
        .remove_item(products::ALL_THE_THINGS_T_SHIRT)
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::ElementNotFound { .. }), "{err}");
}

#[tokio::test]
async fn test_logout_from_inventory() {
    let mut session = logged_in(MockStorefront::new()).await;
    session.logout().await.unwrap();
    assert_eq!(session.state(), NavigationState::LoggedOut);
    session.verify_location().await.unwrap();
    let err = session.products().unwrap_err();
    assert!(matches!(err, ProbeError::WrongPage { .. }));
}
