//! Checkout journey against the in-memory storefront.

use rust_decimal::Decimal;
use storefront_probe::fixtures::{checkout_forms, products, standard_user, success_messages};
use storefront_probe::mock::{PAYMENT_INFO, SHIPPING_INFO};
use storefront_probe::scenario::{self, PurchasePlan};
use storefront_probe::{
    ContinueOutcome, MockStorefront, NavigationState, ProbeError, Session, SessionConfig,
    WaitOptions,
};

fn quick_config() -> SessionConfig {
    let quick = WaitOptions::new().with_timeout(250).with_poll_interval(5);
    SessionConfig::default().with_wait(quick).with_load_wait(quick)
}

async fn at_information(add: &[&str]) -> Session<MockStorefront> {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    session.open().await.unwrap();
    assert!(session.login(&standard_user()).await.unwrap().is_logged_in());
    {
        let page = session.products().unwrap();
        for name in add {
            page.add_product_to_cart(name).await.unwrap();
        }
    }
    session.go_to_cart().await.unwrap();
    session.proceed_to_checkout().await.unwrap();
    session
}

#[tokio::test]
async fn test_end_to_end_purchase() {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    let report = scenario::end_to_end_purchase(&mut session, &PurchasePlan::standard())
        .await
        .unwrap();
    assert_eq!(report.final_state, NavigationState::CheckoutComplete);
    assert_eq!(
        report.step_names(),
        vec![
            "login",
            "add to cart",
            "remove from inventory",
            "review cart",
            "checkout information",
            "order summary",
            "confirmation",
        ]
    );
    assert!(report.to_json().unwrap().contains("end_to_end_purchase"));
    assert!(session.driver().cart_contents().is_empty());
}

#[tokio::test]
async fn test_checkout_information_validation() {
    let mut session = Session::new(MockStorefront::new(), quick_config());
    let report = scenario::checkout_information_validation(&mut session)
        .await
        .unwrap();
    assert_eq!(report.final_state, NavigationState::CheckoutOverview);
}

#[tokio::test]
async fn test_information_form_queries() {
    let session = at_information(&[products::BACKPACK]).await;
    let page = session.checkout_info().unwrap();
    assert_eq!(
        page.get_page_title().await.unwrap(),
        "Checkout: Your Information"
    );
    assert!(page.are_all_fields_empty().await.unwrap());
    assert!(page.is_cancel_button_visible().await.unwrap());

    page.fill_checkout_information(&checkout_forms::valid())
        .await
        .unwrap();
    assert!(page.are_all_fields_filled().await.unwrap());
    assert_eq!(page.form_values().await.unwrap(), checkout_forms::valid());

    page.fill_postal_code("").await.unwrap();
    page.click_continue().await.unwrap();
    assert!(page.is_error_message_visible().await.unwrap());
    assert_eq!(
        page.get_error_message().await.unwrap(),
        "Error: Postal Code is required"
    );
    page.dismiss_error().await.unwrap();
    assert!(!page.is_error_message_visible().await.unwrap());

    page.clear_form().await.unwrap();
    assert!(page.are_all_fields_empty().await.unwrap());
}

#[tokio::test]
async fn test_overview_amounts() {
    let mut session = at_information(&[products::BACKPACK, products::BOLT_T_SHIRT]).await;
    let outcome = session
        .submit_checkout_information(&checkout_forms::valid())
        .await
        .unwrap();
    assert_eq!(outcome, ContinueOutcome::Accepted);

    let overview = session.checkout_overview().unwrap();
    assert_eq!(overview.get_page_title().await.unwrap(), "Checkout: Overview");
    assert_eq!(overview.get_cart_item_count().await.unwrap(), 2);
    assert!(overview.is_item_in_summary(products::BACKPACK).await.unwrap());
    assert_eq!(overview.get_item_quantity(products::BOLT_T_SHIRT).await.unwrap(), 1);
    assert_eq!(overview.get_item_price(products::BACKPACK).await.unwrap(), "$29.99");
    assert_eq!(overview.get_payment_information().await.unwrap(), PAYMENT_INFO);
    assert_eq!(overview.get_shipping_information().await.unwrap(), SHIPPING_INFO);

    assert_eq!(overview.get_item_total().await.unwrap(), "Item total: $45.98");
    assert_eq!(overview.get_tax_value().await.unwrap(), Decimal::new(368, 2));
    assert_eq!(overview.get_total_value().await.unwrap(), Decimal::new(4966, 2));
    assert_eq!(
        overview.calculate_expected_total().await.unwrap(),
        overview.get_total_value().await.unwrap()
    );

    let summary = overview.summary().await.unwrap();
    assert!(summary.is_total_consistent());
    assert_eq!(summary.lines_subtotal(), summary.item_total);
    assert!(overview.is_summary_complete().await.unwrap());
    assert!(overview.is_finish_button_enabled().await.unwrap());
}

#[tokio::test]
async fn test_empty_cart_checkout() {
    let mut session = at_information(&[]).await;
    session
        .submit_checkout_information(&checkout_forms::valid())
        .await
        .unwrap();
    let overview = session.checkout_overview().unwrap();
    assert_eq!(overview.get_cart_item_count().await.unwrap(), 0);
    assert_eq!(overview.get_total_amount().await.unwrap(), "Total: $0.00");
    assert!(!overview.is_summary_complete().await.unwrap());
}

#[tokio::test]
async fn test_confirmation_page() {
    let mut session = at_information(&[products::ONESIE]).await;
    session
        .submit_checkout_information(&checkout_forms::valid())
        .await
        .unwrap();
    session.finish().await.unwrap();
    {
        let page = session.checkout_complete().unwrap();
        assert!(page.is_page_loaded().await.unwrap());
        assert_eq!(page.get_page_title().await.unwrap(), "Checkout: Complete!");
        assert_eq!(
            page.get_complete_header().await.unwrap(),
            success_messages::ORDER_COMPLETE_HEADER
        );
        assert_eq!(
            page.get_complete_text().await.unwrap(),
            success_messages::ORDER_COMPLETE_TEXT
        );
        assert!(page.is_complete_image_visible().await.unwrap());
        assert!(page.is_back_home_button_visible().await.unwrap());
        assert!(page.is_back_home_button_enabled().await.unwrap());
        assert!(page.is_order_completed().await.unwrap());
        assert!(page
            .get_complete_page_url()
            .await
            .unwrap()
            .ends_with("/checkout-complete.html"));
    }
    session.back_home().await.unwrap();
    assert_eq!(
        session.products().unwrap().get_cart_item_count().await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_finish_is_not_available_before_overview() {
    let mut session = at_information(&[products::BACKPACK]).await;
    let err = session.finish().await.unwrap_err();
    assert!(matches!(err, ProbeError::InvalidTransition { .. }));
    assert_eq!(session.state(), NavigationState::CheckoutInfo);
}
