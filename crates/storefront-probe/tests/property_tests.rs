//! Property tests over token derivation, cart badge and order totals.

use proptest::prelude::*;
use rust_decimal::Decimal;
use storefront_probe::fixtures::{checkout_forms, products, standard_user};
use storefront_probe::scenario::{self, CartOp};
use storefront_probe::{
    hyphenate, normalize, parse_money, round2, MockStorefront, Session, SessionConfig,
    WaitOptions, STRIPPED_CHARS,
};

fn quick_config() -> SessionConfig {
    let quick = WaitOptions::new().with_timeout(250).with_poll_interval(5);
    SessionConfig::default().with_wait(quick).with_load_wait(quick)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn cart_op() -> impl Strategy<Value = CartOp> {
    (any::<bool>(), 0..products::ALL.len()).prop_map(|(add, i)| {
        let name = products::ALL[i].to_string();
        if add {
            CartOp::Add(name)
        } else {
            CartOp::Remove(name)
        }
    })
}

mod normalize_properties {
    use super::*;

    proptest! {
        #[test]
        fn prop_normalize_idempotent(name in "[ -~\t]{0,40}") {
            let once = normalize(&name);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_token_shape(name in "[ -~\t]{0,40}") {
            let token = normalize(&name);
            prop_assert!(!token.chars().any(|c| c.is_whitespace() || STRIPPED_CHARS.contains(&c)));
            prop_assert!(!token.contains("--"));
            prop_assert!(!token.starts_with('-') && !token.ends_with('-'));
            prop_assert_eq!(token.to_lowercase(), token.clone());
        }

        #[test]
        fn prop_hyphenate_has_no_whitespace(name in "[ -~\t]{0,40}") {
            prop_assert!(!hyphenate(&name).chars().any(char::is_whitespace));
        }
    }
}

mod money_properties {
    use super::*;

    proptest! {
        #[test]
        fn prop_labels_parse_to_their_amount(cents in 0i64..100_000_000) {
            let amount = Decimal::new(cents, 2);
            prop_assert_eq!(parse_money(&format!("Total: ${amount}")).unwrap(), amount);
        }

        #[test]
        fn prop_round2_is_within_half_a_cent(cents in 0i64..10_000_000, extra in 0i64..100) {
            let value = Decimal::new(cents * 100 + extra, 4);
            let rounded = round2(value);
            prop_assert!(rounded.scale() <= 2);
            prop_assert!((rounded - value).abs() <= Decimal::new(5, 3));
        }
    }
}

mod flow_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_badge_matches_cart(ops in prop::collection::vec(cart_op(), 0..12)) {
            let result = runtime().block_on(async {
                let mut session = Session::new(MockStorefront::new(), quick_config());
                scenario::cart_badge_consistency(&mut session, &ops).await
            });
            prop_assert!(result.is_ok(), "{:?}", result.err());
        }

        #[test]
        fn prop_displayed_total_matches_expected(
            picks in prop::sample::subsequence(products::ALL.to_vec(), 1..=products::ALL.len())
        ) {
            let (expected, displayed, subtotal, listed) = runtime().block_on(async {
                let mut session = Session::new(MockStorefront::new(), quick_config());
                session.open().await.unwrap();
                session.login(&standard_user()).await.unwrap();
                {
                    let page = session.products().unwrap();
                    for name in &picks {
                        page.add_product_to_cart(name).await.unwrap();
                    }
                }
                session.go_to_cart().await.unwrap();
                session.proceed_to_checkout().await.unwrap();
                session
                    .submit_checkout_information(&checkout_forms::valid())
                    .await
                    .unwrap();
                let overview = session.checkout_overview().unwrap();
                let summary = overview.summary().await.unwrap();
                (
                    overview.calculate_expected_total().await.unwrap(),
                    overview.get_total_value().await.unwrap(),
                    summary.item_total,
                    summary.lines_subtotal(),
                )
            });
            prop_assert_eq!(expected, displayed);
            prop_assert_eq!(subtotal, listed);
        }
    }
}
