//! Example: end-to-end purchase against the in-memory storefront
//!
//! Demonstrates: session state machine, page objects and scenario reports
//!
//! Run with: `cargo run --example purchase_demo`

use storefront_probe::logging::init_tracing;
use storefront_probe::scenario::{self, PurchasePlan};
use storefront_probe::{to_dot, MockStorefront, ProbeResult, Session, SessionConfig};

#[tokio::main]
async fn main() -> ProbeResult<()> {
    init_tracing("storefront_probe=info");
    println!("=== Storefront Purchase Example ===\n");

    println!("1. Navigation graph...");
    println!("{}", to_dot());

    println!("2. Running the standard purchase...");
    let mut session = Session::new(MockStorefront::new(), SessionConfig::from_env()?);
    let plan = PurchasePlan::standard();
    println!("   Adding: {:?}", plan.add);
    println!("   Removing: {:?}", plan.remove);
    let report = scenario::end_to_end_purchase(&mut session, &plan).await?;

    println!("\n3. Steps...");
    for step in report.step_names() {
        println!("   ✓ {step}");
    }
    println!("   Final state: {}", session.state());

    println!("\n4. Report JSON...");
    println!("{}", report.to_json()?);

    println!("\n5. Checkout validation...");
    let mut session = Session::new(MockStorefront::new(), SessionConfig::from_env()?);
    let report = scenario::checkout_information_validation(&mut session).await?;
    println!("   {} steps passed", report.step_names().len());

    println!("\n=== Example Complete ===");
    Ok(())
}
