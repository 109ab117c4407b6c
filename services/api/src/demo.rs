use crate::infra::{InMemoryNotifier, InMemoryRecordStore};
use clap::Args;
use farmrent::error::AppError;
use farmrent::workflows::marketplace::{
    InterestSubmission, LandlordSubmission, MarketplaceService,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// County for the demo submissions
    #[arg(long, default_value = "Meru")]
    pub(crate) county: String,
    /// Price per acre the demo farmer offers
    #[arg(long, default_value_t = 60.0)]
    pub(crate) offered_price: f64,
}

/// Seed a few landlord posts, submit one farmer interest, and show which
/// landlords would have been emailed.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryRecordStore::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = MarketplaceService::new(
        store,
        notifier.clone(),
        "FarmRent <noreply@farmrent.ai>",
    );

    println!("FarmRent matching demo - county {}", args.county);

    let asking_prices = [45.0, 55.0, 80.0];
    for (n, asking_price) in asking_prices.into_iter().enumerate() {
        let stored = service
            .post_land(LandlordSubmission {
                county: args.county.clone(),
                asking_price,
                email: format!("landlord{n}@example.com"),
                spi: None,
                acres: Some(10.0 + n as f64 * 5.0),
            })
            .await?;
        println!(
            "  landlord post {} - asking ${asking_price}/acre ({})",
            stored.id, stored.record.email
        );
    }

    let outcome = service
        .submit_interest(InterestSubmission {
            county: args.county.clone(),
            offered_price: args.offered_price,
            email: "farmer@example.com".to_string(),
        })
        .await?;

    println!(
        "\nFarmer offered ${}/acre - {} matching landlord(s)",
        args.offered_price, outcome.matches
    );
    for message in notifier.sent() {
        println!("  notified {} - {}", message.to, message.subject);
    }

    Ok(())
}
