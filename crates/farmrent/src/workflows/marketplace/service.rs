use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use super::domain::{
    FarmerInterest, InterestSubmission, LandlordPost, LandlordSubmission, SignupRequest, Stored,
    ValidationError,
};
use super::matcher::MatchQuery;
use super::notifier::{match_notification, DeliveryError, Notifier};
use super::store::{RecordStore, StoreError};

/// Service orchestrating the public marketplace submissions: landlord posts,
/// farmer interest (with match-and-notify fan-out), and newsletter signups.
pub struct MarketplaceService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    mail_from: String,
}

/// Result of a farmer interest submission. `matches` counts the qualifying
/// landlords found at match time, not the notifications that were delivered.
#[derive(Debug, Clone)]
pub struct InterestOutcome {
    pub interest: Stored<FarmerInterest>,
    pub matches: usize,
}

/// Result of a newsletter signup; duplicates are success-equivalent.
#[derive(Debug, Clone, Copy)]
pub struct SignupOutcome {
    pub already_subscribed: bool,
}

impl<S, N> MarketplaceService<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, mail_from: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            mail_from: mail_from.into(),
        }
    }

    /// Run the interest submission workflow end to end: validate, persist,
    /// match, notify every matched landlord concurrently, and respond once
    /// all attempts have settled.
    ///
    /// The persisted interest is not rolled back when the match query fails;
    /// a saved interest with no computed matches is an accepted trade-off.
    /// Returning before every send has settled is the rejected historical
    /// variant of this workflow; the join below is load-bearing.
    pub async fn submit_interest(
        &self,
        submission: InterestSubmission,
    ) -> Result<InterestOutcome, MarketplaceError> {
        let interest = submission.validate()?;
        let stored = self.store.insert_farmer(interest).await?;

        let query = MatchQuery::for_interest(&stored.record);
        let matched = self.store.find_landlords(&query).await?;

        let attempts = matched
            .iter()
            .map(|landlord| self.notify_match(&stored.record, landlord));
        let settled = join_all(attempts).await;
        let delivered = settled.iter().filter(|outcome| outcome.is_ok()).count();

        info!(
            county = %stored.record.county,
            matches = matched.len(),
            delivered,
            "farmer interest processed"
        );

        Ok(InterestOutcome {
            interest: stored,
            matches: matched.len(),
        })
    }

    async fn notify_match(
        &self,
        farmer: &FarmerInterest,
        landlord: &Stored<LandlordPost>,
    ) -> Result<(), DeliveryError> {
        let message = match_notification(&self.mail_from, farmer, landlord);
        if let Err(err) = self.notifier.send(message).await {
            warn!(
                recipient = %landlord.record.email,
                error = %err,
                "match notification failed"
            );
            return Err(err);
        }
        Ok(())
    }

    /// Persist a landlord post. No matching happens here; posts are only read
    /// when a farmer interest arrives.
    pub async fn post_land(
        &self,
        submission: LandlordSubmission,
    ) -> Result<Stored<LandlordPost>, MarketplaceError> {
        let post = submission.validate()?;
        let stored = self.store.insert_landlord(post).await?;
        info!(id = %stored.id, county = %stored.record.county, "landlord post created");
        Ok(stored)
    }

    /// Record a newsletter signup, treating an existing email as success.
    pub async fn sign_up(&self, request: SignupRequest) -> Result<SignupOutcome, MarketplaceError> {
        let signup = request.validate()?;
        match self.store.insert_signup(signup).await {
            Ok(_) => Ok(SignupOutcome {
                already_subscribed: false,
            }),
            Err(StoreError::Duplicate) => Ok(SignupOutcome {
                already_subscribed: true,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
