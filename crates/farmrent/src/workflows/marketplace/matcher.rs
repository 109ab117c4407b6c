use serde::{Deserialize, Serialize};

use super::domain::{FarmerInterest, LandlordPost};

/// Query selecting the landlord posts a farmer offer qualifies for: same
/// county, asking price at or below the offer.
///
/// County comparison is exact string equality: case-sensitive, untrimmed.
/// That is inherited behavior and a known limitation; normalizing counties is
/// a candidate refinement, not something to fix silently here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub county: String,
    pub offered_price: f64,
}

impl MatchQuery {
    pub fn for_interest(interest: &FarmerInterest) -> Self {
        Self {
            county: interest.county.clone(),
            offered_price: interest.offered_price,
        }
    }

    /// The match predicate. Pure; result ordering and delivery are the
    /// caller's concern.
    pub fn qualifies(&self, post: &LandlordPost) -> bool {
        post.county == self.county && post.asking_price <= self.offered_price
    }
}
