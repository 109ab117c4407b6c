use async_trait::async_trait;

use super::domain::{AdminAccount, FarmerInterest, LandlordPost, Signup, Stored};
use super::matcher::MatchQuery;

/// Storage abstraction over the three marketplace collections plus admin
/// accounts, so the workflows can be exercised against in-memory doubles.
///
/// Listing windows (`landlords`, `farmers`, `signups`) return newest-first
/// slices; `find_landlords` may return matches in any order; callers rely on
/// the count, not the ordering. Concurrent access is the implementation's
/// concern; no transaction spans multiple calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_landlord(&self, post: LandlordPost)
        -> Result<Stored<LandlordPost>, StoreError>;

    async fn insert_farmer(
        &self,
        interest: FarmerInterest,
    ) -> Result<Stored<FarmerInterest>, StoreError>;

    /// Insert a signup; an existing record with the same email must surface
    /// as [`StoreError::Duplicate`].
    async fn insert_signup(&self, signup: Signup) -> Result<Stored<Signup>, StoreError>;

    /// Every landlord post satisfying the match query predicate.
    async fn find_landlords(
        &self,
        query: &MatchQuery,
    ) -> Result<Vec<Stored<LandlordPost>>, StoreError>;

    async fn landlords(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Stored<LandlordPost>>, StoreError>;

    async fn farmers(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Stored<FarmerInterest>>, StoreError>;

    async fn signups(&self, offset: usize, limit: usize)
        -> Result<Vec<Stored<Signup>>, StoreError>;

    async fn count_landlords(&self) -> Result<u64, StoreError>;

    async fn count_farmers(&self) -> Result<u64, StoreError>;

    async fn count_signups(&self) -> Result<u64, StoreError>;

    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>, StoreError>;

    async fn insert_admin(&self, account: AdminAccount) -> Result<(), StoreError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
