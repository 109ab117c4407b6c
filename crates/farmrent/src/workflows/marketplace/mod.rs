//! Land-rental marketplace: landlords post land, farmers declare interest,
//! and matched landlords are notified by email.
//!
//! The submission workflow persists the farmer interest, queries the record
//! store for qualifying landlord posts, fans the notifications out
//! concurrently, and only responds once every delivery attempt has settled.
//! Delivery failures are logged and absorbed; the caller learns the match
//! count, never per-recipient outcomes.

pub mod admin;
pub mod domain;
pub mod matcher;
pub mod notifier;
pub mod pagination;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use admin::{
    password_digest, AdminError, AdminService, AdminTokens, AdminView, Claims, DashboardStats,
    LoginOutcome, SUPER_ADMIN_ROLE,
};
pub use domain::{
    AdminAccount, FarmerInterest, InterestSubmission, LandlordPost, LandlordSubmission, RecordId,
    Signup, SignupRequest, Stored, ValidationError,
};
pub use matcher::MatchQuery;
pub use notifier::{match_notification, DeliveryError, EmailMessage, Notifier};
pub use pagination::{Page, PageInfo, PageRequest};
pub use router::{admin_router, marketplace_router};
pub use service::{InterestOutcome, MarketplaceError, MarketplaceService, SignupOutcome};
pub use store::{RecordStore, StoreError};
