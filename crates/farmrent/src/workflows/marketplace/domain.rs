use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted marketplace records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Envelope adding identity and an immutable creation timestamp to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(record: T) -> Self {
        Self {
            id: RecordId::generate(),
            created_at: Utc::now(),
            record,
        }
    }
}

/// A landlord's offer of land for rent. Never updated or deleted by the
/// marketplace workflows once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandlordPost {
    pub county: String,
    pub spi: Option<f64>,
    pub acres: Option<f64>,
    pub asking_price: f64,
    pub email: String,
}

/// A farmer's declared interest, priced per unit area. Read-only after the
/// submission workflow persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerInterest {
    pub county: String,
    pub offered_price: f64,
    pub email: String,
}

/// Newsletter signup. Unique by email; duplicate submissions are
/// success-equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    pub email: String,
}

/// Credentialed admin account stored alongside marketplace records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub password_digest: String,
    pub role: String,
}

/// Raw farmer interest payload as received over the wire. Fields default so a
/// missing field reads as empty/zero and fails validation rather than
/// deserialization, keeping the error contract uniform.
#[derive(Debug, Clone, Deserialize)]
pub struct InterestSubmission {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub offered_price: f64,
    #[serde(default)]
    pub email: String,
}

impl InterestSubmission {
    pub fn validate(self) -> Result<FarmerInterest, ValidationError> {
        if self.county.is_empty() {
            return Err(ValidationError::MissingField("county"));
        }
        if self.email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if !(self.offered_price > 0.0) {
            return Err(ValidationError::NonPositivePrice {
                field: "offered_price",
                value: self.offered_price,
            });
        }
        Ok(FarmerInterest {
            county: self.county,
            offered_price: self.offered_price,
            email: self.email,
        })
    }
}

/// Raw landlord post payload. `spi` and `acres` are genuinely optional.
#[derive(Debug, Clone, Deserialize)]
pub struct LandlordSubmission {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub asking_price: f64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub spi: Option<f64>,
    #[serde(default)]
    pub acres: Option<f64>,
}

impl LandlordSubmission {
    pub fn validate(self) -> Result<LandlordPost, ValidationError> {
        if self.county.is_empty() {
            return Err(ValidationError::MissingField("county"));
        }
        if self.email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if !(self.asking_price > 0.0) {
            return Err(ValidationError::NonPositivePrice {
                field: "asking_price",
                value: self.asking_price,
            });
        }
        Ok(LandlordPost {
            county: self.county,
            spi: self.spi,
            acres: self.acres,
            asking_price: self.asking_price,
            email: self.email,
        })
    }
}

/// Raw newsletter signup payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<Signup, ValidationError> {
        if self.email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Ok(Signup { email: self.email })
    }
}

/// Rejection raised before any persistence or matching happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} must be a positive number, got {value}")]
    NonPositivePrice { field: &'static str, value: f64 },
}
