use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::domain::{AdminAccount, FarmerInterest, LandlordPost, Signup, Stored};
use super::pagination::{Page, PageRequest};
use super::store::{RecordStore, StoreError};

pub const SUPER_ADMIN_ROLE: &str = "super_admin";

const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in an admin bearer token. Subject is the admin email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies admin bearer tokens (HS256, 24h expiry).
#[derive(Clone)]
pub struct AdminTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AdminTokens {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AdminError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(AdminError::from)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AdminError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(AdminError::from)
    }
}

/// Digest used for stored admin passwords.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Admin surface: login, paginated listings, and dashboard counts.
pub struct AdminService<S> {
    store: Arc<S>,
    tokens: AdminTokens,
}

/// Admin identity as exposed in API responses. Never carries the digest.
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub admin: AdminView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_signups: u64,
    pub total_landlords: u64,
    pub total_farmers: u64,
}

impl<S> AdminService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, tokens: AdminTokens) -> Self {
        Self { store, tokens }
    }

    /// Create the default admin account when none exists yet. Returns whether
    /// an account was created. Racing creations collapse into `Ok(false)` via
    /// the store's duplicate detection.
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<bool, AdminError> {
        if self.store.find_admin(email).await?.is_some() {
            return Ok(false);
        }

        let account = AdminAccount {
            email: email.to_string(),
            password_digest: password_digest(password),
            role: SUPER_ADMIN_ROLE.to_string(),
        };
        match self.store.insert_admin(account).await {
            Ok(()) => {
                info!(%email, "super admin account created");
                Ok(true)
            }
            Err(StoreError::Duplicate) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Authenticate by email + password and issue a bearer token. Unknown
    /// emails and digest mismatches are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AdminError> {
        let account = self
            .store
            .find_admin(email)
            .await?
            .ok_or(AdminError::InvalidCredentials)?;

        if account.password_digest != password_digest(password) {
            return Err(AdminError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.email)?;
        Ok(LoginOutcome {
            token,
            admin: AdminView {
                email: account.email,
                role: account.role,
            },
        })
    }

    /// Verify a bearer token presented on a protected route.
    pub fn authorize(&self, token: &str) -> Result<Claims, AdminError> {
        self.tokens.verify(token)
    }

    pub async fn landlords(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Stored<LandlordPost>>, AdminError> {
        let (rows, total) = tokio::try_join!(
            self.store.landlords(request.offset(), request.limit() as usize),
            self.store.count_landlords()
        )?;
        Ok(Page::assemble(rows, total, request))
    }

    pub async fn farmers(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Stored<FarmerInterest>>, AdminError> {
        let (rows, total) = tokio::try_join!(
            self.store.farmers(request.offset(), request.limit() as usize),
            self.store.count_farmers()
        )?;
        Ok(Page::assemble(rows, total, request))
    }

    pub async fn signups(&self, request: &PageRequest) -> Result<Page<Stored<Signup>>, AdminError> {
        let (rows, total) = tokio::try_join!(
            self.store.signups(request.offset(), request.limit() as usize),
            self.store.count_signups()
        )?;
        Ok(Page::assemble(rows, total, request))
    }

    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        let (total_signups, total_landlords, total_farmers) = tokio::try_join!(
            self.store.count_signups(),
            self.store.count_landlords(),
            self.store.count_farmers()
        )?;
        Ok(DashboardStats {
            total_signups,
            total_landlords,
            total_farmers,
        })
    }
}

/// Error raised by the admin service.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token rejected")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
