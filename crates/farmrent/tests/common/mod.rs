#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use serde_json::Value;

use farmrent::workflows::marketplace::{
    AdminAccount, DeliveryError, EmailMessage, FarmerInterest, LandlordPost, MatchQuery, Notifier,
    RecordStore, Signup, Stored, StoreError,
};

pub const MAIL_FROM: &str = "FarmRent <noreply@farmrent.ai>";

pub fn landlord(county: &str, asking_price: f64, email: &str) -> LandlordPost {
    LandlordPost {
        county: county.to_string(),
        spi: None,
        acres: None,
        asking_price,
        email: email.to_string(),
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

pub async fn json_body(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = serde_json::from_slice(&bytes).expect("body is json");
    (status, value)
}

/// In-memory record store shared by the API-level tests. Flipping
/// `unavailable` makes every operation fail like an unreachable database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    pub unavailable: AtomicBool,
}

#[derive(Default)]
struct Collections {
    landlords: Vec<Stored<LandlordPost>>,
    farmers: Vec<Stored<FarmerInterest>>,
    signups: Vec<Stored<Signup>>,
    admins: Vec<AdminAccount>,
}

impl MemoryStore {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn farmer_count(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").farmers.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_landlord(
        &self,
        post: LandlordPost,
    ) -> Result<Stored<LandlordPost>, StoreError> {
        self.check_available()?;
        let stored = Stored::new(post);
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.landlords.push(stored.clone());
        Ok(stored)
    }

    async fn insert_farmer(
        &self,
        interest: FarmerInterest,
    ) -> Result<Stored<FarmerInterest>, StoreError> {
        self.check_available()?;
        let stored = Stored::new(interest);
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.farmers.push(stored.clone());
        Ok(stored)
    }

    async fn insert_signup(&self, signup: Signup) -> Result<Stored<Signup>, StoreError> {
        self.check_available()?;
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.signups.iter().any(|s| s.record.email == signup.email) {
            return Err(StoreError::Duplicate);
        }
        let stored = Stored::new(signup);
        inner.signups.push(stored.clone());
        Ok(stored)
    }

    async fn find_landlords(
        &self,
        query: &MatchQuery,
    ) -> Result<Vec<Stored<LandlordPost>>, StoreError> {
        self.check_available()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .landlords
            .iter()
            .filter(|stored| query.qualifies(&stored.record))
            .cloned()
            .collect())
    }

    async fn landlords(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Stored<LandlordPost>>, StoreError> {
        self.check_available()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .landlords
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn farmers(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Stored<FarmerInterest>>, StoreError> {
        self.check_available()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .farmers
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn signups(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Stored<Signup>>, StoreError> {
        self.check_available()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .signups
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_landlords(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.inner.lock().expect("store mutex poisoned").landlords.len() as u64)
    }

    async fn count_farmers(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.inner.lock().expect("store mutex poisoned").farmers.len() as u64)
    }

    async fn count_signups(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.inner.lock().expect("store mutex poisoned").signups.len() as u64)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        self.check_available()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.admins.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate);
        }
        inner.admins.push(account);
        Ok(())
    }
}

/// Notifier recording every delivered message.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        tokio::task::yield_now().await;
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message);
        Ok(())
    }
}
