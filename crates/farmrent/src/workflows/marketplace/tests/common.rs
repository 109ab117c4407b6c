use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::workflows::marketplace::domain::{
    AdminAccount, FarmerInterest, InterestSubmission, LandlordPost, Signup, Stored,
};
use crate::workflows::marketplace::matcher::MatchQuery;
use crate::workflows::marketplace::notifier::{DeliveryError, EmailMessage, Notifier};
use crate::workflows::marketplace::store::{RecordStore, StoreError};

pub(super) fn landlord(county: &str, asking_price: f64, email: &str) -> LandlordPost {
    LandlordPost {
        county: county.to_string(),
        spi: None,
        acres: None,
        asking_price,
        email: email.to_string(),
    }
}

pub(super) fn interest(county: &str, offered_price: f64, email: &str) -> InterestSubmission {
    InterestSubmission {
        county: county.to_string(),
        offered_price,
        email: email.to_string(),
    }
}

/// Record store double with switchable failure points and call counters so
/// tests can assert which workflow steps ran.
#[derive(Default)]
pub(super) struct MemoryStore {
    inner: Mutex<Collections>,
    pub(super) fail_farmer_insert: AtomicBool,
    pub(super) fail_find: AtomicBool,
    pub(super) find_calls: AtomicUsize,
}

#[derive(Default)]
struct Collections {
    landlords: Vec<Stored<LandlordPost>>,
    farmers: Vec<Stored<FarmerInterest>>,
    signups: Vec<Stored<Signup>>,
    admins: Vec<AdminAccount>,
}

impl MemoryStore {
    pub(super) fn farmer_records(&self) -> Vec<Stored<FarmerInterest>> {
        self.inner.lock().expect("store mutex poisoned").farmers.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_landlord(
        &self,
        post: LandlordPost,
    ) -> Result<Stored<LandlordPost>, StoreError> {
        let stored = Stored::new(post);
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.landlords.push(stored.clone());
        Ok(stored)
    }

    async fn insert_farmer(
        &self,
        interest: FarmerInterest,
    ) -> Result<Stored<FarmerInterest>, StoreError> {
        if self.fail_farmer_insert.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("insert rejected".to_string()));
        }
        let stored = Stored::new(interest);
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.farmers.push(stored.clone());
        Ok(stored)
    }

    async fn insert_signup(&self, signup: Signup) -> Result<Stored<Signup>, StoreError> {
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
        self.find_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_find.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("query rejected".to_string()));
        }
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
        Ok(self.inner.lock().expect("store mutex poisoned").landlords.len() as u64)
    }

    async fn count_farmers(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().expect("store mutex poisoned").farmers.len() as u64)
    }

    async fn count_signups(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().expect("store mutex poisoned").signups.len() as u64)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.admins.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate);
        }
        inner.admins.push(account);
        Ok(())
    }
}

/// Notifier double recording every delivery. Yields before recording so a
/// workflow that responded without joining its sends would miss attempts.
#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        tokio::task::yield_now().await;
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message);
        Ok(())
    }
}

/// Notifier double failing every delivery while counting the attempts.
#[derive(Default)]
pub(super) struct FailingNotifier {
    pub(super) attempts: AtomicUsize,
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: EmailMessage) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(DeliveryError::Transport("smtp relay down".to_string()))
    }
}
