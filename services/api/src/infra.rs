use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use farmrent::workflows::marketplace::{
    AdminAccount, DeliveryError, EmailMessage, FarmerInterest, LandlordPost, MatchQuery, Notifier,
    RecordStore, Signup, Stored, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store. Stands in for the durable database so the
/// service and demos run without external infrastructure.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    inner: Arc<Mutex<Collections>>,
}

#[derive(Default)]
struct Collections {
    landlords: Vec<Stored<LandlordPost>>,
    farmers: Vec<Stored<FarmerInterest>>,
    signups: Vec<Stored<Signup>>,
    admins: Vec<AdminAccount>,
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_landlord(
        &self,
        post: LandlordPost,
    ) -> Result<Stored<LandlordPost>, StoreError> {
        let stored = Stored::new(post);
        let mut inner = self.inner.lock().expect("record store mutex poisoned");
        inner.landlords.push(stored.clone());
        Ok(stored)
    }

    async fn insert_farmer(
        &self,
        interest: FarmerInterest,
    ) -> Result<Stored<FarmerInterest>, StoreError> {
        let stored = Stored::new(interest);
        let mut inner = self.inner.lock().expect("record store mutex poisoned");
        inner.farmers.push(stored.clone());
        Ok(stored)
    }

    async fn insert_signup(&self, signup: Signup) -> Result<Stored<Signup>, StoreError> {
        let mut inner = self.inner.lock().expect("record store mutex poisoned");
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
        let inner = self.inner.lock().expect("record store mutex poisoned");
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
        let inner = self.inner.lock().expect("record store mutex poisoned");
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
        let inner = self.inner.lock().expect("record store mutex poisoned");
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
        let inner = self.inner.lock().expect("record store mutex poisoned");
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
        let inner = self.inner.lock().expect("record store mutex poisoned");
        Ok(inner.landlords.len() as u64)
    }

    async fn count_farmers(&self) -> Result<u64, StoreError> {
        let inner = self.inner.lock().expect("record store mutex poisoned");
        Ok(inner.farmers.len() as u64)
    }

    async fn count_signups(&self) -> Result<u64, StoreError> {
        let inner = self.inner.lock().expect("record store mutex poisoned");
        Ok(inner.signups.len() as u64)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let inner = self.inner.lock().expect("record store mutex poisoned");
        Ok(inner.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("record store mutex poisoned");
        if inner.admins.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate);
        }
        inner.admins.push(account);
        Ok(())
    }
}

/// Notifier that records messages instead of talking to an SMTP relay.
/// Swapping in a real transport only requires another `Notifier` impl.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl InMemoryNotifier {
    pub(crate) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        info!(to = %message.to, subject = %message.subject, "match notification dispatched");
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message);
        Ok(())
    }
}
