//! Thread-safe handle around a [`DonationLedger`].

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use dhub_domain::{DonationDraft, DonationRecord, DonationSummary, RecordChanges};

use crate::{ledger::DonationLedger, CoreError};

/// Cloneable handle that serializes every ledger operation behind one mutex.
///
/// The receipt counter is read, persisted and advanced while the lock is held, so two
/// concurrent inserts can never observe the same sequence value.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<DonationLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: DonationLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn insert(&self, draft: DonationDraft) -> Result<DonationRecord, CoreError> {
        self.lock()?.insert(draft)
    }

    pub fn update(&self, id: Uuid, changes: RecordChanges) -> Result<DonationRecord, CoreError> {
        self.lock()?.update(id, changes)
    }

    pub fn delete(&self, id: Uuid) -> Result<Option<DonationRecord>, CoreError> {
        self.lock()?.delete(id)
    }

    /// Owned copy of the records. The lock is released before this returns.
    pub fn snapshot(&self) -> Result<Vec<DonationRecord>, CoreError> {
        Ok(self.lock()?.list().to_vec())
    }

    pub fn aggregate(&self) -> Result<DonationSummary, CoreError> {
        Ok(self.lock()?.aggregate())
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with<T>(&self, f: impl FnOnce(&mut DonationLedger) -> T) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, DonationLedger>, CoreError> {
        self.inner.lock().map_err(|_| CoreError::LockPoisoned)
    }
}
