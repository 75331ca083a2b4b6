//! Opens the ledger described by the user's configuration.

use std::{sync::Arc, time::Duration};

use dhub_config::{Config, ConfigManager};
use dhub_core::{
    storage::{LedgerStorage, MemoryStorage},
    DigestSummarizer, DonationLedger, InsightOutcome, InsightRunner, InsightSummarizer,
    SharedLedger,
};
use dhub_storage_json::JsonLedgerStorage;
use tracing::info;

use crate::errors::Result;

/// A running donation hub: configuration plus the single shared ledger.
pub struct HubSession {
    config: Config,
    config_manager: Option<ConfigManager>,
    ledger: SharedLedger,
    summarizer: Arc<dyn InsightSummarizer>,
}

impl HubSession {
    /// Loads config through `manager` and opens the JSON ledger in its data directory.
    pub fn open(manager: ConfigManager) -> Result<Self> {
        let config = manager.load()?;
        let data_dir = manager.data_dir(&config);
        let storage = JsonLedgerStorage::new(data_dir.clone())?;
        let session = Self::with_storage(config, Box::new(storage))?;
        info!(data_dir = %data_dir.display(), records = session.record_count(), "session opened");
        Ok(Self {
            config_manager: Some(manager),
            ..session
        })
    }

    /// Session backed by process memory only. Nothing is written to disk.
    pub fn ephemeral(config: Config) -> Result<Self> {
        Self::with_storage(config, Box::new(MemoryStorage::new()))
    }

    pub fn with_storage(config: Config, storage: Box<dyn LedgerStorage>) -> Result<Self> {
        let ledger = DonationLedger::open(storage)?;
        let summarizer = Arc::new(DigestSummarizer::new(config.currency_label.clone()));
        Ok(Self {
            config,
            config_manager: None,
            ledger: SharedLedger::new(ledger),
            summarizer,
        })
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn InsightSummarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_manager(&self) -> Option<&ConfigManager> {
        self.config_manager.as_ref()
    }

    /// Applies `key = value` and persists the result when a config file backs this session.
    pub fn set_config_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.config.clone();
        updated.set(key, value)?;
        if let Some(manager) = &self.config_manager {
            manager.save(&updated)?;
        }
        if updated.currency_label != self.config.currency_label {
            self.summarizer = Arc::new(DigestSummarizer::new(updated.currency_label.clone()));
        }
        self.config = updated;
        Ok(())
    }

    /// Summarizes the current records, falling back to a placeholder on any failure.
    pub fn insight(&self) -> Result<InsightOutcome> {
        let snapshot = self.ledger.snapshot()?;
        let runner = InsightRunner::new(Duration::from_millis(self.config.insight_timeout_ms));
        Ok(runner.run(Arc::clone(&self.summarizer), snapshot))
    }

    fn record_count(&self) -> usize {
        self.ledger.with(|ledger| ledger.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhub_core::{InsightError, WAITING_MESSAGE};
    use dhub_domain::{DonationCategory, DonationDraft, DonationRecord, Region};
    use tempfile::tempdir;

    struct Failing;

    impl InsightSummarizer for Failing {
        fn summarize(&self, _records: &[DonationRecord]) -> std::result::Result<String, InsightError> {
            Err(InsightError::Provider("offline".into()))
        }
    }

    #[test]
    fn open_reads_config_and_persists_records() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let session = HubSession::open(manager.clone()).unwrap();
        session
            .ledger()
            .insert(DonationDraft::new(
                "Ali Ahmed",
                5000.0,
                DonationCategory::Zakat,
                Region::Area5No,
            ))
            .unwrap();
        drop(session);

        let reopened = HubSession::open(manager).unwrap();
        assert_eq!(reopened.ledger().snapshot().unwrap().len(), 1);
        assert!(dir.path().join("data").join("donations.json").exists());
    }

    #[test]
    fn set_config_value_saves_and_applies() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut session = HubSession::open(manager.clone()).unwrap();

        session.set_config_value("currency_label", "PKR").unwrap();
        assert_eq!(session.config().currency_label, "PKR");
        assert_eq!(manager.load().unwrap().currency_label, "PKR");

        assert!(session.set_config_value("insight_timeout_ms", "soon").is_err());
        assert_eq!(session.config().insight_timeout_ms, 5_000);
    }

    #[test]
    fn insight_on_empty_ledger_waits() {
        let session = HubSession::ephemeral(Config::default()).unwrap();
        assert_eq!(session.insight().unwrap().text, WAITING_MESSAGE);
    }

    #[test]
    fn failing_summarizer_falls_back() {
        let session = HubSession::ephemeral(Config::default())
            .unwrap()
            .with_summarizer(Arc::new(Failing));
        session
            .ledger()
            .insert(DonationDraft::new("Sana", 100.0, DonationCategory::Fitra, Region::J1))
            .unwrap();

        let outcome = session.insight().unwrap();
        assert!(outcome.is_fallback());
    }
}
