//! Free-text insights over a ledger snapshot, with timeout and fallback.

use std::{
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use thiserror::Error;
use tracing::{debug, warn};

use dhub_domain::DonationRecord;

use crate::summary_service::SummaryService;

/// Shown when there is nothing to summarize yet.
pub const WAITING_MESSAGE: &str = "Analyzing donation data...";
/// Shown when the summarizer fails, panics or times out.
pub const FALLBACK_MESSAGE: &str = "Insights are unavailable right now. Ledger figures are unaffected.";
pub const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insight provider failed: {0}")]
    Provider(String),
    #[error("insight provider returned an empty response")]
    Empty,
}

/// Text-in/text-out collaborator that describes a snapshot of records.
pub trait InsightSummarizer: Send + Sync {
    fn summarize(&self, records: &[DonationRecord]) -> Result<String, InsightError>;
}

/// Where the text of an [`InsightOutcome`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightSource {
    Generated,
    Waiting,
    Fallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightOutcome {
    pub text: String,
    pub source: InsightSource,
}

impl InsightOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, InsightSource::Fallback(_))
    }
}

/// Runs a summarizer on its own thread against an owned snapshot.
///
/// Errors never escape: they are logged and replaced with [`FALLBACK_MESSAGE`].
#[derive(Debug, Clone)]
pub struct InsightRunner {
    timeout: Duration,
}

impl Default for InsightRunner {
    fn default() -> Self {
        Self::new(DEFAULT_INSIGHT_TIMEOUT)
    }
}

impl InsightRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn run(
        &self,
        summarizer: Arc<dyn InsightSummarizer>,
        snapshot: Vec<DonationRecord>,
    ) -> InsightOutcome {
        if snapshot.is_empty() {
            return InsightOutcome {
                text: WAITING_MESSAGE.to_string(),
                source: InsightSource::Waiting,
            };
        }

        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("insight".into())
            .spawn(move || {
                let result = summarizer.summarize(&snapshot);
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            return fallback(format!("could not start insight worker: {err}"));
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                debug!(chars = text.len(), "insight generated");
                InsightOutcome {
                    text: text.trim().to_string(),
                    source: InsightSource::Generated,
                }
            }
            Ok(Ok(_)) => fallback(InsightError::Empty.to_string()),
            Ok(Err(err)) => fallback(err.to_string()),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                fallback(format!("timed out after {} ms", self.timeout.as_millis()))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                fallback("insight worker stopped without a response".to_string())
            }
        }
    }
}

fn fallback(reason: String) -> InsightOutcome {
    warn!(%reason, "insight fallback");
    InsightOutcome {
        text: FALLBACK_MESSAGE.to_string(),
        source: InsightSource::Fallback(reason),
    }
}

/// Offline summarizer that describes totals and leading buckets.
#[derive(Debug, Clone)]
pub struct DigestSummarizer {
    currency_label: String,
}

impl DigestSummarizer {
    pub fn new(currency_label: impl Into<String>) -> Self {
        Self {
            currency_label: currency_label.into(),
        }
    }
}

impl Default for DigestSummarizer {
    fn default() -> Self {
        Self::new("Rs")
    }
}

impl InsightSummarizer for DigestSummarizer {
    fn summarize(&self, records: &[DonationRecord]) -> Result<String, InsightError> {
        let summary = SummaryService::aggregate(records);
        let Some((category, category_amount)) = summary.category_series().first().copied() else {
            return Err(InsightError::Empty);
        };
        let Some((region, region_amount)) = summary.region_series().first().copied() else {
            return Err(InsightError::Empty);
        };
        let label = &self.currency_label;
        let average = summary.total / summary.count as f64;
        let category_share = summary.share_of_total(category_amount).unwrap_or(0.0);
        Ok(format!(
            "{count} donation{plural} totalling {label} {total:.0} (average {label} {average:.0}). \
             {category} leads with {label} {category_amount:.0} ({category_share:.0}% of the total); \
             {region} is the strongest region at {label} {region_amount:.0}.",
            count = summary.count,
            plural = if summary.count == 1 { "" } else { "s" },
            total = summary.total,
        ))
    }
}
