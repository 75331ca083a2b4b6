#![doc(test(attr(deny(warnings))))]

//! Donation Hub records charitable donations, issues sequential receipt
//! numbers and aggregates totals by category and region.
//!
//! The ledger itself lives in `dhub-core`; this crate wires it to JSON
//! persistence, user configuration and the `donation_hub_cli` shell.

pub mod cli;
pub mod errors;
pub mod session;
pub mod utils;

pub use errors::HubError;
pub use session::HubSession;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Donation Hub tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
