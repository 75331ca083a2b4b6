pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Default directive applied on top of `RUST_LOG`.
pub const DEFAULT_LOG_DIRECTIVE: &str = "donation_hub=info";

/// Installs the global `fmt` subscriber. Later calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in default_directives() {
            filter = filter.add_directive(directive);
        }
        // Another subscriber may already be installed by an embedding binary or test harness.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}

fn default_directives() -> Vec<Directive> {
    [DEFAULT_LOG_DIRECTIVE, "dhub_core=warn", "dhub_storage_json=warn"]
        .iter()
        .filter_map(|raw| raw.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        assert_eq!(default_directives().len(), 3);
    }
}
