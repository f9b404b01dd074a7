//! Driver for the packed-storage contract generator.
//!
//! The library half of the `pwc` binary: configuration loading, the
//! command handlers and tracing setup. All file-system access lives here;
//! the compiler crates are pure.

pub mod commands;
mod error;

use std::sync::Once;

pub use error::DriverError;

static TRACING_INIT: Once = Once::new();

/// Crates whose `debug` output `-v` turns on.
const WORKSPACE_CRATES: [&str; 3] = ["pw_schema", "pw_codegen", "pwc"];

/// Initialize the tracing subscriber.
///
/// Installs a hierarchical subscriber when `RUST_LOG` is set or `verbose`
/// is requested; otherwise tracing stays disabled. Safe to call more than
/// once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let mut filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("warn")
        } else {
            return;
        };

        if verbose {
            for krate in WORKSPACE_CRATES {
                if let Ok(directive) = format!("{krate}=debug").parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        tracing_subscriber::registry()
            .with(HierarchicalLayer::new(2).with_targets(true))
            .with(filter)
            .init();
    });
}
