//! Test utilities for prism
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`init_test_logging`] - once-only tracing setup that respects `RUST_LOG`
//! - [`TemplateTree`] - temporary layouts/pages/partials directories
//!
//! # Example
//!
//! ```rust,no_run
//! use prism_render::templating::Renderer;
//! use prism_render::test_utils::TemplateTree;
//!
//! let tree = TemplateTree::with_basic_site().unwrap();
//! let renderer = Renderer::new(tree.config()).unwrap();
//! assert!(renderer.contains("home.html"));
//! ```

pub mod fixtures;

pub use fixtures::TemplateTree;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=prism_render=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
