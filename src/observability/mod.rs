//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! graph / fallback code produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → whatever recorder the embedding process installs
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
