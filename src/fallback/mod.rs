//! Fallback configuration generation.
//!
//! # Data Flow
//! ```text
//! rejected entities (type:name)
//!     → rejection.rs (parse & collapse duplicates)
//!     → reconstructor.rs (excise from current, recover from last good)
//!     → graph::flatten (back to a flat document)
//!     → generator.rs (diagnostics dump, observer notification)
//! ```
//!
//! # Design Decisions
//! - Inputs are never mutated; the result is a new graph
//! - Errors abort the whole generation

pub mod error;
pub mod generator;
pub mod reconstructor;
pub mod rejection;

pub use error::FallbackError;
pub use generator::{
    FallbackGenerator, FallbackObserver, FallbackOutcome, FallbackSummary, TracingObserver,
};
pub use reconstructor::{
    build_fallback_config, exclude_rejected_subgraphs, reconstruct, rejected_keys, Reconstruction,
};
pub use rejection::{load_rejections, FlatEntityError};
