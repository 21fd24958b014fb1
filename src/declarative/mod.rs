//! Flat declarative configuration documents.
//!
//! # Data Flow
//! ```text
//! document file (JSON/YAML)
//!     → loader.rs (parse & deserialize)
//!     → Content (services, routes, plugins, upstreams, ...)
//!     → graph::builder (dependency graph)
//!
//! After fallback reconstruction:
//!     graph::flatten
//!     → Content (flat lists with reference fields)
//!     → loader.rs (serialize for the transport)
//! ```
//!
//! # Design Decisions
//! - Nested collections and top-level collections are both accepted
//! - Unknown attributes are carried through untouched
//! - Reference fields accept both string and object forms

pub mod loader;
pub mod schema;

pub use loader::{load_document, write_document, DocumentError, DocumentFormat};
pub use schema::{
    CaCertificate, Certificate, Consumer, Content, Plugin, Reference, Route, Service, Sni,
    Target, Upstream,
};
