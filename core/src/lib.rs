#![deny(missing_docs)]

//! # OpenAPI Sync Core
//!
//! Drift detection between an OpenAPI contract document and the API
//! definition embedded in a deployment template.
//!
//! raw document -> [`document`] -> [`routes`] -> [`compare`] -> report

/// Shared error types.
pub mod error;

/// YAML loaders for the two input documents.
pub mod document;

/// Route table normalization.
pub mod routes;

/// Route table comparison and reporting.
pub mod compare;

/// End-to-end verification run.
pub mod pipeline;

pub use compare::{compare_paths, compare_routes, Finding, SyncReport, IN_SYNC_MESSAGE};
pub use document::{load_contract, load_template, lookup, strip_tags};
pub use error::{AppError, AppResult};
pub use pipeline::{verify, SyncConfig, DEFAULT_CONTRACT_PATH, DEFAULT_TEMPLATE_PATH};
pub use routes::{
    contract_paths, normalize_paths, template_paths, MethodMap, RouteTable,
    DEFAULT_API_RESOURCE,
};
