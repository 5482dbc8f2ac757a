//! Certflow
//!
//! A client library for managing the life cycle of certificates held by a
//! remote PKI backend: enrollment (centralized or decentralized), read-time
//! renewal and revocation checks, best-effort revocation, and bounded polling
//! for third-party propagation.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{BackendConfig, PollConfig};
pub use models::{
    CertificateRecord, CertificateRequest, EnrollTemplate, LifecycleState, ResourceState,
    RevocationReason,
};
pub use services::{BackendClient, PkiBackend, Reconciler};
pub use utils::error::{Error, Result};
