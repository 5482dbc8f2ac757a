//! Lifecycle services

pub mod backend;
pub mod poller;
pub mod reconciler;
pub mod template;

pub use backend::{BackendClient, PkiBackend};
pub use poller::wait_for_third_parties;
pub use reconciler::{classify, Reconciler};
pub use template::build_template;
