//! Data models for certificate lifecycle management

pub mod certificate;
pub mod request;
pub mod state;
pub mod template;

pub use certificate::{
    CertificateRecord, EnrollResponse, RequestRecord, RevocationReason, ThirdPartyItem,
};
pub use request::{CertificateRequest, Label, SanElement, SubjectElement};
pub use state::{LifecycleState, ResourceState};
pub use template::{DnEntry, EnrollTemplate, LabelEntry, OverrideEntry, SanEntry};
