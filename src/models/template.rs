//! Enrollment template wire model
//!
//! The backend's template schema is positionally keyed: subject entries carry
//! `type.<n>` element tags, while SAN entries carry one list of values per
//! type. Override entries (owner, team, contact email) are serialized only
//! when present; sending an empty override is not the same as sending none.

use serde::{Deserialize, Serialize};

/// A positionally tagged subject entry, e.g. ("cn.1", "CN", "example.com")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnEntry {
    /// Positional element tag, `<type>.<n>` with n 1-based per type
    pub element: String,
    /// Element type tag, uppercased
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Element value
    pub value: String,
}

/// A grouped SAN entry: one entry per type, holding every value of that type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SanEntry {
    /// SAN type tag, uppercased
    #[serde(rename = "type")]
    pub entry_type: String,
    /// All values of this type, in declaration order
    pub value: Vec<String>,
}

/// A label entry, passed through verbatim
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelEntry {
    /// Label name
    pub label: String,
    /// Label value
    pub value: String,
}

/// An owner/team/contact-email override entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideEntry {
    /// Override value
    pub value: String,
}

/// The enrollment template submitted with enroll and update requests
///
/// A fresh skeleton is fetched from the backend for the target profile (and
/// CSR, for decentralized enrollments) and filled in by the template builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollTemplate {
    /// Positionally tagged subject entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject: Vec<DnEntry>,
    /// Grouped SAN entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sans: Vec<SanEntry>,
    /// Key type for centralized enrollment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Labels, verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelEntry>,
    /// Owner override; absent means "do not override"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OverrideEntry>,
    /// Team override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<OverrideEntry>,
    /// Contact email override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<OverrideEntry>,
    /// CSR echoed back by the backend for decentralized enrollments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csr: Option<String>,
}
