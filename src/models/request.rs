//! Declarative certificate request model
//!
//! A [`CertificateRequest`] describes the desired certificate. It is built
//! fresh for every create or update call and never persisted. The enrollment
//! mode is determined by which fields are set: a `csr` selects decentralized
//! enrollment, a `key_type` (with subject and SAN elements) selects
//! centralized enrollment. Supplying both is a configuration conflict.

use serde::{Deserialize, Serialize};

/// One subject element of the desired distinguished name, e.g. type "CN" with
/// value "example.com". Positional element tags ("cn.1") are synthesized when
/// the enrollment template is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectElement {
    /// Element type tag, e.g. "CN", "OU", "O"
    #[serde(rename = "type")]
    pub element_type: String,
    /// Element value
    pub value: String,
}

/// One subject alternative name, e.g. type "DNSNAME" with value
/// "www.example.com". Same-type elements are grouped into a single
/// list-valued template entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SanElement {
    /// SAN type tag, e.g. "DNSNAME", "IPADDRESS", "RFC822NAME"
    #[serde(rename = "type")]
    pub san_type: String,
    /// SAN value
    pub value: String,
}

/// A label attached to the certificate on the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name
    pub label: String,
    /// Label value
    pub value: String,
}

/// Desired state of one certificate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// Profile the certificate is enrolled into
    pub profile: String,
    /// Desired subject elements, in declaration order
    #[serde(default)]
    pub subject: Vec<SubjectElement>,
    /// Desired subject alternative names, in declaration order
    #[serde(default)]
    pub sans: Vec<SanElement>,
    /// Labels to attach, verbatim
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Owner override. When absent, no override is sent: omission and empty
    /// string mean different things to the backend.
    #[serde(default)]
    pub owner: Option<String>,
    /// Team override
    #[serde(default)]
    pub team: Option<String>,
    /// Contact email override
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Pre-built PEM CSR; selects decentralized enrollment
    #[serde(default)]
    pub csr: Option<String>,
    /// Key type for backend-side key generation; selects centralized
    /// enrollment. Not compatible with `csr`.
    #[serde(default)]
    pub key_type: Option<String>,
    /// Password to protect the PKCS12 bundle on centralized enrollment
    #[serde(default)]
    pub password: Option<String>,
    /// Third-party connectors that must confirm receipt before a create is
    /// considered fully successful
    #[serde(default)]
    pub third_parties: Vec<String>,
    /// Whether to revoke the certificate on the backend when the resource is
    /// deleted
    #[serde(default)]
    pub revoke_on_delete: bool,
    /// Days before expiry at which the certificate is considered due for
    /// renewal
    #[serde(default)]
    pub renew_before: Option<i64>,
}
