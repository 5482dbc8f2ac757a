//! Certificate record and revocation models
//!
//! The authoritative copy of every certificate lives in the PKI backend; the
//! structs here are the typed view of what the backend returns.

use serde::{Deserialize, Serialize};

/// Revocation reason codes, per RFC 5280
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    /// Default reason for voluntary re-enrollment
    Superseded,
    /// Default reason for deletion-triggered revocation
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

/// Propagation status of the certificate in one third-party system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyItem {
    /// Identifier of the third-party connector
    pub connector: String,
    /// When the certificate was pushed to the third party (epoch ms)
    #[serde(default)]
    pub push_date: Option<i64>,
    /// Identifier assigned by the third party, if any
    #[serde(default)]
    pub remote_id: Option<String>,
}

/// A certificate as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Backend identifier
    pub id: String,
    /// PEM-encoded certificate
    pub certificate: String,
    /// Thumbprint of the certificate
    pub thumbprint: String,
    /// Thumbprint of the public key
    pub public_key_thumbprint: String,
    /// Whether the certificate is self-signed
    pub self_signed: bool,
    /// Distinguished name
    pub dn: String,
    /// Serial number
    pub serial: String,
    /// Issuer DN
    pub issuer: String,
    /// Not valid before (epoch ms)
    pub not_before: i64,
    /// Not valid after (epoch ms)
    pub not_after: i64,
    /// Revocation date (epoch ms); 0 means not revoked
    #[serde(default)]
    pub revocation_date: i64,
    /// Reason the certificate was revoked, when it was
    #[serde(default)]
    pub revocation_reason: Option<RevocationReason>,
    /// Key type, e.g. "rsa-2048"
    pub key_type: String,
    /// Signing algorithm, e.g. "SHA256WITHRSA"
    pub signing_algorithm: String,
    /// Propagation status per third-party system, populated asynchronously
    /// by the backend after enrollment
    #[serde(default)]
    pub third_parties: Vec<ThirdPartyItem>,
}

impl CertificateRecord {
    /// Whether the backend has recorded a revocation for this certificate
    pub fn is_revoked(&self) -> bool {
        self.revocation_date != 0
    }
}

/// Response to an enroll or update request
///
/// `pkcs12` and `password` are only present on centralized enrollments, and
/// only on the enroll response itself: the backend generates the key material
/// exactly once and never returns it again on subsequent reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    /// Backend identifier of the enrollment request, used to follow
    /// third-party propagation
    pub id: String,
    /// The issued certificate
    pub certificate: CertificateRecord,
    /// Base64-encoded PKCS12 bundle holding the certificate and private key
    #[serde(default)]
    pub pkcs12: Option<String>,
    /// Password protecting the PKCS12 bundle
    #[serde(default)]
    pub password: Option<String>,
}

/// An enrollment request record, fetched while waiting for third-party
/// propagation to complete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Backend identifier of the request
    pub id: String,
    /// Request processing status as reported by the backend
    #[serde(default)]
    pub status: Option<String>,
    /// Third parties that have confirmed receipt so far
    #[serde(default)]
    pub third_parties: Vec<ThirdPartyItem>,
}
