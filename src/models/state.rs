//! Persisted resource state and the certificate-to-state mapping layer
//!
//! [`ResourceState`] is the statically-typed shape handed back to the caller
//! for persistence. All "stringly-typed" translation from backend records is
//! confined to this module: everywhere else works with typed structs.

use serde::{Deserialize, Serialize};

use crate::models::certificate::CertificateRecord;
use crate::models::template::{DnEntry, LabelEntry, SanEntry};

/// Lifecycle states of a reconciled certificate resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No certificate is tracked locally
    Absent,
    /// An enroll request has been submitted and not yet answered
    Pending,
    /// The certificate is valid and not due for renewal
    Live,
    /// The renewal threshold has passed; the local copy must be dropped
    Expired,
    /// The backend has recorded a revocation; the local copy must be dropped
    Revoked,
}

/// The locally persisted view of one certificate resource
///
/// The backend owns the authoritative record; this is a read-through cached
/// copy. `pkcs12` and `password` are written exactly once, from the enroll
/// response, and are deliberately left untouched by [`ResourceState::apply_record`]:
/// the backend never returns the key material again.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceState {
    /// Backend certificate identifier
    pub id: String,
    /// Profile the certificate was enrolled into
    pub profile: String,
    /// Owner recorded at enrollment, if overridden
    #[serde(default)]
    pub owner: Option<String>,
    /// Team recorded at enrollment, if overridden
    #[serde(default)]
    pub team: Option<String>,
    /// Contact email recorded at enrollment, if overridden
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Subject entries as submitted
    #[serde(default)]
    pub subject: Vec<DnEntry>,
    /// SAN entries as submitted
    #[serde(default)]
    pub sans: Vec<SanEntry>,
    /// Labels as submitted
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
    /// Third-party connectors that must confirm receipt
    #[serde(default)]
    pub third_parties: Vec<String>,
    /// Whether deletion revokes the certificate on the backend
    #[serde(default)]
    pub revoke_on_delete: bool,
    /// Days before expiry at which renewal is due
    #[serde(default)]
    pub renew_before: Option<i64>,
    /// CSR used for decentralized enrollment, if any
    #[serde(default)]
    pub csr: Option<String>,
    /// Base64-encoded PKCS12 bundle from centralized enrollment
    #[serde(default)]
    pub pkcs12: Option<String>,
    /// Password of the PKCS12 bundle
    #[serde(default)]
    pub password: Option<String>,
    /// PEM-encoded certificate
    pub certificate: String,
    /// Certificate thumbprint
    pub thumbprint: String,
    /// Whether the certificate is self-signed
    pub self_signed: bool,
    /// Public key thumbprint
    pub public_key_thumbprint: String,
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
    pub revocation_date: i64,
    /// Key type
    pub key_type: Option<String>,
    /// Signing algorithm
    pub signing_algorithm: String,
}

impl ResourceState {
    /// Refresh every certificate-derived scalar field from a backend record.
    ///
    /// Request-side fields (profile, subject, labels, renew_before, ...) and
    /// the one-shot secrets (pkcs12, password) are not touched.
    pub fn apply_record(&mut self, record: &CertificateRecord) {
        self.id = record.id.clone();
        self.certificate = record.certificate.clone();
        self.thumbprint = record.thumbprint.clone();
        self.self_signed = record.self_signed;
        self.public_key_thumbprint = record.public_key_thumbprint.clone();
        self.dn = record.dn.clone();
        self.serial = record.serial.clone();
        self.issuer = record.issuer.clone();
        self.not_before = record.not_before;
        self.not_after = record.not_after;
        self.revocation_date = record.revocation_date;
        self.key_type = Some(record.key_type.clone());
        self.signing_algorithm = record.signing_algorithm.clone();
    }

    /// Build a fresh state from a backend record, for import-by-id
    pub fn from_record(record: &CertificateRecord) -> Self {
        let mut state = ResourceState::default();
        state.apply_record(record);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CertificateRecord {
        CertificateRecord {
            id: "id-123".to_string(),
            certificate: "-----BEGIN CERTIFICATE-----\nMIIB...\n-----END CERTIFICATE-----"
                .to_string(),
            thumbprint: "THUMB".to_string(),
            public_key_thumbprint: "PKTHUMB".to_string(),
            self_signed: false,
            dn: "CN=example".to_string(),
            serial: "01AB".to_string(),
            issuer: "CN=issuer".to_string(),
            not_before: 1_111_111_111,
            not_after: 2_222_222_222,
            revocation_date: 0,
            revocation_reason: None,
            key_type: "rsa-2048".to_string(),
            signing_algorithm: "SHA256WITHRSA".to_string(),
            third_parties: vec![],
        }
    }

    #[test]
    fn test_apply_record_round_trips_every_scalar_field() {
        let record = sample_record();
        let mut state = ResourceState::default();
        state.apply_record(&record);

        assert_eq!(state.id, record.id);
        assert_eq!(state.certificate, record.certificate);
        assert_eq!(state.thumbprint, record.thumbprint);
        assert_eq!(state.self_signed, record.self_signed);
        assert_eq!(state.public_key_thumbprint, record.public_key_thumbprint);
        assert_eq!(state.dn, record.dn);
        assert_eq!(state.serial, record.serial);
        assert_eq!(state.issuer, record.issuer);
        assert_eq!(state.not_before, record.not_before);
        assert_eq!(state.not_after, record.not_after);
        assert_eq!(state.revocation_date, record.revocation_date);
        assert_eq!(state.key_type.as_deref(), Some(record.key_type.as_str()));
        assert_eq!(state.signing_algorithm, record.signing_algorithm);
    }

    #[test]
    fn test_apply_record_preserves_one_shot_secrets() {
        let record = sample_record();
        let mut state = ResourceState {
            pkcs12: Some("MIIKkg...".to_string()),
            password: Some("generated-once".to_string()),
            ..Default::default()
        };
        state.apply_record(&record);

        assert_eq!(state.pkcs12.as_deref(), Some("MIIKkg..."));
        assert_eq!(state.password.as_deref(), Some("generated-once"));
    }

    #[test]
    fn test_state_serde_round_trip() {
        let mut state = ResourceState::from_record(&sample_record());
        state.profile = "tls-server".to_string();
        state.renew_before = Some(30);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ResourceState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
