//! Mock backend for testing
//!
//! Provides an in-memory implementation of the PKI backend trait for isolated
//! testing without a real backend, plus factories for common records.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use certflow::models::{
    CertificateRecord, EnrollResponse, EnrollTemplate, RequestRecord, RevocationReason,
    ThirdPartyItem,
};
use certflow::services::backend::PkiBackend;
use certflow::utils::error::{Error, Result};

/// Per-operation call counters
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub get_enroll_template: u32,
    pub enroll: u32,
    pub update: u32,
    pub revoke: u32,
    pub get_certificate: u32,
    pub get_request: u32,
}

impl CallCounts {
    pub fn total(&self) -> u32 {
        self.get_enroll_template
            + self.enroll
            + self.update
            + self.revoke
            + self.get_certificate
            + self.get_request
    }
}

/// In-memory PKI backend
#[derive(Default)]
pub struct MockBackend {
    /// Template skeleton returned by get_enroll_template
    pub template: Mutex<EnrollTemplate>,
    /// Response returned by enroll/update
    pub enroll_response: Mutex<Option<EnrollResponse>>,
    /// Certificates by id
    pub certificates: Mutex<HashMap<String, CertificateRecord>>,
    /// Request records returned by successive get_request calls; the last one
    /// repeats once the sequence is exhausted
    pub request_records: Mutex<Vec<RequestRecord>>,
    /// When set, revoke fails with this message
    pub revoke_error: Mutex<Option<String>>,
    /// Arguments of the last get_enroll_template call
    pub last_template_args: Mutex<Option<(String, Option<String>)>>,
    /// Reason passed to the last revoke call
    pub last_revoke_reason: Mutex<Option<RevocationReason>>,
    pub calls: Mutex<CallCounts>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enroll_response(response: EnrollResponse) -> Self {
        let mock = Self::default();
        *mock.enroll_response.lock().unwrap() = Some(response);
        mock
    }

    pub fn add_certificate(&self, record: CertificateRecord) {
        self.certificates
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn set_request_records(&self, records: Vec<RequestRecord>) {
        *self.request_records.lock().unwrap() = records;
    }

    pub fn fail_revocations(&self, message: &str) {
        *self.revoke_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_counts(&self) -> CallCounts {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PkiBackend for MockBackend {
    async fn get_enroll_template(
        &self,
        profile: &str,
        csr: Option<&str>,
    ) -> Result<EnrollTemplate> {
        self.calls.lock().unwrap().get_enroll_template += 1;
        *self.last_template_args.lock().unwrap() =
            Some((profile.to_string(), csr.map(str::to_string)));
        Ok(self.template.lock().unwrap().clone())
    }

    async fn enroll(
        &self,
        _profile: &str,
        _template: &EnrollTemplate,
        _password: Option<&str>,
    ) -> Result<EnrollResponse> {
        self.calls.lock().unwrap().enroll += 1;
        self.enroll_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Backend("no enroll response configured".to_string()))
    }

    async fn update(
        &self,
        _certificate_id: &str,
        _template: &EnrollTemplate,
    ) -> Result<EnrollResponse> {
        self.calls.lock().unwrap().update += 1;
        self.enroll_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Backend("no enroll response configured".to_string()))
    }

    async fn revoke(
        &self,
        certificate_id: &str,
        reason: RevocationReason,
    ) -> Result<CertificateRecord> {
        self.calls.lock().unwrap().revoke += 1;
        *self.last_revoke_reason.lock().unwrap() = Some(reason);

        if let Some(message) = self.revoke_error.lock().unwrap().clone() {
            return Err(Error::Backend(message));
        }

        self.certificates
            .lock()
            .unwrap()
            .get(certificate_id)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("certificate not found: {}", certificate_id)))
    }

    async fn get_certificate(&self, id: &str) -> Result<CertificateRecord> {
        self.calls.lock().unwrap().get_certificate += 1;
        self.certificates
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("certificate not found: {}", id)))
    }

    async fn get_request(&self, id: &str) -> Result<RequestRecord> {
        self.calls.lock().unwrap().get_request += 1;

        let mut records = self.request_records.lock().unwrap();
        if records.is_empty() {
            return Err(Error::Backend(format!("request not found: {}", id)));
        }
        if records.len() > 1 {
            Ok(records.remove(0))
        } else {
            Ok(records[0].clone())
        }
    }
}

/// Build a certificate record with sensible defaults
pub fn certificate_record(id: &str, not_after: i64) -> CertificateRecord {
    CertificateRecord {
        id: id.to_string(),
        certificate: "-----BEGIN CERTIFICATE-----\nMIIB...\n-----END CERTIFICATE-----".to_string(),
        thumbprint: format!("THUMB-{}", id),
        public_key_thumbprint: format!("PKTHUMB-{}", id),
        self_signed: false,
        dn: "CN=example.com".to_string(),
        serial: "01AB".to_string(),
        issuer: "CN=issuer".to_string(),
        not_before: 1_700_000_000_000,
        not_after,
        revocation_date: 0,
        revocation_reason: None,
        key_type: "rsa-2048".to_string(),
        signing_algorithm: "SHA256WITHRSA".to_string(),
        third_parties: vec![],
    }
}

/// Build a request record confirming the given connectors
pub fn request_record(id: &str, connectors: &[&str]) -> RequestRecord {
    RequestRecord {
        id: id.to_string(),
        status: Some("completed".to_string()),
        third_parties: connectors
            .iter()
            .map(|connector| ThirdPartyItem {
                connector: connector.to_string(),
                push_date: Some(1_700_000_000_000),
                remote_id: None,
            })
            .collect(),
    }
}
