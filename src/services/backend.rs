//! PKI backend client
//!
//! Provides the HTTP client for the remote certificate-management service and
//! the [`PkiBackend`] trait the lifecycle components are written against. The
//! trait keeps the backend an explicitly injected collaborator, so tests can
//! substitute an in-memory implementation.
//!
//! Every call is a single blocking round-trip: failed calls are surfaced
//! immediately with the backend's message text and are never retried here.

use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::BackendConfig;
use crate::models::{
    CertificateRecord, EnrollResponse, EnrollTemplate, RequestRecord, RevocationReason,
};
use crate::utils::error::{Error, Result};

/// Operations consumed from the PKI backend
#[async_trait]
pub trait PkiBackend: Send + Sync {
    /// Fetch the enrollment template skeleton for a profile, and optionally a
    /// pre-built CSR (decentralized enrollment)
    async fn get_enroll_template(
        &self,
        profile: &str,
        csr: Option<&str>,
    ) -> Result<EnrollTemplate>;

    /// Submit an enroll request
    async fn enroll(
        &self,
        profile: &str,
        template: &EnrollTemplate,
        password: Option<&str>,
    ) -> Result<EnrollResponse>;

    /// Submit an update request for an existing certificate
    async fn update(&self, certificate_id: &str, template: &EnrollTemplate)
        -> Result<EnrollResponse>;

    /// Submit a revoke request
    async fn revoke(
        &self,
        certificate_id: &str,
        reason: RevocationReason,
    ) -> Result<CertificateRecord>;

    /// Fetch the authoritative certificate record by id
    async fn get_certificate(&self, id: &str) -> Result<CertificateRecord>;

    /// Fetch an enrollment request record by id, including its third-party
    /// propagation status
    async fn get_request(&self, id: &str) -> Result<RequestRecord>;
}

#[async_trait]
impl<B: PkiBackend + ?Sized> PkiBackend for &B {
    async fn get_enroll_template(
        &self,
        profile: &str,
        csr: Option<&str>,
    ) -> Result<EnrollTemplate> {
        (**self).get_enroll_template(profile, csr).await
    }

    async fn enroll(
        &self,
        profile: &str,
        template: &EnrollTemplate,
        password: Option<&str>,
    ) -> Result<EnrollResponse> {
        (**self).enroll(profile, template, password).await
    }

    async fn update(
        &self,
        certificate_id: &str,
        template: &EnrollTemplate,
    ) -> Result<EnrollResponse> {
        (**self).update(certificate_id, template).await
    }

    async fn revoke(
        &self,
        certificate_id: &str,
        reason: RevocationReason,
    ) -> Result<CertificateRecord> {
        (**self).revoke(certificate_id, reason).await
    }

    async fn get_certificate(&self, id: &str) -> Result<CertificateRecord> {
        (**self).get_certificate(id).await
    }

    async fn get_request(&self, id: &str) -> Result<RequestRecord> {
        (**self).get_request(id).await
    }
}

#[async_trait]
impl<B: PkiBackend + ?Sized> PkiBackend for std::sync::Arc<B> {
    async fn get_enroll_template(
        &self,
        profile: &str,
        csr: Option<&str>,
    ) -> Result<EnrollTemplate> {
        (**self).get_enroll_template(profile, csr).await
    }

    async fn enroll(
        &self,
        profile: &str,
        template: &EnrollTemplate,
        password: Option<&str>,
    ) -> Result<EnrollResponse> {
        (**self).enroll(profile, template, password).await
    }

    async fn update(
        &self,
        certificate_id: &str,
        template: &EnrollTemplate,
    ) -> Result<EnrollResponse> {
        (**self).update(certificate_id, template).await
    }

    async fn revoke(
        &self,
        certificate_id: &str,
        reason: RevocationReason,
    ) -> Result<CertificateRecord> {
        (**self).revoke(certificate_id, reason).await
    }

    async fn get_certificate(&self, id: &str) -> Result<CertificateRecord> {
        (**self).get_certificate(id).await
    }

    async fn get_request(&self, id: &str) -> Result<RequestRecord> {
        (**self).get_request(id).await
    }
}

/// HTTP client for the PKI backend API
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl BackendClient {
    /// Create a new backend client from configuration
    ///
    /// Validates the configuration first, so an incomplete auth pair fails
    /// here rather than on the first request.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .use_rustls_tls();

        // Add CA bundle if provided (must be done before identity for rustls)
        if let Some(ca_pem) = &config.ca_bundle_pem {
            let ca_cert = Certificate::from_pem(ca_pem.as_bytes())
                .map_err(|e| Error::Config(format!("Failed to parse CA bundle: {}", e)))?;
            client_builder = client_builder.add_root_certificate(ca_cert);
        }

        // Configure client certificate authentication if provided
        if let (Some(cert_pem), Some(key_pem)) = (&config.client_cert_pem, &config.client_key_pem)
        {
            // Combine cert and key into a single PEM bundle for rustls
            let mut pem_bundle = cert_pem.clone().into_bytes();
            pem_bundle.push(b'\n');
            pem_bundle.extend_from_slice(key_pem.as_bytes());

            let identity = Identity::from_pem(&pem_bundle)
                .map_err(|e| Error::Config(format!("Failed to create client identity: {}", e)))?;
            client_builder = client_builder.identity(identity);
        }

        // Configure TLS verification (must be after identity for rustls compatibility)
        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_deref());
        }
        builder
    }

    /// Send a request and decode the response, passing backend error text
    /// through verbatim
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("backend returned status {}", status)
            } else {
                body
            };
            return Err(Error::Backend(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Backend(format!("Failed to parse backend response: {}", e)))
    }
}

#[async_trait]
impl PkiBackend for BackendClient {
    async fn get_enroll_template(
        &self,
        profile: &str,
        csr: Option<&str>,
    ) -> Result<EnrollTemplate> {
        debug!(profile, has_csr = csr.is_some(), "Fetching enroll template");

        let mut body = json!({ "profile": profile });
        if let Some(csr) = csr {
            body["csr"] = json!(csr);
        }

        self.send(
            self.request(Method::POST, "/api/v1/requests/template")
                .json(&body),
        )
        .await
    }

    async fn enroll(
        &self,
        profile: &str,
        template: &EnrollTemplate,
        password: Option<&str>,
    ) -> Result<EnrollResponse> {
        debug!(profile, "Submitting enroll request");

        let mut body = json!({
            "profile": profile,
            "template": template,
        });
        if let Some(password) = password {
            body["password"] = json!(password);
        }

        self.send(
            self.request(Method::POST, "/api/v1/requests/enroll")
                .json(&body),
        )
        .await
    }

    async fn update(
        &self,
        certificate_id: &str,
        template: &EnrollTemplate,
    ) -> Result<EnrollResponse> {
        debug!(certificate_id, "Submitting update request");

        let body = json!({
            "certificateId": certificate_id,
            "template": template,
        });

        self.send(
            self.request(Method::POST, "/api/v1/requests/update")
                .json(&body),
        )
        .await
    }

    async fn revoke(
        &self,
        certificate_id: &str,
        reason: RevocationReason,
    ) -> Result<CertificateRecord> {
        debug!(certificate_id, ?reason, "Submitting revoke request");

        let body = json!({
            "certificateId": certificate_id,
            "reason": reason,
        });

        self.send(
            self.request(Method::POST, "/api/v1/requests/revoke")
                .json(&body),
        )
        .await
    }

    async fn get_certificate(&self, id: &str) -> Result<CertificateRecord> {
        debug!(id, "Fetching certificate record");

        self.send(self.request(Method::GET, &format!("/api/v1/certificates/{}", id)))
            .await
    }

    async fn get_request(&self, id: &str) -> Result<RequestRecord> {
        debug!(id, "Fetching enrollment request record");

        self.send(self.request(Method::GET, &format!("/api/v1/requests/{}", id)))
            .await
    }
}
