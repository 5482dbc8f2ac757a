//! Certificate lifecycle reconciler
//!
//! Drives create/read/update/delete for one certificate resource against the
//! PKI backend. The backend owns the certificate; the reconciler's job is to
//! decide when the locally-held copy is still good and when it must be dropped
//! so the next apply re-enrolls.
//!
//! Each resource is reconciled by exactly one operation at a time (the hosting
//! orchestration enforces this), so there is no locking here: every operation
//! is a sequence of blocking round-trips.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::PollConfig;
use crate::models::{
    CertificateRecord, CertificateRequest, LifecycleState, ResourceState, RevocationReason,
};
use crate::services::backend::PkiBackend;
use crate::services::poller::wait_for_third_parties;
use crate::services::template::build_template;
use crate::utils::error::Result;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Reconciles declarative certificate requests against the PKI backend
pub struct Reconciler<B> {
    backend: B,
    poll: PollConfig,
}

impl<B: PkiBackend> Reconciler<B> {
    /// Create a reconciler with the default propagation poll budget
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            poll: PollConfig::default(),
        }
    }

    /// Override the propagation poll budget
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Enroll a new certificate and return its initial state
    ///
    /// When third-party connectors are declared, the create only succeeds once
    /// every one of them has confirmed receipt; partial propagation after the
    /// poll budget is an error, not a silent partial success.
    pub async fn create(&self, request: &CertificateRequest) -> Result<ResourceState> {
        let template = build_template(&self.backend, request).await?;

        let response = self
            .backend
            .enroll(&request.profile, &template, request.password.as_deref())
            .await?;

        info!(
            certificate_id = %response.certificate.id,
            profile = %request.profile,
            "Certificate enrolled"
        );

        let mut state = ResourceState {
            profile: request.profile.clone(),
            owner: request.owner.clone(),
            team: request.team.clone(),
            contact_email: request.contact_email.clone(),
            subject: template.subject.clone(),
            sans: template.sans.clone(),
            labels: template.labels.clone(),
            third_parties: request.third_parties.clone(),
            revoke_on_delete: request.revoke_on_delete,
            renew_before: request.renew_before,
            csr: request.csr.clone(),
            ..Default::default()
        };
        state.apply_record(&response.certificate);

        // The PKCS12 bundle and its password are generated exactly once per
        // enroll call; they must be captured here and never refreshed from
        // reads. Decentralized enrollments never populate them.
        state.pkcs12 = response.pkcs12.clone();
        state.password = response.password.clone().or_else(|| request.password.clone());

        if !request.third_parties.is_empty() {
            wait_for_third_parties(
                &self.backend,
                &response.id,
                &request.third_parties,
                &self.poll,
            )
            .await?;
        }

        Ok(state)
    }

    /// Refetch the authoritative record and re-evaluate liveness
    ///
    /// Returns `Ok(None)` when the record is revoked or past its renewal
    /// threshold: the local copy must be dropped so the next apply recreates
    /// the certificate. The renewal loop is driven entirely by this check plus
    /// the caller's own periodic reconciliation; there is no internal
    /// scheduler.
    pub async fn read(&self, state: &ResourceState) -> Result<Option<ResourceState>> {
        let record = self.backend.get_certificate(&state.id).await?;

        match classify(&record, state.renew_before, Utc::now().timestamp_millis()) {
            LifecycleState::Revoked => {
                info!(
                    certificate_id = %state.id,
                    revocation_date = record.revocation_date,
                    "Certificate revoked, dropping local state"
                );
                Ok(None)
            }
            LifecycleState::Expired => {
                info!(
                    certificate_id = %state.id,
                    not_after = record.not_after,
                    "Certificate within its renewal window, dropping local state"
                );
                Ok(None)
            }
            _ => {
                let mut refreshed = state.clone();
                refreshed.apply_record(&record);
                Ok(Some(refreshed))
            }
        }
    }

    /// Replace the certificate: revoke the old one, then enroll a new one
    ///
    /// The revocation is best-effort: a failure is reported as a diagnostic
    /// but does not block the re-enrollment, since the overriding goal is a
    /// freshly issued certificate.
    pub async fn update(
        &self,
        state: &ResourceState,
        request: &CertificateRequest,
        reason: Option<RevocationReason>,
    ) -> Result<ResourceState> {
        let reason = reason.unwrap_or(RevocationReason::Superseded);

        if let Err(err) = self.backend.revoke(&state.id, reason).await {
            warn!(
                certificate_id = %state.id,
                error = %err,
                "Failed to revoke superseded certificate, continuing with re-enrollment"
            );
        }

        self.create(request).await
    }

    /// Remove the resource, optionally revoking the certificate on the backend
    ///
    /// Backend-side revocation is advisory: a revoke failure is reported as a
    /// diagnostic, and the local record must be cleared by the caller
    /// regardless of the outcome.
    pub async fn delete(&self, state: &ResourceState) -> Result<()> {
        if state.revoke_on_delete {
            if let Err(err) = self
                .backend
                .revoke(&state.id, RevocationReason::CessationOfOperation)
                .await
            {
                warn!(
                    certificate_id = %state.id,
                    error = %err,
                    "Failed to revoke certificate on delete"
                );
            } else {
                info!(certificate_id = %state.id, "Certificate revoked on delete");
            }
        }

        Ok(())
    }

    /// Import an existing certificate by backend id
    pub async fn import(&self, id: &str) -> Result<ResourceState> {
        let record = self.backend.get_certificate(id).await?;
        Ok(ResourceState::from_record(&record))
    }
}

/// Classify a backend record against the liveness invariant
///
/// A record is live iff it has no revocation date and `now` is still more
/// than `renew_before` days from `not_after`. Without a renewal threshold the
/// expiry check is skipped; revocation always wins.
pub fn classify(
    record: &CertificateRecord,
    renew_before_days: Option<i64>,
    now_ms: i64,
) -> LifecycleState {
    if record.is_revoked() {
        return LifecycleState::Revoked;
    }

    if let Some(days) = renew_before_days {
        if days > 0 && now_ms >= record.not_after - days * MILLIS_PER_DAY {
            return LifecycleState::Expired;
        }
    }

    LifecycleState::Live
}
