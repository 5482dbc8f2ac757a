//! Enrollment template builder
//!
//! Assembles the backend enrollment template from a declarative
//! [`CertificateRequest`]. The presence of a CSR selects decentralized
//! enrollment; otherwise the backend generates the key pair (centralized
//! enrollment) and the subject, SANs and key type are filled in here.
//!
//! The backend's template schema is positionally keyed, so subject elements
//! are tagged `<type>.<n>` with a 1-based counter per type in declaration
//! order, while SAN values collapse into one list-valued entry per type.

use std::collections::HashMap;

use crate::models::{
    CertificateRequest, DnEntry, EnrollTemplate, LabelEntry, OverrideEntry, SanElement, SanEntry,
    SubjectElement,
};
use crate::services::backend::PkiBackend;
use crate::utils::error::{Error, Result};

/// Build the enrollment template for a request
///
/// Performs one template-skeleton fetch against the backend (read-only); any
/// backend failure is surfaced verbatim and un-retried. Supplying both `csr`
/// and `key_type` fails before any network call is made.
pub async fn build_template<B: PkiBackend + ?Sized>(
    backend: &B,
    request: &CertificateRequest,
) -> Result<EnrollTemplate> {
    let mut template = if let Some(csr) = &request.csr {
        // Decentralized enrollment: the CSR already fixes subject, SANs and key
        if request.key_type.is_some() {
            return Err(Error::ConfigConflict(
                "the parameter 'key_type' is not compatible with the parameter 'csr'".to_string(),
            ));
        }

        backend
            .get_enroll_template(&request.profile, Some(csr))
            .await?
    } else {
        let mut template = backend.get_enroll_template(&request.profile, None).await?;

        template.subject = index_subject(&request.subject);
        template.sans = group_sans(&request.sans);
        template.key_type = request.key_type.clone();

        template
    };

    template.labels = request
        .labels
        .iter()
        .map(|label| LabelEntry {
            label: label.label.clone(),
            value: label.value.clone(),
        })
        .collect();

    // Overrides are attached only when explicitly provided: omission and empty
    // string mean different things to the backend.
    if let Some(owner) = &request.owner {
        template.owner = Some(OverrideEntry {
            value: owner.clone(),
        });
    }
    if let Some(team) = &request.team {
        template.team = Some(OverrideEntry {
            value: team.clone(),
        });
    }
    if let Some(contact_email) = &request.contact_email {
        template.contact_email = Some(OverrideEntry {
            value: contact_email.clone(),
        });
    }

    Ok(template)
}

/// Tag subject elements positionally: `<type>.<n>`, n 1-based per type in
/// declaration order
pub fn index_subject(elements: &[SubjectElement]) -> Vec<DnEntry> {
    let mut type_counts: HashMap<String, u32> = HashMap::new();

    elements
        .iter()
        .map(|element| {
            let key = element.element_type.to_lowercase();
            let count = type_counts.entry(key.clone()).or_insert(0);
            *count += 1;
            DnEntry {
                element: format!("{}.{}", key, count),
                entry_type: element.element_type.to_uppercase(),
                value: element.value.clone(),
            }
        })
        .collect()
}

/// Group SAN elements into one list-valued entry per type, preserving value
/// order within each type and the order in which types first appear
pub fn group_sans(elements: &[SanElement]) -> Vec<SanEntry> {
    let mut entries: Vec<SanEntry> = Vec::new();

    for element in elements {
        let san_type = element.san_type.to_uppercase();
        match entries.iter_mut().find(|entry| entry.entry_type == san_type) {
            Some(entry) => entry.value.push(element.value.clone()),
            None => entries.push(SanEntry {
                entry_type: san_type,
                value: vec![element.value.clone()],
            }),
        }
    }

    entries
}
