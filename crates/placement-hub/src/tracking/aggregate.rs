use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::{ActorContext, ActorRole, ApplicationId, NormalizedApplication, SourceKind};
use super::normalize::{normalize_direct, normalize_internship, raw_payload};
use super::sources::{DirectApplicationSource, InternshipQuery, InternshipSource};

/// Output of one fetch, normalize, merge, and sort cycle.
#[derive(Debug, Clone, Default)]
pub struct AggregationPass {
    pub records: Vec<NormalizedApplication>,
    pub raw_payloads: HashMap<ApplicationId, Value>,
}

/// Runs a full aggregation pass for the given actor.
///
/// Recruiters read only the recruiter-scoped direct feed. Applicants read
/// both sources concurrently and merge them. A failing source contributes an
/// empty list instead of aborting; this function itself never fails.
pub async fn run_pass<D, I>(directs: &D, internships: &I, actor: &ActorContext) -> AggregationPass
where
    D: DirectApplicationSource + ?Sized,
    I: InternshipSource + ?Sized,
{
    let mut pass = AggregationPass::default();

    match actor.role {
        ActorRole::Recruiter => {
            let records = directs
                .list_for_recruiter(&actor.identity)
                .await
                .unwrap_or_else(|err| {
                    warn_source_down(SourceKind::DirectApplication, &err);
                    Vec::new()
                });
            for record in &records {
                let normalized = normalize_direct(record);
                pass.raw_payloads
                    .insert(normalized.id.clone(), raw_payload(record));
                pass.records.push(normalized);
            }
        }
        ActorRole::Applicant => {
            let query = InternshipQuery {
                posted_by: Some(actor.identity.clone()),
            };
            let (direct_result, internship_result) =
                tokio::join!(directs.list(), internships.list(&query));

            let direct_records = direct_result.unwrap_or_else(|err| {
                warn_source_down(SourceKind::DirectApplication, &err);
                Vec::new()
            });
            let internship_records = internship_result.unwrap_or_else(|err| {
                warn_source_down(SourceKind::InternshipEntity, &err);
                Vec::new()
            });

            for record in &direct_records {
                let normalized = normalize_direct(record);
                pass.raw_payloads
                    .insert(normalized.id.clone(), raw_payload(record));
                pass.records.push(normalized);
            }
            for record in &internship_records {
                let normalized = normalize_internship(record);
                pass.raw_payloads
                    .insert(normalized.id.clone(), raw_payload(record));
                pass.records.push(normalized);
            }
        }
    }

    sort_by_recency(&mut pass.records);
    info!(
        total = pass.records.len(),
        role = ?actor.role,
        "aggregation pass complete"
    );
    pass
}

/// Stable newest-first ordering; records without a timestamp sort last.
pub(crate) fn sort_by_recency(records: &mut [NormalizedApplication]) {
    records.sort_by(|left, right| match (left.created_at, right.created_at) {
        (Some(left_at), Some(right_at)) => right_at.cmp(&left_at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn warn_source_down(source: SourceKind, err: &super::sources::SourceError) {
    warn!(
        source = source.label(),
        error = %err,
        "source fetch failed; contributing no records"
    );
}
