use async_trait::async_trait;
use chrono::{Duration, Local};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_hub::tracking::{
    ActorRole, DirectApplicationRecord, DirectApplicationSource, InternshipQuery,
    InternshipRecord, InternshipSource, PostingRef, SourceError,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) const DEMO_RECRUITER: &str = "recruiter@horizonlabs.dev";
pub(crate) const DEMO_APPLICANT: &str = "career-cell@stateu.edu";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Direct application record plus the recruiter that owns its posting, so
/// the scoped listing can filter server-side the way the real backend does.
#[derive(Debug, Clone)]
pub(crate) struct OwnedDirectRecord {
    pub(crate) owner: Option<String>,
    pub(crate) record: DirectApplicationRecord,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectApplications {
    records: Arc<Mutex<Vec<OwnedDirectRecord>>>,
}

impl InMemoryDirectApplications {
    pub(crate) fn with_records(records: Vec<OwnedDirectRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

#[async_trait]
impl DirectApplicationSource for InMemoryDirectApplications {
    async fn list(&self) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        let guard = self.records.lock().expect("direct records mutex poisoned");
        Ok(guard.iter().map(|owned| owned.record.clone()).collect())
    }

    async fn list_for_recruiter(
        &self,
        recruiter_id: &str,
    ) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        let guard = self.records.lock().expect("direct records mutex poisoned");
        Ok(guard
            .iter()
            .filter(|owned| owned.owner.as_deref() == Some(recruiter_id))
            .map(|owned| owned.record.clone())
            .collect())
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
        let mut guard = self.records.lock().expect("direct records mutex poisoned");
        match guard.iter_mut().find(|owned| owned.record.id == id) {
            Some(owned) => {
                owned.record.status = Some(status.to_string());
                Ok(())
            }
            None => Err(SourceError::NotFound(id.to_string())),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInternshipBoard {
    records: Arc<Mutex<Vec<InternshipRecord>>>,
}

impl InMemoryInternshipBoard {
    pub(crate) fn with_records(records: Vec<InternshipRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

#[async_trait]
impl InternshipSource for InMemoryInternshipBoard {
    async fn list(&self, query: &InternshipQuery) -> Result<Vec<InternshipRecord>, SourceError> {
        let guard = self
            .records
            .lock()
            .expect("internship records mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| match query.posted_by.as_deref() {
                Some(poster) => record.posted_by.as_deref() == Some(poster),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
        let mut guard = self
            .records
            .lock()
            .expect("internship records mutex poisoned");
        match guard.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.status = Some(status.to_string());
                Ok(())
            }
            None => Err(SourceError::NotFound(id.to_string())),
        }
    }
}

/// Seeded in-memory backends: three direct applications (one still carrying
/// the backend's narrow status vocabulary) and two internship postings owned
/// by the demo applicant identity.
pub(crate) fn seeded_sources() -> (Arc<InMemoryDirectApplications>, Arc<InMemoryInternshipBoard>) {
    let directs = vec![
        OwnedDirectRecord {
            owner: Some(DEMO_RECRUITER.to_string()),
            record: DirectApplicationRecord {
                id: "app-backend-001".to_string(),
                applicant_name: Some("Priya Sharma".to_string()),
                applicant_email: Some("priya@campusmail.dev".to_string()),
                phone: Some("+91-98200-11223".to_string()),
                status: Some("reviewed".to_string()),
                application_type: Some("job".to_string()),
                job_id: Some("job-42".to_string()),
                created_date: Some(days_ago(12)),
                resume_url: Some("https://cdn.campusmail.dev/resumes/priya-sharma.pdf".to_string()),
                job: Some(PostingRef {
                    title: Some("Backend Engineer".to_string()),
                    company_name: Some("Horizon Labs".to_string()),
                    location: Some("Pune".to_string()),
                }),
                ..DirectApplicationRecord::default()
            },
        },
        OwnedDirectRecord {
            owner: Some(DEMO_RECRUITER.to_string()),
            record: DirectApplicationRecord {
                id: "app-intern-002".to_string(),
                applicant_name: Some("Arjun Mehta".to_string()),
                applicant_email: Some("arjun@campusmail.dev".to_string()),
                application_type: Some("internship".to_string()),
                internship_id: Some("intern-77".to_string()),
                created_date: Some(days_ago(5)),
                cover_letter: Some(
                    "Final-year student with two data engineering projects.".to_string(),
                ),
                internship: Some(PostingRef {
                    title: Some("Backend Intern".to_string()),
                    company_name: Some("Nimbus Analytics".to_string()),
                    location: Some("Remote".to_string()),
                }),
                ..DirectApplicationRecord::default()
            },
        },
        OwnedDirectRecord {
            owner: Some("talent@pixelforge.dev".to_string()),
            record: DirectApplicationRecord {
                id: "app-frontend-003".to_string(),
                applicant_name: Some("Sara Khan".to_string()),
                applicant_email: Some("sara@campusmail.dev".to_string()),
                status: Some("pending".to_string()),
                application_type: Some("job".to_string()),
                title: Some("Frontend Developer".to_string()),
                company_name: Some("Pixel Forge".to_string()),
                location: Some("Bengaluru".to_string()),
                created_date: Some(days_ago(2)),
                ..DirectApplicationRecord::default()
            },
        },
    ];

    let internships = vec![
        InternshipRecord {
            id: "intern-ds-101".to_string(),
            title: Some("Data Science Internship".to_string()),
            company: Some("Quanta Metrics".to_string()),
            location: Some("Bengaluru".to_string()),
            duration: Some("6 months".to_string()),
            stipend_amount_min: Some(15_000),
            stipend_amount_max: Some(20_000),
            status: Some("approved".to_string()),
            posted_by: Some(DEMO_APPLICANT.to_string()),
            poster_name: Some("Career Cell".to_string()),
            created_date: Some(days_ago(1)),
            ..InternshipRecord::default()
        },
        InternshipRecord {
            id: "intern-mkt-102".to_string(),
            title: Some("Campus Outreach Internship".to_string()),
            company: Some("BrightHire".to_string()),
            location: Some("Remote".to_string()),
            duration: Some("3 months".to_string()),
            stipend_amount_min: Some(8_000),
            posted_by: Some(DEMO_APPLICANT.to_string()),
            poster_name: Some("Career Cell".to_string()),
            created_date: Some(days_ago(20)),
            ..InternshipRecord::default()
        },
    ];

    (
        Arc::new(InMemoryDirectApplications::with_records(directs)),
        Arc::new(InMemoryInternshipBoard::with_records(internships)),
    )
}

pub(crate) fn parse_role(raw: &str) -> Result<ActorRole, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "recruiter" => Ok(ActorRole::Recruiter),
        "applicant" => Ok(ActorRole::Applicant),
        other => Err(format!(
            "unknown role '{other}', expected recruiter or applicant"
        )),
    }
}

fn days_ago(days: i64) -> String {
    (Local::now() - Duration::days(days)).to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recruiter_listing_is_scoped_to_the_owner() {
        let (directs, _internships) = seeded_sources();

        let scoped = directs
            .list_for_recruiter(DEMO_RECRUITER)
            .await
            .expect("scoped listing succeeds");
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|record| record.id != "app-frontend-003"));

        let all = directs.list().await.expect("listing succeeds");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn internship_listing_honors_the_posted_by_filter() {
        let (_directs, internships) = seeded_sources();

        let query = InternshipQuery {
            posted_by: Some(DEMO_APPLICANT.to_string()),
        };
        let mine = internships.list(&query).await.expect("listing succeeds");
        assert_eq!(mine.len(), 2);

        let query = InternshipQuery {
            posted_by: Some("someone-else@stateu.edu".to_string()),
        };
        let theirs = internships.list(&query).await.expect("listing succeeds");
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn status_writes_persist_in_the_seeded_sources() {
        let (directs, internships) = seeded_sources();

        directs
            .set_status("app-backend-001", "shortlisted")
            .await
            .expect("write succeeds");
        let records = directs.list().await.expect("listing succeeds");
        let updated = records
            .iter()
            .find(|record| record.id == "app-backend-001")
            .expect("record exists");
        assert_eq!(updated.status.as_deref(), Some("shortlisted"));

        let missing = internships.set_status("intern-ghost", "approved").await;
        assert_eq!(
            missing,
            Err(SourceError::NotFound("intern-ghost".to_string()))
        );
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(parse_role("Recruiter"), Ok(ActorRole::Recruiter));
        assert_eq!(parse_role(" applicant "), Ok(ActorRole::Applicant));
        assert!(parse_role("admin").is_err());
    }
}
