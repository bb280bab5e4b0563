use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::tracking::sources::{
    DirectApplicationRecord, DirectApplicationSource, InternshipQuery, InternshipRecord,
    InternshipSource, SourceError,
};
use crate::tracking::tracker::ApplicationTracker;

pub(super) const RECRUITER: &str = "recruiter@horizonlabs.dev";
pub(super) const APPLICANT: &str = "career-cell@stateu.edu";

pub(super) fn direct_record(
    id: &str,
    status: Option<&str>,
    created: Option<&str>,
) -> DirectApplicationRecord {
    DirectApplicationRecord {
        id: id.to_string(),
        applicant_name: Some("Priya Sharma".to_string()),
        applicant_email: Some("priya@campusmail.dev".to_string()),
        status: status.map(str::to_string),
        application_type: Some("job".to_string()),
        created_date: created.map(str::to_string),
        title: Some("Backend Engineer".to_string()),
        company_name: Some("Horizon Labs".to_string()),
        ..DirectApplicationRecord::default()
    }
}

pub(super) fn internship_record(
    id: &str,
    status: Option<&str>,
    created: Option<&str>,
) -> InternshipRecord {
    InternshipRecord {
        id: id.to_string(),
        title: Some("Data Science Internship".to_string()),
        company: Some("Quanta Metrics".to_string()),
        status: status.map(str::to_string),
        posted_by: Some(APPLICANT.to_string()),
        poster_name: Some("Career Cell".to_string()),
        created_date: created.map(str::to_string),
        ..InternshipRecord::default()
    }
}

/// Direct-application double. Applies writes to its stored records and logs
/// every call so tests can assert what reached the backend.
#[derive(Default)]
pub(super) struct MemoryDirects {
    pub(super) records: Arc<Mutex<Vec<DirectApplicationRecord>>>,
    pub(super) recruiter_queries: Arc<Mutex<Vec<String>>>,
    pub(super) writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryDirects {
    pub(super) fn with_records(records: Vec<DirectApplicationRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    pub(super) fn stored_status(&self, id: &str) -> Option<String> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|record| record.id == id)
            .and_then(|record| record.status.clone())
    }
}

#[async_trait]
impl DirectApplicationSource for MemoryDirects {
    async fn list(&self) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        Ok(self.records.lock().expect("records mutex poisoned").clone())
    }

    async fn list_for_recruiter(
        &self,
        recruiter_id: &str,
    ) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        self.recruiter_queries
            .lock()
            .expect("queries mutex poisoned")
            .push(recruiter_id.to_string());
        self.list().await
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push((id.to_string(), status.to_string()));
        let mut records = self.records.lock().expect("records mutex poisoned");
        match records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.status = Some(status.to_string());
                Ok(())
            }
            None => Err(SourceError::NotFound(id.to_string())),
        }
    }
}

/// Internship double mirroring [`MemoryDirects`], logging list queries.
#[derive(Default)]
pub(super) struct MemoryInternships {
    pub(super) records: Arc<Mutex<Vec<InternshipRecord>>>,
    pub(super) queries: Arc<Mutex<Vec<InternshipQuery>>>,
    pub(super) writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryInternships {
    pub(super) fn with_records(records: Vec<InternshipRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    pub(super) fn stored_status(&self, id: &str) -> Option<String> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|record| record.id == id)
            .and_then(|record| record.status.clone())
    }
}

#[async_trait]
impl InternshipSource for MemoryInternships {
    async fn list(&self, query: &InternshipQuery) -> Result<Vec<InternshipRecord>, SourceError> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push(query.clone());
        Ok(self.records.lock().expect("records mutex poisoned").clone())
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError> {
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push((id.to_string(), status.to_string()));
        let mut records = self.records.lock().expect("records mutex poisoned");
        match records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.status = Some(status.to_string());
                Ok(())
            }
            None => Err(SourceError::NotFound(id.to_string())),
        }
    }
}

/// Direct source that fails every call.
pub(super) struct FailingDirects;

#[async_trait]
impl DirectApplicationSource for FailingDirects {
    async fn list(&self) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        Err(SourceError::Transport("connection reset".to_string()))
    }

    async fn list_for_recruiter(
        &self,
        _recruiter_id: &str,
    ) -> Result<Vec<DirectApplicationRecord>, SourceError> {
        Err(SourceError::Transport("connection reset".to_string()))
    }

    async fn set_status(&self, _id: &str, _status: &str) -> Result<(), SourceError> {
        Err(SourceError::Transport("connection reset".to_string()))
    }
}

/// Internship source that fails every call.
pub(super) struct FailingInternships;

#[async_trait]
impl InternshipSource for FailingInternships {
    async fn list(&self, _query: &InternshipQuery) -> Result<Vec<InternshipRecord>, SourceError> {
        Err(SourceError::Transport("connection reset".to_string()))
    }

    async fn set_status(&self, _id: &str, _status: &str) -> Result<(), SourceError> {
        Err(SourceError::Transport("connection reset".to_string()))
    }
}

/// Internship source that lists normally but rejects every write.
pub(super) struct ReadOnlyInternships {
    pub(super) inner: MemoryInternships,
}

#[async_trait]
impl InternshipSource for ReadOnlyInternships {
    async fn list(&self, query: &InternshipQuery) -> Result<Vec<InternshipRecord>, SourceError> {
        self.inner.list(query).await
    }

    async fn set_status(&self, _id: &str, _status: &str) -> Result<(), SourceError> {
        Err(SourceError::Rejected("read-only replica".to_string()))
    }
}

pub(super) fn build_tracker(
    directs: Vec<DirectApplicationRecord>,
    internships: Vec<InternshipRecord>,
) -> (
    ApplicationTracker<MemoryDirects, MemoryInternships>,
    Arc<MemoryDirects>,
    Arc<MemoryInternships>,
) {
    let directs = Arc::new(MemoryDirects::with_records(directs));
    let internships = Arc::new(MemoryInternships::with_records(internships));
    let tracker = ApplicationTracker::new(directs.clone(), internships.clone());
    (tracker, directs, internships)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("response body is readable");
    serde_json::from_slice(&body).expect("response body is json")
}
