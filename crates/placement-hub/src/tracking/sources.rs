use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw record returned by the direct-application backend.
///
/// The backend is schema-light: every field except the id may be missing,
/// and unrecognized fields ride along in `extra` so the preserved payload
/// loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectApplicationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internship_id: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<PostingRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internship: Option<PostingRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Posting fields embedded in a record when the backend pre-joins them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "company", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Raw internship posting, reinterpreted as an application by the portal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternshipRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stipend_amount_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stipend_amount_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_name: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Listing filter for the internship backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternshipQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
}

/// Failure surfaced by a source adapter call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("record not found: {0}")]
    NotFound(String),
}

/// Backend owning direct application records.
#[async_trait]
pub trait DirectApplicationSource: Send + Sync {
    /// Every application record visible to the portal.
    async fn list(&self) -> Result<Vec<DirectApplicationRecord>, SourceError>;

    /// Records scoped to one recruiter's postings, with posting fields
    /// pre-joined by the backend.
    async fn list_for_recruiter(
        &self,
        recruiter_id: &str,
    ) -> Result<Vec<DirectApplicationRecord>, SourceError>;

    /// Persists a status value in the backend's own vocabulary.
    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError>;
}

/// Backend owning internship postings.
#[async_trait]
pub trait InternshipSource: Send + Sync {
    async fn list(&self, query: &InternshipQuery) -> Result<Vec<InternshipRecord>, SourceError>;

    async fn set_status(&self, id: &str, status: &str) -> Result<(), SourceError>;
}
