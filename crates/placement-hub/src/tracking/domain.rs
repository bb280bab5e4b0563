use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::CanonicalStatus;

/// Identifier carried over verbatim from a source record's native id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Backend that owns a record and must receive its status writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    DirectApplication,
    InternshipEntity,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            SourceKind::DirectApplication => "direct_application",
            SourceKind::InternshipEntity => "internship_entity",
        }
    }
}

/// Kind of posting an application targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    Job,
    Internship,
}

impl PositionType {
    pub const fn label(self) -> &'static str {
        match self {
            PositionType::Job => "job",
            PositionType::Internship => "internship",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "job" => Some(PositionType::Job),
            "internship" => Some(PositionType::Internship),
            _ => None,
        }
    }
}

/// Role of the caller requesting an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Recruiter,
    Applicant,
}

/// Caller identity supplied explicitly with every aggregation request. The
/// role picks the adapter paths; the identity scopes what they return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub role: ActorRole,
    pub identity: String,
}

impl ActorContext {
    pub fn recruiter(identity: impl Into<String>) -> Self {
        Self {
            role: ActorRole::Recruiter,
            identity: identity.into(),
        }
    }

    pub fn applicant(identity: impl Into<String>) -> Self {
        Self {
            role: ActorRole::Applicant,
            identity: identity.into(),
        }
    }
}

/// Canonical application shape both sources are projected onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedApplication {
    pub id: ApplicationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub position_title: String,
    pub company_name: String,
    pub location: String,
    pub position_type: PositionType,
    pub status: CanonicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub source_kind: SourceKind,
}
