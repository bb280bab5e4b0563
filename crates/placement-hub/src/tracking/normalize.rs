use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::domain::{ApplicationId, NormalizedApplication, PositionType, SourceKind};
use super::sources::{DirectApplicationRecord, InternshipRecord};
use super::status::CanonicalStatus;

/// Sentinel title used when no source field resolves to a usable value.
pub const UNKNOWN_POSITION: &str = "Unknown Position";

/// Projects a direct-application record onto the canonical shape. Total:
/// every missing field falls back to a default or sentinel, never an error.
pub fn normalize_direct(record: &DirectApplicationRecord) -> NormalizedApplication {
    let position_title = first_non_empty(&[
        record.title.as_deref(),
        record.job.as_ref().and_then(|posting| posting.title.as_deref()),
        record
            .internship
            .as_ref()
            .and_then(|posting| posting.title.as_deref()),
    ])
    .unwrap_or(UNKNOWN_POSITION)
    .to_string();

    let company_name = first_non_empty(&[
        record.company_name.as_deref(),
        record
            .job
            .as_ref()
            .and_then(|posting| posting.company_name.as_deref()),
        record
            .internship
            .as_ref()
            .and_then(|posting| posting.company_name.as_deref()),
    ])
    .unwrap_or_default()
    .to_string();

    let location = first_non_empty(&[
        record.location.as_deref(),
        record
            .job
            .as_ref()
            .and_then(|posting| posting.location.as_deref()),
        record
            .internship
            .as_ref()
            .and_then(|posting| posting.location.as_deref()),
    ])
    .unwrap_or_default()
    .to_string();

    NormalizedApplication {
        id: ApplicationId(record.id.clone()),
        display_name: non_empty(record.applicant_name.as_deref()),
        position_title,
        company_name,
        location,
        position_type: direct_position_type(record),
        status: CanonicalStatus::from_raw(record.status.as_deref()),
        created_at: parse_created_at(record.created_date.as_deref()),
        contact_email: non_empty(record.applicant_email.as_deref()),
        contact_phone: non_empty(record.phone.as_deref()),
        resume_url: non_empty(record.resume_url.as_deref()),
        cover_letter: non_empty(record.cover_letter.as_deref()),
        source_kind: SourceKind::DirectApplication,
    }
}

/// Reinterprets an internship posting as an application record. The poster
/// stands in for the applicant and the listing state rides through the
/// status field unchanged.
pub fn normalize_internship(record: &InternshipRecord) -> NormalizedApplication {
    NormalizedApplication {
        id: ApplicationId(record.id.clone()),
        display_name: non_empty(record.poster_name.as_deref()),
        position_title: non_empty(record.title.as_deref())
            .unwrap_or_else(|| UNKNOWN_POSITION.to_string()),
        company_name: non_empty(record.company.as_deref()).unwrap_or_default(),
        location: non_empty(record.location.as_deref()).unwrap_or_default(),
        position_type: PositionType::Internship,
        status: CanonicalStatus::from_raw(record.status.as_deref()),
        created_at: parse_created_at(record.created_date.as_deref()),
        contact_email: non_empty(record.posted_by.as_deref()),
        contact_phone: None,
        resume_url: None,
        cover_letter: None,
        source_kind: SourceKind::InternshipEntity,
    }
}

/// Full source record serialized for the opaque payload table.
pub fn raw_payload<T: serde::Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates; anything else
/// yields `None` and the record sorts last.
pub(crate) fn parse_created_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn direct_position_type(record: &DirectApplicationRecord) -> PositionType {
    if let Some(kind) = record
        .application_type
        .as_deref()
        .and_then(PositionType::parse)
    {
        return kind;
    }
    if record.internship_id.is_some() || record.internship.is_some() {
        PositionType::Internship
    } else {
        PositionType::Job
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}
