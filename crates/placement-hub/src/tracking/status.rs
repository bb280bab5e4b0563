use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unified status vocabulary used for display and filtering.
///
/// The direct-application backend persists a narrower vocabulary; the pairs
/// `reviewed`/`reviewing`, `shortlisted`/`interviewed`, and `hired`/`accepted`
/// translate between the two on every read and write. Values outside the
/// canonical set (internship listing states such as `approved`) pass through
/// untouched as [`CanonicalStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalStatus {
    Pending,
    Reviewing,
    Shortlisted,
    Interviewed,
    Accepted,
    Rejected,
    Hired,
    Other(String),
}

/// Canonical members in display order, passthrough values excluded.
pub const CANONICAL_ORDER: [CanonicalStatus; 7] = [
    CanonicalStatus::Pending,
    CanonicalStatus::Reviewing,
    CanonicalStatus::Shortlisted,
    CanonicalStatus::Interviewed,
    CanonicalStatus::Accepted,
    CanonicalStatus::Rejected,
    CanonicalStatus::Hired,
];

impl CanonicalStatus {
    /// Display label; `Other` yields the preserved raw value.
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalStatus::Pending => "pending",
            CanonicalStatus::Reviewing => "reviewing",
            CanonicalStatus::Shortlisted => "shortlisted",
            CanonicalStatus::Interviewed => "interviewed",
            CanonicalStatus::Accepted => "accepted",
            CanonicalStatus::Rejected => "rejected",
            CanonicalStatus::Hired => "hired",
            CanonicalStatus::Other(value) => value,
        }
    }

    /// Maps a caller-supplied label onto the canonical set. Unrecognized
    /// labels become `Other` rather than an error; no backend translation
    /// happens here.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => CanonicalStatus::Pending,
            "reviewing" => CanonicalStatus::Reviewing,
            "shortlisted" => CanonicalStatus::Shortlisted,
            "interviewed" => CanonicalStatus::Interviewed,
            "accepted" => CanonicalStatus::Accepted,
            "rejected" => CanonicalStatus::Rejected,
            "hired" => CanonicalStatus::Hired,
            other => CanonicalStatus::Other(other.to_string()),
        }
    }

    /// Normalizes a raw backend status on read: the narrow direct-backend
    /// words map to their display equivalents, a missing or empty value
    /// defaults to pending, and anything unrecognized passes through.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return CanonicalStatus::Pending;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CanonicalStatus::Pending;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "reviewed" => CanonicalStatus::Reviewing,
            "shortlisted" => CanonicalStatus::Interviewed,
            "hired" => CanonicalStatus::Accepted,
            other => CanonicalStatus::parse(other),
        }
    }

    /// Value written to the direct-application backend for this status, the
    /// reverse side of the read translation. Labels outside the translated
    /// pairs are written verbatim.
    pub fn direct_backend_value(&self) -> &str {
        match self {
            CanonicalStatus::Reviewing => "reviewed",
            CanonicalStatus::Interviewed => "shortlisted",
            CanonicalStatus::Accepted => "hired",
            CanonicalStatus::Pending
            | CanonicalStatus::Shortlisted
            | CanonicalStatus::Rejected
            | CanonicalStatus::Hired => self.as_str(),
            CanonicalStatus::Other(value) => value,
        }
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CanonicalStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CanonicalStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(CanonicalStatus::parse(&value))
    }
}
