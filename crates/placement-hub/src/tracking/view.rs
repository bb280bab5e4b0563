use serde::Serialize;

use super::domain::{NormalizedApplication, PositionType};
use super::status::{CanonicalStatus, CANONICAL_ORDER};

/// Sort keys the caller may request. Recency keeps the aggregator's order
/// rather than re-sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Recency,
    Name,
    Position,
}

/// Filter and sort input for one rendering of the board. `None` means the
/// dimension is unfiltered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    pub search: Option<String>,
    pub status: Option<CanonicalStatus>,
    pub position_type: Option<PositionType>,
    pub sort: SortKey,
}

/// Applies filters and the requested sort to the base collection without
/// touching it. Pure and idempotent: the same options against the same base
/// always yield the same output.
pub fn apply(base: &[NormalizedApplication], options: &ViewOptions) -> Vec<NormalizedApplication> {
    let mut records: Vec<NormalizedApplication> = base
        .iter()
        .filter(|record| matches_filters(record, options))
        .cloned()
        .collect();

    match options.sort {
        SortKey::Recency => {}
        SortKey::Name => records.sort_by_key(|record| {
            record
                .display_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
        }),
        SortKey::Position => records.sort_by_key(|record| record.position_title.to_lowercase()),
    }

    records
}

/// Per-status record count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: CanonicalStatus,
    pub count: usize,
}

/// Tallies the collection by status: canonical members first in display
/// order, passthrough values after them alphabetically. Absent statuses are
/// omitted.
pub fn status_breakdown(records: &[NormalizedApplication]) -> Vec<StatusCount> {
    let mut counts = Vec::new();
    for status in CANONICAL_ORDER {
        let count = records
            .iter()
            .filter(|record| record.status == status)
            .count();
        if count > 0 {
            counts.push(StatusCount { status, count });
        }
    }

    let mut passthrough: Vec<&str> = records
        .iter()
        .filter_map(|record| match &record.status {
            CanonicalStatus::Other(label) => Some(label.as_str()),
            _ => None,
        })
        .collect();
    passthrough.sort_unstable();
    passthrough.dedup();

    for label in passthrough {
        let count = records
            .iter()
            .filter(|record| record.status.as_str() == label)
            .count();
        counts.push(StatusCount {
            status: CanonicalStatus::Other(label.to_string()),
            count,
        });
    }

    counts
}

fn matches_filters(record: &NormalizedApplication, options: &ViewOptions) -> bool {
    if let Some(search) = options.search.as_deref() {
        let term = search.trim().to_lowercase();
        if !term.is_empty() && !matches_search(record, &term) {
            return false;
        }
    }
    if let Some(status) = &options.status {
        if record.status != *status {
            return false;
        }
    }
    if let Some(position_type) = options.position_type {
        if record.position_type != position_type {
            return false;
        }
    }
    true
}

fn matches_search(record: &NormalizedApplication, term: &str) -> bool {
    let fields = [
        record.display_name.as_deref().unwrap_or_default(),
        record.position_title.as_str(),
        record.company_name.as_str(),
    ];
    fields.iter().any(|field| field.to_lowercase().contains(term))
}
