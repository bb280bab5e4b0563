//! Application aggregation and status synchronization.
//!
//! Two backends feed this module: direct applications submitted against
//! postings, and internship postings the portal also tracks as applications.
//! The submodules project both shapes onto one canonical record, merge them
//! into a recency-sorted board, serve filtered views of it, and route status
//! writes back to whichever backend owns each record.

pub mod aggregate;
pub mod domain;
pub mod normalize;
pub mod router;
pub mod selection;
pub mod sources;
pub mod status;
pub mod tracker;
pub mod view;

#[cfg(test)]
mod tests;

pub use aggregate::{run_pass, AggregationPass};
pub use domain::{
    ActorContext, ActorRole, ApplicationId, NormalizedApplication, PositionType, SourceKind,
};
pub use normalize::{normalize_direct, normalize_internship};
pub use router::tracking_router;
pub use selection::SelectionManager;
pub use sources::{
    DirectApplicationRecord, DirectApplicationSource, InternshipQuery, InternshipRecord,
    InternshipSource, PostingRef, SourceError,
};
pub use status::CanonicalStatus;
pub use tracker::{ApplicationTracker, BulkFailure, BulkStatusReport, StatusUpdateError};
pub use view::{status_breakdown, SortKey, StatusCount, ViewOptions};
