use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::aggregate::{run_pass, AggregationPass};
use super::domain::{ActorContext, ApplicationId, NormalizedApplication, SourceKind};
use super::selection::SelectionManager;
use super::sources::{DirectApplicationSource, InternshipSource, SourceError};
use super::status::CanonicalStatus;
use super::view::{self, StatusCount, ViewOptions};

/// Error raised by a single status mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusUpdateError {
    #[error("unknown application id: {0}")]
    UnknownApplication(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Per-id outcome of a failed bulk write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: ApplicationId,
    pub reason: String,
}

/// Settlement summary for one bulk mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkStatusReport {
    pub attempted: usize,
    pub updated: Vec<ApplicationId>,
    pub failed: Vec<BulkFailure>,
    pub reloaded: bool,
}

#[derive(Default)]
struct Board {
    records: Vec<NormalizedApplication>,
    raw_payloads: HashMap<ApplicationId, Value>,
    selection: SelectionManager,
    last_actor: Option<ActorContext>,
}

/// Coordinates aggregation passes, views, selection, and status writes
/// against the two owning backends.
///
/// The board holds whatever the most recently finished pass produced; there
/// is no sequencing between overlapping passes, so a slow older pass can
/// land after a newer one.
pub struct ApplicationTracker<D, I> {
    directs: Arc<D>,
    internships: Arc<I>,
    board: Mutex<Board>,
}

impl<D, I> ApplicationTracker<D, I>
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    pub fn new(directs: Arc<D>, internships: Arc<I>) -> Self {
        Self {
            directs,
            internships,
            board: Mutex::new(Board::default()),
        }
    }

    /// Runs an aggregation pass as the given actor and replaces the board
    /// with its output. Returns the fresh base collection.
    pub async fn aggregate(&self, actor: &ActorContext) -> Vec<NormalizedApplication> {
        let pass = run_pass(self.directs.as_ref(), self.internships.as_ref(), actor).await;
        self.install_pass(pass, actor.clone())
    }

    /// Filtered, sorted rendering of the current board.
    pub fn view(&self, options: &ViewOptions) -> Vec<NormalizedApplication> {
        let board = self.lock_board();
        view::apply(&board.records, options)
    }

    /// Unfiltered snapshot of the current board.
    pub fn records(&self) -> Vec<NormalizedApplication> {
        self.lock_board().records.clone()
    }

    /// Status tallies for the current board.
    pub fn status_summary(&self) -> Vec<StatusCount> {
        let board = self.lock_board();
        view::status_breakdown(&board.records)
    }

    /// Source payload preserved for a record, if the board knows the id.
    pub fn raw_payload(&self, id: &ApplicationId) -> Option<Value> {
        self.lock_board().raw_payloads.get(id).cloned()
    }

    /// Routes one status write to the owning backend, then patches the board
    /// copy. The board is only touched after the backend confirms; a failed
    /// write leaves it untouched.
    pub async fn set_status(
        &self,
        id: &ApplicationId,
        status: CanonicalStatus,
    ) -> Result<(), StatusUpdateError> {
        let source_kind = self
            .record_source_kind(id)
            .ok_or_else(|| StatusUpdateError::UnknownApplication(id.0.clone()))?;

        match self.write_status(source_kind, id, &status).await {
            Ok(()) => {
                let mut board = self.lock_board();
                if let Some(record) = board.records.iter_mut().find(|record| record.id == *id) {
                    record.status = status;
                }
                Ok(())
            }
            Err(err) => {
                warn!(id = %id.0, error = %err, "status write failed; board left unchanged");
                Err(StatusUpdateError::Source(err))
            }
        }
    }

    /// Fans out one write per id with no concurrency cap, settles all of
    /// them, then re-aggregates so the board reflects the backends'
    /// authoritative state. Per-id failures never cancel other writes.
    pub async fn set_status_bulk(
        &self,
        ids: &[ApplicationId],
        status: CanonicalStatus,
    ) -> BulkStatusReport {
        let (routed, mut failed) = self.route_ids(ids);

        let writes = routed.iter().map(|(id, source_kind)| {
            let status = status.clone();
            async move {
                let outcome = self.write_status(*source_kind, id, &status).await;
                (id.clone(), outcome)
            }
        });

        let mut updated = Vec::new();
        for (id, outcome) in join_all(writes).await {
            match outcome {
                Ok(()) => updated.push(id),
                Err(err) => {
                    warn!(id = %id.0, error = %err, "bulk status write failed");
                    failed.push(BulkFailure {
                        id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let reloaded = self.reload_after_bulk().await;

        BulkStatusReport {
            attempted: ids.len(),
            updated,
            failed,
            reloaded,
        }
    }

    /// Bulk mutation over the currently selected ids.
    pub async fn set_status_selected(&self, status: CanonicalStatus) -> BulkStatusReport {
        let ids = self.selected_ids();
        self.set_status_bulk(&ids, status).await
    }

    /// Flips one id in the selection; returns whether it is now selected.
    pub fn toggle_selection(&self, id: ApplicationId) -> bool {
        self.lock_board().selection.toggle(id)
    }

    /// Selects exactly the ids visible under the given view options,
    /// replacing any previous selection. Returns the selected ids.
    pub fn select_visible(&self, options: &ViewOptions) -> Vec<ApplicationId> {
        let mut board = self.lock_board();
        let visible: Vec<ApplicationId> = view::apply(&board.records, options)
            .into_iter()
            .map(|record| record.id)
            .collect();
        board.selection.select_all(visible.clone());
        visible
    }

    pub fn clear_selection(&self) {
        self.lock_board().selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<ApplicationId> {
        self.lock_board().selection.ids()
    }

    pub fn is_selected(&self, id: &ApplicationId) -> bool {
        self.lock_board().selection.is_selected(id)
    }

    fn install_pass(
        &self,
        pass: AggregationPass,
        actor: ActorContext,
    ) -> Vec<NormalizedApplication> {
        let mut board = self.lock_board();
        board.records = pass.records;
        board.raw_payloads = pass.raw_payloads;
        board.last_actor = Some(actor);
        board.records.clone()
    }

    fn record_source_kind(&self, id: &ApplicationId) -> Option<SourceKind> {
        self.lock_board()
            .records
            .iter()
            .find(|record| record.id == *id)
            .map(|record| record.source_kind)
    }

    /// The direct backend speaks the narrow vocabulary; the internship
    /// backend stores the canonical label as-is.
    async fn write_status(
        &self,
        source_kind: SourceKind,
        id: &ApplicationId,
        status: &CanonicalStatus,
    ) -> Result<(), SourceError> {
        match source_kind {
            SourceKind::DirectApplication => {
                self.directs
                    .set_status(&id.0, status.direct_backend_value())
                    .await
            }
            SourceKind::InternshipEntity => self.internships.set_status(&id.0, status.as_str()).await,
        }
    }

    fn route_ids(
        &self,
        ids: &[ApplicationId],
    ) -> (Vec<(ApplicationId, SourceKind)>, Vec<BulkFailure>) {
        let board = self.lock_board();
        let mut routed = Vec::new();
        let mut failed = Vec::new();
        for id in ids {
            match board.records.iter().find(|record| record.id == *id) {
                Some(record) => routed.push((id.clone(), record.source_kind)),
                None => failed.push(BulkFailure {
                    id: id.clone(),
                    reason: StatusUpdateError::UnknownApplication(id.0.clone()).to_string(),
                }),
            }
        }
        (routed, failed)
    }

    async fn reload_after_bulk(&self) -> bool {
        let actor = self.lock_board().last_actor.clone();
        match actor {
            Some(actor) => {
                self.aggregate(&actor).await;
                true
            }
            None => false,
        }
    }

    fn lock_board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().expect("board mutex poisoned")
    }
}
