use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ActorContext, ActorRole, ApplicationId, PositionType};
use super::sources::{DirectApplicationSource, InternshipSource};
use super::status::CanonicalStatus;
use super::tracker::{ApplicationTracker, StatusUpdateError};
use super::view::{SortKey, ViewOptions};

/// HTTP surface over an [`ApplicationTracker`].
pub fn tracking_router<D, I>(tracker: Arc<ApplicationTracker<D, I>>) -> Router
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/aggregate",
            post(aggregate_endpoint::<D, I>),
        )
        .route("/api/v1/applications", get(view_endpoint::<D, I>))
        .route(
            "/api/v1/applications/summary",
            get(summary_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/status",
            post(bulk_status_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/selection",
            get(selection_endpoint::<D, I>).delete(clear_selection_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/selection/toggle",
            post(toggle_selection_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/selection/all",
            post(select_visible_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/:application_id/raw",
            get(raw_payload_endpoint::<D, I>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(status_endpoint::<D, I>),
        )
        .with_state(tracker)
}

/// Query parameters shared by the view and select-all endpoints. `all`
/// disables the status and type filters the same way an absent value does.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewQuery {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "type")]
    position_type: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

impl ViewQuery {
    fn into_options(self) -> ViewOptions {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
            .map(CanonicalStatus::parse);
        let position_type = self
            .position_type
            .as_deref()
            .and_then(PositionType::parse);
        let sort = match self.sort.as_deref().map(str::trim) {
            Some("name") => SortKey::Name,
            Some("position") => SortKey::Position,
            _ => SortKey::Recency,
        };

        ViewOptions {
            search: self.search,
            status,
            position_type,
            sort,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateRequest {
    role: ActorRole,
    identity: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: CanonicalStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkStatusRequest {
    #[serde(default)]
    ids: Option<Vec<String>>,
    status: CanonicalStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleRequest {
    id: String,
}

pub(crate) async fn aggregate_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    axum::Json(request): axum::Json<AggregateRequest>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let actor = ActorContext {
        role: request.role,
        identity: request.identity,
    };
    let records = tracker.aggregate(&actor).await;
    (StatusCode::OK, axum::Json(records)).into_response()
}

pub(crate) async fn view_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    Query(query): Query<ViewQuery>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let records = tracker.view(&query.into_options());
    (StatusCode::OK, axum::Json(records)).into_response()
}

pub(crate) async fn summary_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    (StatusCode::OK, axum::Json(tracker.status_summary())).into_response()
}

pub(crate) async fn raw_payload_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    Path(application_id): Path<String>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let id = ApplicationId(application_id);
    match tracker.raw_payload(&id) {
        Some(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
        None => unknown_application(&id.0),
    }
}

pub(crate) async fn status_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let id = ApplicationId(application_id);
    match tracker.set_status(&id, request.status.clone()).await {
        Ok(()) => {
            let body = axum::Json(json!({
                "id": id.0,
                "status": request.status.as_str(),
            }));
            (StatusCode::OK, body).into_response()
        }
        Err(StatusUpdateError::UnknownApplication(missing)) => unknown_application(&missing),
        Err(StatusUpdateError::Source(err)) => {
            let body = axum::Json(json!({ "error": err.to_string() }));
            (StatusCode::BAD_GATEWAY, body).into_response()
        }
    }
}

pub(crate) async fn bulk_status_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    axum::Json(request): axum::Json<BulkStatusRequest>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let report = match request.ids {
        Some(ids) => {
            let ids: Vec<ApplicationId> = ids.into_iter().map(ApplicationId).collect();
            tracker.set_status_bulk(&ids, request.status).await
        }
        None => tracker.set_status_selected(request.status).await,
    };
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn toggle_selection_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    axum::Json(request): axum::Json<ToggleRequest>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let selected = tracker.toggle_selection(ApplicationId(request.id.clone()));
    let body = axum::Json(json!({ "id": request.id, "selected": selected }));
    (StatusCode::OK, body).into_response()
}

pub(crate) async fn select_visible_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
    Query(query): Query<ViewQuery>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    let selected = tracker.select_visible(&query.into_options());
    (StatusCode::OK, axum::Json(selected)).into_response()
}

pub(crate) async fn selection_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    (StatusCode::OK, axum::Json(tracker.selected_ids())).into_response()
}

pub(crate) async fn clear_selection_endpoint<D, I>(
    State(tracker): State<Arc<ApplicationTracker<D, I>>>,
) -> Response
where
    D: DirectApplicationSource + 'static,
    I: InternshipSource + 'static,
{
    tracker.clear_selection();
    StatusCode::NO_CONTENT.into_response()
}

fn unknown_application(id: &str) -> Response {
    let body = axum::Json(json!({ "error": format!("unknown application id: {id}") }));
    (StatusCode::NOT_FOUND, body).into_response()
}
