use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationId, ApplicationSubmission};
use super::export::export_file_name;
use super::filter::ApplicationFilter;
use super::service::{ApplicationService, ApplicationServiceError};
use super::store::{ApplicationStore, StoreError};

/// Router builder exposing intake and review dashboard endpoints.
pub fn application_router<S>(service: Arc<ApplicationService<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/applications/summary", get(summary_handler::<S>))
        .route("/api/v1/applications/export", get(export_handler::<S>))
        .route(
            "/api/v1/applications/:application_id",
            get(detail_handler::<S>),
        )
        .route(
            "/api/v1/applications/:application_id/:action",
            post(status_action_handler::<S>),
        )
        .with_state(service)
}

fn error_response(err: ApplicationServiceError) -> Response {
    let status = match &err {
        ApplicationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        _ => {
            error!(error = %err, "application request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.submit(submission).await {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.list(&filter) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<S>(State(service): State<Arc<ApplicationService<S>>>) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let mut buffer = Vec::new();
    match service.export_csv(&filter, &mut buffer) {
        Ok(_) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_file_name(Utc::now().date_naive())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                buffer,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_action_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path((application_id, action)): Path<(String, String)>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let id = ApplicationId(application_id);
    let outcome = match action.as_str() {
        "approve" => service.approve(&id),
        "reject" => service.reject(&id),
        "block" => service.block(&id),
        "review" => service.mark_under_review(&id),
        other => {
            let payload = json!({ "error": format!("unknown action '{other}'") });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match outcome {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}
