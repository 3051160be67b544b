use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{CandidateId, NewCandidate, PositionId};
use super::repository::HiringRepository;
use super::service::{HiringError, HiringService};
use super::validation::{parse_id, StageTransition, StageUpdatePayload, ValidationError};

const INTERNAL_ERROR: &str = "Internal Server Error";

/// Router exposing positions, board data, and candidate endpoints.
pub fn hiring_router<R>(service: Arc<HiringService<R>>) -> Router
where
    R: HiringRepository + 'static,
{
    Router::new()
        .route("/positions", get(list_positions_handler::<R>))
        .route(
            "/positions/:id/candidates",
            get(position_candidates_handler::<R>),
        )
        .route(
            "/positions/:id/interview-flow",
            get(interview_flow_handler::<R>),
        )
        .route(
            "/candidates",
            axum::routing::post(add_candidate_handler::<R>),
        )
        .route(
            "/candidates/:id",
            get(candidate_handler::<R>).put(update_stage_handler::<R>),
        )
        .with_state(service)
}

fn error_body(status: StatusCode, error: impl Into<String>) -> Response {
    let error: String = error.into();
    (status, Json(json!({ "error": error }))).into_response()
}

fn message_body(status: StatusCode, message: &str, error: impl Into<String>) -> Response {
    let error: String = error.into();
    (status, Json(json!({ "message": message, "error": error }))).into_response()
}

pub(crate) async fn list_positions_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
) -> Response
where
    R: HiringRepository + 'static,
{
    match service.list_positions() {
        Ok(positions) => (StatusCode::OK, Json(positions)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to list positions");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching positions")
        }
    }
}

fn position_error(err: HiringError, operation: &'static str) -> Response {
    match err {
        HiringError::Validation(validation) => {
            error_body(StatusCode::BAD_REQUEST, validation.to_string())
        }
        HiringError::NotFound(entity) => {
            error_body(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        HiringError::Internal(err) => {
            error!(error = %err, operation, "position query failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

pub(crate) async fn position_candidates_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return position_error(ValidationError::InvalidId.into(), "position_candidates");
    };

    match service.position_candidates(PositionId(id)) {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(err) => position_error(err, "position_candidates"),
    }
}

pub(crate) async fn interview_flow_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return position_error(ValidationError::InvalidId.into(), "interview_flow");
    };

    match service.interview_flow(PositionId(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => position_error(err, "interview_flow"),
    }
}

pub(crate) async fn add_candidate_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
    payload: Result<Json<NewCandidate>, JsonRejection>,
) -> Response
where
    R: HiringRepository + 'static,
{
    const FAILURE: &str = "Error adding candidate";

    let candidate = match payload {
        Ok(Json(candidate)) => candidate,
        Err(rejection) => {
            let err = ValidationError::MalformedBody(rejection.body_text());
            return message_body(StatusCode::BAD_REQUEST, FAILURE, err.to_string());
        }
    };

    match service.add_candidate(candidate) {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Candidate added successfully",
                "data": created,
            })),
        )
            .into_response(),
        Err(HiringError::Validation(err)) => {
            message_body(StatusCode::BAD_REQUEST, FAILURE, err.to_string())
        }
        Err(err) => {
            error!(error = %err, "failed to add candidate");
            message_body(StatusCode::INTERNAL_SERVER_ERROR, FAILURE, INTERNAL_ERROR)
        }
    }
}

pub(crate) async fn candidate_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: HiringRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return error_body(
            StatusCode::BAD_REQUEST,
            ValidationError::InvalidId.to_string(),
        );
    };

    match service.candidate(CandidateId(id)) {
        Ok(candidate) => (StatusCode::OK, Json(candidate)).into_response(),
        Err(HiringError::NotFound(entity)) => {
            error_body(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        Err(HiringError::Validation(err)) => error_body(StatusCode::BAD_REQUEST, err.to_string()),
        Err(HiringError::Internal(err)) => {
            error!(error = %err, candidate_id = id, "failed to load candidate");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

pub(crate) async fn update_stage_handler<R>(
    State(service): State<Arc<HiringService<R>>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StageUpdatePayload>, JsonRejection>,
) -> Response
where
    R: HiringRepository + 'static,
{
    const FAILURE: &str = "Error updating candidate stage";

    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let err = ValidationError::MalformedBody(rejection.body_text());
            return message_body(StatusCode::BAD_REQUEST, FAILURE, err.to_string());
        }
    };

    let transition = match StageTransition::parse(&raw_id, &payload) {
        Ok(transition) => transition,
        Err(err) => return message_body(StatusCode::BAD_REQUEST, FAILURE, err.to_string()),
    };

    match service.update_candidate_stage(transition) {
        Ok(application) => (
            StatusCode::OK,
            Json(json!({
                "message": "Candidate stage updated successfully",
                "data": application,
            })),
        )
            .into_response(),
        Err(HiringError::NotFound(entity)) => {
            let message = format!("{entity} not found");
            message_body(StatusCode::NOT_FOUND, &message, message.clone())
        }
        Err(HiringError::Validation(err)) => {
            message_body(StatusCode::BAD_REQUEST, FAILURE, err.to_string())
        }
        Err(HiringError::Internal(err)) => {
            error!(
                error = %err,
                application_id = %transition.application_id,
                "failed to update candidate stage"
            );
            message_body(StatusCode::INTERNAL_SERVER_ERROR, FAILURE, INTERNAL_ERROR)
        }
    }
}
