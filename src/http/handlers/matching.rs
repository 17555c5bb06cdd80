use crate::domain::request::{AssignmentRequest, Frequency, Gender, OrgLevel, RentalCategory, RequestStatus};
use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

fn engine_error(e: EngineError) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code) = match &e {
        EngineError::Transient(_) => (StatusCode::BAD_GATEWAY, "RECORD_STORE_UNAVAILABLE"),
        EngineError::PartialCommit { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_COMMIT"),
        EngineError::ProposalNotFound(_) => (StatusCode::NOT_FOUND, "PROPOSAL_NOT_FOUND"),
        EngineError::IllegalTransition { .. } => (StatusCode::CONFLICT, "ILLEGAL_TRANSITION"),
    };
    (status, Json(err(code, &e.to_string())))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// Manual trigger: run one matching cycle now instead of waiting for the
/// periodic tick.
pub async fn run_matching(State(state): State<AppState>) -> impl IntoResponse {
    match state.scheduler.run_once().await {
        Ok(proposal) => {
            (StatusCode::OK, Json(serde_json::json!({ "proposal": proposal }))).into_response()
        }
        Err(e) => engine_error(e).into_response(),
    }
}

pub async fn get_proposal(State(state): State<AppState>) -> impl IntoResponse {
    let proposal = state.coordinator.outstanding().await;
    (StatusCode::OK, Json(serde_json::json!({ "proposal": proposal }))).into_response()
}

pub async fn confirm_proposal(
    State(state): State<AppState>,
    Path(proposal_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.coordinator.confirm(proposal_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "requestId": outcome.request_id,
                "assignedPlates": outcome.assigned_plates,
                "skippedPlates": outcome.skipped_plates,
                "numberOfCar": format!("{}/{}", outcome.fulfilled_count, outcome.requested_count),
                "fullyFulfilled": outcome.fully_fulfilled,
            })),
        )
            .into_response(),
        Err(e) => engine_error(e).into_response(),
    }
}

pub async fn reject_proposal(
    State(state): State<AppState>,
    Path(proposal_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.coordinator.reject(proposal_id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"rejected": true}))).into_response(),
        Err(e) => engine_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    pub request_letter_no: String,
    pub requester_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub request_date: String,
    pub position: String,
    #[serde(default)]
    pub rental_type: String,
    pub travel_work_percentage: String,
    pub short_notice_percentage: String,
    #[serde(default)]
    pub mobility_issue: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub selected_models: Vec<String>,
}

fn parse_level(position: &str) -> Option<OrgLevel> {
    match position.trim() {
        "Level 1" => Some(OrgLevel::Level1),
        "Level 2" => Some(OrgLevel::Level2),
        "Level 3" => Some(OrgLevel::Level3),
        "Level 4" => Some(OrgLevel::Level4),
        "Level 5" => Some(OrgLevel::Level5),
        _ => None,
    }
}

fn parse_frequency(raw: &str) -> Option<Frequency> {
    match raw.to_lowercase().as_str() {
        "low" => Some(Frequency::Low),
        "medium" => Some(Frequency::Medium),
        "high" => Some(Frequency::High),
        _ => None,
    }
}

/// Operator-submitted request: score, persist, and attempt an immediate
/// match. Level1 requests belong to the directorate allocation flow and are
/// refused here.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequestBody>,
) -> impl IntoResponse {
    let Some(level) = parse_level(&body.position) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("INVALID_POSITION", "position must be Level 1..Level 5")),
        )
            .into_response();
    };
    if level == OrgLevel::Level1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("LEVEL1_OUT_OF_SCOPE", "directorate requests use the multi-vehicle allocation flow")),
        )
            .into_response();
    }
    let (Some(travel), Some(notice)) = (
        parse_frequency(&body.travel_work_percentage),
        parse_frequency(&body.short_notice_percentage),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("INVALID_FREQUENCY", "frequencies must be low, medium, or high")),
        )
            .into_response();
    };
    if body.selected_models.len() > 3 {
        return (
            StatusCode::BAD_REQUEST,
            Json(err("TOO_MANY_MODELS", "at most 3 requested models")),
        )
            .into_response();
    }

    let requested_count = body.selected_models.len().max(1) as u32;
    let request = AssignmentRequest {
        id: Uuid::new_v4().to_string(),
        request_letter_no: body.request_letter_no,
        requester_name: body.requester_name,
        department: body.department,
        phone_number: body.phone_number,
        request_date: body.request_date,
        organizational_level: level,
        rental_category: match body.rental_type.to_lowercase().as_str() {
            "project" => RentalCategory::Project,
            "organizational" => RentalCategory::Organizational,
            _ => RentalCategory::Standard,
        },
        travel_frequency: travel,
        short_notice_frequency: notice,
        has_mobility_issue: body.mobility_issue.eq_ignore_ascii_case("yes"),
        gender: if body.gender.eq_ignore_ascii_case("female") {
            Gender::Female
        } else {
            Gender::Male
        },
        priority_score: 0,
        status: RequestStatus::Pending,
        requested_models: body.selected_models,
        assigned_vehicle_ids: vec![],
        fulfilled_count: 0,
        requested_count,
    };

    match state.coordinator.submit(request).await {
        Ok(Some(proposal)) => {
            (StatusCode::OK, Json(serde_json::json!({ "proposal": proposal }))).into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "proposal": null,
                "message": "No available automobiles matching criteria. The request has been saved and will be matched when a vehicle becomes available.",
            })),
        )
            .into_response(),
        Err(e) => engine_error(e).into_response(),
    }
}
