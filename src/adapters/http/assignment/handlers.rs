//! HTTP handlers for assignment endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::assignment::{
    AssignBatchCommand, AssignBatchHandler, AssignPersonaCommand, AssignPersonaHandler,
    GetAssignmentsHandler, GetAssignmentsQuery, GetSummaryHandler, GetSummaryQuery,
    RecordOverrideCommand, RecordOverrideHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, UserId, WindowDays};

use super::dto::{
    AssignBatchRequest, AssignRequest, AssignmentHistoryParams, AssignmentResponse,
    BatchFailure, BatchResponse, ErrorResponse, OverrideRequest, SummaryParams,
    SummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AssignmentHandlers {
    assign_handler: Arc<AssignPersonaHandler>,
    batch_handler: Arc<AssignBatchHandler>,
    override_handler: Arc<RecordOverrideHandler>,
    history_handler: Arc<GetAssignmentsHandler>,
    summary_handler: Arc<GetSummaryHandler>,
}

impl AssignmentHandlers {
    pub fn new(
        assign_handler: Arc<AssignPersonaHandler>,
        batch_handler: Arc<AssignBatchHandler>,
        override_handler: Arc<RecordOverrideHandler>,
        history_handler: Arc<GetAssignmentsHandler>,
        summary_handler: Arc<GetSummaryHandler>,
    ) -> Self {
        Self {
            assign_handler,
            batch_handler,
            override_handler,
            history_handler,
            summary_handler,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Response> {
    UserId::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response()
    })
}

fn parse_window(raw: u32) -> Result<WindowDays, Response> {
    WindowDays::try_from(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/assignments - Run one assignment
pub async fn assign_persona(
    State(handlers): State<AssignmentHandlers>,
    Json(req): Json<AssignRequest>,
) -> Response {
    let user_id = match parse_user_id(&req.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let window_days = match parse_window(req.window_days) {
        Ok(w) => w,
        Err(response) => return response,
    };

    let cmd = AssignPersonaCommand {
        user_id,
        window_days,
        reference_date: req.reference_date,
    };

    match handlers.assign_handler.handle(cmd).await {
        Ok(assignment) => {
            let response: AssignmentResponse = assignment.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_assignment_error(e),
    }
}

/// POST /api/assignments/batch - Run assignment for many users
pub async fn assign_batch(
    State(handlers): State<AssignmentHandlers>,
    Json(req): Json<AssignBatchRequest>,
) -> Response {
    let window_days = match parse_window(req.window_days) {
        Ok(w) => w,
        Err(response) => return response,
    };
    let mut user_ids = Vec::with_capacity(req.user_ids.len());
    for raw in &req.user_ids {
        match parse_user_id(raw) {
            Ok(id) => user_ids.push(id),
            Err(response) => return response,
        }
    }

    let outcome = handlers
        .batch_handler
        .handle(AssignBatchCommand {
            user_ids,
            window_days,
            reference_date: req.reference_date,
        })
        .await;

    let response = BatchResponse {
        assignments: outcome
            .assignments
            .into_iter()
            .map(AssignmentResponse::from)
            .collect(),
        failures: outcome
            .failures
            .into_iter()
            .map(|(user_id, error)| BatchFailure {
                user_id: user_id.to_string(),
                code: error.code.to_string(),
                message: error.message,
            })
            .collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/assignments/override - Force a persona
pub async fn record_override(
    State(handlers): State<AssignmentHandlers>,
    Json(req): Json<OverrideRequest>,
) -> Response {
    let user_id = match parse_user_id(&req.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let window_days = match parse_window(req.window_days) {
        Ok(w) => w,
        Err(response) => return response,
    };

    let cmd = RecordOverrideCommand {
        user_id,
        window_days,
        reference_date: req.reference_date,
        persona_id: req.persona_id,
        reason: req.reason,
    };

    match handlers.override_handler.handle(cmd).await {
        Ok(assignment) => {
            let response: AssignmentResponse = assignment.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_assignment_error(e),
    }
}

/// GET /api/assignments - Assignment history
pub async fn get_assignments(
    State(handlers): State<AssignmentHandlers>,
    Query(params): Query<AssignmentHistoryParams>,
) -> Response {
    let user_id = match parse_user_id(&params.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let window_days = match params.window_days {
        Some(raw) => match parse_window(raw) {
            Ok(w) => Some(w),
            Err(response) => return response,
        },
        None => None,
    };

    let query = GetAssignmentsQuery {
        user_id,
        window_days,
    };

    match handlers.history_handler.handle(query).await {
        Ok(history) => {
            let response: Vec<AssignmentResponse> =
                history.into_iter().map(AssignmentResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_assignment_error(e),
    }
}

/// GET /api/summary - Freshly computed behavioral summary
pub async fn get_summary(
    State(handlers): State<AssignmentHandlers>,
    Query(params): Query<SummaryParams>,
) -> Response {
    let user_id = match parse_user_id(&params.user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let window_days = match parse_window(params.window_days) {
        Ok(w) => w,
        Err(response) => return response,
    };

    let query = GetSummaryQuery {
        user_id,
        window_days,
        reference_date: params.reference_date,
    };

    match handlers.summary_handler.handle(query).await {
        Ok(summary) => {
            let response: SummaryResponse = summary.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_assignment_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_assignment_error(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
        ErrorCode::PersonaNotFound | ErrorCode::AssignmentNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorResponse {
        code: error.code.to_string(),
        message: error.message,
        details: if error.details.is_empty() {
            None
        } else {
            serde_json::to_value(&error.details).ok()
        },
    };
    (status, Json(body)).into_response()
}
