//! HTTP routes for assignment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    assign_batch, assign_persona, get_assignments, get_summary, record_override,
    AssignmentHandlers,
};

/// Creates the assignment router with all endpoints.
pub fn assignment_routes(handlers: AssignmentHandlers) -> Router {
    Router::new()
        .route("/assignments", post(assign_persona))
        .route("/assignments", get(get_assignments))
        .route("/assignments/batch", post(assign_batch))
        .route("/assignments/override", post(record_override))
        .route("/summary", get(get_summary))
        .with_state(handlers)
}
