//! HTTP surface for assignments and summaries.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AssignmentHandlers;
pub use routes::assignment_routes;
