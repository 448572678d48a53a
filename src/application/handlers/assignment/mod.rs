//! Assignment handlers - compute, batch, override, and read paths.

mod assign_batch;
mod assign_persona;
mod get_assignments;
mod get_summary;
mod record_override;

pub use assign_batch::{AssignBatchCommand, AssignBatchHandler, BatchOutcome};
pub use assign_persona::{AssignPersonaCommand, AssignPersonaHandler};
pub use get_assignments::{GetAssignmentsHandler, GetAssignmentsQuery};
pub use get_summary::{GetSummaryHandler, GetSummaryQuery};
pub use record_override::{RecordOverrideCommand, RecordOverrideHandler};
