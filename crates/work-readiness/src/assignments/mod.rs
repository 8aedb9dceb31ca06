//! Work-readiness assignment scheduling guarded against overdue and unresolved pending work.

pub mod domain;
mod guard;
pub mod repository;
pub mod router;
pub mod service;
mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    AssignmentId, AssignmentRecord, AssignmentStatus, BatchAssignmentRequest, WorkerId,
};
pub use guard::{AssignmentConflictGuard, AssignmentRejection, RejectionReason};
pub use repository::{AssignmentRepository, RepositoryError, SlotConflict};
pub use router::assignment_router;
pub use service::{AssignmentServiceError, BatchAssignmentOutcome, WorkReadinessService};
