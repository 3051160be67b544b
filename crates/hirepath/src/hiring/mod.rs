//! Positions, interview flows, candidates, and the stage-transition workflow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, BoardCandidate, Candidate, CandidateId, Interview, InterviewFlow,
    InterviewFlowId, InterviewStep, InterviewStepId, NewCandidate, Position, PositionFlowView,
    PositionId, PositionStatus,
};
pub use repository::{HiringRepository, RepositoryError};
pub use router::hiring_router;
pub use seed::{HiringSnapshot, SeedError};
pub use service::{Entity, HiringError, HiringService};
pub use store::InMemoryHiringStore;
pub use validation::{StageTransition, StageUpdatePayload, ValidationError};
