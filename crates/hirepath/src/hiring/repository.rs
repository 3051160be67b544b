use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, InterviewFlow, InterviewFlowId,
    NewCandidate, Position, PositionId,
};

/// Storage abstraction handed to the service as a single shared handle.
///
/// Implementations own consistency of individual calls only; the service never
/// spans a transaction across two calls.
pub trait HiringRepository: Send + Sync {
    fn positions(&self) -> Result<Vec<Position>, RepositoryError>;
    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError>;
    fn interview_flow(&self, id: InterviewFlowId)
        -> Result<Option<InterviewFlow>, RepositoryError>;
    fn applications_for_position(
        &self,
        id: PositionId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn candidates(&self, ids: &[CandidateId]) -> Result<Vec<Candidate>, RepositoryError>;
    /// Persist a new candidate. Duplicate e-mail addresses yield `Conflict`.
    fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("no {0} ids left to allocate")]
    IdsExhausted(&'static str),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
