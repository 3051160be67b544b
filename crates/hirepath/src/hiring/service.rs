use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    Application, BoardCandidate, Candidate, CandidateId, InterviewFlow, NewCandidate, Position,
    PositionFlowView, PositionId,
};
use super::repository::{HiringRepository, RepositoryError};
use super::validation::{validate_new_candidate, StageTransition, ValidationError};

/// Entities that can be reported missing to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Position,
    InterviewFlow,
    Candidate,
    Application,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::Position => "Position",
            Entity::InterviewFlow => "Interview flow",
            Entity::Candidate => "Candidate",
            Entity::Application => "Application",
        };
        f.write_str(label)
    }
}

/// Error raised by the hiring service.
#[derive(Debug, thiserror::Error)]
pub enum HiringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(Entity),
    #[error(transparent)]
    Internal(#[from] RepositoryError),
}

/// Every backend operation, composed over one injected repository handle.
pub struct HiringService<R> {
    repository: Arc<R>,
}

impl<R> HiringService<R>
where
    R: HiringRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list_positions(&self) -> Result<Vec<Position>, HiringError> {
        let mut positions = self.repository.positions()?;
        positions.sort_by_key(|position| position.id);
        Ok(positions)
    }

    /// Position name plus its interview flow with steps in display order.
    pub fn interview_flow(&self, position_id: PositionId) -> Result<PositionFlowView, HiringError> {
        let (position, flow) = self.position_with_flow(position_id)?;
        let interview_steps = flow.ordered_steps();

        Ok(PositionFlowView {
            position_name: position.title,
            interview_flow: InterviewFlow {
                interview_steps,
                ..flow
            },
        })
    }

    /// Board cards for a position: each application with its candidate, step name, and score.
    pub fn position_candidates(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<BoardCandidate>, HiringError> {
        let (_, flow) = self.position_with_flow(position_id)?;
        let applications = self.repository.applications_for_position(position_id)?;

        let candidate_ids: Vec<CandidateId> = applications
            .iter()
            .map(|application| application.candidate_id)
            .collect();
        let candidates: BTreeMap<CandidateId, Candidate> = self
            .repository
            .candidates(&candidate_ids)?
            .into_iter()
            .map(|candidate| (candidate.id, candidate))
            .collect();

        let mut cards = Vec::with_capacity(applications.len());
        for application in applications {
            let Some(step) = flow.step(application.current_interview_step) else {
                warn!(
                    application_id = %application.id,
                    step_id = %application.current_interview_step,
                    %position_id,
                    "application step is outside the position's flow; omitting from board"
                );
                continue;
            };
            let Some(candidate) = candidates.get(&application.candidate_id) else {
                warn!(
                    application_id = %application.id,
                    candidate_id = %application.candidate_id,
                    "application references a missing candidate; omitting from board"
                );
                continue;
            };

            cards.push(BoardCandidate {
                id: candidate.id,
                full_name: candidate.full_name(),
                current_interview_step: step.name.clone(),
                average_score: application.average_score(),
                application_id: application.id,
            });
        }

        cards.sort_by_key(|card| card.application_id);
        Ok(cards)
    }

    pub fn add_candidate(&self, candidate: NewCandidate) -> Result<Candidate, HiringError> {
        validate_new_candidate(&candidate)?;

        let created = self
            .repository
            .insert_candidate(candidate)
            .map_err(|err| match err {
                RepositoryError::Conflict => HiringError::from(ValidationError::DuplicateEmail),
                other => HiringError::from(other),
            })?;

        info!(candidate_id = %created.id, "candidate created");
        Ok(created)
    }

    pub fn candidate(&self, id: CandidateId) -> Result<Candidate, HiringError> {
        self.repository
            .candidate(id)?
            .ok_or(HiringError::NotFound(Entity::Candidate))
    }

    /// Move an application to another step of its position's flow.
    ///
    /// The target step must belong to the flow; moving backwards is allowed.
    /// Concurrent updates to the same application are last-write-wins.
    pub fn update_candidate_stage(
        &self,
        transition: StageTransition,
    ) -> Result<Application, HiringError> {
        let StageTransition {
            candidate_id,
            application_id,
            interview_step_id,
        } = transition;

        let mut application = self
            .repository
            .application(application_id)?
            .ok_or(HiringError::NotFound(Entity::Application))?;

        if application.candidate_id != candidate_id {
            return Err(ValidationError::CandidateMismatch {
                application: application_id,
                candidate: candidate_id,
            }
            .into());
        }

        let (_, flow) = self.position_with_flow(application.position_id)?;
        if !flow.contains_step(interview_step_id) {
            return Err(ValidationError::StepNotInFlow {
                step: interview_step_id,
                position: application.position_id,
            }
            .into());
        }

        let previous_step = application.current_interview_step;
        application.current_interview_step = interview_step_id;

        self.repository
            .update_application(application.clone())
            .map_err(|err| match err {
                RepositoryError::NotFound => HiringError::NotFound(Entity::Application),
                other => HiringError::from(other),
            })?;

        info!(
            %application_id,
            %candidate_id,
            from = %previous_step,
            to = %interview_step_id,
            "candidate stage updated"
        );
        Ok(application)
    }

    fn position_with_flow(
        &self,
        position_id: PositionId,
    ) -> Result<(Position, InterviewFlow), HiringError> {
        let position = self
            .repository
            .position(position_id)?
            .ok_or(HiringError::NotFound(Entity::Position))?;
        let flow = self
            .repository
            .interview_flow(position.interview_flow_id)?
            .ok_or(HiringError::NotFound(Entity::InterviewFlow))?;
        Ok((position, flow))
    }
}
