//! Client-side kanban board for a single position.
//!
//! The board holds the flow's steps and the candidate cards fetched from the
//! backend. Moves are applied locally first and described by a [`PendingMove`],
//! which the caller persists and, on failure, hands back to
//! [`PositionBoard::rollback`].

use crate::hiring::domain::{
    ApplicationId, BoardCandidate, CandidateId, InterviewStep, InterviewStepId, PositionFlowView,
};

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("no column named '{0}' on this board")]
    UnknownStep(String),
    #[error("candidate {0} is not on this board")]
    UnknownCandidate(CandidateId),
}

/// Where a card was dropped: a column (by step name) and a column-relative index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub step_name: String,
    pub index: usize,
}

impl DropTarget {
    pub fn new(step_name: impl Into<String>, index: usize) -> Self {
        Self {
            step_name: step_name.into(),
            index,
        }
    }
}

/// A local move that has not been confirmed by the backend yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub candidate_id: CandidateId,
    pub application_id: ApplicationId,
    pub from_step: String,
    pub from_index: usize,
    pub to_step: String,
    pub to_step_id: InterviewStepId,
    restore_at: usize,
}

impl PendingMove {
    /// Reorders inside a column are display-only; only stage changes are persisted.
    pub fn changes_stage(&self) -> bool {
        self.from_step != self.to_step
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn<'a> {
    pub step: &'a InterviewStep,
    pub cards: Vec<&'a BoardCandidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionBoard {
    position_name: String,
    steps: Vec<InterviewStep>,
    cards: Vec<BoardCandidate>,
}

impl PositionBoard {
    pub fn new(detail: PositionFlowView, cards: Vec<BoardCandidate>) -> Self {
        let steps = detail.interview_flow.ordered_steps();
        Self {
            position_name: detail.position_name,
            steps,
            cards,
        }
    }

    pub fn position_name(&self) -> &str {
        &self.position_name
    }

    pub fn card(&self, candidate_id: CandidateId) -> Option<&BoardCandidate> {
        self.cards.iter().find(|card| card.id == candidate_id)
    }

    /// One column per step in flow order. Cards whose step is not in the flow are not shown.
    pub fn columns(&self) -> Vec<BoardColumn<'_>> {
        self.steps
            .iter()
            .map(|step| BoardColumn {
                step,
                cards: self
                    .cards
                    .iter()
                    .filter(|card| card.current_interview_step == step.name)
                    .collect(),
            })
            .collect()
    }

    /// Apply a drag-and-drop move locally.
    ///
    /// Returns `Ok(None)` when the card is dropped back where it started.
    pub fn move_card(
        &mut self,
        candidate_id: CandidateId,
        target: DropTarget,
    ) -> Result<Option<PendingMove>, BoardError> {
        let step = self
            .steps
            .iter()
            .find(|step| step.name == target.step_name)
            .cloned()
            .ok_or_else(|| BoardError::UnknownStep(target.step_name.clone()))?;

        let (restore_at, from_step, from_index) = self.location(candidate_id)?;
        if from_step == step.name && from_index == target.index {
            return Ok(None);
        }

        let mut card = self.cards.remove(restore_at);
        card.current_interview_step = step.name.clone();
        let application_id = card.application_id;
        self.insert_into_column(card, target.index);

        Ok(Some(PendingMove {
            candidate_id,
            application_id,
            from_step,
            from_index,
            to_step: step.name,
            to_step_id: step.id,
            restore_at,
        }))
    }

    /// Undo a move whose persistence failed, putting the card back where it was taken from.
    pub fn rollback(&mut self, pending: &PendingMove) -> Result<(), BoardError> {
        let global = self
            .cards
            .iter()
            .position(|card| card.id == pending.candidate_id)
            .ok_or(BoardError::UnknownCandidate(pending.candidate_id))?;

        let mut card = self.cards.remove(global);
        card.current_interview_step = pending.from_step.clone();
        let restore_at = pending.restore_at.min(self.cards.len());
        self.cards.insert(restore_at, card);
        Ok(())
    }

    /// Global position, step name, and column-relative index of a card.
    fn location(&self, candidate_id: CandidateId) -> Result<(usize, String, usize), BoardError> {
        let global = self
            .cards
            .iter()
            .position(|card| card.id == candidate_id)
            .ok_or(BoardError::UnknownCandidate(candidate_id))?;
        let step = self.cards[global].current_interview_step.clone();
        let index = self.cards[..global]
            .iter()
            .filter(|card| card.current_interview_step == step)
            .count();
        Ok((global, step, index))
    }

    fn insert_into_column(&mut self, card: BoardCandidate, index: usize) {
        let column: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.current_interview_step == card.current_interview_step)
            .map(|(position, _)| position)
            .collect();

        let insert_at = match column.get(index) {
            Some(position) => *position,
            None => column.last().map_or(self.cards.len(), |last| last + 1),
        };
        self.cards.insert(insert_at, card);
    }
}

/// Average score as a whole number of stars, rounded and clamped to `0..=5`.
pub fn star_rating(score: f32) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    score.round().clamp(0.0, f32::from(MAX_STARS)) as u8
}

/// Five-glyph rendering of a score, filled stars first.
pub fn stars(score: f32) -> String {
    let filled = usize::from(star_rating(score));
    let empty = usize::from(MAX_STARS) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}
