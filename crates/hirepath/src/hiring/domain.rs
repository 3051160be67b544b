use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a job opening.
    PositionId
);
numeric_id!(
    /// Identifier of an interview flow (the pipeline a position follows).
    InterviewFlowId
);
numeric_id!(
    /// Identifier of a single stage inside an interview flow.
    InterviewStepId
);
numeric_id!(CandidateId);
numeric_id!(
    /// Identifier of the candidate/position join record that carries the current stage.
    ApplicationId
);

/// Lifecycle label of a position. No transition rules apply between values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionStatus {
    Open,
    Hired,
    Closed,
    Draft,
}

impl PositionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Hired => "Hired",
            Self::Closed => "Closed",
            Self::Draft => "Draft",
        }
    }
}

/// A job opening and the interview flow its candidates move through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub job_description: String,
    #[serde(default)]
    pub location: String,
    pub application_deadline: DateTime<Utc>,
    pub status: PositionStatus,
    pub interview_flow_id: InterviewFlowId,
}

/// One named stage of a flow; `order_index` only drives display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStep {
    pub id: InterviewStepId,
    pub interview_flow_id: InterviewFlowId,
    pub name: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlow {
    pub id: InterviewFlowId,
    pub description: String,
    pub interview_steps: Vec<InterviewStep>,
}

impl InterviewFlow {
    /// Steps sorted by `order_index`, ties broken by id.
    pub fn ordered_steps(&self) -> Vec<InterviewStep> {
        let mut steps = self.interview_steps.clone();
        steps.sort_by_key(|step| (step.order_index, step.id));
        steps
    }

    pub fn step(&self, id: InterviewStepId) -> Option<&InterviewStep> {
        self.interview_steps.iter().find(|step| step.id == id)
    }

    pub fn contains_step(&self, id: InterviewStepId) -> bool {
        self.step(id).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Payload accepted by candidate creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A scored (or not yet scored) interview held for an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub interview_step_id: InterviewStepId,
    pub interview_date: NaiveDate,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Join between a candidate and a position. The pipeline stage lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub position_id: PositionId,
    pub candidate_id: CandidateId,
    pub application_date: NaiveDate,
    pub current_interview_step: InterviewStepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
}

impl Application {
    /// Mean of the scored interviews, `0.0` when nothing has been scored yet.
    pub fn average_score(&self) -> f32 {
        let scores: Vec<f32> = self
            .interviews
            .iter()
            .filter_map(|interview| interview.score)
            .map(f32::from)
            .collect();

        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        }
    }
}

/// `GET /positions/:id/interview-flow` projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionFlowView {
    pub position_name: String,
    pub interview_flow: InterviewFlow,
}

/// `GET /positions/:id/candidates` element: one card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCandidate {
    pub id: CandidateId,
    pub full_name: String,
    /// Name of the step, matching one of the flow's step names.
    pub current_interview_step: String,
    pub average_score: f32,
    pub application_id: ApplicationId,
}
