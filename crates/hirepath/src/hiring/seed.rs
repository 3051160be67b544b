//! JSON snapshot format used to hydrate the in-memory store.
//!
//! Positions and interview flows have no create endpoint, so every running
//! instance starts from a snapshot: either one loaded from disk or the bundled
//! demo data. Snapshots are validated before any record reaches the store, which
//! is where the "current step belongs to the position's flow" invariant is first
//! established.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, Interview, InterviewFlow,
    InterviewFlowId, InterviewStep, InterviewStepId, Position, PositionId, PositionStatus,
};

pub const MAX_INTERVIEW_SCORE: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringSnapshot {
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub interview_flows: Vec<InterviewFlow>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("unable to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: i64 },
    #[error("{entity} id {id} must be a positive integer")]
    NonPositiveId { entity: &'static str, id: i64 },
    #[error("flow {flow} has more than one step named '{name}'")]
    DuplicateStepName { flow: InterviewFlowId, name: String },
    #[error("position {position} references unknown interview flow {flow}")]
    UnknownFlow {
        position: PositionId,
        flow: InterviewFlowId,
    },
    #[error("step {step} is listed under flow {listed} but declares flow {declared}")]
    StepFlowMismatch {
        step: InterviewStepId,
        listed: InterviewFlowId,
        declared: InterviewFlowId,
    },
    #[error("application {application} references unknown position {position}")]
    UnknownPosition {
        application: ApplicationId,
        position: PositionId,
    },
    #[error("application {application} references unknown candidate {candidate}")]
    UnknownCandidate {
        application: ApplicationId,
        candidate: CandidateId,
    },
    #[error("application {application} is at step {step}, which is not part of its position's flow")]
    StepOutsideFlow {
        application: ApplicationId,
        step: InterviewStepId,
    },
    #[error("application {application} has an interview score of {score}, above the maximum of 5")]
    ScoreOutOfRange { application: ApplicationId, score: u8 },
}

impl HiringSnapshot {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check ids are positive and unique, step names are unique per flow, and
    /// every reference resolves.
    pub fn validate(&self) -> Result<(), SeedError> {
        ensure_unique("position", self.positions.iter().map(|p| p.id.0))?;
        ensure_unique("interview flow", self.interview_flows.iter().map(|f| f.id.0))?;
        ensure_unique(
            "interview step",
            self.interview_flows
                .iter()
                .flat_map(|flow| flow.interview_steps.iter().map(|step| step.id.0)),
        )?;
        ensure_unique("candidate", self.candidates.iter().map(|c| c.id.0))?;
        ensure_unique("application", self.applications.iter().map(|a| a.id.0))?;

        let flows: BTreeMap<InterviewFlowId, &InterviewFlow> = self
            .interview_flows
            .iter()
            .map(|flow| (flow.id, flow))
            .collect();

        for flow in &self.interview_flows {
            let mut names = BTreeSet::new();
            if let Some(step) = flow
                .interview_steps
                .iter()
                .find(|step| !names.insert(step.name.trim()))
            {
                return Err(SeedError::DuplicateStepName {
                    flow: flow.id,
                    name: step.name.clone(),
                });
            }
            if let Some(step) = flow
                .interview_steps
                .iter()
                .find(|step| step.interview_flow_id != flow.id)
            {
                return Err(SeedError::StepFlowMismatch {
                    step: step.id,
                    listed: flow.id,
                    declared: step.interview_flow_id,
                });
            }
        }

        let mut position_flows = BTreeMap::new();
        for position in &self.positions {
            let flow = flows
                .get(&position.interview_flow_id)
                .ok_or(SeedError::UnknownFlow {
                    position: position.id,
                    flow: position.interview_flow_id,
                })?;
            position_flows.insert(position.id, *flow);
        }

        let candidates: BTreeSet<CandidateId> = self.candidates.iter().map(|c| c.id).collect();

        for application in &self.applications {
            let flow = position_flows.get(&application.position_id).ok_or(
                SeedError::UnknownPosition {
                    application: application.id,
                    position: application.position_id,
                },
            )?;
            if !candidates.contains(&application.candidate_id) {
                return Err(SeedError::UnknownCandidate {
                    application: application.id,
                    candidate: application.candidate_id,
                });
            }
            if !flow.contains_step(application.current_interview_step) {
                return Err(SeedError::StepOutsideFlow {
                    application: application.id,
                    step: application.current_interview_step,
                });
            }
            if let Some(score) = application
                .interviews
                .iter()
                .filter_map(|interview| interview.score)
                .find(|score| *score > MAX_INTERVIEW_SCORE)
            {
                return Err(SeedError::ScoreOutOfRange {
                    application: application.id,
                    score,
                });
            }
        }

        Ok(())
    }

    /// Small data set used when no seed file is configured.
    pub fn demo() -> Self {
        let standard = InterviewFlowId(1);
        let engineering = InterviewFlowId(2);

        let step = |id: i64, flow: InterviewFlowId, name: &str, order_index: u32| InterviewStep {
            id: InterviewStepId(id),
            interview_flow_id: flow,
            name: name.to_string(),
            order_index,
        };

        let interview_flows = vec![
            InterviewFlow {
                id: standard,
                description: "Standard development process".to_string(),
                interview_steps: vec![
                    step(1, standard, "Initial Screening", 1),
                    step(2, standard, "Technical Interview", 2),
                    step(3, standard, "Manager Interview", 3),
                ],
            },
            InterviewFlow {
                id: engineering,
                description: "Engineering leadership process".to_string(),
                interview_steps: vec![
                    step(4, engineering, "Initial Screening", 1),
                    step(5, engineering, "System Design", 2),
                    step(6, engineering, "Executive Review", 3),
                    step(7, engineering, "Offer", 4),
                ],
            },
        ];

        let deadline = |year: i32, month: u32, day: u32| {
            Utc.with_ymd_and_hms(year, month, day, 23, 59, 59)
                .single()
                .unwrap_or_else(Utc::now)
        };

        let positions = vec![
            Position {
                id: PositionId(1),
                title: "Senior Full-Stack Engineer".to_string(),
                description: "Build and own the hiring platform end to end.".to_string(),
                job_description: "Full-stack development with Rust and TypeScript.".to_string(),
                location: "Remote".to_string(),
                application_deadline: deadline(2026, 12, 31),
                status: PositionStatus::Open,
                interview_flow_id: standard,
            },
            Position {
                id: PositionId(2),
                title: "Data Scientist".to_string(),
                description: "Model candidate funnel conversion.".to_string(),
                job_description: "Statistics, experimentation, and reporting.".to_string(),
                location: "Madrid".to_string(),
                application_deadline: deadline(2026, 11, 30),
                status: PositionStatus::Draft,
                interview_flow_id: standard,
            },
            Position {
                id: PositionId(3),
                title: "Engineering Manager".to_string(),
                description: "Lead the platform team.".to_string(),
                job_description: "People leadership and delivery ownership.".to_string(),
                location: "Barcelona".to_string(),
                application_deadline: deadline(2026, 10, 1),
                status: PositionStatus::Closed,
                interview_flow_id: engineering,
            },
        ];

        let candidate = |id: i64, first: &str, last: &str| Candidate {
            id: CandidateId(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!(
                "{}.{}@example.com",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone: None,
            address: None,
        };

        let candidates = vec![
            candidate(1, "John", "Doe"),
            candidate(2, "Jane", "Smith"),
            candidate(3, "Carlos", "Garcia"),
            candidate(4, "Amara", "Okafor"),
        ];

        let date = |month: u32, day: u32| {
            NaiveDate::from_ymd_opt(2026, month, day).unwrap_or(NaiveDate::MIN)
        };
        let scored = |step_id: i64, day: u32, score: u8| Interview {
            interview_step_id: InterviewStepId(step_id),
            interview_date: date(9, day),
            score: Some(score),
            notes: None,
        };

        let application =
            |id: i64, position: i64, candidate: i64, step: i64, interviews: Vec<Interview>| {
                Application {
                    id: ApplicationId(id),
                    position_id: PositionId(position),
                    candidate_id: CandidateId(candidate),
                    application_date: date(9, 1),
                    current_interview_step: InterviewStepId(step),
                    notes: None,
                    interviews,
                }
            };

        let applications = vec![
            application(1, 1, 1, 2, vec![scored(1, 5, 5)]),
            application(2, 1, 2, 2, vec![scored(1, 6, 4), scored(2, 12, 5)]),
            application(3, 1, 3, 1, Vec::new()),
            application(4, 2, 1, 1, Vec::new()),
            application(5, 3, 4, 5, vec![scored(4, 3, 3)]),
        ];

        Self {
            positions,
            interview_flows,
            candidates,
            applications,
        }
    }
}

fn ensure_unique(
    entity: &'static str,
    ids: impl Iterator<Item = i64>,
) -> Result<(), SeedError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if id <= 0 {
            return Err(SeedError::NonPositiveId { entity, id });
        }
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId { entity, id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_snapshot_is_consistent() {
        HiringSnapshot::demo().validate().expect("demo data validates");
    }

    #[test]
    fn rejects_application_outside_its_flow() {
        let mut snapshot = HiringSnapshot::demo();
        // Step 5 belongs to the engineering flow; position 1 uses the standard one.
        snapshot.applications[0].current_interview_step = InterviewStepId(5);

        match snapshot.validate() {
            Err(SeedError::StepOutsideFlow { application, step }) => {
                assert_eq!(application, ApplicationId(1));
                assert_eq!(step, InterviewStepId(5));
            }
            other => panic!("expected step outside flow, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_candidates() {
        let mut snapshot = HiringSnapshot::demo();
        let duplicate = snapshot.candidates[0].clone();
        snapshot.candidates.push(duplicate);

        assert!(matches!(
            snapshot.validate(),
            Err(SeedError::DuplicateId {
                entity: "candidate",
                id: 1
            })
        ));
    }

    #[test]
    fn rejects_ids_the_api_cannot_address() {
        let mut snapshot = HiringSnapshot::demo();
        snapshot.candidates[3].id = CandidateId(0);

        assert!(matches!(
            snapshot.validate(),
            Err(SeedError::NonPositiveId {
                entity: "candidate",
                id: 0
            })
        ));

        let mut snapshot = HiringSnapshot::demo();
        snapshot.positions[1].id = PositionId(-2);
        assert!(matches!(
            snapshot.validate(),
            Err(SeedError::NonPositiveId {
                entity: "position",
                id: -2
            })
        ));
    }

    #[test]
    fn rejects_repeated_step_names_within_a_flow() {
        let mut snapshot = HiringSnapshot::demo();
        snapshot.interview_flows[0].interview_steps[2].name = "Technical Interview".to_string();

        match snapshot.validate() {
            Err(SeedError::DuplicateStepName { flow, name }) => {
                assert_eq!(flow, InterviewFlowId(1));
                assert_eq!(name, "Technical Interview");
            }
            other => panic!("expected duplicate step name, got {other:?}"),
        }
    }

    #[test]
    fn rejects_scores_above_five() {
        let mut snapshot = HiringSnapshot::demo();
        snapshot.applications[0].interviews[0].score = Some(9);

        assert!(matches!(
            snapshot.validate(),
            Err(SeedError::ScoreOutOfRange { score: 9, .. })
        ));
    }

    #[test]
    fn reads_camel_case_json() {
        let raw = r#"{
            "positions": [{
                "id": 10,
                "title": "QA Engineer",
                "jobDescription": "Test automation",
                "applicationDeadline": "2026-12-01T00:00:00Z",
                "status": "Open",
                "interviewFlowId": 1
            }],
            "interviewFlows": [{
                "id": 1,
                "description": "Short",
                "interviewSteps": [
                    {"id": 1, "interviewFlowId": 1, "name": "Screen", "orderIndex": 1}
                ]
            }],
            "candidates": [{"id": 3, "firstName": "Lin", "lastName": "Wu", "email": "lin@example.com"}],
            "applications": [{
                "id": 8,
                "positionId": 10,
                "candidateId": 3,
                "applicationDate": "2026-09-01",
                "currentInterviewStep": 1
            }]
        }"#;

        let snapshot = HiringSnapshot::from_reader(raw.as_bytes()).expect("snapshot parses");
        assert_eq!(snapshot.positions[0].status, PositionStatus::Open);
        assert_eq!(snapshot.applications[0].interviews.len(), 0);
        assert_eq!(snapshot.candidates[0].full_name(), "Lin Wu");
    }
}
