//! Input parsing that runs before any storage access.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{ApplicationId, CandidateId, InterviewStepId, NewCandidate, PositionId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid ID format")]
    InvalidId,
    #[error("Invalid candidate ID format")]
    InvalidCandidateId,
    #[error("Invalid application ID format")]
    InvalidApplicationId,
    #[error("Invalid interview step format")]
    InvalidInterviewStep,
    #[error("application {application} does not belong to candidate {candidate}")]
    CandidateMismatch {
        application: ApplicationId,
        candidate: CandidateId,
    },
    #[error("interview step {step} is not part of the interview flow for position {position}")]
    StepNotInFlow {
        step: InterviewStepId,
        position: PositionId,
    },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("a candidate with this email already exists")]
    DuplicateEmail,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Parse a strictly positive integer id from a path segment or string field.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn parse_id_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().filter(|id| *id > 0),
        Value::String(raw) => parse_id(raw),
        _ => None,
    }
}

/// Body of `PUT /candidates/:id`. Ids may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdatePayload {
    #[serde(default)]
    pub application_id: Option<Value>,
    #[serde(default)]
    pub current_interview_step: Option<Value>,
}

impl StageUpdatePayload {
    pub fn new(application_id: ApplicationId, step: InterviewStepId) -> Self {
        Self {
            application_id: Some(Value::from(application_id.0)),
            current_interview_step: Some(Value::from(step.0)),
        }
    }
}

/// A fully parsed request to move an application to another interview step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub candidate_id: CandidateId,
    pub application_id: ApplicationId,
    pub interview_step_id: InterviewStepId,
}

impl StageTransition {
    pub fn parse(candidate_id: &str, payload: &StageUpdatePayload) -> Result<Self, ValidationError> {
        let candidate_id = parse_id(candidate_id).ok_or(ValidationError::InvalidCandidateId)?;
        let application_id = parse_id_value(payload.application_id.as_ref())
            .ok_or(ValidationError::InvalidApplicationId)?;
        let interview_step_id = parse_id_value(payload.current_interview_step.as_ref())
            .ok_or(ValidationError::InvalidInterviewStep)?;

        Ok(Self {
            candidate_id: CandidateId(candidate_id),
            application_id: ApplicationId(application_id),
            interview_step_id: InterviewStepId(interview_step_id),
        })
    }
}

/// Field checks the persistence layer would otherwise enforce.
pub fn validate_new_candidate(candidate: &NewCandidate) -> Result<(), ValidationError> {
    if candidate.first_name.trim().is_empty() {
        return Err(ValidationError::MissingField("firstName"));
    }
    if candidate.last_name.trim().is_empty() {
        return Err(ValidationError::MissingField("lastName"));
    }

    let email = candidate.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid_email {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(application_id: Value, step: Value) -> StageUpdatePayload {
        StageUpdatePayload {
            application_id: Some(application_id),
            current_interview_step: Some(step),
        }
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let transition =
            StageTransition::parse("7", &payload(json!(42), json!("3"))).expect("parses");
        assert_eq!(
            transition,
            StageTransition {
                candidate_id: CandidateId(7),
                application_id: ApplicationId(42),
                interview_step_id: InterviewStepId(3),
            }
        );

        let padded = StageTransition::parse(" 7 ", &payload(json!(" 42"), json!(3)))
            .expect("whitespace is trimmed");
        assert_eq!(padded.application_id, ApplicationId(42));
    }

    #[test]
    fn rejects_each_malformed_id_with_its_own_error() {
        assert_eq!(
            StageTransition::parse("seven", &payload(json!(42), json!(3))),
            Err(ValidationError::InvalidCandidateId)
        );
        assert_eq!(
            StageTransition::parse("7", &payload(json!("42abc"), json!(3))),
            Err(ValidationError::InvalidApplicationId)
        );
        assert_eq!(
            StageTransition::parse("7", &payload(json!(42), json!(3.5))),
            Err(ValidationError::InvalidInterviewStep)
        );
        assert_eq!(
            StageTransition::parse("7", &payload(json!(-4), json!(3))),
            Err(ValidationError::InvalidApplicationId)
        );
        assert_eq!(
            StageTransition::parse("7", &StageUpdatePayload::default()),
            Err(ValidationError::InvalidApplicationId)
        );
        assert_eq!(
            StageTransition::parse("7", &payload(json!(42), Value::Null)),
            Err(ValidationError::InvalidInterviewStep)
        );
    }

    #[test]
    fn candidate_validation_checks_names_and_email() {
        let mut candidate = NewCandidate {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            address: None,
        };
        assert_eq!(validate_new_candidate(&candidate), Ok(()));

        candidate.email = "ada@localhost".to_string();
        assert_eq!(
            validate_new_candidate(&candidate),
            Err(ValidationError::InvalidEmail)
        );

        candidate.email = "ada@example.com".to_string();
        candidate.last_name = "  ".to_string();
        assert_eq!(
            validate_new_candidate(&candidate),
            Err(ValidationError::MissingField("lastName"))
        );
    }
}
