//! HTTP client for the hiring API and a board session that persists drag moves.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::board::{BoardError, DropTarget, PositionBoard};
use crate::hiring::domain::{
    Application, ApplicationId, BoardCandidate, Candidate, CandidateId, InterviewStepId,
    NewCandidate, Position, PositionFlowView, PositionId,
};
use crate::hiring::validation::StageUpdatePayload;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3010";

const CONNECT_TIMEOUT_SECS: u64 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Thin wrapper over each backend endpoint.
#[derive(Debug, Clone)]
pub struct HiringClient {
    http: Client,
    base_url: String,
}

impl HiringClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ClientError::Build)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub async fn positions(&self) -> Result<Vec<Position>, ClientError> {
        self.get("/positions").await
    }

    pub async fn interview_flow(
        &self,
        position_id: PositionId,
    ) -> Result<PositionFlowView, ClientError> {
        self.get(&format!("/positions/{position_id}/interview-flow"))
            .await
    }

    pub async fn position_candidates(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<BoardCandidate>, ClientError> {
        self.get(&format!("/positions/{position_id}/candidates"))
            .await
    }

    pub async fn candidate(&self, candidate_id: CandidateId) -> Result<Candidate, ClientError> {
        self.get(&format!("/candidates/{candidate_id}")).await
    }

    pub async fn add_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, ClientError> {
        let url = self.url("/candidates");
        let response = self
            .http
            .post(&url)
            .json(candidate)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let envelope: Envelope<Candidate> = decode(url, response).await?;
        Ok(envelope.data)
    }

    pub async fn update_candidate_stage(
        &self,
        candidate_id: CandidateId,
        application_id: ApplicationId,
        step_id: InterviewStepId,
    ) -> Result<Application, ClientError> {
        let url = self.url(&format!("/candidates/{candidate_id}"));
        let response = self
            .http
            .put(&url)
            .json(&StageUpdatePayload::new(application_id, step_id))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let envelope: Envelope<Application> = decode(url, response).await?;
        Ok(envelope.data)
    }

    /// Fetch the flow and the candidates concurrently and assemble a board.
    pub async fn load_board(&self, position_id: PositionId) -> Result<PositionBoard, ClientError> {
        let (detail, candidates) = tokio::try_join!(
            self.interview_flow(position_id),
            self.position_candidates(position_id)
        )?;
        Ok(PositionBoard::new(detail, candidates))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        decode(url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { url, source });
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| error_message(&body))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Result of a board interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Dropped where it started.
    Unchanged,
    /// Reordered inside its column; nothing to persist.
    Reordered,
    /// Stage change confirmed by the backend.
    Persisted(Application),
}

/// A board plus the client used to persist its moves.
#[derive(Debug)]
pub struct BoardSession {
    client: HiringClient,
    position_id: PositionId,
    board: PositionBoard,
}

impl BoardSession {
    pub async fn open(client: HiringClient, position_id: PositionId) -> Result<Self, ClientError> {
        let board = client.load_board(position_id).await?;
        Ok(Self {
            client,
            position_id,
            board,
        })
    }

    pub fn board(&self) -> &PositionBoard {
        &self.board
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.board = self.client.load_board(self.position_id).await?;
        Ok(())
    }

    /// Move a card locally, then persist the stage change. The local move is
    /// rolled back if the backend refuses it or cannot be reached.
    pub async fn move_candidate(
        &mut self,
        candidate_id: CandidateId,
        target: DropTarget,
    ) -> Result<MoveOutcome, ClientError> {
        let Some(pending) = self.board.move_card(candidate_id, target)? else {
            return Ok(MoveOutcome::Unchanged);
        };
        if !pending.changes_stage() {
            return Ok(MoveOutcome::Reordered);
        }

        match self
            .client
            .update_candidate_stage(
                pending.candidate_id,
                pending.application_id,
                pending.to_step_id,
            )
            .await
        {
            Ok(application) => Ok(MoveOutcome::Persisted(application)),
            Err(err) => {
                warn!(
                    error = %err,
                    %candidate_id,
                    to = %pending.to_step,
                    "stage change rejected; restoring board"
                );
                self.board.rollback(&pending)?;
                Err(err)
            }
        }
    }
}
