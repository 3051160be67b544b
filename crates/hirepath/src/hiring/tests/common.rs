use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::hiring::domain::{
    Application, ApplicationId, Candidate, CandidateId, InterviewFlow, InterviewFlowId,
    NewCandidate, Position, PositionId,
};
use crate::hiring::repository::{HiringRepository, RepositoryError};
use crate::hiring::{hiring_router, HiringService, HiringSnapshot, InMemoryHiringStore};

pub(super) fn seeded_store() -> Arc<InMemoryHiringStore> {
    Arc::new(InMemoryHiringStore::from_snapshot(HiringSnapshot::demo()).expect("demo seeds"))
}

pub(super) fn build_service() -> (HiringService<InMemoryHiringStore>, Arc<InMemoryHiringStore>) {
    let store = seeded_store();
    (HiringService::new(store.clone()), store)
}

pub(super) fn router_with<R>(repository: Arc<R>) -> Router
where
    R: HiringRepository + 'static,
{
    hiring_router(Arc::new(HiringService::new(repository)))
}

pub(super) fn new_candidate(email: &str) -> NewCandidate {
    NewCandidate {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
        phone: None,
        address: Some("Arlington, VA".to_string()),
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Repository whose every call fails as if the backing store were down.
pub(super) struct UnavailableRepository;

impl UnavailableRepository {
    fn down<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable(
            "connection refused (db.internal:5432)".to_string(),
        ))
    }
}

impl HiringRepository for UnavailableRepository {
    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Self::down()
    }

    fn position(&self, _id: PositionId) -> Result<Option<Position>, RepositoryError> {
        Self::down()
    }

    fn interview_flow(
        &self,
        _id: InterviewFlowId,
    ) -> Result<Option<InterviewFlow>, RepositoryError> {
        Self::down()
    }

    fn applications_for_position(
        &self,
        _id: PositionId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Self::down()
    }

    fn application(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Self::down()
    }

    fn update_application(&self, _application: Application) -> Result<(), RepositoryError> {
        Self::down()
    }

    fn candidate(&self, _id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Self::down()
    }

    fn candidates(&self, _ids: &[CandidateId]) -> Result<Vec<Candidate>, RepositoryError> {
        Self::down()
    }

    fn insert_candidate(&self, _candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        Self::down()
    }
}

/// Delegates to the seeded store while counting every call that reaches storage.
#[derive(Default)]
pub(super) struct CountingRepository {
    inner: InMemoryHiringStore,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub(super) fn seeded() -> Self {
        Self {
            inner: InMemoryHiringStore::from_snapshot(HiringSnapshot::demo()).expect("demo seeds"),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> &InMemoryHiringStore {
        self.calls.fetch_add(1, Ordering::SeqCst);
        &self.inner
    }
}

impl HiringRepository for CountingRepository {
    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        self.touch().positions()
    }

    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        self.touch().position(id)
    }

    fn interview_flow(
        &self,
        id: InterviewFlowId,
    ) -> Result<Option<InterviewFlow>, RepositoryError> {
        self.touch().interview_flow(id)
    }

    fn applications_for_position(
        &self,
        id: PositionId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.touch().applications_for_position(id)
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.touch().application(id)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        self.touch().update_application(application)
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.touch().candidate(id)
    }

    fn candidates(&self, ids: &[CandidateId]) -> Result<Vec<Candidate>, RepositoryError> {
        self.touch().candidates(ids)
    }

    fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        self.touch().insert_candidate(candidate)
    }
}
