//! The board session against a live loopback server: moves are persisted, and
//! rolled back locally when the backend refuses them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hirepath::board::DropTarget;
use hirepath::client::{BoardSession, ClientError, HiringClient, MoveOutcome};
use hirepath::hiring::{
    hiring_router, Application, ApplicationId, Candidate, CandidateId, HiringRepository,
    HiringService, HiringSnapshot, InMemoryHiringStore, InterviewFlow, InterviewFlowId,
    InterviewStepId, NewCandidate, Position, PositionId, RepositoryError,
};

async fn spawn_server<R>(repository: Arc<R>) -> String
where
    R: HiringRepository + 'static,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let app = hiring_router(Arc::new(HiringService::new(repository)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    format!("http://{addr}")
}

fn seeded_store() -> Arc<InMemoryHiringStore> {
    Arc::new(InMemoryHiringStore::from_snapshot(HiringSnapshot::demo()).expect("demo seeds"))
}

/// Store whose writes can be switched off to simulate a failing backend.
struct FlakyStore {
    inner: InMemoryHiringStore,
    writes_fail: AtomicBool,
}

impl HiringRepository for FlakyStore {
    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        self.inner.positions()
    }

    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        self.inner.position(id)
    }

    fn interview_flow(
        &self,
        id: InterviewFlowId,
    ) -> Result<Option<InterviewFlow>, RepositoryError> {
        self.inner.interview_flow(id)
    }

    fn applications_for_position(
        &self,
        id: PositionId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_position(id)
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.application(id)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("write timeout".to_string()));
        }
        self.inner.update_application(application)
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.candidate(id)
    }

    fn candidates(&self, ids: &[CandidateId]) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.candidates(ids)
    }

    fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert_candidate(candidate)
    }
}

#[tokio::test]
async fn drag_to_another_column_is_persisted() {
    let store = seeded_store();
    let base_url = spawn_server(store.clone()).await;
    let client = HiringClient::new(base_url).expect("client builds");

    let mut session = BoardSession::open(client.clone(), PositionId(1))
        .await
        .expect("board loads");
    assert_eq!(session.board().position_name(), "Senior Full-Stack Engineer");

    let outcome = session
        .move_candidate(CandidateId(3), DropTarget::new("Manager Interview", 0))
        .await
        .expect("move persisted");

    match outcome {
        MoveOutcome::Persisted(application) => {
            assert_eq!(application.id, ApplicationId(3));
            assert_eq!(application.current_interview_step, InterviewStepId(3));
        }
        other => panic!("expected persisted move, got {other:?}"),
    }

    let stored = store
        .application(ApplicationId(3))
        .expect("read succeeds")
        .expect("application present");
    assert_eq!(stored.current_interview_step, InterviewStepId(3));

    session.refresh().await.expect("board reloads");
    let card = session.board().card(CandidateId(3)).expect("card present");
    assert_eq!(card.current_interview_step, "Manager Interview");
}

#[tokio::test]
async fn reorder_inside_a_column_stays_local() {
    let base_url = spawn_server(seeded_store()).await;
    let client = HiringClient::new(base_url).expect("client builds");
    let mut session = BoardSession::open(client, PositionId(1))
        .await
        .expect("board loads");

    let outcome = session
        .move_candidate(CandidateId(1), DropTarget::new("Technical Interview", 1))
        .await
        .expect("reorder succeeds");
    assert_eq!(outcome, MoveOutcome::Reordered);

    let unchanged = session
        .move_candidate(CandidateId(1), DropTarget::new("Technical Interview", 1))
        .await
        .expect("no-op succeeds");
    assert_eq!(unchanged, MoveOutcome::Unchanged);
}

#[tokio::test]
async fn rejected_move_is_rolled_back() {
    let store = Arc::new(FlakyStore {
        inner: InMemoryHiringStore::from_snapshot(HiringSnapshot::demo()).expect("demo seeds"),
        writes_fail: AtomicBool::new(false),
    });
    let base_url = spawn_server(store.clone()).await;
    let client = HiringClient::new(base_url).expect("client builds");
    let mut session = BoardSession::open(client, PositionId(1))
        .await
        .expect("board loads");
    let before = session.board().clone();

    store.writes_fail.store(true, Ordering::SeqCst);
    let err = session
        .move_candidate(CandidateId(3), DropTarget::new("Technical Interview", 0))
        .await
        .expect_err("backend refuses the write");

    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert!(!message.contains("write timeout"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(session.board(), &before);

    let stored = store
        .application(ApplicationId(3))
        .expect("read succeeds")
        .expect("application present");
    assert_eq!(stored.current_interview_step, InterviewStepId(1));
}

#[tokio::test]
async fn client_maps_status_codes() {
    let base_url = spawn_server(seeded_store()).await;
    let client = HiringClient::new(format!("{base_url}/")).expect("client builds");

    let positions = client.positions().await.expect("positions load");
    assert_eq!(positions.len(), 3);

    match client.candidate(CandidateId(404)).await {
        Err(ClientError::NotFound(message)) => assert_eq!(message, "Candidate not found"),
        other => panic!("expected not found, got {other:?}"),
    }

    let created = client
        .add_candidate(&NewCandidate {
            first_name: "Katherine".to_string(),
            last_name: "Johnson".to_string(),
            email: "katherine@example.com".to_string(),
            phone: None,
            address: None,
        })
        .await
        .expect("candidate created");
    assert_eq!(created.id, CandidateId(5));

    match client
        .update_candidate_stage(CandidateId(1), ApplicationId(1), InterviewStepId(6))
        .await
    {
        Err(ClientError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("not part of the interview flow"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}
