use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, InterviewFlow, InterviewFlowId,
    NewCandidate, Position, PositionId,
};
use super::repository::{HiringRepository, RepositoryError};
use super::seed::{HiringSnapshot, SeedError};

#[derive(Debug, Default)]
struct Tables {
    positions: BTreeMap<PositionId, Position>,
    flows: BTreeMap<InterviewFlowId, InterviewFlow>,
    candidates: BTreeMap<CandidateId, Candidate>,
    applications: BTreeMap<ApplicationId, Application>,
}

/// Process-local repository backed by ordered maps behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryHiringStore {
    tables: RwLock<Tables>,
}

impl InMemoryHiringStore {
    pub fn from_snapshot(snapshot: HiringSnapshot) -> Result<Self, SeedError> {
        snapshot.validate()?;

        let HiringSnapshot {
            positions,
            interview_flows,
            candidates,
            applications,
        } = snapshot;

        let tables = Tables {
            positions: positions.into_iter().map(|p| (p.id, p)).collect(),
            flows: interview_flows.into_iter().map(|f| (f.id, f)).collect(),
            candidates: candidates.into_iter().map(|c| (c.id, c)).collect(),
            applications: applications.into_iter().map(|a| (a.id, a)).collect(),
        };

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl HiringRepository for InMemoryHiringStore {
    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Ok(self.read()?.positions.values().cloned().collect())
    }

    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        Ok(self.read()?.positions.get(&id).cloned())
    }

    fn interview_flow(
        &self,
        id: InterviewFlowId,
    ) -> Result<Option<InterviewFlow>, RepositoryError> {
        Ok(self.read()?.flows.get(&id).cloned())
    }

    fn applications_for_position(
        &self,
        id: PositionId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .read()?
            .applications
            .values()
            .filter(|application| application.position_id == id)
            .cloned()
            .collect())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.read()?.applications.get(&id).cloned())
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        match tables.applications.get_mut(&application.id) {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.read()?.candidates.get(&id).cloned())
    }

    fn candidates(&self, ids: &[CandidateId]) -> Result<Vec<Candidate>, RepositoryError> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.candidates.get(id).cloned())
            .collect())
    }

    fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        let mut tables = self.write()?;

        let email = candidate.email.trim().to_string();
        if tables
            .candidates
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&email))
        {
            return Err(RepositoryError::Conflict);
        }

        let next_id = match tables.candidates.keys().next_back() {
            Some(last) => last
                .0
                .checked_add(1)
                .ok_or(RepositoryError::IdsExhausted("candidate"))?,
            None => 1,
        };

        let record = Candidate {
            id: CandidateId(next_id),
            first_name: candidate.first_name.trim().to_string(),
            last_name: candidate.last_name.trim().to_string(),
            email,
            phone: candidate.phone,
            address: candidate.address,
        };

        tables.candidates.insert(record.id, record.clone());
        Ok(record)
    }
}
