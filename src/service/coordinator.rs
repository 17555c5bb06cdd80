use crate::domain::proposal::Proposal;
use crate::domain::request::{AssignmentRequest, RequestStatus};
use crate::domain::vehicle::Vehicle;
use crate::error::EngineError;
use crate::matching::filter::{filter_and_rank, filter_for_model, select_top};
use crate::matching::ranker::rank;
use crate::pool::MatchPool;
use crate::scoring::engine::score;
use crate::scoring::types::ScoreInputs;
use crate::service::committer::{AssignmentCommitter, CommitOutcome};
use crate::store::RecordStore;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A proposal plus the request/vehicle context needed to commit it.
struct PendingMatch {
    proposal: Proposal,
    request: AssignmentRequest,
    vehicles: Vec<Vehicle>,
}

/// Finds the best (request, vehicles) pair and holds at most one unconfirmed
/// proposal. The slot mutex is the engine's single mutual-exclusion point:
/// the periodic tick, the manual trigger, and confirm/reject all serialize
/// through it, so a second proposal can never appear while one is in flight.
pub struct ProposalCoordinator {
    pool: Arc<MatchPool>,
    store: Arc<dyn RecordStore>,
    committer: AssignmentCommitter,
    slot: Mutex<Option<PendingMatch>>,
    rng: Mutex<StdRng>,
    proposal_ttl: Duration,
}

impl ProposalCoordinator {
    pub fn new(
        pool: Arc<MatchPool>,
        store: Arc<dyn RecordStore>,
        committer: AssignmentCommitter,
        proposal_ttl_secs: i64,
        tie_break_seed: Option<u64>,
    ) -> Self {
        let rng = match tie_break_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pool,
            store,
            committer,
            slot: Mutex::new(None),
            rng: Mutex::new(rng),
            proposal_ttl: Duration::seconds(proposal_ttl_secs),
        }
    }

    /// One matching cycle. If a live proposal is outstanding it is returned
    /// unchanged and no search runs; an expired one is auto-rejected first.
    /// A cycle that finds no eligible pair returns None and changes nothing.
    pub async fn tick(&self) -> Result<Option<Proposal>, EngineError> {
        let Ok(mut slot) = self.slot.try_lock() else {
            // A confirm or another trigger holds the slot; skip this cycle.
            return Ok(None);
        };

        if let Some(pending) = slot.as_ref() {
            if !pending.proposal.is_expired(Utc::now()) {
                return Ok(Some(pending.proposal.clone()));
            }
            tracing::info!(
                proposal_id = %pending.proposal.id,
                request_id = %pending.proposal.request_id,
                "proposal expired unconfirmed, auto-rejecting"
            );
            *slot = None;
        }

        let snapshot = self.pool.refresh().await.map_err(EngineError::Transient)?;
        let backlog = rank(&snapshot.requests);

        for request in &backlog {
            let vehicles = self.pick_vehicles(request, &snapshot.vehicles).await;
            if vehicles.is_empty() {
                continue;
            }
            let now = Utc::now();
            let proposal = Proposal {
                id: Uuid::new_v4(),
                request_id: request.id.clone(),
                request_letter_no: request.request_letter_no.clone(),
                candidate_vehicle_ids: vehicles.iter().map(|v| v.id.clone()).collect(),
                candidate_plate_numbers: vehicles.iter().map(|v| v.plate_number.clone()).collect(),
                created_at: now,
                expires_at: now + self.proposal_ttl,
            };
            tracing::info!(
                proposal_id = %proposal.id,
                request_id = %request.id,
                plates = ?proposal.candidate_plate_numbers,
                "proposal created"
            );
            *slot = Some(PendingMatch {
                proposal: proposal.clone(),
                request: request.clone(),
                vehicles,
            });
            return Ok(Some(proposal));
        }

        Ok(None)
    }

    /// Vehicle selection for one request: the top-ranked eligible vehicle, or
    /// for a multi-model request one vehicle per distinct unfulfilled model
    /// (models with no match are skipped, never blocking the rest).
    async fn pick_vehicles(&self, request: &AssignmentRequest, pool: &[Vehicle]) -> Vec<Vehicle> {
        let eligible = filter_and_rank(pool, request.organizational_level, request.is_high_priority());
        if eligible.is_empty() {
            return vec![];
        }

        let mut rng = self.rng.lock().await;
        if !request.is_multi_vehicle() {
            return select_top(&eligible, &mut *rng).into_iter().collect();
        }

        let mut picked: Vec<Vehicle> = Vec::new();
        for model in request.unfulfilled_models() {
            let for_model: Vec<Vehicle> = filter_for_model(&eligible, &model)
                .into_iter()
                .filter(|v| !picked.iter().any(|p| p.plate_number == v.plate_number))
                .collect();
            if let Some(vehicle) = select_top(&for_model, &mut *rng) {
                picked.push(vehicle);
            }
        }
        picked
    }

    pub async fn outstanding(&self) -> Option<Proposal> {
        self.slot.lock().await.as_ref().map(|p| p.proposal.clone())
    }

    /// Hand the proposal to the committer. The slot is cleared whether the
    /// commit succeeds or fails; on failure the request is simply reconsidered
    /// on a later tick.
    pub async fn confirm(&self, proposal_id: Uuid) -> Result<CommitOutcome, EngineError> {
        let mut slot = self.slot.lock().await;
        let pending = match slot.take() {
            Some(p) if p.proposal.id == proposal_id => p,
            other => {
                *slot = other;
                return Err(EngineError::ProposalNotFound(proposal_id));
            }
        };

        // The slot guard stays held through the commit so no tick can open a
        // new proposal while the two-sided write is in flight.
        let result = self.committer.commit(&pending.request, &pending.vehicles).await;
        if let Err(refresh_err) = self.pool.refresh().await {
            tracing::warn!("post-commit pool refresh failed: {}", refresh_err);
        }
        result
    }

    pub async fn reject(&self, proposal_id: Uuid) -> Result<(), EngineError> {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(p) if p.proposal.id == proposal_id => {
                tracing::info!(proposal_id = %proposal_id, "proposal rejected by operator");
                *slot = None;
                Ok(())
            }
            _ => Err(EngineError::ProposalNotFound(proposal_id)),
        }
    }

    /// Entry point for a newly submitted request (manual flow). The request
    /// is scored, persisted, and when no vehicle currently qualifies it is
    /// saved as Not Assigned so later ticks pick it up once the pool changes.
    pub async fn submit(
        &self,
        mut request: AssignmentRequest,
    ) -> Result<Option<Proposal>, EngineError> {
        request.priority_score = score(&ScoreInputs {
            travel_frequency: request.travel_frequency,
            short_notice_frequency: request.short_notice_frequency,
            has_mobility_issue: request.has_mobility_issue,
            gender: request.gender,
        })
        .percentage;

        let snapshot = self.pool.refresh().await.map_err(EngineError::Transient)?;
        let eligible = filter_and_rank(
            &snapshot.vehicles,
            request.organizational_level,
            request.is_high_priority(),
        );

        request.status = if eligible.is_empty() {
            RequestStatus::NotAssigned
        } else {
            RequestStatus::Pending
        };
        self.store
            .create_request(&request)
            .await
            .map_err(EngineError::Transient)?;

        if eligible.is_empty() {
            return Ok(None);
        }
        // The tick may surface an already-outstanding proposal, or rank a
        // different request first; either way this submission is saved and
        // deferred, not matched.
        match self.tick().await? {
            Some(proposal) if proposal.request_id == request.id => Ok(Some(proposal)),
            _ => Ok(None),
        }
    }
}
