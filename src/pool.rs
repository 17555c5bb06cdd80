use crate::domain::request::AssignmentRequest;
use crate::domain::vehicle::{SourcePool, Vehicle};
use crate::scoring::engine::score;
use crate::scoring::types::ScoreInputs;
use crate::store::RecordStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One coherent read of the record store: the merged owned + rented vehicle
/// pools and the pending backlog. Taken at the start of every tick and after
/// every commit; never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct PoolSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub requests: Vec<AssignmentRequest>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

pub struct MatchPool {
    store: Arc<dyn RecordStore>,
}

impl MatchPool {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn refresh(&self) -> Result<PoolSnapshot> {
        let mut vehicles = self.store.list_ready_automobiles(SourcePool::Owned).await?;
        vehicles.extend(self.store.list_ready_automobiles(SourcePool::Rented).await?);

        let mut requests = self.store.list_pending_requests().await?;
        // The score column is derived state; recompute it from the four
        // inputs so a stale or hand-edited stored value never drives ranking.
        for request in &mut requests {
            request.priority_score = score(&ScoreInputs {
                travel_frequency: request.travel_frequency,
                short_notice_frequency: request.short_notice_frequency,
                has_mobility_issue: request.has_mobility_issue,
                gender: request.gender,
            })
            .percentage;
        }

        Ok(PoolSnapshot {
            vehicles,
            requests,
            refreshed_at: Some(Utc::now()),
        })
    }
}
