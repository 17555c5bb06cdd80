use crate::domain::proposal::Proposal;
use crate::error::EngineError;
use crate::service::coordinator::ProposalCoordinator;
use std::sync::Arc;

/// Drives the reconciliation loop. All matching is serialized through the
/// coordinator's single slot, so the periodic cadence and the manual trigger
/// can never race each other into a double booking.
#[derive(Clone)]
pub struct Scheduler {
    pub coordinator: Arc<ProposalCoordinator>,
    pub tick_interval: std::time::Duration,
}

impl Scheduler {
    /// Periodic loop. Tick failures are logged and the loop continues; the
    /// next period is the retry.
    pub async fn run(self) {
        loop {
            match self.coordinator.tick().await {
                Ok(Some(proposal)) => {
                    tracing::info!(
                        proposal_id = %proposal.id,
                        request_id = %proposal.request_id,
                        "proposal awaiting confirmation"
                    );
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!("matching tick failed: {}", err);
                }
            }
            tokio::time::sleep(self.tick_interval).await;
        }
    }

    /// Synchronous manual trigger for the operator flow. Same ranking,
    /// filtering, and mutual exclusion as the periodic path; errors surface
    /// to the caller instead of being swallowed.
    pub async fn run_once(&self) -> Result<Option<Proposal>, EngineError> {
        self.coordinator.tick().await
    }
}
