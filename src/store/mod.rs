use crate::domain::request::{AssignmentRequest, RequestStatus};
use crate::domain::vehicle::{AvailabilityStatus, SourcePool, Vehicle};
use anyhow::Result;
use chrono::NaiveDate;

pub mod http;
pub mod mock;

/// Extra fields carried on a request-status write. The multi-vehicle flow
/// reports partial fulfillment through the counts and the model split string
/// ("matched,.../unmatched,..."), mirroring the record store's schema.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub assigned_vehicle_ids: Vec<String>,
    pub assigned_plate_numbers: Vec<String>,
    pub fulfilled_count: u32,
    pub requested_count: u32,
    pub model_split: Option<String>,
    pub effective_date: Option<NaiveDate>,
}

/// The external record store owning vehicles and assignment requests. This
/// engine never persists anything itself; it reads snapshots and performs
/// status transitions through this interface.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_ready_automobiles(&self, pool: SourcePool) -> Result<Vec<Vehicle>>;

    async fn set_vehicle_status(
        &self,
        pool: SourcePool,
        plate_number: &str,
        status: AvailabilityStatus,
        effective_date: NaiveDate,
    ) -> Result<()>;

    /// Pending backlog, Level1 requests excluded upstream.
    async fn list_pending_requests(&self) -> Result<Vec<AssignmentRequest>>;

    async fn create_request(&self, request: &AssignmentRequest) -> Result<()>;

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        update: &StatusUpdate,
    ) -> Result<()>;
}

/// Best-effort notification dispatch. Errors never propagate past the caller;
/// they are logged and swallowed at the call site.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, deep_link: &str, target_role: &str) -> Result<()>;
}
