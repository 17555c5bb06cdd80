use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A tentative (request, vehicles) pairing awaiting human confirmation.
/// Never persisted; at most one exists at any time.
#[derive(Debug, Clone, Serialize)]
pub struct Proposal {
    pub id: Uuid,
    pub request_id: String,
    pub request_letter_no: String,
    pub candidate_vehicle_ids: Vec<String>,
    pub candidate_plate_numbers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Proposal {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
