use serde::{Deserialize, Serialize};

/// Organizational seniority. Numerically smaller levels are more senior.
/// Level1 (directorate) requests are served by the multi-vehicle allocation
/// flow and never appear in this engine's backlog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrgLevel {
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
    Level5 = 5,
}

impl OrgLevel {
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentalCategory {
    Standard,
    Project,
    Organizational,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Assigned,
    NotAssigned,
    Approved,
    Rejected,
    InTransfer,
    Waiting,
}

impl RequestStatus {
    /// Legal transitions of the request lifecycle. The matching side only
    /// ever drives Pending -> Assigned/NotAssigned. The handover sub-path
    /// (Pending -> InTransfer -> Waiting -> Assigned) belongs to the vehicle
    /// inspection and transfer service, which writes through the same record
    /// store; it is validated here but never initiated by the committer. The
    /// reviewer gate owns Assigned -> Approved/Rejected.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Pending, NotAssigned)
                | (Pending, InTransfer)
                | (InTransfer, Waiting)
                | (Waiting, Assigned)
                | (Assigned, Approved)
                | (Assigned, Rejected)
                | (NotAssigned, Pending)
        )
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Assigned => "Assigned",
            RequestStatus::NotAssigned => "Not Assigned",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::InTransfer => "In Transfer",
            RequestStatus::Waiting => "Waiting",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub id: String,
    pub request_letter_no: String,
    pub requester_name: String,
    pub department: String,
    pub phone_number: String,
    pub request_date: String,
    pub organizational_level: OrgLevel,
    pub rental_category: RentalCategory,
    pub travel_frequency: Frequency,
    pub short_notice_frequency: Frequency,
    pub has_mobility_issue: bool,
    pub gender: Gender,
    pub priority_score: i32,
    pub status: RequestStatus,
    /// Up to 3 requested models; empty for the single-vehicle flow.
    pub requested_models: Vec<String>,
    pub assigned_vehicle_ids: Vec<String>,
    pub fulfilled_count: u32,
    pub requested_count: u32,
}

impl AssignmentRequest {
    pub fn is_high_priority(&self) -> bool {
        self.priority_score >= 70
    }

    pub fn is_multi_vehicle(&self) -> bool {
        self.requested_models.len() > 1 || self.requested_count > 1
    }

    /// Models not yet covered by an assigned vehicle.
    pub fn unfulfilled_models(&self) -> Vec<String> {
        self.requested_models
            .iter()
            .skip(self.fulfilled_count as usize)
            .cloned()
            .collect()
    }
}
