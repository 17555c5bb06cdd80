use crate::domain::request::{Frequency, Gender};
use serde::{Deserialize, Serialize};

/// The four qualitative attributes the priority score is derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub travel_frequency: Frequency,
    pub short_notice_frequency: Frequency,
    pub has_mobility_issue: bool,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriorityScore {
    pub percentage: i32,
    pub is_high_priority: bool,
}
