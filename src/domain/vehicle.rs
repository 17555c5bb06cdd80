use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Automobile,
    Other,
}

impl VehicleCategory {
    /// The fleet directory stores vehicle type as free text; anything
    /// containing "auto" (or the recurring upstream misspelling "autho")
    /// counts as an automobile.
    pub fn from_type_field(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("auto") || lower.contains("autho") {
            VehicleCategory::Automobile
        } else {
            VehicleCategory::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Electric,
    Other,
}

impl FuelType {
    pub fn from_field(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("electric") {
            FuelType::Electric
        } else {
            FuelType::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Ready,
    Assigned,
    InTransfer,
    Maintenance,
    Other,
}

impl AvailabilityStatus {
    /// Upstream status strings are free text ("Approved", "In_transfer", ...).
    /// "Approved" in the fleet directory means ready for assignment.
    pub fn from_field(raw: &str) -> Self {
        match raw.to_lowercase().replace(['_', '-'], " ").trim() {
            "ready" | "approved" | "available" => AvailabilityStatus::Ready,
            "assigned" | "pending" => AvailabilityStatus::Assigned,
            "in transfer" => AvailabilityStatus::InTransfer,
            "maintenance" | "under maintenance" => AvailabilityStatus::Maintenance,
            _ => AvailabilityStatus::Other,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            AvailabilityStatus::Ready => "Ready",
            AvailabilityStatus::Assigned => "Assigned",
            AvailabilityStatus::InTransfer => "In_transfer",
            AvailabilityStatus::Maintenance => "Maintenance",
            AvailabilityStatus::Other => "Other",
        }
    }
}

/// Which fleet sub-resource owns the vehicle record. Status writes are routed
/// to different remote endpoints depending on this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourcePool {
    Owned,
    Rented,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub plate_number: String,
    pub model: String,
    pub category: VehicleCategory,
    pub manufacture_year: i32,
    pub engine_displacement_cc: i32,
    pub fuel_type: FuelType,
    pub availability_status: AvailabilityStatus,
    pub source_pool: SourcePool,
}

impl Vehicle {
    pub fn is_matchable(&self) -> bool {
        self.category == VehicleCategory::Automobile
            && self.availability_status == AvailabilityStatus::Ready
    }
}

/// Engine displacement arrives as free text ("1,200 CC", "1300cc"). Strip
/// everything but digits; unparseable values fall back to 0 and will never
/// pass the numeric eligibility rules.
pub fn parse_displacement(raw: &str) -> i32 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
