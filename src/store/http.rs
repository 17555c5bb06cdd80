use crate::domain::request::{AssignmentRequest, OrgLevel, RequestStatus};
use crate::domain::vehicle::{
    parse_displacement, AvailabilityStatus, FuelType, SourcePool, Vehicle, VehicleCategory,
};
use crate::store::{Notifier, RecordStore, StatusUpdate};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

/// HTTP adapter for the fleet record store. Owned vehicles live under
/// `/auth/car`, rented ones under `/auth/rent-car`; both speak the same
/// free-text schema normalized here into domain types.
#[derive(Clone)]
pub struct HttpRecordStore {
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl HttpRecordStore {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        Self {
            base_url,
            timeout_ms,
            client: reqwest::Client::new(),
        }
    }

    fn pool_prefix(pool: SourcePool) -> &'static str {
        match pool {
            SourcePool::Owned => "auth/car",
            SourcePool::Rented => "auth/rent-car",
        }
    }

    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
struct WireCar {
    id: serde_json::Value,
    #[serde(rename = "plateNumber")]
    plate_number: String,
    model: String,
    #[serde(rename = "carType", alias = "vehiclesType", default)]
    car_type: String,
    #[serde(rename = "manufactureYear", alias = "proYear", default)]
    manufacture_year: serde_json::Value,
    #[serde(rename = "motorCapacity", alias = "cc", default)]
    motor_capacity: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "fuelType", default)]
    fuel_type: String,
}

#[derive(Debug, Deserialize)]
struct CarListEnvelope {
    #[serde(rename = "codStatus", default)]
    cod_status: i32,
    #[serde(rename = "carList", alias = "rentCarList", default)]
    cars: Vec<WireCar>,
}

#[derive(Debug, Deserialize)]
struct WireRequest {
    id: serde_json::Value,
    #[serde(rename = "requestLetterNo")]
    request_letter_no: String,
    #[serde(rename = "requesterName", default)]
    requester_name: String,
    #[serde(default)]
    department: String,
    #[serde(rename = "phoneNumber", default)]
    phone_number: String,
    #[serde(rename = "requestDate", default)]
    request_date: String,
    #[serde(rename = "position")]
    position: String,
    #[serde(rename = "rentalType", default)]
    rental_type: String,
    #[serde(rename = "travelWorkPercentage", default)]
    travel_work_percentage: String,
    #[serde(rename = "shortNoticePercentage", default)]
    short_notice_percentage: String,
    #[serde(rename = "mobilityIssue", default)]
    mobility_issue: String,
    #[serde(default)]
    gender: String,
    #[serde(rename = "totalPercentage", default)]
    total_percentage: i32,
    #[serde(default)]
    status: String,
    #[serde(rename = "model", default)]
    model: String,
    #[serde(rename = "numberOfCar", default)]
    number_of_car: String,
}

#[derive(Debug, Deserialize)]
struct RequestListEnvelope {
    #[serde(rename = "codStatus", default)]
    cod_status: i32,
    #[serde(default)]
    assignments: Vec<WireRequest>,
}

fn id_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_vehicle(raw: WireCar, pool: SourcePool) -> Vehicle {
    let year = match &raw.manufacture_year {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) as i32,
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Vehicle {
        id: id_string(&raw.id),
        plate_number: raw.plate_number,
        model: raw.model,
        category: VehicleCategory::from_type_field(&raw.car_type),
        manufacture_year: year,
        engine_displacement_cc: parse_displacement(&raw.motor_capacity),
        fuel_type: FuelType::from_field(&raw.fuel_type),
        availability_status: AvailabilityStatus::from_field(&raw.status),
        source_pool: pool,
    }
}

fn parse_level(position: &str) -> OrgLevel {
    match position.trim() {
        "Level 1" => OrgLevel::Level1,
        "Level 2" => OrgLevel::Level2,
        "Level 3" => OrgLevel::Level3,
        "Level 4" => OrgLevel::Level4,
        _ => OrgLevel::Level5,
    }
}

fn parse_frequency(raw: &str) -> crate::domain::request::Frequency {
    match raw.to_lowercase().as_str() {
        "high" => crate::domain::request::Frequency::High,
        "medium" => crate::domain::request::Frequency::Medium,
        _ => crate::domain::request::Frequency::Low,
    }
}

/// The `numberOfCar` column is "fulfilled/requested"; a missing or malformed
/// value means a plain single-vehicle request.
fn parse_counts(raw: &str) -> (u32, u32) {
    let mut parts = raw.splitn(2, '/');
    let fulfilled = parts.next().and_then(|p| p.trim().parse().ok());
    let requested = parts.next().and_then(|p| p.trim().parse().ok());
    match (fulfilled, requested) {
        (Some(f), Some(r)) => (f, r),
        _ => (0, 1),
    }
}

/// The `model` column is "matched,.../unmatched,..."; the segment after the
/// slash is what still needs a vehicle.
fn parse_models(raw: &str) -> Vec<String> {
    raw.split('/')
        .flat_map(|seg| seg.split(','))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_request(raw: WireRequest) -> AssignmentRequest {
    let (fulfilled_count, requested_count) = parse_counts(&raw.number_of_car);
    AssignmentRequest {
        id: id_string(&raw.id),
        request_letter_no: raw.request_letter_no,
        requester_name: raw.requester_name,
        department: raw.department,
        phone_number: raw.phone_number,
        request_date: raw.request_date,
        organizational_level: parse_level(&raw.position),
        rental_category: match raw.rental_type.to_lowercase().as_str() {
            "project" => crate::domain::request::RentalCategory::Project,
            "organizational" => crate::domain::request::RentalCategory::Organizational,
            _ => crate::domain::request::RentalCategory::Standard,
        },
        travel_frequency: parse_frequency(&raw.travel_work_percentage),
        short_notice_frequency: parse_frequency(&raw.short_notice_percentage),
        has_mobility_issue: raw.mobility_issue.eq_ignore_ascii_case("yes"),
        gender: if raw.gender.eq_ignore_ascii_case("female") {
            crate::domain::request::Gender::Female
        } else {
            crate::domain::request::Gender::Male
        },
        priority_score: raw.total_percentage,
        status: match raw.status.to_lowercase().as_str() {
            "assigned" => RequestStatus::Assigned,
            "not assigned" => RequestStatus::NotAssigned,
            _ => RequestStatus::Pending,
        },
        requested_models: parse_models(&raw.model),
        assigned_vehicle_ids: vec![],
        fulfilled_count,
        requested_count,
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_ready_automobiles(&self, pool: SourcePool) -> Result<Vec<Vehicle>> {
        let url = format!("{}/{}/approved", self.base_url, Self::pool_prefix(pool));
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;
        let envelope: CarListEnvelope = resp.json().await?;
        if envelope.cod_status != 200 && envelope.cod_status != 0 {
            return Err(anyhow!("record store rejected vehicle read: {}", envelope.cod_status));
        }
        Ok(envelope
            .cars
            .into_iter()
            .map(|c| to_vehicle(c, pool))
            .filter(Vehicle::is_matchable)
            .collect())
    }

    async fn set_vehicle_status(
        &self,
        pool: SourcePool,
        plate_number: &str,
        status: AvailabilityStatus,
        effective_date: NaiveDate,
    ) -> Result<()> {
        let url = format!("{}/{}/status/{}", self.base_url, Self::pool_prefix(pool), plate_number);
        let body = json!({
            "status": status.as_wire(),
            "assignmentDate": effective_date.format("%Y-%m-%d").to_string(),
        });
        self.client
            .put(url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_pending_requests(&self) -> Result<Vec<AssignmentRequest>> {
        let url = format!("{}/auth/assignments/not-assigned", self.base_url);
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;
        let envelope: RequestListEnvelope = resp.json().await?;
        if envelope.cod_status != 200 && envelope.cod_status != 0 {
            return Err(anyhow!("record store rejected backlog read: {}", envelope.cod_status));
        }
        Ok(envelope
            .assignments
            .into_iter()
            .map(to_request)
            .filter(|r| r.organizational_level != OrgLevel::Level1)
            .collect())
    }

    async fn create_request(&self, request: &AssignmentRequest) -> Result<()> {
        let prefix = match request.rental_category {
            crate::domain::request::RentalCategory::Organizational => "auth/rent-car",
            _ => "auth/car",
        };
        let url = format!("{}/{}/assign", self.base_url, prefix);
        let body = json!({
            "requestLetterNo": request.request_letter_no,
            "requestDate": request.request_date,
            "requesterName": request.requester_name,
            "position": format!("Level {}", request.organizational_level.rank()),
            "department": request.department,
            "phoneNumber": request.phone_number,
            "totalPercentage": request.priority_score,
            "status": request.status.as_wire(),
        });
        self.client
            .post(url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        update: &StatusUpdate,
    ) -> Result<()> {
        let url = format!("{}/auth/assignments/{}/status", self.base_url, request_id);
        let body = json!({
            "status": status.as_wire(),
            "carIds": update.assigned_vehicle_ids,
            "plateNumbers": update.assigned_plate_numbers.join(", "),
            "numberOfCar": format!("{}/{}", update.fulfilled_count, update.requested_count),
            "model": update.model_split,
            "assignmentDate": update
                .effective_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        });
        self.client
            .put(url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Notification dispatch to the portal's notification service.
#[derive(Clone)]
pub struct HttpNotifier {
    pub base_url: String,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, message: &str, deep_link: &str, target_role: &str) -> Result<()> {
        let url = format!("{}/auth/notifications", self.base_url);
        let body = json!({
            "message": message,
            "link": deep_link,
            "targetRole": target_role,
        });
        self.client.post(url).json(&body).send().await?.error_for_status()?;
        Ok(())
    }
}
