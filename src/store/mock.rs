use crate::domain::request::{AssignmentRequest, OrgLevel, RequestStatus};
use crate::domain::vehicle::{AvailabilityStatus, SourcePool, Vehicle};
use crate::store::{Notifier, RecordStore, StatusUpdate};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::sync::Mutex;

/// In-memory record store used by integration tests and local runs without a
/// portal backend. Failure injection mirrors the remote failure modes: reads
/// can be cut off entirely, request writes can be failed, and vehicle writes
/// can be budgeted so the Nth write fails.
#[derive(Default)]
pub struct InMemoryRecordStore {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    vehicles: Vec<Vehicle>,
    requests: Vec<AssignmentRequest>,
    created: Vec<AssignmentRequest>,
    request_updates: Vec<(String, RequestStatus)>,
    vehicle_status_log: Vec<(String, AvailabilityStatus)>,
    fail_reads: bool,
    fail_request_updates: bool,
    vehicle_writes_remaining: Option<u32>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_vehicles(&self, vehicles: Vec<Vehicle>) {
        self.state.lock().unwrap().vehicles = vehicles;
    }

    pub fn seed_requests(&self, requests: Vec<AssignmentRequest>) {
        self.state.lock().unwrap().requests = requests;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_request_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_request_updates = fail;
    }

    /// Allow `n` further vehicle-status writes, then fail the rest.
    pub fn limit_vehicle_writes(&self, n: u32) {
        self.state.lock().unwrap().vehicle_writes_remaining = Some(n);
    }

    pub fn vehicle_status(&self, plate_number: &str) -> Option<AvailabilityStatus> {
        self.state
            .lock()
            .unwrap()
            .vehicles
            .iter()
            .find(|v| v.plate_number == plate_number)
            .map(|v| v.availability_status)
    }

    pub fn request_status(&self, request_id: &str) -> Option<RequestStatus> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .map(|r| r.status)
    }

    pub fn request(&self, request_id: &str) -> Option<AssignmentRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .cloned()
    }

    pub fn vehicle_write_count(&self) -> usize {
        self.state.lock().unwrap().vehicle_status_log.len()
    }

    pub fn request_update_count(&self) -> usize {
        self.state.lock().unwrap().request_updates.len()
    }

    pub fn created_requests(&self) -> Vec<AssignmentRequest> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_ready_automobiles(&self, pool: SourcePool) -> Result<Vec<Vehicle>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(anyhow!("injected read failure"));
        }
        Ok(state
            .vehicles
            .iter()
            .filter(|v| v.source_pool == pool && v.is_matchable())
            .cloned()
            .collect())
    }

    async fn set_vehicle_status(
        &self,
        _pool: SourcePool,
        plate_number: &str,
        status: AvailabilityStatus,
        _effective_date: NaiveDate,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.vehicle_writes_remaining {
            Some(0) => return Err(anyhow!("injected vehicle write failure")),
            Some(n) => state.vehicle_writes_remaining = Some(n - 1),
            None => {}
        }
        let vehicle = state
            .vehicles
            .iter_mut()
            .find(|v| v.plate_number == plate_number)
            .ok_or_else(|| anyhow!("unknown plate {plate_number}"))?;
        vehicle.availability_status = status;
        state.vehicle_status_log.push((plate_number.to_string(), status));
        Ok(())
    }

    async fn list_pending_requests(&self) -> Result<Vec<AssignmentRequest>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(anyhow!("injected read failure"));
        }
        Ok(state
            .requests
            .iter()
            .filter(|r| {
                matches!(r.status, RequestStatus::Pending | RequestStatus::NotAssigned)
                    && r.organizational_level != OrgLevel::Level1
            })
            .cloned()
            .collect())
    }

    async fn create_request(&self, request: &AssignmentRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.created.push(request.clone());
        state.requests.push(request.clone());
        Ok(())
    }

    async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        update: &StatusUpdate,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_request_updates {
            return Err(anyhow!("injected request update failure"));
        }
        let request = state
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| anyhow!("unknown request {request_id}"))?;
        request.status = status;
        request.fulfilled_count = update.fulfilled_count;
        request.requested_count = update.requested_count;
        request
            .assigned_vehicle_ids
            .extend(update.assigned_vehicle_ids.iter().cloned());
        // The record store persists the model split as the request's model
        // column, matched segment first; the next backlog read hands the
        // list back in that order. Mirror that round-trip here.
        if let Some(split) = &update.model_split {
            request.requested_models = split
                .split('/')
                .flat_map(|seg| seg.split(','))
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
        state.request_updates.push((request_id.to_string(), status));
        Ok(())
    }
}

/// Records every dispatched notification; optionally fails to exercise the
/// swallow-and-log path.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: std::sync::atomic::AtomicBool,
    messages: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str, deep_link: &str, target_role: &str) -> Result<()> {
        if self.fail.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(anyhow!("injected notifier failure"));
        }
        self.messages.lock().unwrap().push((
            message.to_string(),
            deep_link.to_string(),
            target_role.to_string(),
        ));
        Ok(())
    }
}
