use fleet_matcher::domain::request::{
    AssignmentRequest, Frequency, Gender, OrgLevel, RentalCategory, RequestStatus,
};
use fleet_matcher::domain::vehicle::{
    AvailabilityStatus, FuelType, SourcePool, Vehicle, VehicleCategory,
};
use fleet_matcher::pool::MatchPool;
use fleet_matcher::service::committer::AssignmentCommitter;
use fleet_matcher::service::coordinator::ProposalCoordinator;
use fleet_matcher::store::mock::{InMemoryRecordStore, RecordingNotifier};
use std::sync::Arc;

pub fn vehicle(plate: &str, model: &str, cc: i32, year: i32) -> Vehicle {
    Vehicle {
        id: format!("v-{plate}"),
        plate_number: plate.to_string(),
        model: model.to_string(),
        category: VehicleCategory::Automobile,
        manufacture_year: year,
        engine_displacement_cc: cc,
        fuel_type: FuelType::Other,
        availability_status: AvailabilityStatus::Ready,
        source_pool: SourcePool::Owned,
    }
}

pub fn request(id: &str, level: OrgLevel, travel: Frequency, notice: Frequency) -> AssignmentRequest {
    AssignmentRequest {
        id: id.to_string(),
        request_letter_no: format!("RL-{id}"),
        requester_name: "tester".to_string(),
        department: "operations".to_string(),
        phone_number: "0911-000000".to_string(),
        request_date: "2026-08-01".to_string(),
        organizational_level: level,
        rental_category: RentalCategory::Standard,
        travel_frequency: travel,
        short_notice_frequency: notice,
        has_mobility_issue: false,
        gender: Gender::Male,
        priority_score: 0,
        status: RequestStatus::Pending,
        requested_models: vec![],
        assigned_vehicle_ids: vec![],
        fulfilled_count: 0,
        requested_count: 1,
    }
}

pub struct Harness {
    pub store: Arc<InMemoryRecordStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub committer: AssignmentCommitter,
    pub coordinator: ProposalCoordinator,
}

pub fn harness(proposal_ttl_secs: i64) -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let pool = Arc::new(MatchPool::new(store.clone()));
    let committer = AssignmentCommitter {
        store: store.clone(),
        notifier: notifier.clone(),
    };
    let coordinator = ProposalCoordinator::new(
        pool,
        store.clone(),
        committer.clone(),
        proposal_ttl_secs,
        Some(17),
    );
    Harness {
        store,
        notifier,
        committer,
        coordinator,
    }
}
