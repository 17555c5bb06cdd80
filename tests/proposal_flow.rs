mod common;

use common::{harness, request, vehicle};
use fleet_matcher::domain::request::{Frequency, OrgLevel};
use fleet_matcher::error::EngineError;
use uuid::Uuid;

#[tokio::test]
async fn tick_with_no_eligible_vehicle_returns_none_and_changes_nothing() {
    let h = harness(600);
    // A Level5 expert can never take a 2500cc vehicle.
    h.store.seed_vehicles(vec![vehicle("A-1", "LandCruiser", 2500, 2022)]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level5, Frequency::High, Frequency::High)]);

    let out = h.coordinator.tick().await.unwrap();
    assert!(out.is_none());
    assert_eq!(h.store.vehicle_write_count(), 0);
    assert_eq!(h.store.request_update_count(), 0);
}

#[tokio::test]
async fn at_most_one_proposal_across_repeated_ticks() {
    let h = harness(3600);
    h.store.seed_vehicles(vec![
        vehicle("A-1", "Corolla", 1300, 2020),
        vehicle("A-2", "Hilux", 1500, 2021),
    ]);
    h.store.seed_requests(vec![
        request("r1", OrgLevel::Level2, Frequency::High, Frequency::High),
        request("r2", OrgLevel::Level3, Frequency::High, Frequency::High),
    ]);

    let first = h.coordinator.tick().await.unwrap().expect("proposal");
    let second = h.coordinator.tick().await.unwrap().expect("same proposal");
    let third = h.coordinator.tick().await.unwrap().expect("same proposal");
    assert_eq!(first.id, second.id);
    assert_eq!(first.id, third.id);
    assert_eq!(h.coordinator.outstanding().await.unwrap().id, first.id);
}

#[tokio::test]
async fn backlog_is_served_in_rank_order() {
    let h = harness(600);
    h.store.seed_vehicles(vec![vehicle("A-1", "Corolla", 1300, 2020)]);
    h.store.seed_requests(vec![
        // Level2 but low priority (15+35+0+1 = 51).
        request("senior", OrgLevel::Level2, Frequency::Low, Frequency::Low),
        // Level4 and high priority (35+55+0+1 = 91): must win.
        request("urgent", OrgLevel::Level4, Frequency::High, Frequency::High),
    ]);

    let proposal = h.coordinator.tick().await.unwrap().expect("proposal");
    assert_eq!(proposal.request_id, "urgent");
}

#[tokio::test]
async fn reject_clears_the_slot_and_request_stays_pending() {
    let h = harness(600);
    h.store.seed_vehicles(vec![vehicle("A-1", "Corolla", 1300, 2020)]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level3, Frequency::High, Frequency::High)]);

    let proposal = h.coordinator.tick().await.unwrap().expect("proposal");
    h.coordinator.reject(proposal.id).await.unwrap();

    assert!(h.coordinator.outstanding().await.is_none());
    assert_eq!(h.store.vehicle_write_count(), 0);

    // The request is still pending, so the next tick re-proposes it.
    let again = h.coordinator.tick().await.unwrap().expect("new proposal");
    assert_ne!(again.id, proposal.id);
    assert_eq!(again.request_id, "r1");
}

#[tokio::test]
async fn reject_with_wrong_id_is_refused() {
    let h = harness(600);
    h.store.seed_vehicles(vec![vehicle("A-1", "Corolla", 1300, 2020)]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level3, Frequency::High, Frequency::High)]);

    let proposal = h.coordinator.tick().await.unwrap().expect("proposal");
    let err = h.coordinator.reject(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::ProposalNotFound(_)));
    assert_eq!(h.coordinator.outstanding().await.unwrap().id, proposal.id);
}

#[tokio::test]
async fn expired_proposal_is_auto_rejected_and_matching_resumes() {
    let h = harness(0); // zero TTL: expires immediately
    h.store.seed_vehicles(vec![vehicle("A-1", "Corolla", 1300, 2020)]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level3, Frequency::High, Frequency::High)]);

    let first = h.coordinator.tick().await.unwrap().expect("proposal");
    let second = h.coordinator.tick().await.unwrap().expect("replacement");
    assert_ne!(first.id, second.id);
    assert_eq!(second.request_id, "r1");
}

#[tokio::test]
async fn tick_aborts_cleanly_when_the_store_is_down() {
    let h = harness(600);
    h.store.seed_vehicles(vec![vehicle("A-1", "Corolla", 1300, 2020)]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level3, Frequency::High, Frequency::High)]);
    h.store.fail_reads(true);

    let err = h.coordinator.tick().await.unwrap_err();
    assert!(matches!(err, EngineError::Transient(_)));
    assert!(h.coordinator.outstanding().await.is_none());

    // Next natural tick succeeds once the store is back.
    h.store.fail_reads(false);
    assert!(h.coordinator.tick().await.unwrap().is_some());
}

#[tokio::test]
async fn submit_defers_when_another_proposal_is_outstanding() {
    let h = harness(3600);
    h.store.seed_vehicles(vec![
        vehicle("A-1", "Corolla", 1300, 2020),
        vehicle("A-2", "Hilux", 1500, 2021),
    ]);
    h.store
        .seed_requests(vec![request("r1", OrgLevel::Level3, Frequency::High, Frequency::High)]);

    let outstanding = h.coordinator.tick().await.unwrap().expect("proposal for r1");

    let late = request("r2", OrgLevel::Level2, Frequency::High, Frequency::High);
    let result = h.coordinator.submit(late).await.unwrap();

    // The submission is saved for later ticks; the unrelated live proposal
    // is not handed back as its match.
    assert!(result.is_none());
    assert_eq!(h.coordinator.outstanding().await.unwrap().id, outstanding.id);
    let created = h.store.created_requests();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "r2");
}

#[tokio::test]
async fn level5_requests_compete_on_score() {
    let h = harness(600);
    h.store.seed_vehicles(vec![vehicle("A-1", "Vitz", 1100, 2010)]);
    h.store.seed_requests(vec![
        // 15+35+0+1 = 51
        request("calm", OrgLevel::Level5, Frequency::Low, Frequency::Low),
        // 35+55+0+1 = 91
        request("busy", OrgLevel::Level5, Frequency::High, Frequency::High),
    ]);

    let proposal = h.coordinator.tick().await.unwrap().expect("proposal");
    assert_eq!(proposal.request_id, "busy");
}

#[tokio::test]
async fn multi_model_request_gets_one_vehicle_per_unfulfilled_model() {
    let h = harness(600);
    h.store.seed_vehicles(vec![
        vehicle("A-1", "Corolla", 1300, 2020),
        vehicle("A-2", "Corolla", 1300, 2015),
        vehicle("A-3", "Hilux", 1500, 2021),
    ]);
    let mut req = request("multi", OrgLevel::Level2, Frequency::High, Frequency::High);
    req.requested_models = vec!["Corolla".to_string(), "Hilux".to_string(), "Vitz".to_string()];
    req.requested_count = 3;
    h.store.seed_requests(vec![req]);

    let proposal = h.coordinator.tick().await.unwrap().expect("proposal");
    // Vitz has no match and is skipped; one vehicle each for the other two.
    assert_eq!(proposal.candidate_plate_numbers.len(), 2);
    assert!(proposal.candidate_plate_numbers.contains(&"A-1".to_string()));
    assert!(proposal.candidate_plate_numbers.contains(&"A-3".to_string()));
}
