use crate::domain::request::{AssignmentRequest, RequestStatus};
use crate::domain::vehicle::{AvailabilityStatus, SourcePool, Vehicle};
use crate::error::EngineError;
use crate::store::{Notifier, RecordStore, StatusUpdate};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub request_id: String,
    pub assigned_plates: Vec<String>,
    /// Plates skipped because they were no longer Ready; a retried commit
    /// lands here in full and performs no writes.
    pub skipped_plates: Vec<String>,
    pub fulfilled_count: u32,
    pub requested_count: u32,
    pub fully_fulfilled: bool,
}

/// Two-sided state transition: vehicles -> Assigned, request -> Assigned (or
/// Pending with updated fulfillment for a partial multi-vehicle match). The
/// two writes are a saga: if the request side fails, every vehicle written in
/// step one is reverted to Ready; only a failed revert leaves the store
/// inconsistent, and that surfaces as PartialCommit.
#[derive(Clone)]
pub struct AssignmentCommitter {
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AssignmentCommitter {
    pub async fn commit(
        &self,
        request: &AssignmentRequest,
        vehicles: &[Vehicle],
    ) -> Result<CommitOutcome, EngineError> {
        if request.status == RequestStatus::Assigned {
            // Retried commit after a success: nothing left to do.
            return Ok(CommitOutcome {
                request_id: request.id.clone(),
                assigned_plates: vec![],
                skipped_plates: vehicles.iter().map(|v| v.plate_number.clone()).collect(),
                fulfilled_count: request.fulfilled_count,
                requested_count: request.requested_count,
                fully_fulfilled: true,
            });
        }

        // NotAssigned requests re-enter the backlog as re-queued pending work.
        let effective = match request.status {
            RequestStatus::NotAssigned => RequestStatus::Pending,
            other => other,
        };
        if !effective.can_transition_to(RequestStatus::Assigned) {
            return Err(EngineError::IllegalTransition {
                request_id: request.id.clone(),
                from: request.status.as_wire(),
                to: RequestStatus::Assigned.as_wire(),
            });
        }

        let today = Utc::now().date_naive();
        let ready = self.ready_plates().await.map_err(EngineError::Transient)?;

        let mut assigned: Vec<&Vehicle> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();
        for vehicle in vehicles {
            if !ready.contains(&vehicle.plate_number) {
                // Already taken, most likely by an earlier attempt of this
                // same commit. Skipping keeps retries side-effect free.
                skipped.push(vehicle.plate_number.clone());
                continue;
            }
            let write = self
                .store
                .set_vehicle_status(
                    vehicle.source_pool,
                    &vehicle.plate_number,
                    AvailabilityStatus::Assigned,
                    today,
                )
                .await;
            if let Err(err) = write {
                self.revert(&assigned, &request.id, err).await?;
                return Err(EngineError::Transient(anyhow::anyhow!(
                    "vehicle status write failed for {}",
                    vehicle.plate_number
                )));
            }
            assigned.push(vehicle);
        }

        if assigned.is_empty() && !skipped.is_empty() {
            // Every candidate was already taken; leave the request record
            // untouched rather than rewriting it with stale fulfillment.
            return Ok(CommitOutcome {
                request_id: request.id.clone(),
                assigned_plates: vec![],
                skipped_plates: skipped,
                fulfilled_count: request.fulfilled_count,
                requested_count: request.requested_count.max(1),
                fully_fulfilled: false,
            });
        }

        let newly = assigned.len() as u32;
        let requested_count = request.requested_count.max(1);
        let fulfilled_count = (request.fulfilled_count + newly).min(requested_count);
        let fully_fulfilled = fulfilled_count >= requested_count;
        let next_status = if fully_fulfilled {
            RequestStatus::Assigned
        } else {
            RequestStatus::Pending
        };

        let update = StatusUpdate {
            assigned_vehicle_ids: assigned.iter().map(|v| v.id.clone()).collect(),
            assigned_plate_numbers: assigned.iter().map(|v| v.plate_number.clone()).collect(),
            fulfilled_count,
            requested_count,
            model_split: model_split(request, &assigned),
            effective_date: Some(today),
        };

        if let Err(err) = self
            .store
            .update_request_status(&request.id, next_status, &update)
            .await
        {
            self.revert(&assigned, &request.id, err).await?;
            return Err(EngineError::Transient(anyhow::anyhow!(
                "request status write failed for {}",
                request.id
            )));
        }

        let plates = update.assigned_plate_numbers.join(", ");
        let message = if fully_fulfilled {
            format!("Request {} assigned vehicle(s) {}", request.request_letter_no, plates)
        } else {
            format!(
                "Request {} partially fulfilled ({}/{}): {}",
                request.request_letter_no, fulfilled_count, requested_count, plates
            )
        };
        if let Err(err) = self
            .notifier
            .notify(&message, &format!("/assignments/{}", request.id), "admin")
            .await
        {
            tracing::warn!("notification dispatch failed for request {}: {}", request.id, err);
        }

        Ok(CommitOutcome {
            request_id: request.id.clone(),
            assigned_plates: update.assigned_plate_numbers,
            skipped_plates: skipped,
            fulfilled_count,
            requested_count,
            fully_fulfilled,
        })
    }

    async fn ready_plates(&self) -> anyhow::Result<HashSet<String>> {
        let mut plates = HashSet::new();
        for pool in [SourcePool::Owned, SourcePool::Rented] {
            for vehicle in self.store.list_ready_automobiles(pool).await? {
                plates.insert(vehicle.plate_number);
            }
        }
        Ok(plates)
    }

    /// Compensating action: put every vehicle written so far back to Ready.
    /// A failed revert is the one place the two-sided update can strand state.
    async fn revert(
        &self,
        assigned: &[&Vehicle],
        request_id: &str,
        cause: anyhow::Error,
    ) -> Result<(), EngineError> {
        let today = Utc::now().date_naive();
        let mut stranded = Vec::new();
        for vehicle in assigned {
            let revert = self
                .store
                .set_vehicle_status(
                    vehicle.source_pool,
                    &vehicle.plate_number,
                    AvailabilityStatus::Ready,
                    today,
                )
                .await;
            if revert.is_err() {
                stranded.push(vehicle.plate_number.clone());
            }
        }
        if stranded.is_empty() {
            Ok(())
        } else {
            Err(EngineError::PartialCommit {
                request_id: request_id.to_string(),
                stranded_plates: stranded,
                cause,
            })
        }
    }
}

/// Record-store encoding of the multi-vehicle model list: models covered so
/// far, a slash, then the models still waiting. The model list is stored
/// matched-first, so models fulfilled in earlier rounds are the leading
/// `fulfilled_count` entries and stay in the matched segment. Single-vehicle
/// requests have no model list and report nothing.
fn model_split(request: &AssignmentRequest, assigned: &[&Vehicle]) -> Option<String> {
    if request.requested_models.is_empty() {
        return None;
    }
    let mut matched: Vec<String> = request
        .requested_models
        .iter()
        .take(request.fulfilled_count as usize)
        .cloned()
        .collect();
    matched.extend(assigned.iter().map(|v| v.model.clone()));
    let covered: HashSet<String> = matched.iter().map(|m| m.to_lowercase()).collect();
    let unmatched: Vec<String> = request
        .requested_models
        .iter()
        .filter(|m| !covered.contains(&m.to_lowercase()))
        .cloned()
        .collect();
    if unmatched.is_empty() {
        Some(matched.join(","))
    } else {
        Some(format!("{}/{}", matched.join(","), unmatched.join(",")))
    }
}
