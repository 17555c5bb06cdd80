use axum::routing::{get, post};
use axum::Router;
use fleet_matcher::config::AppConfig;
use fleet_matcher::http::handlers::matching;
use fleet_matcher::pool::MatchPool;
use fleet_matcher::service::committer::AssignmentCommitter;
use fleet_matcher::service::coordinator::ProposalCoordinator;
use fleet_matcher::service::scheduler::Scheduler;
use fleet_matcher::store::http::{HttpNotifier, HttpRecordStore};
use fleet_matcher::store::{Notifier, RecordStore};
use fleet_matcher::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(
        cfg.record_store_url.clone(),
        cfg.record_store_timeout_ms,
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier {
        base_url: cfg.record_store_url.clone(),
        client: reqwest::Client::new(),
    });

    let pool = Arc::new(MatchPool::new(store.clone()));
    let committer = AssignmentCommitter {
        store: store.clone(),
        notifier,
    };
    let coordinator = Arc::new(ProposalCoordinator::new(
        pool,
        store,
        committer,
        cfg.proposal_ttl_secs,
        cfg.tie_break_seed,
    ));
    let scheduler = Scheduler {
        coordinator: coordinator.clone(),
        tick_interval: std::time::Duration::from_secs(cfg.tick_interval_secs),
    };
    tokio::spawn(scheduler.clone().run());

    let state = AppState {
        scheduler,
        coordinator,
    };

    let app = Router::new()
        .route("/health", get(matching::health))
        .route("/matching/run", post(matching::run_matching))
        .route("/matching/requests", post(matching::submit_request))
        .route("/matching/proposal", get(matching::get_proposal))
        .route("/matching/proposal/:proposal_id/confirm", post(matching::confirm_proposal))
        .route("/matching/proposal/:proposal_id/reject", post(matching::reject_proposal))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
