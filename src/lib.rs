pub mod config;
pub mod domain {
    pub mod proposal;
    pub mod request;
    pub mod vehicle;
}
pub mod error;
pub mod http {
    pub mod handlers {
        pub mod matching;
    }
}
pub mod matching {
    pub mod filter;
    pub mod ranker;
}
pub mod pool;
pub mod scoring {
    pub mod engine;
    pub mod types;
}
pub mod service {
    pub mod committer;
    pub mod coordinator;
    pub mod scheduler;
}
pub mod store;

use service::coordinator::ProposalCoordinator;
use service::scheduler::Scheduler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,
    pub coordinator: Arc<ProposalCoordinator>,
}
