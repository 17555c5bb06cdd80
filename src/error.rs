use thiserror::Error;

/// Failure classes surfaced by matching and commit flows. Anything not listed
/// here ("no eligible match", tie-breaks) is a normal outcome, not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A read or write against the external record store failed. The tick is
    /// abandoned and retried on the next natural period.
    #[error("record store unavailable: {0}")]
    Transient(anyhow::Error),

    /// The vehicle-side write landed but the request-side write failed and
    /// the compensating revert also failed, leaving the named plates marked
    /// Assigned with no corresponding request.
    #[error("partial commit for request {request_id}: vehicles {stranded_plates:?} left Assigned ({cause})")]
    PartialCommit {
        request_id: String,
        stranded_plates: Vec<String>,
        cause: anyhow::Error,
    },

    /// Confirm/reject referenced a proposal that is not the outstanding one.
    #[error("no outstanding proposal with id {0}")]
    ProposalNotFound(uuid::Uuid),

    /// A status write would violate the request lifecycle.
    #[error("illegal status transition {from} -> {to} for request {request_id}")]
    IllegalTransition {
        request_id: String,
        from: &'static str,
        to: &'static str,
    },
}
