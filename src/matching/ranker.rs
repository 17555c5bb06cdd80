use crate::domain::request::{AssignmentRequest, OrgLevel};
use std::cmp::Ordering;

/// Pairwise precedence between two pending requests:
/// two expert (Level5) requests compete on raw score; otherwise a lone
/// high-priority request wins; otherwise seniority (lower level first).
pub fn compare(a: &AssignmentRequest, b: &AssignmentRequest) -> Ordering {
    if a.organizational_level == OrgLevel::Level5 && b.organizational_level == OrgLevel::Level5 {
        return b.priority_score.cmp(&a.priority_score);
    }

    match (a.is_high_priority(), b.is_high_priority()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    a.organizational_level.rank().cmp(&b.organizational_level.rank())
}

/// Priority order for one tick. Stable: requests the comparator cannot
/// separate keep their backlog order.
pub fn rank(requests: &[AssignmentRequest]) -> Vec<AssignmentRequest> {
    let mut ordered = requests.to_vec();
    ordered.sort_by(compare);
    ordered
}
