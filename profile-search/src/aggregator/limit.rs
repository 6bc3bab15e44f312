//! Result-count ceiling.

use crate::types::UserRecord;

/// Keep at most `max_results` records, returning whether the cap was reached.
///
/// The cap is applied before visibility filtering, so a capped list may
/// later shrink below `max_results`; it is never refilled. A non-positive
/// cap empties the list.
pub fn apply_cap(records: &mut Vec<UserRecord>, max_results: i64) -> bool {
    let cap = usize::try_from(max_results).unwrap_or(0);
    let reached = !records.is_empty() && records.len() >= cap;
    records.truncate(cap);
    reached
}
