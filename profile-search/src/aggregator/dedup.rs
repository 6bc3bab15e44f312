//! Order-preserving merge and deduplication of user records.
//!
//! Sources may return overlapping users. The first occurrence of each
//! identifier wins, so a user found by an earlier source keeps that
//! source's position and record.

use std::collections::HashSet;

use crate::types::UserRecord;

/// Concatenate per-source result lists in the given order.
pub fn merge_in_order<I>(lists: I) -> Vec<UserRecord>
where
    I: IntoIterator<Item = Vec<UserRecord>>,
{
    lists.into_iter().flatten().collect()
}

/// Remove records whose identifier was already seen, keeping first occurrences.
pub fn deduplicate(records: Vec<UserRecord>) -> Vec<UserRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
