//! Visibility filtering: hide invisible users from non-privileged callers.

use std::collections::HashSet;

use crate::error::SearchError;
use crate::provider::UserDirectory;
use crate::types::UserRecord;

/// Remove users the caller is not allowed to see.
///
/// Privileged callers get `records` back unchanged. Otherwise the invisible
/// identifiers are resolved to user records and any matching record is
/// dropped. Filtering only ever removes entries.
///
/// # Errors
///
/// Propagates directory failures from the privilege check, the invisible
/// set lookup, or resolution.
pub async fn remove_invisible_users<D: UserDirectory>(
    directory: &D,
    records: Vec<UserRecord>,
) -> Result<Vec<UserRecord>, SearchError> {
    if directory.is_privileged_caller().await? {
        return Ok(records);
    }

    let invisible_ids = directory.invisible_user_ids().await?;
    if invisible_ids.is_empty() {
        return Ok(records);
    }
    let invisible = directory.resolve(&invisible_ids).await?;
    if invisible.is_empty() {
        return Ok(records);
    }

    let hidden: HashSet<&str> = invisible.iter().map(|u| u.id.as_str()).collect();
    let before = records.len();
    let visible: Vec<UserRecord> = records
        .into_iter()
        .filter(|record| !hidden.contains(record.id.as_str()))
        .collect();
    tracing::debug!(removed = before - visible.len(), "removed invisible users");
    Ok(visible)
}
