//! Assertions with readable failure messages.

use anyhow::{Context, Result};
use leadgrid_runtime::{Notification, NotificationKind};
use serde_json::Value;

/// Assert that exactly one notification was emitted and it has the given kind and message.
pub fn assert_single_notification(
    notifications: &[Notification],
    kind: NotificationKind,
    message: &str,
) -> Result<()> {
    match notifications {
        [only] if only.kind == kind && only.message == message => Ok(()),
        [only] => anyhow::bail!(
            "Expected {:?} \"{}\", got {:?} \"{}\"",
            kind,
            message,
            only.kind,
            only.message
        ),
        _ => anyhow::bail!(
            "Expected exactly one notification, got {}: {:?}",
            notifications.len(),
            notifications
        ),
    }
}

/// Assert the ids, in order, of the rows in a JSON array of leads.
pub fn assert_row_ids(json: &Value, expected: &[&str]) -> Result<()> {
    let rows = json.as_array().context("Expected a JSON array of rows")?;
    let ids: Vec<&str> = rows.iter().filter_map(|row| row["id"].as_str()).collect();
    if ids != expected {
        anyhow::bail!("Expected row ids {:?}, got {:?}", expected, ids);
    }
    Ok(())
}

/// Assert that `ids` holds no duplicates.
pub fn assert_unique<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate id {}", id);
        }
    }
    Ok(())
}
