//! Notification body composition.

use crate::diff::diff;
use crate::snapshot::Snapshot;

/// Build the notification body for `current`.
///
/// With a previous snapshot the body starts with a change summary; on a
/// first run (`previous` is `None`) it only lists the current configuration.
pub fn report(current: &Snapshot, previous: Option<&Snapshot>) -> String {
    let mut body = String::new();
    if let Some(previous) = previous {
        body.push_str("Changes summary:\n");
        body.push_str(&diff(current, previous));
        body.push('\n');
    }
    body.push_str("Current configuration:\n");
    body.push_str(&current.render());
    body
}
