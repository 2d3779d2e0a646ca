//! Server registry merging.

use std::collections::BTreeSet;

/// Add `server` to a registry list.
///
/// The result has no duplicates and is sorted ascending, whatever the order
/// of `existing`.
pub fn merge_server(existing: Vec<String>, server: &str) -> Vec<String> {
    let mut set: BTreeSet<String> = existing.into_iter().collect();
    set.insert(server.to_string());
    set.into_iter().collect()
}
