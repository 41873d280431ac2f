//! Catalog merge policy.

use std::collections::HashSet;

use crate::models::{Entry, EntryId};

/// Union local and remote entries by id.
///
/// Remote entries whose id is absent locally are added; ids present in both
/// keep the local copy untouched (no field-by-field reconciliation — this is
/// the documented local-wins policy, not an LWW or CRDT merge). The result
/// is re-sorted by creation time, newest first.
#[must_use]
pub fn merge_catalogs(local: &[Entry], remote: Vec<Entry>) -> Vec<Entry> {
    let known: HashSet<EntryId> = local.iter().map(|entry| entry.id).collect();

    let mut merged: Vec<Entry> = local.to_vec();
    merged.extend(remote.into_iter().filter(|entry| !known.contains(&entry.id)));
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry_at(body: &str, created_at: i64) -> Entry {
        let mut entry = Entry::text(body);
        entry.created_at = created_at;
        entry
    }

    fn ids(entries: &[Entry]) -> Vec<EntryId> {
        entries.iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn disjoint_sets_union_and_sort_newest_first() {
        let a = entry_at("a", 40);
        let b = entry_at("b", 30);
        let c = entry_at("c", 20);
        let d = entry_at("d", 10);

        let merged = merge_catalogs(&[a.clone(), b.clone()], vec![c.clone(), d.clone()]);
        assert_eq!(ids(&merged), vec![a.id, b.id, c.id, d.id]);

        let timestamps: Vec<i64> = merged.iter().map(|entry| entry.created_at).collect();
        assert_eq!(timestamps, vec![40, 30, 20, 10]);
    }

    #[test]
    fn merge_is_commutative_on_disjoint_ids() {
        let local = vec![entry_at("a", 2), entry_at("b", 4)];
        let remote = vec![entry_at("c", 1), entry_at("d", 3)];

        let one_way = merge_catalogs(&local, remote.clone());
        let other_way = merge_catalogs(&remote, local);

        let mut one: Vec<EntryId> = ids(&one_way);
        let mut other: Vec<EntryId> = ids(&other_way);
        one.sort_by_key(EntryId::as_str);
        other.sort_by_key(EntryId::as_str);
        assert_eq!(one, other);
    }

    #[test]
    fn same_id_keeps_local_version_without_duplication() {
        let local = entry_at("edited locally", 5);
        let mut remote = local.clone();
        remote.body = "stale remote copy".to_string();
        remote.mood = Some("😴".to_string());

        let merged = merge_catalogs(&[local.clone()], vec![remote]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0], local);
    }
}
