//! Order-preserving reconciliation of scalar lists.
//!
//! The remote API treats address, tag, instance and load balancer lists as
//! sets and may return them in any order. [`reconcile_lists`] produces the
//! remote membership laid out in the declared order:
//!
//! 1. declared items that still exist remotely, in declared order;
//! 2. remote-only items, in the order the remote returned them.
//!
//! Duplicates collapse: every remote member appears exactly once.

use std::collections::HashSet;
use std::hash::Hash;

/// Reconcile a declared list against the remote list.
#[must_use]
pub fn reconcile_lists<T>(local: &[T], remote: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut remaining: HashSet<&T> = remote.iter().collect();
    let mut merged = Vec::with_capacity(remaining.len());

    for item in local {
        if remaining.remove(item) {
            merged.push(item.clone());
        }
    }

    for item in remote {
        if remaining.remove(item) {
            merged.push(item.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keeps_declared_order_and_drops_removed() {
        let merged = reconcile_lists(&strings(&["a", "b", "c"]), &strings(&["c", "a"]));
        assert_eq!(merged, strings(&["a", "c"]));
    }

    #[test]
    fn appends_remote_only_items() {
        let merged = reconcile_lists(
            &strings(&["10.0.0.0/8", "192.168.0.0/16"]),
            &strings(&["172.16.0.0/12", "192.168.0.0/16", "0.0.0.0/0", "10.0.0.0/8"]),
        );

        assert_eq!(&merged[..2], &strings(&["10.0.0.0/8", "192.168.0.0/16"])[..]);
        let tail: BTreeSet<String> = merged[2..].iter().cloned().collect();
        let expected: BTreeSet<String> = strings(&["0.0.0.0/0", "172.16.0.0/12"]).into_iter().collect();
        assert_eq!(tail, expected);
    }

    #[test]
    fn integers_reconcile_the_same_way() {
        let merged = reconcile_lists(&[3_i64, 1, 2], &[2, 3, 4]);
        assert_eq!(&merged[..2], &[3, 2]);
        assert_eq!(merged[2], 4);
    }

    #[test]
    fn duplicates_collapse() {
        let merged = reconcile_lists(&strings(&["a", "a", "b"]), &strings(&["a", "b", "b"]));
        assert_eq!(merged, strings(&["a", "b"]));
    }

    #[test]
    fn empty_inputs() {
        assert!(reconcile_lists::<String>(&[], &[]).is_empty());
        assert!(reconcile_lists(&strings(&["a"]), &[]).is_empty());
        assert_eq!(reconcile_lists(&[], &strings(&["a"])), strings(&["a"]));
    }

    proptest! {
        #[test]
        fn output_is_exactly_the_remote_set(
            local in prop::collection::vec(0_i64..20, 0..12),
            remote in prop::collection::vec(0_i64..20, 0..12),
        ) {
            let merged = reconcile_lists(&local, &remote);

            let merged_set: BTreeSet<_> = merged.iter().copied().collect();
            let remote_set: BTreeSet<_> = remote.iter().copied().collect();
            prop_assert_eq!(merged.len(), merged_set.len());
            prop_assert_eq!(merged_set, remote_set);
        }

        #[test]
        fn shared_items_follow_declared_order(
            local in prop::collection::btree_set(0_i64..30, 0..12),
            remote in prop::collection::btree_set(0_i64..30, 0..12),
        ) {
            let local: Vec<_> = local.into_iter().rev().collect();
            let remote: Vec<_> = remote.into_iter().collect();
            let merged = reconcile_lists(&local, &remote);

            let expected_prefix: Vec<_> =
                local.iter().copied().filter(|item| remote.contains(item)).collect();
            prop_assert_eq!(&merged[..expected_prefix.len()], &expected_prefix[..]);
        }

        #[test]
        fn identical_lists_are_unchanged(
            items in prop::collection::hash_set("[a-z0-9./]{1,12}", 0..10),
        ) {
            let items: Vec<String> = items.into_iter().collect();
            prop_assert_eq!(reconcile_lists(&items, &items), items);
        }
    }
}
