//! Item list views.
//!
//! Every function takes the full item set in creation order (as returned by
//! `ItemStore::list_all`) and returns a new, owned ordering.

use crate::model::item::{Item, ItemId};
use crate::model::marker::{ItemState, Marker, Signifier};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Returns the last `n` items in creation order, oldest first.
///
/// Fewer than `n` items yields all of them; `n == 0` yields nothing.
pub fn recent(items: &[Item], n: usize) -> Vec<Item> {
    let start = items.len().saturating_sub(n);
    items[start..].to_vec()
}

/// Returns scheduled, not-yet-complete items at or after `now_ms`.
///
/// Sorted by `scheduled_at` ascending, ties by `id` ascending.
pub fn upcoming(items: &[Item], now_ms: i64) -> Vec<Item> {
    let mut selected: Vec<Item> = items
        .iter()
        .filter(|item| !item.is_complete())
        .filter(|item| item.scheduled_at.is_some_and(|at| at >= now_ms))
        .cloned()
        .collect();
    selected.sort_by_key(|item| (item.scheduled_at, item.id));
    selected
}

/// Keeps items matching one marker. `Marker::Clear` keeps everything.
pub fn filter_marker(items: &[Item], marker: Marker) -> Vec<Item> {
    items
        .iter()
        .filter(|item| marker_matches(item, marker))
        .cloned()
        .collect()
}

/// Newest `n` items first.
pub fn newest_first(items: &[Item], n: usize) -> Vec<Item> {
    items.iter().rev().take(n).cloned().collect()
}

/// Priority items ordered by schedule, unscheduled last.
pub fn priority(items: &[Item], n: usize) -> Vec<Item> {
    let mut selected = filter_marker(items, Marker::Signifier(Signifier::Priority));
    selected.sort_by_key(|item| (item.scheduled_at.is_none(), item.scheduled_at, item.id));
    selected.truncate(n);
    selected
}

/// Completed items, most recently updated first.
pub fn completed(items: &[Item], n: usize) -> Vec<Item> {
    let mut selected = filter_marker(items, Marker::State(ItemState::Complete));
    selected.sort_by_key(|item| (Reverse(item.updated_at), Reverse(item.id)));
    selected.truncate(n);
    selected
}

/// Case-insensitive substring search, most recently updated first.
pub fn search(items: &[Item], text: &str, include_complete: bool) -> Vec<Item> {
    let needle = text.to_lowercase();
    let mut selected: Vec<Item> = items
        .iter()
        .filter(|item| include_complete || !item.is_complete())
        .filter(|item| item.description.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    selected.sort_by_key(|item| (Reverse(item.updated_at), Reverse(item.id)));
    selected
}

/// Expands each root with its descendants, depth-first.
///
/// Children are visited in id order. An item is emitted at most once, so a
/// child that is itself one of the roots is not repeated. A descendant
/// rejected by `keep_child` is dropped together with its own subtree.
pub fn with_children<F>(all: &[Item], roots: &[Item], keep_child: F) -> Vec<(Item, usize)>
where
    F: Fn(&Item) -> bool,
{
    let mut children: HashMap<ItemId, Vec<&Item>> = HashMap::new();
    for item in all {
        if let Some(parent_id) = item.parent_id {
            children.entry(parent_id).or_default().push(item);
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|item| item.id);
    }

    let root_ids: HashSet<ItemId> = roots.iter().map(|item| item.id).collect();
    let mut seen = HashSet::new();
    let mut expanded = Vec::with_capacity(roots.len());
    for root in roots {
        if !seen.insert(root.id) {
            continue;
        }
        expanded.push((root.clone(), 0));

        let mut stack: Vec<(&Item, usize)> = children
            .get(&root.id)
            .map(|kids| kids.iter().rev().map(|kid| (*kid, 1)).collect())
            .unwrap_or_default();
        while let Some((item, depth)) = stack.pop() {
            if root_ids.contains(&item.id) || !keep_child(item) || !seen.insert(item.id) {
                continue;
            }
            expanded.push((item.clone(), depth));
            if let Some(kids) = children.get(&item.id) {
                stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
            }
        }
    }
    expanded
}

fn marker_matches(item: &Item, marker: Marker) -> bool {
    match marker {
        Marker::State(state) => item.state == state,
        Marker::Signifier(signifier) => item.signifier == Some(signifier),
        Marker::Clear => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{completed, newest_first, priority, search, with_children};
    use crate::model::item::Item;
    use crate::model::marker::{ItemState, Signifier};

    fn item(id: i64) -> Item {
        Item {
            id,
            description: format!("item {id}"),
            state: ItemState::Incomplete,
            signifier: None,
            parent_id: None,
            scheduled_at: None,
            created_at: id,
            updated_at: id,
        }
    }

    #[test]
    fn newest_first_reverses_and_limits() {
        let items: Vec<Item> = (1..=4).map(item).collect();
        let ids: Vec<i64> = newest_first(&items, 3).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn priority_puts_unscheduled_last() {
        let mut a = item(1);
        a.signifier = Some(Signifier::Priority);
        let mut b = item(2);
        b.signifier = Some(Signifier::Priority);
        b.scheduled_at = Some(500);
        let c = item(3);
        let ids: Vec<i64> = priority(&[a, b, c], 10).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn completed_orders_by_last_update() {
        let mut a = item(1);
        a.state = ItemState::Complete;
        a.updated_at = 90;
        let mut b = item(2);
        b.state = ItemState::Complete;
        b.updated_at = 10;
        let ids: Vec<i64> = completed(&[a, b, item(3)], 10).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_and_hides_complete_by_default() {
        let mut a = item(1);
        a.description = "Call Mom".to_string();
        let mut b = item(2);
        b.description = "call dentist".to_string();
        b.state = ItemState::Complete;
        let items = vec![a, b];

        assert_eq!(search(&items, "CALL", false).len(), 1);
        assert_eq!(search(&items, "call", true).len(), 2);
    }

    #[test]
    fn with_children_nests_depth_first_without_duplicates() {
        let parent = item(1);
        let mut child = item(2);
        child.parent_id = Some(1);
        let mut grandchild = item(3);
        grandchild.parent_id = Some(2);
        let mut second_child = item(4);
        second_child.parent_id = Some(1);
        let all = vec![parent.clone(), child.clone(), grandchild, second_child];

        let expanded: Vec<(i64, usize)> = with_children(&all, &[parent, child], |_| true)
            .iter()
            .map(|(item, depth)| (item.id, *depth))
            .collect();
        assert_eq!(expanded, vec![(1, 0), (4, 1), (2, 0), (3, 1)]);
    }

    #[test]
    fn rejected_child_takes_its_subtree_with_it() {
        let parent = item(1);
        let mut done = item(2);
        done.parent_id = Some(1);
        done.state = ItemState::Complete;
        let mut under_done = item(3);
        under_done.parent_id = Some(2);
        let mut open = item(4);
        open.parent_id = Some(1);
        let all = vec![parent.clone(), done, under_done, open];

        let ids: Vec<i64> = with_children(&all, &[parent], |item| !item.is_complete())
            .iter()
            .map(|(item, _)| item.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }
}
