//! Dense priority maintenance for [`Prioritizable`] collections.
//!
//! Every function works on one scope sorted ascending by priority and returns
//! only the items whose priority changed, so callers persist the minimum.

use thiserror::Error;

use crate::Prioritizable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorganizeError {
    #[error("priority {priority} is outside 1..={len}")]
    PriorityOutOfRange { priority: i32, len: usize },
}

/// Sort by priority, ties broken by id.
pub fn sort_by_priority<T: Prioritizable>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// True when the priorities of `items`, in order, are exactly `1..=len`.
#[must_use]
pub fn is_dense<T: Prioritizable>(items: &[T]) -> bool {
    items
        .iter()
        .zip(1..)
        .all(|(item, expected)| item.priority() == expected)
}

fn len_as_priority(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

fn priority_at(index: usize) -> i32 {
    len_as_priority(index + 1)
}

/// Move the item at priority `old` to priority `new` in a sorted slice.
///
/// `new` outside `1..=len` is clamped to `len`. Items between the two
/// positions shift by one toward the vacated slot. Returns the sub-slice
/// `[min(old, new), max(old, new)]` with priorities rewritten to match
/// positions.
///
/// # Errors
///
/// Returns [`ReorganizeError::PriorityOutOfRange`] if `old` is not a valid
/// position.
pub fn reorganize<T: Prioritizable>(
    sorted: &mut [T],
    old: i32,
    new: i32,
) -> Result<&[T], ReorganizeError> {
    let len = sorted.len();
    let max = len_as_priority(len);
    if old < 1 || old > max {
        return Err(ReorganizeError::PriorityOutOfRange { priority: old, len });
    }
    let new = if new < 1 || new > max { max } else { new };

    // both in 1..=len, so the casts are lossless
    let from = (old - 1) as usize;
    let to = (new - 1) as usize;
    if from < to {
        sorted[from..=to].rotate_left(1);
    } else if from > to {
        sorted[to..=from].rotate_right(1);
    }

    let (lo, hi) = (from.min(to), from.max(to));
    for (index, item) in sorted.iter_mut().enumerate().take(hi + 1).skip(lo) {
        item.set_priority(priority_at(index));
    }
    Ok(&sorted[lo..=hi])
}

/// Insert `item` at its requested priority.
///
/// # Errors
///
/// Never fails for a non-empty result; the error type is shared with
/// [`reorganize`].
pub fn add_new<T: Prioritizable>(item: T, items: &mut Vec<T>) -> Result<&[T], ReorganizeError> {
    sort_by_priority(items);
    let requested = item.priority();
    items.push(item);
    let appended = len_as_priority(items.len());
    reorganize(items, appended, requested)
}

/// Replace the stored version of `item` (matched by id) and move it from
/// `previous` to its new priority. An empty list gets `item` appended.
///
/// If no stored version has the same id the list is left without `item`;
/// callers must check that it is present in the returned slice.
///
/// # Errors
///
/// Returns [`ReorganizeError::PriorityOutOfRange`] when `previous` is not a
/// position in the list.
pub fn update_existing<T: Prioritizable>(
    item: T,
    items: &mut Vec<T>,
    previous: i32,
) -> Result<&[T], ReorganizeError> {
    sort_by_priority(items);
    let requested = item.priority();
    if items.is_empty() {
        items.push(item);
    } else if let Some(slot) = items.iter_mut().find(|stored| stored.id() == item.id()) {
        *slot = item;
    }
    reorganize(items, previous, requested)
}

/// Sort, then move the item at `old` to `new`.
///
/// # Errors
///
/// Returns [`ReorganizeError::PriorityOutOfRange`] when `old` is not a
/// position in the list.
pub fn change_priority<T: Prioritizable>(
    items: &mut [T],
    old: i32,
    new: i32,
) -> Result<&[T], ReorganizeError> {
    sort_by_priority(items);
    reorganize(items, old, new)
}

/// Close the gap left by `deleted_id`: renumber the rest `1, 2, 3...` in
/// order and return only the items whose priority changed.
#[must_use]
pub fn pack<T: Prioritizable>(mut items: Vec<T>, deleted_id: &str) -> Vec<T> {
    sort_by_priority(&mut items);
    let mut altered = Vec::new();
    let mut next = 1;
    for mut item in items {
        if item.id() == deleted_id {
            continue;
        }
        if item.priority() != next {
            item.set_priority(next);
            altered.push(item);
        }
        next += 1;
    }
    altered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        priority: i32,
    }

    impl Prioritizable for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn set_priority(&mut self, priority: i32) {
            self.priority = priority;
        }
    }

    fn item(id: &str, priority: i32) -> Item {
        Item {
            id: id.into(),
            priority,
        }
    }

    fn dense(n: usize) -> Vec<Item> {
        (1..=n)
            .map(|p| item(&format!("r{p}"), len_as_priority(p)))
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn move_down_returns_span() {
        let mut items = dense(5);
        let altered = reorganize(&mut items, 2, 4).unwrap();
        assert_eq!(ids(altered), vec!["r3", "r4", "r2"]);
        assert_eq!(altered.iter().map(|i| i.priority).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(is_dense(&items));
    }

    #[test]
    fn move_up_returns_span() {
        let mut items = dense(5);
        let altered = reorganize(&mut items, 4, 2).unwrap();
        assert_eq!(ids(altered), vec!["r4", "r2", "r3"]);
        assert!(is_dense(&items));
    }

    #[test]
    fn new_priority_clamped_to_len() {
        for new in [0, -3, 999] {
            let mut items = dense(3);
            reorganize(&mut items, 2, new).unwrap();
            assert_eq!(items[2].id, "r2");
            assert_eq!(items[2].priority, 3);
        }
    }

    #[test]
    fn same_priority_alters_only_itself() {
        let mut items = dense(4);
        let altered = reorganize(&mut items, 3, 3).unwrap();
        assert_eq!(ids(altered), vec!["r3"]);
    }

    #[test]
    fn old_priority_out_of_range_is_error() {
        let mut items = dense(3);
        assert_eq!(
            reorganize(&mut items, 4, 1).unwrap_err(),
            ReorganizeError::PriorityOutOfRange { priority: 4, len: 3 }
        );
        let mut empty: Vec<Item> = Vec::new();
        assert!(reorganize(&mut empty, 1, 1).is_err());
    }

    #[test]
    fn add_new_in_the_middle() {
        let mut items = dense(3);
        let altered = add_new(item("new", 2), &mut items).unwrap();
        assert_eq!(ids(altered), vec!["new", "r2", "r3"]);
        assert!(is_dense(&items));
    }

    #[test]
    fn add_new_past_the_end_appends() {
        let mut items = dense(3);
        let altered = add_new(item("new", 50), &mut items).unwrap();
        assert_eq!(ids(altered), vec!["new"]);
        assert_eq!(altered[0].priority, 4);
    }

    #[test]
    fn add_new_to_empty() {
        let mut items = Vec::new();
        let altered = add_new(item("first", 7), &mut items).unwrap();
        assert_eq!(altered[0].priority, 1);
    }

    #[test]
    fn update_existing_replaces_and_moves() {
        let mut items = dense(4);
        let altered = update_existing(item("r1", 3), &mut items, 1).unwrap();
        assert_eq!(ids(altered), vec!["r2", "r3", "r1"]);
        assert!(is_dense(&items));
    }

    #[test]
    fn update_existing_unknown_id_is_dropped() {
        let mut items = dense(3);
        let altered = update_existing(item("ghost", 1), &mut items, 3).unwrap();
        assert!(!ids(altered).contains(&"ghost"));
    }

    #[test]
    fn change_priority_sorts_first() {
        let mut items = vec![item("c", 3), item("a", 1), item("b", 2)];
        let altered = change_priority(&mut items, 3, 1).unwrap();
        assert_eq!(ids(altered), vec!["c", "a", "b"]);
    }

    #[test]
    fn pack_after_delete() {
        let items = vec![item("a", 1), item("c", 3), item("d", 4)];
        let altered = pack(items, "b");
        assert_eq!(ids(&altered), vec!["c", "d"]);
        assert_eq!(altered.iter().map(|i| i.priority).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn pack_skips_deleted_id_still_present() {
        let altered = pack(dense(4), "r2");
        assert_eq!(ids(&altered), vec!["r3", "r4"]);
    }

    #[test]
    fn ties_broken_by_id() {
        let mut items = vec![item("b", 1), item("a", 1)];
        sort_by_priority(&mut items);
        assert_eq!(ids(&items), vec!["a", "b"]);
    }
}
