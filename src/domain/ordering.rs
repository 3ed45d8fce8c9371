use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};

/// An item positioned among its siblings by an integer `order`
pub trait Ordered {
    type Id: Clone + Ord;

    fn id(&self) -> &Self::Id;
    fn order(&self) -> i64;
}

/// A single `(id, order)` pair of a batch reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate<I> {
    pub id: I,
    pub order: i64,
}

impl<I> OrderUpdate<I> {
    pub fn new(id: I, order: i64) -> Self {
        Self { id, order }
    }
}

/// Order assigned to an item appended after the given siblings
///
/// Returns `max + 1`, or `1` when there are no siblings. Gaps are kept as is.
/// A sibling already at `i64::MAX` leaves nothing to append after and gives
/// `BadInput`.
///
/// # Examples
/// ```
/// use kanban_core::domain::ordering::next_order;
///
/// assert_eq!(next_order(Vec::<i64>::new()).unwrap(), 1);
/// assert_eq!(next_order(vec![1, 7, 3]).unwrap(), 8);
/// assert!(next_order(vec![i64::MAX]).is_err());
/// ```
pub fn next_order(orders: impl IntoIterator<Item = i64>) -> Result<i64> {
    match orders.into_iter().max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| KanbanError::BadInput(format!("no order left after {}", max))),
    }
}

/// Sorts siblings ascending by `order`; ties fall back to the id so reads stay deterministic
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.id().cmp(b.id())));
}

/// Moves the element at `from` to index `to`, shifting the ones in between
///
/// Returns `false` and leaves `items` untouched when either index is out of range.
///
/// # Examples
/// ```
/// use kanban_core::domain::ordering::array_move;
///
/// let mut items = vec!["a", "b", "c", "d"];
/// assert!(array_move(&mut items, 3, 1));
/// assert_eq!(items, vec!["a", "d", "b", "c"]);
/// ```
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Dense 1-based orders for a sequence in its current display order
pub fn renumber<T: Ordered>(items: &[T]) -> Vec<OrderUpdate<T::Id>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| OrderUpdate::new(item.id().clone(), index as i64 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        order: i64,
    }

    impl Ordered for Item {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn order(&self) -> i64 {
            self.order
        }
    }

    fn item(id: &str, order: i64) -> Item {
        Item {
            id: id.to_string(),
            order,
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_next_order_empty() {
        assert_eq!(next_order(std::iter::empty()).unwrap(), 1);
    }

    #[test]
    fn test_next_order_with_gaps() {
        assert_eq!(next_order([2, 10, 5]).unwrap(), 11);
    }

    #[test]
    fn test_next_order_negative_values() {
        assert_eq!(next_order([-3, -1]).unwrap(), 0);
    }

    #[test]
    fn test_next_order_after_max_is_bad_input() {
        let result = next_order([3, i64::MAX]);
        assert!(matches!(result, Err(KanbanError::BadInput(_))));
        assert_eq!(next_order([i64::MAX - 1]).unwrap(), i64::MAX);
    }

    #[test]
    fn test_sort_by_order_ascending() {
        let mut items = vec![item("c", 3), item("a", 1), item("b", 2)];
        sort_by_order(&mut items);
        assert_eq!(ids(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_by_order_breaks_ties_by_id() {
        let mut items = vec![item("z", 1), item("m", 1), item("a", 2)];
        sort_by_order(&mut items);
        assert_eq!(ids(&items), vec!["m", "z", "a"]);
    }

    #[test]
    fn test_array_move_forward_and_back() {
        let mut items = vec![1, 2, 3, 4];
        assert!(array_move(&mut items, 0, 2));
        assert_eq!(items, vec![2, 3, 1, 4]);

        assert!(array_move(&mut items, 3, 0));
        assert_eq!(items, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_array_move_out_of_range() {
        let mut items = vec![1, 2];
        assert!(!array_move(&mut items, 0, 2));
        assert!(!array_move(&mut items, 5, 0));
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_renumber_is_one_based() {
        let items = vec![item("x", 40), item("y", 7)];
        let updates = renumber(&items);

        assert_eq!(
            updates,
            vec![
                OrderUpdate::new("x".to_string(), 1),
                OrderUpdate::new("y".to_string(), 2),
            ]
        );
    }
}
