//! ## Orderings
//! This module contains the comparator plumbing used by the sorted containers, the key things
//! exposed are:
//! - [Order] which is the trait for strict weak orderings stored inside a container
//! - [Natural] which orders elements by their [Ord] instance
//! - [OrderBy] which wraps a comparison closure into an [Order]

use std::cmp::Ordering;

/// A strict weak ordering on values of type `T`. Implementations are stored by value inside the
/// containers that use them, so they should be cheap to copy around.
pub trait Order<T> {
    /// Compare `lhs` to `rhs`.
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering;

    /// Check whether `lhs` is strictly smaller than `rhs`.
    fn lt(&self, lhs: &T, rhs: &T) -> bool {
        self.cmp(lhs, rhs) == Ordering::Less
    }
}

/// The ordering given by the [Ord] instance of the element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord> Order<T> for Natural {
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Wrapper that turns a comparison closure into an [Order].
#[derive(Debug, Clone, Copy)]
pub struct OrderBy<F>(pub F);

impl<T, F: Fn(&T, &T) -> Ordering> Order<T> for OrderBy<F> {
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.0)(lhs, rhs)
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{Natural, Order, OrderBy};

    #[test]
    fn natural_order_test() {
        assert_eq!(Order::<u32>::cmp(&Natural, &1, &2), Ordering::Less);
        assert_eq!(Order::<u32>::cmp(&Natural, &2, &2), Ordering::Equal);
        assert!(Natural.lt(&1, &2));
        assert!(!Natural.lt(&2, &2));
    }

    #[test]
    fn order_by_test() {
        let rev = OrderBy(|lhs: &u32, rhs: &u32| rhs.cmp(lhs));
        assert_eq!(rev.cmp(&1, &2), Ordering::Greater);
        assert!(rev.lt(&2, &1));
    }
}
