//! Ranking policy for order queues
//!
//! A queue's ordering is decided by three pieces:
//!
//! - [`PriorityFn`]: a caller-supplied function mapping an [`Order`] to an `i32` rank
//! - [`HeapType`]: whether the smallest or the largest rank comes out first
//! - [`Structure`]: whether the tree is kept as a skew heap or a leftist heap
//!
//! Two queues can only be merged if they share the same `PriorityFn`
//! *instance*. Functions are compared by identity, never by calling them,
//! so two separately constructed functions with identical behavior are
//! still considered different.

use crate::order::Order;
use std::fmt;
use std::rc::Rc;

/// A shared, identity-comparable ranking function
///
/// Cloning a `PriorityFn` shares the same identity; calling
/// [`PriorityFn::new`] twice on the same closure does not.
///
/// A negative rank has a second meaning: [`OrderQueue::insert`] refuses
/// orders that rank below zero.
///
/// [`OrderQueue::insert`]: crate::queue::OrderQueue::insert
///
/// # Example
///
/// ```rust
/// use order_queue::priority::PriorityFn;
///
/// let by_importance = PriorityFn::new(|o| o.importance());
/// let same = by_importance.clone();
/// let lookalike = PriorityFn::new(|o| o.importance());
///
/// assert!(by_importance.same_as(&same));
/// assert!(!by_importance.same_as(&lookalike));
/// ```
#[derive(Clone)]
pub struct PriorityFn {
    func: Rc<dyn Fn(&Order) -> i32>,
}

impl PriorityFn {
    /// Wraps a ranking function, giving it a fresh identity
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Order) -> i32 + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Ranks an order
    #[inline]
    pub fn rank(&self, order: &Order) -> i32 {
        (self.func)(order)
    }

    /// Returns true if both handles refer to the same function instance
    pub fn same_as(&self, other: &PriorityFn) -> bool {
        // Compare data pointers only; vtable addresses are not unique.
        std::ptr::eq(
            Rc::as_ptr(&self.func) as *const (),
            Rc::as_ptr(&other.func) as *const (),
        )
    }
}

impl PartialEq for PriorityFn {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for PriorityFn {}

impl fmt::Debug for PriorityFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PriorityFn({:p})", Rc::as_ptr(&self.func) as *const ())
    }
}

/// Which end of the rank order is served first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapType {
    /// Smallest rank first
    Min,
    /// Largest rank first
    Max,
}

impl HeapType {
    /// Returns true if rank `a` should be served strictly before rank `b`
    #[inline]
    pub fn prefers(self, a: i32, b: i32) -> bool {
        match self {
            HeapType::Min => a < b,
            HeapType::Max => a > b,
        }
    }
}

/// Tree discipline used when merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    /// Swap children after every merge step; amortized O(log n)
    Skew,
    /// Keep null path lengths and swap only when the right side grows heavier;
    /// worst-case O(log n)
    Leftist,
}
