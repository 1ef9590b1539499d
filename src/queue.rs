//! Mergeable order queue backed by a skew or leftist heap
//!
//! Every operation reduces to a single primitive that merges two heap-ordered
//! binary trees along their right spines:
//!
//! - insert merges the tree with a one-node tree
//! - pop merges the root's two subtrees
//! - queue merge merges the two roots
//!
//! After each merge step the winning node is restructured according to the
//! queue's [`Structure`]: a skew heap always swaps its children, a leftist
//! heap swaps only when the right child's null path length exceeds the left
//! one's and then records its own.
//!
//! # Time Complexity
//!
//! | Operation        | Skew              | Leftist           |
//! |------------------|-------------------|-------------------|
//! | `insert`         | O(log n) amortized| O(log n)          |
//! | `pop`            | O(log n) amortized| O(log n)          |
//! | `peek`           | O(1)              | O(1)              |
//! | `merge`          | O(log n) amortized| O(log n)          |
//! | `set_priority_fn`| O(n log n)        | O(n log n)        |
//! | `set_structure`  | O(n log n)        | O(n log n)        |
//! | `clone`          | O(n)              | O(n)              |
//!
//! A skew heap has no height bound, so nothing here recurses on tree height:
//! merging, cloning, dropping and rendering all use explicit stacks.
//!
//! # Example
//!
//! ```rust
//! use order_queue::{HeapType, Order, OrderQueue, PriorityFn, Structure};
//!
//! let by_importance = PriorityFn::new(|o| o.importance());
//! let mut queue = OrderQueue::new(by_importance, HeapType::Max, Structure::Leftist);
//!
//! for (name, importance) in [("a", 10), ("b", 90), ("c", 50)] {
//!     let order = Order::builder(name).importance(importance).build().unwrap();
//!     assert!(queue.insert(order));
//! }
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.pop().unwrap().customer(), "b");
//! assert_eq!(queue.pop().unwrap().customer(), "c");
//! ```

use crate::error::{InvariantViolation, MergeConflict, QueueError};
use crate::order::Order;
use crate::priority::{HeapType, PriorityFn, Structure};
use log::{debug, trace, warn};
use smallvec::SmallVec;
use std::fmt::{self, Write};
use std::mem;

type Link = Option<Box<Node>>;

struct Node {
    order: Order,
    left: Link,
    right: Link,
    // Only maintained for leftist heaps
    npl: u32,
}

impl Node {
    fn singleton(order: Order) -> Box<Self> {
        Box::new(Node {
            order,
            left: None,
            right: None,
            npl: 0,
        })
    }
}

#[inline]
fn npl(link: &Link) -> Option<u32> {
    link.as_ref().map(|node| node.npl)
}

/// Mergeable priority queue of [`Order`]s
///
/// The queue owns its ranking policy. Changing the priority function or the
/// structure rebuilds the tree, since its shape is only meaningful under the
/// policy that built it.
pub struct OrderQueue {
    root: Link,
    len: usize,
    priority: PriorityFn,
    heap_type: HeapType,
    structure: Structure,
}

impl OrderQueue {
    /// Creates an empty queue with the given policy
    pub fn new(priority: PriorityFn, heap_type: HeapType, structure: Structure) -> Self {
        Self {
            root: None,
            len: 0,
            priority,
            heap_type,
            structure,
        }
    }

    /// Returns the number of orders in the queue
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn priority_fn(&self) -> &PriorityFn {
        &self.priority
    }

    pub fn heap_type(&self) -> HeapType {
        self.heap_type
    }

    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Inserts an order, returning false if it was refused
    ///
    /// An order is refused when the priority function ranks it below zero.
    /// A refused order is dropped and the queue is left untouched.
    pub fn insert(&mut self, order: Order) -> bool {
        let rank = self.priority.rank(&order);
        if rank < 0 {
            trace!("refusing order for {}: rank {}", order.customer(), rank);
            return false;
        }
        self.push_unchecked(order);
        true
    }

    fn push_unchecked(&mut self, order: Order) {
        let root = self.root.take();
        self.root = self.merge_trees(root, Some(Node::singleton(order)));
        self.len += 1;
    }

    /// Returns the next order without removing it
    pub fn peek(&self) -> Option<&Order> {
        self.root.as_ref().map(|node| &node.order)
    }

    /// Removes and returns the next order
    ///
    /// # Errors
    /// Returns [`QueueError::EmptyQueue`] if there are no orders.
    pub fn pop(&mut self) -> Result<Order, QueueError> {
        let mut root = self.root.take().ok_or(QueueError::EmptyQueue)?;
        let (left, right) = (root.left.take(), root.right.take());
        self.root = self.merge_trees(left, right);
        self.len -= 1;
        Ok(root.order)
    }

    /// Moves every order of `other` into this queue, leaving `other` empty
    ///
    /// Both queues must use the same [`PriorityFn`] instance, heap type and
    /// structure. Passing the same queue twice is ruled out by the borrow
    /// checker.
    ///
    /// # Errors
    /// Returns [`QueueError::IncompatibleMerge`] naming the first policy
    /// component that differs. Neither queue is modified in that case.
    pub fn merge(&mut self, other: &mut OrderQueue) -> Result<(), QueueError> {
        self.check_compatible(other)?;

        let ours = self.root.take();
        let theirs = other.root.take();
        self.root = self.merge_trees(ours, theirs);
        debug!(
            "merged queue of {} orders into queue of {}",
            other.len, self.len
        );
        self.len += mem::take(&mut other.len);
        Ok(())
    }

    fn check_compatible(&self, other: &OrderQueue) -> Result<(), QueueError> {
        let conflict = if !self.priority.same_as(&other.priority) {
            MergeConflict::PriorityFn
        } else if self.structure != other.structure {
            MergeConflict::Structure
        } else if self.heap_type != other.heap_type {
            MergeConflict::HeapType
        } else {
            return Ok(());
        };
        Err(QueueError::IncompatibleMerge(conflict))
    }

    /// Replaces the priority function and heap type, then rebuilds the tree
    pub fn set_priority_fn(&mut self, priority: PriorityFn, heap_type: HeapType) {
        self.rebuild(|queue| {
            queue.priority = priority;
            queue.heap_type = heap_type;
        });
    }

    /// Replaces the structure, then rebuilds the tree
    pub fn set_structure(&mut self, structure: Structure) {
        self.rebuild(|queue| queue.structure = structure);
    }

    /// Drains under the current policy, applies the change, and reinserts.
    ///
    /// Orders were admitted when inserted, so they are not re-screened for
    /// negative ranks under the new policy.
    fn rebuild(&mut self, change: impl FnOnce(&mut Self)) {
        let mut drained = Vec::with_capacity(self.len);
        while let Ok(order) = self.pop() {
            drained.push(order);
        }

        change(self);

        let mut negative = 0usize;
        for order in drained {
            if self.priority.rank(&order) < 0 {
                negative += 1;
            }
            self.push_unchecked(order);
        }
        if negative > 0 {
            warn!(
                "{} queued orders rank below zero under the new priority function",
                negative
            );
        }
        debug!(
            "rebuilt queue of {} orders as {:?} {:?}",
            self.len, self.heap_type, self.structure
        );
    }

    /// Removes every order
    pub fn clear(&mut self) {
        release(self.root.take());
        self.len = 0;
    }

    /// Drains the queue in priority order
    pub fn into_sorted_vec(mut self) -> Vec<Order> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok(order) = self.pop() {
            sorted.push(order);
        }
        sorted
    }

    /// Iterates over the orders in pre-order
    ///
    /// Only the first order yielded is guaranteed to be the next one out;
    /// the rest follow the tree, not the ranking.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
            remaining: self.len,
        }
    }

    /// Renders every order in pre-order, separated by spaces
    pub fn preorder(&self) -> String {
        let mut out = String::new();
        for (i, order) in self.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", order);
        }
        out
    }

    /// Renders the tree shape for debugging
    ///
    /// Each node is printed as `(<left><rank>:<customer><right>)`, with the
    /// null path length appended as `:<npl>` for leftist heaps. An empty
    /// queue renders as `Empty heap.`.
    pub fn dump(&self) -> String {
        enum Step<'a> {
            Enter(&'a Node),
            Label(&'a Node),
            Close,
        }

        let Some(root) = self.root.as_deref() else {
            return "Empty heap.".to_string();
        };

        let mut out = String::new();
        let mut steps = vec![Step::Enter(root)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node) => {
                    out.push('(');
                    steps.push(Step::Close);
                    if let Some(right) = node.right.as_deref() {
                        steps.push(Step::Enter(right));
                    }
                    steps.push(Step::Label(node));
                    if let Some(left) = node.left.as_deref() {
                        steps.push(Step::Enter(left));
                    }
                }
                Step::Label(node) => {
                    let rank = self.priority.rank(&node.order);
                    let _ = match self.structure {
                        Structure::Skew => write!(out, "{}:{}", rank, node.order.customer()),
                        Structure::Leftist => write!(
                            out,
                            "{}:{}:{}",
                            rank,
                            node.order.customer(),
                            node.npl
                        ),
                    };
                }
                Step::Close => out.push(')'),
            }
        }
        out
    }

    /// Checks heap order, the leftist shape (for leftist heaps) and the length
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        let mut counted = 0usize;
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();

        while let Some(node) = stack.pop() {
            counted += 1;
            let rank = self.priority.rank(&node.order);

            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                if self.heap_type.prefers(self.priority.rank(&child.order), rank) {
                    return Err(InvariantViolation::HeapOrder {
                        parent: node.order.customer().to_string(),
                        child: child.order.customer().to_string(),
                    });
                }
                stack.push(child);
            }

            if self.structure == Structure::Leftist {
                let expected = node.right.as_ref().map_or(0, |right| right.npl + 1);
                if node.npl != expected {
                    return Err(InvariantViolation::NullPathLength {
                        customer: node.order.customer().to_string(),
                        stored: node.npl,
                        expected,
                    });
                }
                if node.right.is_some() && npl(&node.left) < npl(&node.right) {
                    return Err(InvariantViolation::LeftistShape {
                        customer: node.order.customer().to_string(),
                    });
                }
            }
        }

        if counted != self.len {
            return Err(InvariantViolation::SizeMismatch {
                counted,
                recorded: self.len,
            });
        }
        Ok(())
    }

    /// Merges two heap-ordered trees into one
    ///
    /// Walks down the right spines, keeping the more favourable root at each
    /// step (the first tree wins ties), then restructures the collected
    /// winners bottom-up.
    fn merge_trees(&self, mut a: Link, mut b: Link) -> Link {
        let mut spine: SmallVec<[Box<Node>; 32]> = SmallVec::new();

        let mut merged = loop {
            match (a, b) {
                (None, rest) | (rest, None) => break rest,
                (Some(first), Some(second)) => {
                    let (mut winner, loser) = if self.heap_type.prefers(
                        self.priority.rank(&second.order),
                        self.priority.rank(&first.order),
                    ) {
                        (second, first)
                    } else {
                        (first, second)
                    };
                    a = winner.right.take();
                    b = Some(loser);
                    spine.push(winner);
                }
            }
        };

        while let Some(mut node) = spine.pop() {
            node.right = merged;
            self.restructure(&mut node);
            merged = Some(node);
        }
        merged
    }

    #[inline]
    fn restructure(&self, node: &mut Node) {
        match self.structure {
            Structure::Skew => mem::swap(&mut node.left, &mut node.right),
            Structure::Leftist => {
                if npl(&node.left) < npl(&node.right) {
                    mem::swap(&mut node.left, &mut node.right);
                }
                node.npl = node.right.as_ref().map_or(0, |right| right.npl + 1);
            }
        }
    }
}

/// Frees a tree without recursing on its height
fn release(root: Link) {
    let mut stack: Vec<Box<Node>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Copies a tree node for node, preserving shape and null path lengths
fn clone_tree(root: &Link) -> Link {
    // Pre-order walk, then rebuild from the back: by the time a node is
    // reached its left subtree is on top of `built` and its right below.
    let mut preorder: Vec<&Node> = Vec::new();
    let mut stack: Vec<&Node> = root.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        preorder.push(node);
        stack.extend(node.right.as_deref());
        stack.extend(node.left.as_deref());
    }

    let mut built: Vec<Box<Node>> = Vec::with_capacity(preorder.len());
    for node in preorder.into_iter().rev() {
        let left = if node.left.is_some() { built.pop() } else { None };
        let right = if node.right.is_some() { built.pop() } else { None };
        built.push(Box::new(Node {
            order: node.order.clone(),
            left,
            right,
            npl: node.npl,
        }));
    }
    built.pop()
}

impl Clone for OrderQueue {
    fn clone(&self) -> Self {
        Self {
            root: clone_tree(&self.root),
            len: self.len,
            priority: self.priority.clone(),
            heap_type: self.heap_type,
            structure: self.structure,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        release(self.root.take());
        self.root = clone_tree(&source.root);
        self.len = source.len;
        self.priority = source.priority.clone();
        self.heap_type = source.heap_type;
        self.structure = source.structure;
    }
}

impl Drop for OrderQueue {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

impl fmt::Debug for OrderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderQueue")
            .field("len", &self.len)
            .field("priority", &self.priority)
            .field("heap_type", &self.heap_type)
            .field("structure", &self.structure)
            .finish()
    }
}

/// Pre-order iterator over the orders of an [`OrderQueue`]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        self.remaining -= 1;
        Some(&node.order)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderQueue {
    type Item = &'a Order;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(name: &str, importance: i32) -> Order {
        Order::builder(name).importance(importance).build().unwrap()
    }

    fn by_importance() -> PriorityFn {
        PriorityFn::new(|o| o.importance())
    }

    fn queue(heap_type: HeapType, structure: Structure) -> OrderQueue {
        OrderQueue::new(by_importance(), heap_type, structure)
    }

    #[test]
    fn test_basic_operations() {
        let mut q = queue(HeapType::Min, Structure::Skew);

        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.peek(), None);

        q.insert(order("five", 5));
        q.insert(order("one", 1));
        q.insert(order("ten", 10));
        q.insert(order("three", 3));

        assert_eq!(q.len(), 4);
        assert_eq!(q.peek().map(Order::customer), Some("one"));

        let names: Vec<_> = std::iter::from_fn(|| q.pop().ok())
            .map(|o| o.customer().to_string())
            .collect();
        assert_eq!(names, ["one", "three", "five", "ten"]);
        assert_eq!(q.pop(), Err(QueueError::EmptyQueue));
        assert!(q.is_empty());
    }

    #[test]
    fn test_skew_merge_swaps_children() {
        let mut q = queue(HeapType::Min, Structure::Skew);
        q.insert(order("a", 1));
        q.insert(order("b", 2));
        // b lands in the right subtree, then the swap moves it left
        assert_eq!(q.dump(), "((2:b)1:a)");
        q.insert(order("c", 3));
        assert_eq!(q.dump(), "((3:c)1:a(2:b))");
    }

    #[test]
    fn test_leftist_npl_bookkeeping() {
        let mut q = queue(HeapType::Min, Structure::Leftist);
        q.insert(order("a", 1));
        q.insert(order("b", 2));
        assert_eq!(q.dump(), "((2:b:0)1:a:0)");
        q.insert(order("c", 3));
        assert_eq!(q.dump(), "((2:b:0)1:a:1(3:c:0))");
        q.verify_invariants().unwrap();
    }

    #[test]
    fn test_ties_keep_existing_root() {
        let mut q = queue(HeapType::Max, Structure::Leftist);
        q.insert(order("first", 50));
        q.insert(order("second", 50));
        assert_eq!(q.peek().map(Order::customer), Some("first"));
    }

    #[test]
    fn test_negative_rank_refused() {
        let mut q = OrderQueue::new(PriorityFn::new(|_| -1), HeapType::Min, Structure::Skew);
        assert!(!q.insert(order("x", 1)));
        assert_eq!(q.len(), 0);
        assert!(q.is_empty());
    }

    #[test]
    fn test_merge_leaves_other_empty() {
        let p = by_importance();
        let mut a = OrderQueue::new(p.clone(), HeapType::Min, Structure::Leftist);
        let mut b = OrderQueue::new(p, HeapType::Min, Structure::Leftist);
        a.insert(order("a3", 3));
        b.insert(order("b1", 1));
        b.insert(order("b2", 2));

        a.merge(&mut b).unwrap();

        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 0);
        assert!(b.is_empty());
        assert_eq!(a.peek().map(Order::customer), Some("b1"));
        a.verify_invariants().unwrap();
        b.verify_invariants().unwrap();
    }

    #[test]
    fn test_merge_conflicts() {
        let p = by_importance();
        let mut a = OrderQueue::new(p.clone(), HeapType::Min, Structure::Skew);
        a.insert(order("a", 1));

        let mut other_fn = queue(HeapType::Min, Structure::Skew);
        other_fn.insert(order("b", 2));
        assert_eq!(
            a.merge(&mut other_fn),
            Err(QueueError::IncompatibleMerge(MergeConflict::PriorityFn))
        );

        let mut other_structure = OrderQueue::new(p.clone(), HeapType::Min, Structure::Leftist);
        assert_eq!(
            a.merge(&mut other_structure),
            Err(QueueError::IncompatibleMerge(MergeConflict::Structure))
        );

        let mut other_type = OrderQueue::new(p, HeapType::Max, Structure::Skew);
        assert_eq!(
            a.merge(&mut other_type),
            Err(QueueError::IncompatibleMerge(MergeConflict::HeapType))
        );

        assert_eq!(a.len(), 1);
        assert_eq!(other_fn.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut q = queue(HeapType::Max, Structure::Skew);
        for i in 0..10 {
            q.insert(order("x", i));
        }
        q.clear();
        assert_eq!(q.len(), 0);
        assert!(q.peek().is_none());
        assert_eq!(q.dump(), "Empty heap.");
    }

    #[test]
    fn test_clone_preserves_shape() {
        let mut q = queue(HeapType::Min, Structure::Leftist);
        for (i, v) in [7, 3, 9, 1, 4, 8].into_iter().enumerate() {
            q.insert(order(&format!("o{}", i), v));
        }
        let copy = q.clone();
        assert_eq!(copy.dump(), q.dump());
        assert_eq!(copy.len(), q.len());
        assert!(copy.priority_fn().same_as(q.priority_fn()));
    }

    #[test]
    fn test_clone_from_replaces_contents() {
        let mut source = queue(HeapType::Min, Structure::Skew);
        source.insert(order("s", 2));

        let mut target = queue(HeapType::Max, Structure::Leftist);
        target.insert(order("t1", 5));
        target.insert(order("t2", 6));

        target.clone_from(&source);
        assert_eq!(target.len(), 1);
        assert_eq!(target.heap_type(), HeapType::Min);
        assert_eq!(target.structure(), Structure::Skew);
        assert_eq!(target.dump(), source.dump());
    }

    #[test]
    fn test_set_structure_rebuilds() {
        let mut q = queue(HeapType::Min, Structure::Skew);
        for v in [5, 2, 8, 1, 9, 3] {
            q.insert(order("x", v));
        }
        q.set_structure(Structure::Leftist);
        assert_eq!(q.structure(), Structure::Leftist);
        assert_eq!(q.len(), 6);
        q.verify_invariants().unwrap();
    }

    #[test]
    fn test_preorder_first_is_extremal() {
        let mut q = queue(HeapType::Max, Structure::Skew);
        for (name, v) in [("low", 1), ("high", 99), ("mid", 50)] {
            q.insert(order(name, v));
        }
        assert_eq!(q.iter().len(), 3);
        assert_eq!(q.iter().next().map(Order::customer), Some("high"));
        assert!(q.preorder().starts_with("Customer: high, importance: 99"));
    }

    #[test]
    fn test_verify_detects_size_mismatch() {
        let mut q = queue(HeapType::Min, Structure::Skew);
        q.insert(order("x", 1));
        q.len = 2;
        assert_eq!(
            q.verify_invariants(),
            Err(InvariantViolation::SizeMismatch {
                counted: 1,
                recorded: 2
            })
        );
        q.len = 1;
    }

    #[test]
    fn test_verify_detects_heap_order() {
        let mut q = queue(HeapType::Min, Structure::Skew);
        q.insert(order("parent", 1));
        q.insert(order("child", 2));
        // Flip to max without rebuilding
        q.heap_type = HeapType::Max;
        assert!(matches!(
            q.verify_invariants(),
            Err(InvariantViolation::HeapOrder { .. })
        ));
    }
}
