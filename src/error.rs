//! Error types for order queues

use std::fmt;
use std::ops::RangeInclusive;

/// Error type for queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// An order was requested from a queue with no orders
    EmptyQueue,
    /// Two queues cannot be merged; neither was modified
    IncompatibleMerge(MergeConflict),
}

/// The policy component that differed between two queues in a rejected merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeConflict {
    /// The queues were built with different priority function instances
    PriorityFn,
    /// One queue is a skew heap and the other a leftist heap
    Structure,
    /// One queue is a min-heap and the other a max-heap
    HeapType,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::EmptyQueue => write!(f, "queue is empty"),
            QueueError::IncompatibleMerge(conflict) => {
                write!(f, "cannot merge queues: {}", conflict)
            }
        }
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeConflict::PriorityFn => write!(f, "priority functions differ"),
            MergeConflict::Structure => write!(f, "heap structures differ"),
            MergeConflict::HeapType => write!(f, "heap types differ"),
        }
    }
}

impl std::error::Error for QueueError {}

/// Error returned when an [`Order`](crate::order::Order) field is out of range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    OutOfRange {
        field: &'static str,
        value: i32,
        range: RangeInclusive<i32>,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::OutOfRange {
                field,
                value,
                range,
            } => write!(
                f,
                "{} = {} is outside {}..={}",
                field,
                value,
                range.start(),
                range.end()
            ),
        }
    }
}

impl std::error::Error for OrderError {}

/// A broken structural invariant, reported by
/// [`OrderQueue::verify_invariants`](crate::queue::OrderQueue::verify_invariants)
///
/// Customers are included so a failing test can point at the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A child ranks more favourably than its parent
    HeapOrder { parent: String, child: String },
    /// A leftist node's stored NPL is not one more than its right child's
    NullPathLength {
        customer: String,
        stored: u32,
        expected: u32,
    },
    /// A leftist node's right child has a larger NPL than its left child
    LeftistShape { customer: String },
    /// The recorded length does not match the number of reachable nodes
    SizeMismatch { counted: usize, recorded: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::HeapOrder { parent, child } => {
                write!(f, "heap order violated: {} is above {}", parent, child)
            }
            InvariantViolation::NullPathLength {
                customer,
                stored,
                expected,
            } => write!(
                f,
                "node {} has npl {} but its right child implies {}",
                customer, stored, expected
            ),
            InvariantViolation::LeftistShape { customer } => {
                write!(f, "node {} has a heavier right subtree", customer)
            }
            InvariantViolation::SizeMismatch { counted, recorded } => write!(
                f,
                "length mismatch: counted {} nodes but len is {}",
                counted, recorded
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
