//! Mergeable Priority Queues of Work Orders
//!
//! This crate provides [`OrderQueue`], a priority queue of [`Order`]s that can
//! be merged with another queue in logarithmic time and re-ranked at run time.
//!
//! # Features
//!
//! - **Skew Heap**: O(log n) amortized insert, pop and merge; no balance bookkeeping
//! - **Leftist Heap**: O(log n) worst-case insert, pop and merge via null path lengths
//! - **Min or Max**: either end of the ranking can be served first
//! - **Pluggable ranking**: a caller-supplied [`PriorityFn`], compared by identity
//! - **Re-ranking**: swapping the priority function or structure rebuilds the queue
//!
//! # Example
//!
//! ```rust
//! use order_queue::{HeapType, Order, OrderQueue, PriorityFn, Structure};
//!
//! let by_quantity = PriorityFn::new(|o| o.quantity());
//! let mut north = OrderQueue::new(by_quantity.clone(), HeapType::Min, Structure::Skew);
//! let mut south = OrderQueue::new(by_quantity, HeapType::Min, Structure::Skew);
//!
//! north.insert(Order::builder("n").quantity(4000).build().unwrap());
//! south.insert(Order::builder("s").quantity(1500).build().unwrap());
//!
//! north.merge(&mut south).unwrap();
//! assert_eq!(north.len(), 2);
//! assert!(south.is_empty());
//! assert_eq!(north.pop().unwrap().customer(), "s");
//! ```

pub mod error;
pub mod order;
pub mod priority;
pub mod queue;

pub use error::{InvariantViolation, MergeConflict, OrderError, QueueError};
pub use order::{Order, OrderBuilder};
pub use priority::{HeapType, PriorityFn, Structure};
pub use queue::OrderQueue;
