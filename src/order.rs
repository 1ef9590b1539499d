//! Work order records
//!
//! An [`Order`] is the immutable payload carried by an
//! [`OrderQueue`](crate::queue::OrderQueue). It has no behavior beyond field
//! access; all ranking is done by a [`PriorityFn`](crate::priority::PriorityFn)
//! supplied by the caller.
//!
//! Every numeric field has a fixed valid range. Orders are built through
//! [`OrderBuilder`], which rejects out-of-range values instead of clamping them.
//!
//! # Example
//!
//! ```rust
//! use order_queue::order::Order;
//!
//! let order = Order::builder("acme")
//!     .fifo(3)
//!     .importance(80)
//!     .quantity(2500)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(order.customer(), "acme");
//! assert_eq!(order.importance(), 80);
//! assert_eq!(order.process_time(), 1); // unset fields take their lowest valid value
//! ```

use crate::error::OrderError;
use std::fmt;
use std::ops::RangeInclusive;

/// Customer name used when the builder is given an empty one
pub const DEFAULT_CUSTOMER: &str = "NONAME";

/// A single work order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order {
    customer: String,
    fifo: i32,
    process_time: i32,
    due_time: i32,
    slack_time: i32,
    material: i32,
    importance: i32,
    workforce: i32,
    quantity: i32,
}

impl Order {
    /// Arrival position; 1 is the first order placed, 50 the last one accepted
    pub const FIFO_RANGE: RangeInclusive<i32> = 1..=50;
    /// Process, due and slack times, in months
    pub const TIME_RANGE: RangeInclusive<i32> = 1..=12;
    /// Material availability, in percent
    pub const MATERIAL_RANGE: RangeInclusive<i32> = 0..=100;
    /// Customer importance, in percent
    pub const IMPORTANCE_RANGE: RangeInclusive<i32> = 0..=100;
    /// Available workers
    pub const WORKFORCE_RANGE: RangeInclusive<i32> = 100..=200;
    /// Units ordered
    pub const QUANTITY_RANGE: RangeInclusive<i32> = 1000..=10000;

    /// Starts building an order for the given customer
    pub fn builder(customer: impl Into<String>) -> OrderBuilder {
        OrderBuilder::new(customer)
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn fifo(&self) -> i32 {
        self.fifo
    }

    pub fn process_time(&self) -> i32 {
        self.process_time
    }

    pub fn due_time(&self) -> i32 {
        self.due_time
    }

    pub fn slack_time(&self) -> i32 {
        self.slack_time
    }

    pub fn material(&self) -> i32 {
        self.material
    }

    pub fn importance(&self) -> i32 {
        self.importance
    }

    pub fn workforce(&self) -> i32 {
        self.workforce
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer: {}, importance: {}, quantity: {}, order placement time: {}",
            self.customer, self.importance, self.quantity, self.fifo
        )
    }
}

/// Builder for [`Order`]
///
/// Fields that are never set default to the low end of their valid range.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    fn new(customer: impl Into<String>) -> Self {
        let mut customer = customer.into();
        if customer.is_empty() {
            customer = DEFAULT_CUSTOMER.to_string();
        }
        Self {
            order: Order {
                customer,
                fifo: *Order::FIFO_RANGE.start(),
                process_time: *Order::TIME_RANGE.start(),
                due_time: *Order::TIME_RANGE.start(),
                slack_time: *Order::TIME_RANGE.start(),
                material: *Order::MATERIAL_RANGE.start(),
                importance: *Order::IMPORTANCE_RANGE.start(),
                workforce: *Order::WORKFORCE_RANGE.start(),
                quantity: *Order::QUANTITY_RANGE.start(),
            },
        }
    }

    pub fn fifo(mut self, fifo: i32) -> Self {
        self.order.fifo = fifo;
        self
    }

    pub fn process_time(mut self, months: i32) -> Self {
        self.order.process_time = months;
        self
    }

    pub fn due_time(mut self, months: i32) -> Self {
        self.order.due_time = months;
        self
    }

    pub fn slack_time(mut self, months: i32) -> Self {
        self.order.slack_time = months;
        self
    }

    pub fn material(mut self, percent: i32) -> Self {
        self.order.material = percent;
        self
    }

    pub fn importance(mut self, percent: i32) -> Self {
        self.order.importance = percent;
        self
    }

    pub fn workforce(mut self, workers: i32) -> Self {
        self.order.workforce = workers;
        self
    }

    pub fn quantity(mut self, units: i32) -> Self {
        self.order.quantity = units;
        self
    }

    /// Validates every field and produces the order
    ///
    /// # Errors
    /// Returns [`OrderError::OutOfRange`] for the first field outside its range.
    pub fn build(self) -> Result<Order, OrderError> {
        let o = &self.order;
        check("fifo", o.fifo, Order::FIFO_RANGE)?;
        check("process_time", o.process_time, Order::TIME_RANGE)?;
        check("due_time", o.due_time, Order::TIME_RANGE)?;
        check("slack_time", o.slack_time, Order::TIME_RANGE)?;
        check("material", o.material, Order::MATERIAL_RANGE)?;
        check("importance", o.importance, Order::IMPORTANCE_RANGE)?;
        check("workforce", o.workforce, Order::WORKFORCE_RANGE)?;
        check("quantity", o.quantity, Order::QUANTITY_RANGE)?;
        Ok(self.order)
    }
}

fn check(field: &'static str, value: i32, range: RangeInclusive<i32>) -> Result<(), OrderError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(OrderError::OutOfRange {
            field,
            value,
            range,
        })
    }
}
