//! Shared helpers for integration tests

#![allow(dead_code)]

use order_queue::{Order, OrderQueue, PriorityFn};
use std::ops::RangeInclusive;

/// Linear congruential generator for reproducible orders
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    pub fn next_in(&mut self, range: RangeInclusive<i32>) -> i32 {
        let span = (*range.end() - *range.start()) as u64 + 1;
        *range.start() + (self.next() % span) as i32
    }

    /// Produces a valid order with every field drawn from its range
    pub fn order(&mut self, id: usize) -> Order {
        Order::builder(format!("Customer{}", id))
            .fifo(self.next_in(Order::FIFO_RANGE))
            .process_time(self.next_in(Order::TIME_RANGE))
            .due_time(self.next_in(Order::TIME_RANGE))
            .slack_time(self.next_in(Order::TIME_RANGE))
            .material(self.next_in(Order::MATERIAL_RANGE))
            .importance(self.next_in(Order::IMPORTANCE_RANGE))
            .workforce(self.next_in(Order::WORKFORCE_RANGE))
            .quantity(self.next_in(Order::QUANTITY_RANGE))
            .build()
            .expect("generated fields are in range")
    }
}

pub fn importance_plus_quantity() -> PriorityFn {
    PriorityFn::new(|o| o.importance() + o.quantity())
}

pub fn fifo_plus_process_time() -> PriorityFn {
    PriorityFn::new(|o| o.fifo() + o.process_time())
}

/// Orders that rank to exactly `rank` under [`importance_rank`]
pub fn ranked(name: &str, rank: i32) -> Order {
    Order::builder(name)
        .importance(rank)
        .build()
        .expect("rank fits the importance range")
}

pub fn importance_rank() -> PriorityFn {
    PriorityFn::new(|o| o.importance())
}

/// Pops every order, returning the ranks in extraction order
pub fn drain_ranks(queue: &mut OrderQueue) -> Vec<i32> {
    let priority = queue.priority_fn().clone();
    let mut ranks = Vec::with_capacity(queue.len());
    while let Ok(order) = queue.pop() {
        ranks.push(priority.rank(&order));
    }
    ranks
}

/// Customer names sorted, for multiset comparisons
pub fn sorted_customers<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<String> {
    let mut names: Vec<String> = orders
        .into_iter()
        .map(|o| o.customer().to_string())
        .collect();
    names.sort();
    names
}
