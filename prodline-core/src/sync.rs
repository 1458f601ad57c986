//! Counter-style synchronization between components.
//!
//! [`BoundedCounter`] is a non-negative level with a blocking `get` and a
//! non-blocking `put`. A component that cannot be satisfied right away leaves
//! a waiter behind; a later `put` hands the units over and schedules the
//! waiter's wake event at the current instant.
//!
//! Waiters are served strictly in the order they suspended. The head waiter
//! blocks everyone behind it until its own request is covered, so a large
//! request is never starved by smaller ones.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

use crate::{Key, Scheduler, SimError};

/// Outcome of [`BoundedCounter::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The units were taken; the caller continues immediately.
    Ready,
    /// The caller is suspended; its wake event will be scheduled by a later `put`.
    Pending,
}

struct Waiter<E> {
    required: u64,
    key: Key<E>,
    wake: E,
}

struct State<E> {
    level: u64,
    queue: VecDeque<Waiter<E>>,
}

impl<E: fmt::Debug + 'static> State<E> {
    fn release_waiters(&mut self, scheduler: &mut Scheduler) {
        while let Some(front) = self.queue.front() {
            if front.required > self.level {
                break;
            }
            let Some(waiter) = self.queue.pop_front() else {
                break;
            };
            self.level -= waiter.required;
            trace!(
                required = waiter.required,
                level = self.level,
                time = %scheduler.time(),
                "Counter waiter released"
            );
            scheduler.schedule_now(waiter.key, waiter.wake);
        }
    }
}

/// Shared handle to a counter. Clones refer to the same level.
pub struct BoundedCounter<E> {
    inner: Rc<RefCell<State<E>>>,
}

impl<E> Clone for BoundedCounter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: fmt::Debug + 'static> Default for BoundedCounter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug + 'static> fmt::Debug for BoundedCounter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("BoundedCounter")
            .field("level", &state.level)
            .field("waiting", &state.queue.len())
            .finish()
    }
}

impl<E: fmt::Debug + 'static> BoundedCounter<E> {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(State {
                level: 0,
                queue: VecDeque::new(),
            })),
        }
    }

    /// Units currently held and not reserved by a released waiter.
    pub fn level(&self) -> u64 {
        self.inner.borrow().level
    }

    /// Number of suspended `get` calls.
    pub fn waiting(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Adds `amount` units, then releases every waiter at the head of the
    /// queue whose request is now covered.
    pub fn put(&self, amount: u64, scheduler: &mut Scheduler) -> Result<(), SimError> {
        if amount == 0 {
            return Err(SimError::InvalidArgument {
                operation: "BoundedCounter::put",
                reason: "amount must be positive".to_string(),
            });
        }
        let mut state = self.inner.borrow_mut();
        state.level = state.level.checked_add(amount).ok_or_else(|| {
            SimError::invariant("counter level overflow")
        })?;
        trace!(amount, level = state.level, time = %scheduler.time(), "Counter put");
        state.release_waiters(scheduler);
        Ok(())
    }

    /// Takes `amount` units if they are available and nobody is queued ahead.
    /// Otherwise registers `wake` to be delivered to `key` once a `put`
    /// covers the request; the units are taken on the caller's behalf at
    /// that moment.
    pub fn get(
        &self,
        amount: u64,
        key: Key<E>,
        wake: E,
        scheduler: &mut Scheduler,
    ) -> Result<Acquire, SimError> {
        if amount == 0 {
            return Err(SimError::InvalidArgument {
                operation: "BoundedCounter::get",
                reason: "amount must be positive".to_string(),
            });
        }
        let mut state = self.inner.borrow_mut();
        if state.queue.is_empty() && state.level >= amount {
            state.level -= amount;
            trace!(amount, level = state.level, time = %scheduler.time(), "Counter get satisfied");
            return Ok(Acquire::Ready);
        }
        trace!(amount, level = state.level, time = %scheduler.time(), "Counter get suspended");
        state.queue.push_back(Waiter {
            required: amount,
            key,
            wake,
        });
        Ok(Acquire::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Wake {
        Ready(u32),
    }

    fn key(n: u128) -> Key<Wake> {
        Key::new_with_id(Uuid::from_u128(n))
    }

    #[test]
    fn get_is_immediate_when_level_suffices() {
        let mut scheduler = Scheduler::default();
        let counter = BoundedCounter::new();
        counter.put(2, &mut scheduler).unwrap();

        let outcome = counter.get(1, key(1), Wake::Ready(1), &mut scheduler).unwrap();
        assert_eq!(outcome, Acquire::Ready);
        assert_eq!(counter.level(), 1);
        assert_eq!(scheduler.pending_events(), 0);
    }

    #[test]
    fn put_wakes_suspended_getter() {
        let mut scheduler = Scheduler::default();
        let counter = BoundedCounter::new();

        let outcome = counter.get(1, key(1), Wake::Ready(7), &mut scheduler).unwrap();
        assert_eq!(outcome, Acquire::Pending);
        assert_eq!(counter.waiting(), 1);

        counter.put(1, &mut scheduler).unwrap();
        assert_eq!(counter.level(), 0, "units are handed to the waiter");
        assert_eq!(counter.waiting(), 0);

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.time(), scheduler.time());
        assert_eq!(entry.downcast::<Wake>().unwrap().event, &Wake::Ready(7));
    }

    #[test]
    fn waiters_are_released_in_fifo_order() {
        let mut scheduler = Scheduler::default();
        let counter = BoundedCounter::new();

        for i in 0..3 {
            counter.get(1, key(i), Wake::Ready(i as u32), &mut scheduler).unwrap();
        }
        counter.put(3, &mut scheduler).unwrap();

        for i in 0..3 {
            let entry = scheduler.pop().unwrap();
            assert_eq!(entry.downcast::<Wake>().unwrap().event, &Wake::Ready(i));
        }
    }

    #[test]
    fn head_waiter_blocks_later_waiters() {
        let mut scheduler = Scheduler::default();
        let counter = BoundedCounter::new();

        counter.get(3, key(1), Wake::Ready(1), &mut scheduler).unwrap();
        counter.get(1, key(2), Wake::Ready(2), &mut scheduler).unwrap();

        counter.put(2, &mut scheduler).unwrap();
        assert_eq!(counter.waiting(), 2);
        assert_eq!(counter.level(), 2);

        // A fresh getter cannot barge past the queue either.
        let outcome = counter.get(1, key(3), Wake::Ready(3), &mut scheduler).unwrap();
        assert_eq!(outcome, Acquire::Pending);

        counter.put(3, &mut scheduler).unwrap();
        assert_eq!(counter.waiting(), 0);
        assert_eq!(counter.level(), 0);
        let woken: Vec<Wake> = std::iter::from_fn(|| scheduler.pop())
            .map(|entry| entry.downcast::<Wake>().unwrap().event.clone())
            .collect();
        assert_eq!(woken, vec![Wake::Ready(1), Wake::Ready(2), Wake::Ready(3)]);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut scheduler = Scheduler::default();
        let counter: BoundedCounter<Wake> = BoundedCounter::new();

        assert!(matches!(
            counter.put(0, &mut scheduler),
            Err(SimError::InvalidArgument { operation: "BoundedCounter::put", .. })
        ));
        assert!(matches!(
            counter.get(0, key(1), Wake::Ready(0), &mut scheduler),
            Err(SimError::InvalidArgument { operation: "BoundedCounter::get", .. })
        ));
        assert_eq!(counter.level(), 0);
    }

    #[test]
    fn clones_share_the_level() {
        let mut scheduler = Scheduler::default();
        let producer: BoundedCounter<Wake> = BoundedCounter::new();
        let consumer = producer.clone();

        producer.put(4, &mut scheduler).unwrap();
        assert_eq!(consumer.level(), 4);
    }
}
