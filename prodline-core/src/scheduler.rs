use std::any::Any;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use std::rc::Rc;
use tracing::trace;
use uuid::Uuid;

use crate::types::EventId;
use crate::{Key, SimTime};

/// Entry type stored in the scheduler, including the event value, component key, and the time when
/// it is supposed to occur.
///
/// Besides being stored in the scheduler's internal priority queue,
/// event entries are simply passed to [`crate::Components`] object, which unpacks them, and passes them
/// to the correct component.
/// Dispatch class of an entry. At equal times every urgent entry is
/// dispatched before any normal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Urgent,
    Normal,
}

#[derive(Debug)]
pub struct EventEntry {
    event_id: EventId,
    time: SimTime,
    priority: Priority,
    pub(crate) component: Uuid,
    inner: Box<dyn Any>,
}

impl EventEntry {
    pub(crate) fn new<E: fmt::Debug + 'static>(
        id: EventId,
        time: SimTime,
        priority: Priority,
        component: Key<E>,
        event: E,
    ) -> Self {
        EventEntry {
            event_id: id,
            time,
            priority,
            component: component.id(),
            inner: Box::new(event),
        }
    }

    pub fn id(&self) -> EventId {
        self.event_id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Tries to downcast the event entry to one holding an event of type `E`.
    /// If fails, returns `None`.
    #[must_use]
    pub(crate) fn downcast<E: fmt::Debug + 'static>(&self) -> Option<EventEntryTyped<'_, E>> {
        self.inner.downcast_ref::<E>().map(|event| EventEntryTyped {
            id: self.event_id,
            time: self.time,
            component_key: Key::new_with_id(self.component),
            event,
        })
    }
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.event_id == other.event_id
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap. Same-time entries pop
        // urgent first, then in submission order.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.event_id.cmp(&self.event_id))
    }
}

#[derive(Debug)]
pub struct EventEntryTyped<'e, E: fmt::Debug> {
    pub id: EventId,
    pub time: SimTime,
    pub component_key: Key<E>,
    pub event: &'e E,
}

type Clock = Rc<Cell<SimTime>>;

/// This struct exposes only immutable access to the simulation clock.
/// The clock itself is owned by the scheduler, while others can obtain `ClockRef`
/// to read the current simulation time.
///
/// # Example
///
/// ```
/// # use prodline_core::Scheduler;
/// let scheduler = Scheduler::default();
/// let clock_ref = scheduler.clock();
/// assert_eq!(clock_ref.time(), scheduler.time());
/// ```
#[derive(Clone)]
pub struct ClockRef {
    clock: Clock,
}

impl From<Clock> for ClockRef {
    fn from(clock: Clock) -> Self {
        Self { clock }
    }
}

impl ClockRef {
    /// Return the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Scheduler is used to keep the current time and information about the upcoming events.
///
/// See the [crate-level documentation](index.html) for more information.
pub struct Scheduler {
    next_event_id: u64,
    events: BinaryHeap<EventEntry>,
    clock: Clock,
    cancelled: HashSet<EventId>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::default())),
            cancelled: HashSet::new(),
        }
    }
}

impl Scheduler {
    /// Schedules `event` to be executed for `component` at `self.time() + delay`.
    ///
    /// Returns the id of the new entry, which can later be passed to
    /// [`Scheduler::cancel`].
    pub fn schedule<E: fmt::Debug + 'static>(
        &mut self,
        delay: f64,
        component: Key<E>,
        event: E,
    ) -> EventId {
        self.push(delay, Priority::Normal, component, event)
    }

    /// Schedules `event` to be executed for `component` at `self.time()`.
    pub fn schedule_now<E: fmt::Debug + 'static>(&mut self, component: Key<E>, event: E) -> EventId {
        self.schedule(0.0, component, event)
    }

    /// Schedules `event` at `self.time()` ahead of every normal entry due at
    /// the same instant, including ones submitted earlier.
    ///
    /// This is how one component preempts another: the target sees the event
    /// before anything else it was waiting for at this instant.
    pub fn schedule_urgent<E: fmt::Debug + 'static>(&mut self, component: Key<E>, event: E) -> EventId {
        self.push(0.0, Priority::Urgent, component, event)
    }

    fn push<E: fmt::Debug + 'static>(
        &mut self,
        delay: f64,
        priority: Priority,
        component: Key<E>,
        event: E,
    ) -> EventId {
        self.next_event_id += 1;
        let id = EventId(self.next_event_id);
        let time = self.time() + delay;
        trace!(event_id = %id, time = %time, ?priority, ?event, "Event scheduled");
        self.events
            .push(EventEntry::new(id, time, priority, component, event));
        id
    }

    /// Withdraws a pending entry. Returns `false` if the entry already fired,
    /// was already cancelled, or never existed.
    pub fn cancel(&mut self, id: EventId) -> bool {
        if id.0 == 0 || id.0 > self.next_event_id {
            return false;
        }
        if !self.events.iter().any(|entry| entry.event_id == id) {
            return false;
        }
        let inserted = self.cancelled.insert(id);
        if inserted {
            trace!(event_id = %id, time = %self.time(), "Event cancelled");
        }
        inserted
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Number of live (not cancelled) entries still queued.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len() - self.cancelled.len()
    }

    /// Returns a reference to the next scheduled event or `None` if none are left.
    pub fn peek(&mut self) -> Option<&EventEntry> {
        self.discard_cancelled();
        self.events.peek()
    }

    /// Removes and returns the next scheduled event or `None` if none are left.
    /// The clock moves to the time of the returned entry.
    pub fn pop(&mut self) -> Option<EventEntry> {
        self.discard_cancelled();
        self.events.pop().inspect(|event| {
            self.clock.replace(event.time());
        })
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.events.peek() {
            if !self.cancelled.remove(&top.event_id) {
                break;
            }
            self.events.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(id: u64, time: f64) -> EventEntry {
        EventEntry {
            event_id: EventId(id),
            time: SimTime::from(time),
            priority: Priority::Normal,
            component: Uuid::from_u128(id as u128),
            inner: Box::new(String::from("inner")),
        }
    }

    #[test]
    fn test_clock_ref() {
        let time = SimTime::from(1.0);
        let clock = Clock::new(Cell::new(time));
        let clock_ref = ClockRef::from(clock);
        assert_eq!(clock_ref.time(), time);
    }

    #[test]
    fn test_event_entry_downcast() {
        let entry = entry(0, 1.0);
        assert!(entry.downcast::<String>().is_some());
        assert!(entry.downcast::<i32>().is_none());
    }

    #[test]
    fn test_event_entry_cmp() {
        assert_eq!(entry(0, 1.0), entry(0, 1.0));
        assert_ne!(entry(0, 1.0), entry(1, 1.0));

        // Earlier time has higher heap priority.
        assert_eq!(entry(0, 0.0).cmp(&entry(1, 1.0)), Ordering::Greater);
        assert_eq!(entry(1, 2.0).cmp(&entry(3, 1.0)), Ordering::Less);

        // Same time: lower id has higher heap priority.
        assert_eq!(entry(1, 1.0).cmp(&entry(2, 1.0)), Ordering::Greater);
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    struct EventA;
    #[derive(Debug, Clone, Eq, PartialEq)]
    struct EventB(u32);

    #[test]
    fn test_scheduler() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.time(), SimTime::zero());
        assert_eq!(scheduler.clock().time(), SimTime::zero());
        assert!(scheduler.events.is_empty());

        let component_a = Key::<EventA>::new_with_id(Uuid::from_u128(1));
        let component_b = Key::<EventB>::new_with_id(Uuid::from_u128(2));

        scheduler.schedule(1.0, component_a, EventA);
        scheduler.schedule_now(component_b, EventB(0));
        scheduler.schedule(2.0, component_b, EventB(2));

        assert_eq!(scheduler.time(), SimTime::zero());
        assert_eq!(scheduler.pending_events(), 3);

        let entry = scheduler.pop().unwrap();
        let entry = entry.downcast::<EventB>().unwrap();
        assert_eq!(entry.time, SimTime::zero());
        assert_eq!(entry.component_key.id(), component_b.id());
        assert_eq!(entry.event, &EventB(0));

        let entry = scheduler.pop().unwrap();
        let entry = entry.downcast::<EventA>().unwrap();
        assert_eq!(entry.time, SimTime::from(1.0));
        assert_eq!(entry.component_key.id(), component_a.id());
        assert_eq!(scheduler.time(), SimTime::from(1.0));
        assert_eq!(scheduler.clock().time(), SimTime::from(1.0));

        let entry = scheduler.pop().unwrap();
        let entry = entry.downcast::<EventB>().unwrap();
        assert_eq!(entry.time, SimTime::from(2.0));
        assert_eq!(entry.event, &EventB(2));

        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_same_time_entries_pop_in_submission_order() {
        let mut scheduler = Scheduler::default();
        let key = Key::<EventB>::new_with_id(Uuid::from_u128(9));

        for i in 0..50 {
            scheduler.schedule(1.5, key, EventB(i));
        }

        for i in 0..50 {
            let entry = scheduler.pop().unwrap();
            assert_eq!(entry.downcast::<EventB>().unwrap().event, &EventB(i));
        }
    }

    #[test]
    fn test_urgent_entry_preempts_same_time_entries() {
        let mut scheduler = Scheduler::default();
        let key = Key::<EventB>::new_with_id(Uuid::from_u128(5));

        scheduler.schedule(1.0, key, EventB(1));
        scheduler.schedule(1.0, key, EventB(2));
        scheduler.schedule(0.5, key, EventB(0));

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.downcast::<EventB>().unwrap().event, &EventB(0));

        // Advance to 1.0 by popping the first entry due there.
        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.downcast::<EventB>().unwrap().event, &EventB(1));
        assert_eq!(scheduler.time(), SimTime::from(1.0));

        scheduler.schedule_now(key, EventB(4));
        scheduler.schedule_urgent(key, EventB(3));

        let order: Vec<u32> = std::iter::from_fn(|| scheduler.pop())
            .map(|entry| entry.downcast::<EventB>().unwrap().event.0)
            .collect();
        assert_eq!(order, vec![3, 2, 4]);
    }

    #[test]
    fn test_urgent_entry_does_not_jump_earlier_times() {
        assert_eq!(
            entry(2, 1.0).cmp(&EventEntry {
                priority: Priority::Urgent,
                ..entry(1, 2.0)
            }),
            Ordering::Greater
        );
    }

    #[test]
    fn test_cancel_skips_entry() {
        let mut scheduler = Scheduler::default();
        let key = Key::<EventB>::new_with_id(Uuid::from_u128(3));

        let first = scheduler.schedule(1.0, key, EventB(1));
        scheduler.schedule(2.0, key, EventB(2));

        assert!(scheduler.cancel(first));
        assert!(!scheduler.cancel(first), "double cancel is refused");
        assert_eq!(scheduler.pending_events(), 1);
        assert_eq!(scheduler.peek().unwrap().time(), SimTime::from(2.0));

        let entry = scheduler.pop().unwrap();
        assert_eq!(entry.downcast::<EventB>().unwrap().event, &EventB(2));
        assert_eq!(scheduler.time(), SimTime::from(2.0));
        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_refused() {
        let mut scheduler = Scheduler::default();
        let key = Key::<EventB>::new_with_id(Uuid::from_u128(4));

        let id = scheduler.schedule(1.0, key, EventB(1));
        scheduler.pop().unwrap();
        assert!(!scheduler.cancel(id));
        assert!(!scheduler.cancel(EventId(99)));
    }
}
