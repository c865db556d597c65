//! Typed scheduled events and the min-priority queue that orders them.
//!
//! Dispatch is by `match` over a tagged `Event` enum rather than a
//! polymorphic base class with virtual `apply` — the original source's
//! design, ported to the teacher's own `TimelineEvent`/`PhysicsEvent`
//! tagged-enum shape (`physics/mod.rs`).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::quantities::TimePoint;
use crate::simulation::MarbleId;

/// The kind of event and the marble(s) it affects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// `marble` is predicted to hit a wall; the wall is re-identified at
    /// apply time rather than stored, since the marble's trajectory (and
    /// therefore which wall it hits) cannot have changed if the event is
    /// still valid.
    WallCollision { marble: MarbleId },
    /// `m1` and `m2` are predicted to collide with each other.
    MarblesCollision { m1: MarbleId, m2: MarbleId },
    /// A user-scheduled sampling callback. Carries no marble references and
    /// therefore no validity witness — it always fires.
    Tick,
}

/// Per-marble generation captured at scheduling time, used to detect that a
/// marble's trajectory changed since this event was queued.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Witness {
    marble: MarbleId,
    generation: u64,
}

/// An event together with its scheduled date and validity witnesses.
#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub date: TimePoint,
    pub event: Event,
    witnesses: Vec<Witness>,
}

impl ScheduledEvent {
    pub fn new(
        date: TimePoint,
        event: Event,
        witnesses: Vec<(MarbleId, u64)>,
    ) -> Self {
        ScheduledEvent {
            date,
            event,
            witnesses: witnesses
                .into_iter()
                .map(|(marble, generation)| Witness { marble, generation })
                .collect(),
        }
    }

    /// True if every marble this event references still has the generation
    /// it had when the event was scheduled.
    pub fn is_valid(&self, current_generation: impl Fn(MarbleId) -> u64) -> bool {
        self.witnesses
            .iter()
            .all(|w| current_generation(w.marble) == w.generation)
    }
}

/// Heap entry: ordered by `(date, sequence)` so that equal dates break ties
/// in FIFO insertion order, deterministic within a single run. `OrderedFloat`
/// gives `f64` a total order (panicking on NaN is acceptable here: a NaN
/// collision date is a bug upstream, not a runtime input).
struct HeapEntry {
    date: OrderedFloat<f64>,
    sequence: u64,
    scheduled: ScheduledEvent,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.sequence == other.sequence
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.date, self.sequence).cmp(&(other.date, other.sequence))
    }
}

fn ordered(date: TimePoint) -> OrderedFloat<f64> {
    OrderedFloat(date.get())
}

/// A time-ordered min-priority queue of scheduled events, backed by a
/// `BinaryHeap<Reverse<_>>` (the idiomatic min-heap pattern in `std`).
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<HeapEntry>>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, scheduled: ScheduledEvent) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(HeapEntry {
            date: ordered(scheduled.date),
            sequence,
            scheduled,
        }));
    }

    pub fn peek_date(&self) -> Option<TimePoint> {
        self.heap.peek().map(|Reverse(entry)| TimePoint::new(entry.date.0))
    }

    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop().map(|Reverse(entry)| entry.scheduled)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
