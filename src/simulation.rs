//! Owns the marbles and the event queue, and drives virtual time forward.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::collision::{
    predict_marble_marble_collision, predict_wall_collision, reflect_off_wall,
    resolve_elastic_collision,
};
use crate::error::SimulationError;
use crate::event::{Event, EventQueue, ScheduledEvent};
use crate::handler::{EventHandler, NoopHandler};
use crate::marble::Marble;
use crate::quantities::{Length, TimePoint};

/// A stable index into the simulation's marble storage. Valid for the
/// lifetime of the `Simulation` that produced it; marbles are never
/// inserted or removed after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarbleId(usize);

impl MarbleId {
    pub(crate) fn from_index(index: usize) -> Self {
        MarbleId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Shared handle to an `EventHandler`. The simulation and its caller both
/// hold a reference to the same handler (mirroring the original source's
/// `boost::shared_ptr<EventsHandler>`), so a caller can inspect handler
/// state directly rather than reaching back through the simulation.
pub type HandlerRef = Rc<RefCell<dyn EventHandler>>;

/// Owns the arena, the marbles, the current virtual time, and the event
/// queue.
pub struct Simulation {
    w: f64,
    h: f64,
    marbles: Vec<Marble>,
    t_now: f64,
    queue: EventQueue,
    handler: HandlerRef,
    advancing: bool,
}

impl Simulation {
    /// Constructs a simulation over `marbles` in a `w` by `h` arena,
    /// schedules every marble's initial wall collision and every pair's
    /// initial mutual collision, and invokes `handler.begin(self)`.
    /// `handler` of `None` installs a no-op default.
    ///
    /// Returns an error rather than panicking on invalid geometry, since
    /// construction is the one boundary where this crate validates rather
    /// than asserts (see SPEC_FULL.md §7).
    pub fn new(
        w: f64,
        h: f64,
        marbles: Vec<Marble>,
        handler: Option<HandlerRef>,
    ) -> Result<Self, SimulationError> {
        if w <= 0.0 {
            return Err(SimulationError::NonPositiveWidth(w));
        }
        if h <= 0.0 {
            return Err(SimulationError::NonPositiveHeight(h));
        }
        for (index, marble) in marbles.iter().enumerate() {
            if marble.radius() <= 0.0 {
                return Err(SimulationError::NonPositiveRadius {
                    index,
                    radius: marble.radius(),
                });
            }
            if marble.mass() < 0.0 {
                return Err(SimulationError::NegativeMass {
                    index,
                    mass: marble.mass(),
                });
            }
        }

        let handler =
            handler.unwrap_or_else(|| Rc::new(RefCell::new(NoopHandler)));

        let mut sim = Simulation {
            w,
            h,
            marbles,
            t_now: 0.0,
            queue: EventQueue::new(),
            handler,
            advancing: false,
        };
        sim.schedule_initial_events();
        let handler = sim.handler.clone();
        handler.borrow_mut().begin(&mut sim);
        Ok(sim)
    }

    pub fn width(&self) -> f64 {
        self.w
    }

    pub fn height(&self) -> f64 {
        self.h
    }

    pub fn t(&self) -> f64 {
        self.t_now
    }

    pub fn marbles(&self) -> &[Marble] {
        &self.marbles
    }

    pub fn marble(&self, id: MarbleId) -> &Marble {
        &self.marbles[id.0]
    }

    /// Returns the shared handler handle, so a caller can inspect state an
    /// implementation accumulates (e.g. an event counter) without the
    /// simulation exposing a typed accessor for it.
    pub fn handler(&self) -> HandlerRef {
        self.handler.clone()
    }

    fn schedule_initial_events(&mut self) {
        let n = self.marbles.len();
        for i in 0..n {
            self.schedule_wall_collision(MarbleId(i));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                self.schedule_pair_collision(MarbleId(i), MarbleId(j));
            }
        }
    }

    fn schedule_wall_collision(&mut self, id: MarbleId) {
        let marble = &self.marbles[id.0];
        if let Some((dt, _wall)) = predict_wall_collision(
            marble,
            TimePoint::new(self.t_now),
            Length::new(self.w),
            Length::new(self.h),
        ) {
            let date = TimePoint::new(self.t_now) + dt;
            trace!(marble = id.0, date = date.get(), "scheduling wall collision");
            self.queue.push(ScheduledEvent::new(
                date,
                Event::WallCollision { marble: id },
                vec![(id, marble.generation())],
            ));
        }
    }

    fn schedule_pair_collision(&mut self, a: MarbleId, b: MarbleId) {
        let marble_a = &self.marbles[a.0];
        let marble_b = &self.marbles[b.0];
        if let Some(dt) = predict_marble_marble_collision(
            marble_a,
            marble_b,
            TimePoint::new(self.t_now),
        ) {
            let date = TimePoint::new(self.t_now) + dt;
            trace!(a = a.0, b = b.0, date = date.get(), "scheduling pair collision");
            self.queue.push(ScheduledEvent::new(
                date,
                Event::MarblesCollision { m1: a, m2: b },
                vec![(a, marble_a.generation()), (b, marble_b.generation())],
            ));
        }
    }

    /// Enqueues a `Tick` event at `t_now + dt` that invokes
    /// `handler.tick()` when it fires. Ticks have no validity witness and
    /// always fire.
    pub fn schedule_tick_in(&mut self, dt: f64) {
        self.queue.push(ScheduledEvent::new(
            TimePoint::new(self.t_now + dt),
            Event::Tick,
            vec![],
        ));
    }

    /// Drains the event queue up to (but not including) `T`, applying each
    /// still-valid event in date order, then advances virtual time and
    /// every marble's `t_last` to exactly `T`.
    ///
    /// # Panics
    /// Panics if `T < t_now`, or if called re-entrantly from inside a
    /// handler callback.
    pub fn advance_to(&mut self, target: f64) {
        assert!(
            target >= self.t_now,
            "Simulation::advance_to({target}) called with target before t_now ({})",
            self.t_now
        );
        assert!(
            !self.advancing,
            "Simulation::advance_to called re-entrantly from a handler callback"
        );
        self.advancing = true;

        while let Some(date) = self.queue.peek_date() {
            if date.get() >= target {
                break;
            }
            let scheduled = self.queue.pop().expect("peek just confirmed a head");
            if !scheduled.is_valid(|id| self.marbles[id.0].generation()) {
                warn!(date = date.get(), event = ?scheduled.event, "discarding stale event");
                continue;
            }

            for marble in self.marbles.iter_mut() {
                marble.advance_to(date.get());
            }
            self.t_now = date.get();
            debug!(date = date.get(), event = ?scheduled.event, "applying event");
            self.apply(scheduled.event);
        }

        for marble in self.marbles.iter_mut() {
            marble.advance_to(target);
        }
        self.t_now = target;
        self.advancing = false;
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::WallCollision { marble } => {
                self.apply_wall_collision(marble);
            }
            Event::MarblesCollision { m1, m2 } => {
                self.apply_marbles_collision(m1, m2);
            }
            Event::Tick => {
                let handler = self.handler.clone();
                handler.borrow_mut().tick(self);
            }
        }
    }

    fn apply_wall_collision(&mut self, id: MarbleId) {
        // Re-derive which wall is hit from the current (still-valid)
        // trajectory, rather than trusting a wall tag captured at
        // scheduling time.
        let marble = &self.marbles[id.0];
        let Some((dt, wall)) = predict_wall_collision(
            marble,
            TimePoint::new(self.t_now),
            Length::new(self.w),
            Length::new(self.h),
        ) else {
            return;
        };
        debug_assert!(dt.get().abs() < 1e-6, "wall collision fired off-schedule");

        let (vx, vy) = marble.velocity_typed();
        let (vx, vy) = reflect_off_wall(vx, vy, wall);
        self.marbles[id.0].set_velocity(vx.get(), vy.get());

        self.schedule_wall_collision(id);
        for other in 0..self.marbles.len() {
            if other != id.0 {
                self.schedule_pair_collision(id, MarbleId(other));
            }
        }
    }

    fn apply_marbles_collision(&mut self, a: MarbleId, b: MarbleId) {
        let marble_a = self.marbles[a.0];
        let marble_b = self.marbles[b.0];
        let pos_a = marble_a.current_position_typed();
        let pos_b = marble_b.current_position_typed();
        let (new_vel_a, new_vel_b) = resolve_elastic_collision(
            pos_a,
            marble_a.velocity_typed(),
            marble_a.mass_typed(),
            pos_b,
            marble_b.velocity_typed(),
            marble_b.mass_typed(),
        );

        self.marbles[a.0].set_velocity(new_vel_a.0.get(), new_vel_a.1.get());
        self.marbles[b.0].set_velocity(new_vel_b.0.get(), new_vel_b.1.get());

        self.schedule_wall_collision(a);
        self.schedule_wall_collision(b);
        for other in 0..self.marbles.len() {
            let other_id = MarbleId(other);
            if other_id != a {
                self.schedule_pair_collision(a, other_id);
            }
            if other_id != b {
                self.schedule_pair_collision(b, other_id);
            }
        }

        let handler = self.handler.clone();
        handler.borrow_mut().collision(self, a, b);
    }

    /// Sets a marble's velocity from outside the normal event flow — a
    /// scripted external perturbation between `advance_to` calls, as in
    /// `collision_with_wall_is_canceled` below.
    pub fn set_marble_velocity(&mut self, id: MarbleId, vx: f64, vy: f64) {
        self.marbles[id.0].set_velocity(vx, vy);
    }

    pub fn marble_id(&self, index: usize) -> MarbleId {
        assert!(index < self.marbles.len(), "marble index out of range");
        MarbleId(index)
    }
}
