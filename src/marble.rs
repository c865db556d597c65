//! Per-body state for a single marble: immutable constants (radius, mass),
//! a rebasing kinematic baseline, and a generation counter used to
//! invalidate stale scheduled events.

use tracing::debug;

use crate::quantities::{Length, Mass, Speed, TimePoint};

/// A circular rigid body confined to the arena.
///
/// Position at instant `t` is `(x0 + vx*(t-t0), y0 + vy*(t-t0))`. The
/// baseline `(x0, y0, t0)` is rebased every time the velocity changes, so
/// that long runs of small `advance_to` calls never accumulate error the way
/// a naive `position += velocity * dt` integrator would (see
/// `tests::advance_marble_by_many_small_steps_matches_one_big_step`). The
/// baseline is stored as the dimensional newtypes from `quantities` rather
/// than bare `f64`s, so the arithmetic below goes through `Length`/`Speed`/
/// `TimePoint`/`Duration`'s operator overloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marble {
    r: Length,
    m: Mass,
    x0: Length,
    y0: Length,
    t0: TimePoint,
    vx: Speed,
    vy: Speed,
    t_last: TimePoint,
    generation: u64,
}

impl Marble {
    /// Creates a marble at `(x, y)` with velocity `(vx, vy)`, baseline time 0.
    ///
    /// `r` must be strictly positive and `m` non-negative; callers at the
    /// simulation boundary (`Simulation::new`) are expected to validate
    /// this and return `SimulationError` rather than let it reach here.
    pub fn new(r: f64, m: f64, x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Marble {
            r: Length::new(r),
            m: Mass::new(m),
            x0: Length::new(x),
            y0: Length::new(y),
            t0: TimePoint::new(0.0),
            vx: Speed::new(vx),
            vy: Speed::new(vy),
            t_last: TimePoint::new(0.0),
            generation: 0,
        }
    }

    pub fn radius(&self) -> f64 {
        self.r.get()
    }

    pub fn mass(&self) -> f64 {
        self.m.get()
    }

    /// Typed radius, for callers (e.g. `collision.rs`) doing further
    /// dimensional arithmetic.
    pub fn radius_length(&self) -> Length {
        self.r
    }

    /// Typed mass, for callers doing further dimensional arithmetic.
    pub fn mass_typed(&self) -> Mass {
        self.m
    }

    /// Linear extrapolation from the baseline to instant `t`, in the typed
    /// domain.
    pub fn position_at(&self, t: TimePoint) -> (Length, Length) {
        let dt = t - self.t0;
        (self.x0 + self.vx * dt, self.y0 + self.vy * dt)
    }

    /// Linear extrapolation from the baseline to instant `t`.
    pub fn position(&self, t: f64) -> (f64, f64) {
        let (x, y) = self.position_at(TimePoint::new(t));
        (x.get(), y.get())
    }

    /// Position at the marble's current `t_last`, in the typed domain.
    pub fn current_position_typed(&self) -> (Length, Length) {
        self.position_at(self.t_last)
    }

    /// Position at the marble's current `t_last`.
    pub fn current_position(&self) -> (f64, f64) {
        self.position(self.t_last.get())
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.vx.get(), self.vy.get())
    }

    /// Typed velocity, for callers doing further dimensional arithmetic.
    pub fn velocity_typed(&self) -> (Speed, Speed) {
        (self.vx, self.vy)
    }

    /// Opaque token that changes whenever `set_velocity` is called. Stale
    /// scheduled events compare this against the value captured at
    /// scheduling time to detect invalidation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn t_last(&self) -> f64 {
        self.t_last.get()
    }

    /// Advances this marble's `t_last` to `t`. Does not recompute position;
    /// position remains a pure function of `t_last` via the baseline.
    ///
    /// # Panics
    /// Panics if `t < t_last` (time never moves backwards for a marble).
    pub fn advance_to(&mut self, t: f64) {
        let t = TimePoint::new(t);
        assert!(
            t >= self.t_last,
            "Marble::advance_to({}) called with t before t_last ({})",
            t.get(),
            self.t_last.get()
        );
        self.t_last = t;
    }

    /// Rebases the baseline to the current `t_last` and sets a new velocity,
    /// bumping the generation counter so any event scheduled against the
    /// previous trajectory is invalidated.
    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        let (x, y) = self.current_position();
        self.x0 = Length::new(x);
        self.y0 = Length::new(y);
        self.t0 = self.t_last;
        self.vx = Speed::new(vx);
        self.vy = Speed::new(vy);
        self.generation += 1;
        debug!(
            x, y, vx, vy, generation = self.generation,
            "marble velocity changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_marble() {
        let mut m = Marble::new(1.0, 1.0, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.current_position(), (1.0, 2.0));
        m.advance_to(5.0);
        assert_eq!(m.current_position(), (16.0, 22.0));
    }

    #[test]
    fn advance_marble_by_one_big_step() {
        let mut m = Marble::new(1.0, 1.0, 1_000_000_000.0, 0.0, 0.001, 0.0);
        m.advance_to(1000.0);
        assert_eq!(m.current_position().0, 1_000_000_001.0);
    }

    #[test]
    fn advance_marble_by_many_small_steps_matches_one_big_step() {
        let mut m = Marble::new(1.0, 1.0, 1_000_000_000.0, 0.0, 0.001, 0.0);
        for i in 0..1000 {
            m.advance_to(i as f64);
        }
        m.advance_to(1000.0);
        assert_eq!(m.current_position().0, 1_000_000_001.0);
    }

    #[test]
    fn change_marble_speed_rebases_baseline() {
        let mut m = Marble::new(1.0, 1.0, 1.0, 2.0, 3.0, 4.0);
        m.advance_to(5.0);
        m.set_velocity(5.0, 6.0);
        m.advance_to(10.0);
        assert_eq!(m.current_position(), (41.0, 52.0));
    }

    #[test]
    fn set_velocity_bumps_generation() {
        let mut m = Marble::new(1.0, 1.0, 0.0, 0.0, 1.0, 0.0);
        let g0 = m.generation();
        m.set_velocity(-1.0, 0.0);
        assert_eq!(m.generation(), g0 + 1);
    }

    #[test]
    #[should_panic]
    fn advance_to_backwards_panics() {
        let mut m = Marble::new(1.0, 1.0, 0.0, 0.0, 1.0, 0.0);
        m.advance_to(5.0);
        m.advance_to(1.0);
    }
}
