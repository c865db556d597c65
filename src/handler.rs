//! The event-handler capability set consumers (a renderer, a scenario
//! generator, a test) implement to observe the simulation as it runs.

use crate::simulation::{MarbleId, Simulation};

/// Callbacks invoked by `Simulation::advance_to` as it drains the event
/// queue. Implementations must not call back into `advance_to` — the
/// simulation detects and panics on such re-entrancy (see §5 of
/// SPEC_FULL.md) — but may otherwise call back into the simulation,
/// notably `schedule_tick_in`, since they're handed `&mut Simulation`.
pub trait EventHandler {
    /// Called once, synchronously, from `Simulation::new`.
    fn begin(&mut self, sim: &mut Simulation) {
        let _ = sim;
    }

    /// Called for each `Tick` event as it fires.
    fn tick(&mut self, sim: &mut Simulation) {
        let _ = sim;
    }

    /// Called after a marble-marble collision has been applied. Not part of
    /// the distilled spec's minimal surface, but several revisions of the
    /// original C++ events-handler interface expose a `collision()`
    /// callback alongside `begin`/`tick`; this crate keeps it available for
    /// consumers that want it (e.g. a sound trigger) without requiring
    /// every handler to implement it.
    fn collision(&mut self, sim: &mut Simulation, m1: MarbleId, m2: MarbleId) {
        let _ = (sim, m1, m2);
    }
}

/// A handler that does nothing; used when a consumer has no need to observe
/// the simulation.
#[derive(Debug, Default)]
pub struct NoopHandler;

impl EventHandler for NoopHandler {}
