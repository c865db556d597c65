//! Deterministic, event-driven simulation of circular marbles colliding
//! with each other and with the walls of a rectangular arena.
//!
//! Time does not advance in fixed steps. Instead, [`Simulation`] keeps a
//! priority queue of predicted future contacts (the next wall a marble will
//! hit, the next pair of marbles that will touch) and [`Simulation::advance_to`]
//! jumps straight to each one in turn, resolving it before moving on to the
//! next. A consumer that only cares about positions at fixed sampling
//! intervals can still get them — call `advance_to` with an increasing
//! sequence of target times and read [`Simulation::marbles`] after each call.
//!
//! See `SPEC_FULL.md` in the repository root for the full specification
//! this crate implements.

pub mod collision;
pub mod error;
pub mod event;
pub mod handler;
pub mod marble;
pub mod prelude;
pub mod quantities;
pub mod simulation;

pub use error::SimulationError;
pub use handler::{EventHandler, NoopHandler};
pub use marble::Marble;
pub use simulation::{HandlerRef, MarbleId, Simulation};
