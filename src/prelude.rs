//! Common imports for consumers of this crate.

pub use crate::collision::Wall;
pub use crate::error::SimulationError;
pub use crate::handler::{EventHandler, NoopHandler};
pub use crate::marble::Marble;
pub use crate::quantities::{Duration, Length, Mass, Speed, TimePoint};
pub use crate::simulation::{HandlerRef, MarbleId, Simulation};
