//! The one recoverable failure mode in this crate: invalid construction
//! arguments. Everything past construction is a documented precondition
//! enforced with `assert!`/`debug_assert!` (see SPEC_FULL.md §7) rather
//! than a `Result`, since the original design treats those as programmer
//! errors, not recoverable conditions.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("arena width must be positive, got {0}")]
    NonPositiveWidth(f64),
    #[error("arena height must be positive, got {0}")]
    NonPositiveHeight(f64),
    #[error("marble {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: f64 },
    #[error("marble {index} has negative mass {mass}")]
    NegativeMass { index: usize, mass: f64 },
}
