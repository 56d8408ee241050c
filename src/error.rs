//! Error taxonomy shared across the crate
//!
//! Data problems (bad rows, out-of-range months) are recoverable: the
//! caller keeps the previous world and reports. Lifecycle misuse surfaces
//! as `PhaseViolation` instead of panicking.

use thiserror::Error;

use crate::sim::SimPhase;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while mapping data to a simulation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Month index outside the table
    #[error("month {index} is out of range for a table of {len} rows")]
    MonthOutOfRange { index: i64, len: usize },

    /// A cell that should hold a number does not
    #[error("row {row} column {column} is not usable as a number: {cell}")]
    MalformedRow {
        row: usize,
        column: usize,
        cell: String,
    },

    /// scale() with in_min == in_max
    #[error("scale input range is degenerate (in_min == in_max == {in_min})")]
    DegenerateRange { in_min: f32 },

    /// Negative ball count reached a spawn call
    #[error("spawn count must be non-negative, got {count}")]
    InvalidSpawnCount { count: i64 },

    /// Lifecycle operation called in the wrong phase
    #[error("{op} is not allowed while the simulation is {phase:?}")]
    PhaseViolation { op: &'static str, phase: SimPhase },
}
