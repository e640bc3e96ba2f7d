//! tilepal core
//!
//! Ambient utilities shared by the tilepal crates: logging setup,
//! profiling hooks, math re-exports and small geometry types.

pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
