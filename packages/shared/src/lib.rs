//! Utilities shared by the Lantern binaries: logger setup and the clock abstraction.

pub mod logger;
pub mod time;
