//! In-memory real-time chat relay.
//!
//! Clients post messages, commands and images over plain HTTP and receive
//! everything addressed to them on a Server-Sent Events stream. Sessions,
//! rate-limit counters and uploaded images live only in memory.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
