//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! - `sse`: JSON frames pushed over the event stream
//! - `conversion`: domain entity -> DTO

pub mod conversion;
pub mod sse;
