//! HTTP and SSE endpoint handlers.

mod http;
mod image;
mod session;
mod sse;

pub use http::{health_check, join, leave, send_message, set_nickname};
pub use image::{get_image, upload_image};
pub use sse::events;
