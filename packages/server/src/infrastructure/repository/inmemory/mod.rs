//! インメモリ Repository 実装

pub mod blob;
pub mod session;

pub use blob::InMemoryBlobRepository;
pub use session::InMemorySessionRepository;
