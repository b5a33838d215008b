//! Service layer modules.
//!
//! Contains the Redis cache client, the quote event bus, and the
//! notification recorder.

pub mod cache;
pub mod events;
pub mod notifications;

pub use cache::RedisCache;
pub use events::{EventBus, QuoteEvent};
