//! Background Tasks Module
//!
//! Tasks that run on the tokio runtime independently of cache callers.
//!
//! # Tasks
//! - Expiry: deletes one key when its TTL elapses

mod expiry;

pub use expiry::{spawn_expiry_timer, ExpiryTimer};
