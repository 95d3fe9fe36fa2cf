//! Background Tasks Module
//!
//! Contains background tasks owned by storage backends.
//!
//! # Tasks
//! - TTL Cleanup: removes expired in-process entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
