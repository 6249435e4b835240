//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a map.
//!
//! # Tasks
//! - Sweeper: Removes expired map entries at the configured interval

mod sweeper;

pub(crate) use sweeper::Sweeper;
