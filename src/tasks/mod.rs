//! Background Tasks Module
//!
//! Periodic maintenance owned by the composition root: the caller spawns
//! the sweeps, holds their handles and aborts them on shutdown.

mod sweep;

pub use sweep::{spawn_history_sweep_task, spawn_pool_sweep_task};
