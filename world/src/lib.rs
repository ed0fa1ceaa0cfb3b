#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative entity storage for Balloon Defence.
//!
//! The world owns plain data: the preallocated enemy pool, the player base,
//! the shared path and the tower roster. It exposes small mutation primitives
//! (activate, damage, kill, move) that the pure systems compose into the
//! per-tick rules. Nothing here decides *when* something happens.

mod base;
mod path;
mod pool;
mod towers;

pub use base::PlayerBase;
pub use path::Path;
pub use pool::{DamageOutcome, Enemy, EnemyPool};
pub use towers::{Tower, TowerRoster};
