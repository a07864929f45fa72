//! State structures for the Pooled Staking program.
//!
//! This module defines all account structures used to store program state.

pub mod registry;
pub mod stake_pool;
pub mod user_position;

pub use registry::*;
pub use stake_pool::*;
pub use user_position::*;
