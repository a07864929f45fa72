//! Program constants for the Pooled Staking program.
//!
//! Seeds, fixed-point precision, and the bounds that keep the reward
//! accumulator inside its integer width.

use anchor_lang::prelude::*;

/// Seed for deriving the singleton registry PDA
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Seed for deriving stake pool PDAs (followed by the little-endian pool id)
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving user position PDAs
pub const USER_POSITION_SEED: &[u8] = b"user_position";

/// Seed for deriving a pool's stake vault PDA
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";

/// Seed for deriving reward vault PDAs (followed by the stream index)
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Fixed-point scale applied to reward accumulators (10^12).
///
/// Truncation loses less than one base unit per `SCALE` units of stake on
/// every accrual. With `MAX_REWARD_RATE` and a single unit staked, a `u128`
/// accumulator still holds more than 3 * 10^14 ticks of growth.
pub const SCALE: u128 = 1_000_000_000_000;

/// Maximum reward rate per tick for a single stream (in reward base units)
pub const MAX_REWARD_RATE: u64 = 1_000_000_000_000;

/// Maximum number of reward streams attached to a pool
pub const MAX_REWARD_STREAMS: usize = 4;

/// Maximum lock period (roughly two years of seconds)
pub const MAX_LOCK_PERIOD: u64 = 2 * 365 * 86_400;

/// Tick sources a pool can accrue against
pub mod clock_kind {
    /// Unix timestamp in seconds
    pub const UNIX_TIMESTAMP: u8 = 0;
    /// Slot height
    pub const SLOT: u8 = 1;
}

/// What happens to settled rewards when a user withdraws stake
pub mod withdraw_policy {
    /// Rewards stay in the claimable balance until `claim_rewards`
    pub const CREDIT: u8 = 0;
    /// Rewards are paid out together with the withdrawn stake
    pub const PAY_OUT: u8 = 1;
}
