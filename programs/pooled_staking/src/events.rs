//! Events emitted by the Pooled Staking program.
//!
//! Emitted only after an instruction has applied all of its effects.

use anchor_lang::prelude::*;

#[event]
pub struct PoolCreated {
    pub pool_id: u64,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub rates: Vec<u64>,
    pub lock_period: u64,
    pub clock_kind: u8,
    pub withdraw_policy: u8,
}

#[event]
pub struct RewardStreamAdded {
    pub pool_id: u64,
    pub stream_index: u8,
    pub reward_mint: Pubkey,
    pub rate: u64,
}

#[event]
pub struct Deposited {
    pub pool_id: u64,
    pub user: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
}

#[event]
pub struct Withdrawn {
    pub pool_id: u64,
    pub user: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
}

#[event]
pub struct RewardClaimed {
    pub pool_id: u64,
    pub user: Pubkey,
    pub amounts: Vec<u64>,
}

#[event]
pub struct RateUpdated {
    pub pool_id: u64,
    pub stream_index: u8,
    pub old_rate: u64,
    pub new_rate: u64,
}

#[event]
pub struct PoolActiveChanged {
    pub pool_id: u64,
    pub active: bool,
}

#[event]
pub struct LockPeriodUpdated {
    pub pool_id: u64,
    pub lock_period: u64,
}

#[event]
pub struct AuthorityTransferred {
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct RewardsFunded {
    pub pool_id: u64,
    pub stream_index: u8,
    pub funder: Pubkey,
    pub amount: u64,
}

#[event]
pub struct EmergencyWithdrawn {
    pub pool_id: u64,
    pub stream_index: u8,
    pub destination: Pubkey,
    pub amount: u64,
}
