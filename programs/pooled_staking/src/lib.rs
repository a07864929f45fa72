//! # Pooled Staking Program
//!
//! A multi-pool staking program. Each pool stakes one SPL token and pays one
//! or more reward tokens, each emitted at a fixed rate per tick and shared
//! pro rata among stakers.
//!
//! ## Features
//! - Lazily accrued reward-per-share accumulators (no per-user iteration)
//! - Up to four reward streams per pool
//! - Optional lock period measured from a position's last deposit
//! - Rewards either credited or paid out on withdraw, per pool
//! - Registry authority controls rates, activation and reward vaults
//! - Checked arithmetic everywhere; a failure aborts the whole instruction
//!
//! ## Reward accounts
//! `claim_rewards`, and `withdraw` on pools that pay out on withdraw, expect
//! one `(reward_vault, destination)` pair per reward stream in
//! `remaining_accounts`, in stream order.

use anchor_lang::prelude::*;

declare_id!("8APsQWumiTJhtz21gnSw8qt3xjFAVahZiGnQvsEkekr3");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
pub mod transfer;

use instructions::*;

#[program]
pub mod pooled_staking {
    use super::*;

    /// Creates the registry; the signer becomes its authority.
    pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
        instructions::initialize_registry::handler(ctx)
    }

    /// Creates a stake pool with its first reward stream.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the registry, mints and new vaults
    /// * `rate` - Reward units emitted per tick by stream 0
    /// * `lock_period` - Ticks a deposit stays locked (0 = no lock)
    /// * `clock_kind` - 0 = unix timestamp, 1 = slot
    /// * `withdraw_policy` - 0 = credit rewards, 1 = pay out on withdraw
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the registry authority
    /// - Rate or lock period exceed their maximum
    /// - Clock kind or withdraw policy are unknown
    pub fn create_pool(
        ctx: Context<CreatePool>,
        rate: u64,
        lock_period: u64,
        clock_kind: u8,
        withdraw_policy: u8,
    ) -> Result<()> {
        instructions::create_pool::handler(ctx, rate, lock_period, clock_kind, withdraw_policy)
    }

    /// Adds another reward stream to a pool.
    ///
    /// # Errors
    /// Returns an error if the caller is not the authority, the rate is too
    /// high, or the pool already has the maximum number of streams.
    pub fn add_reward_stream(ctx: Context<AddRewardStream>, rate: u64) -> Result<()> {
        instructions::add_reward_stream::handler(ctx, rate)
    }

    /// Stakes tokens into a pool.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for depositing
    /// * `amount` - Amount of stake tokens to deposit
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Pool is inactive
    /// - Arithmetic would overflow
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraws staked tokens.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for withdrawing
    /// * `amount` - Amount of stake tokens to withdraw
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero or exceeds the position's stake
    /// - Lock period has not ended
    /// - Reward accounts are missing on a pay-out pool
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Claims every stream's settled rewards.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No rewards are available
    /// - A reward vault cannot cover its stream's amount
    /// - Reward accounts do not match the pool's streams
    pub fn claim_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>,
    ) -> Result<()> {
        instructions::claim_rewards::handler(ctx)
    }

    /// Admin function to change one stream's reward rate.
    pub fn set_reward_rate(ctx: Context<AdminControl>, stream_index: u8, rate: u64) -> Result<()> {
        instructions::admin::set_reward_rate_handler(ctx, stream_index, rate)
    }

    /// Admin function to activate or deactivate a pool.
    ///
    /// # Arguments
    /// * `ctx` - The context containing admin accounts
    /// * `active` - False blocks new deposits
    pub fn set_pool_active(ctx: Context<AdminControl>, active: bool) -> Result<()> {
        instructions::admin::set_pool_active_handler(ctx, active)
    }

    /// Admin function to change a pool's lock period.
    pub fn set_lock_period(ctx: Context<AdminControl>, lock_period: u64) -> Result<()> {
        instructions::admin::set_lock_period_handler(ctx, lock_period)
    }

    /// Admin function to transfer registry authority to a new address.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the current authority
    /// - New authority is the zero address
    pub fn transfer_authority(ctx: Context<RegistryAdmin>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority_handler(ctx, new_authority)
    }

    /// Admin function to move tokens out of a reward vault.
    ///
    /// Stake vaults cannot be targeted.
    pub fn emergency_withdraw(
        ctx: Context<EmergencyWithdraw>,
        stream_index: u8,
        amount: u64,
    ) -> Result<()> {
        instructions::emergency_withdraw::handler(ctx, stream_index, amount)
    }

    /// Tops up a reward stream's vault. Anyone can fund.
    pub fn fund_rewards(ctx: Context<FundRewards>, stream_index: u8, amount: u64) -> Result<()> {
        instructions::fund_rewards::handler(ctx, stream_index, amount)
    }
}
