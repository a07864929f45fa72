//! Emergency withdraw instruction handler.
//!
//! Lets the registry authority pull tokens out of a reward vault. Stake
//! vaults are not reachable from here: the vault must be one of the pool's
//! reward stream vaults.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::EmergencyWithdrawn;
use crate::state::{Registry, StakePool};
use crate::transfer;

/// Accounts required for an emergency withdrawal.
#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    /// The registry authority.
    pub authority: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.is_privileged(&authority.key()) @ StakingError::Unauthorized
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump,
        constraint = stake_pool.pool_id < registry.pool_count @ StakingError::PoolNotFound
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// Reward vault to drain from.
    #[account(
        mut,
        constraint = reward_vault.key() != stake_pool.stake_vault @ StakingError::VaultMismatch
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = destination.mint == reward_vault.mint @ StakingError::MintMismatch
    )]
    pub destination: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Move `amount` reward tokens out of stream `stream_index`'s vault.
///
/// # Security
/// - Only the registry authority can call this
/// - Accrued but unpaid rewards may become unfunded
/// - Staked principal is never touched
pub fn handler(ctx: Context<EmergencyWithdraw>, stream_index: u8, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);

    let stake_pool = &ctx.accounts.stake_pool;
    let stream = stake_pool.stream(stream_index)?;
    require_keys_eq!(
        ctx.accounts.reward_vault.key(),
        stream.reward_vault,
        StakingError::VaultMismatch
    );
    require!(
        ctx.accounts.reward_vault.amount >= amount,
        StakingError::InsufficientRewardFunds
    );

    transfer::push(
        &ctx.accounts.token_program,
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.destination.to_account_info(),
        stake_pool.to_account_info(),
        stake_pool.pool_id,
        stake_pool.bump,
        amount,
    )?;

    msg!(
        "EMERGENCY: {} tokens withdrawn from pool {} stream {}",
        amount,
        stake_pool.pool_id,
        stream_index
    );
    msg!("Destination: {}", ctx.accounts.destination.key());

    emit!(EmergencyWithdrawn {
        pool_id: stake_pool.pool_id,
        stream_index,
        destination: ctx.accounts.destination.key(),
        amount,
    });

    Ok(())
}
