//! Claim rewards instruction handler.
//!
//! Pays every stream's settled balance without touching the stake.
//! `remaining_accounts` carries one `(reward_vault, destination)` pair per
//! reward stream, in stream order.

use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardClaimed;
use crate::ledger;
use crate::state::{Registry, StakePool, UserPosition};
use crate::transfer;

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// The position owner.
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump,
        constraint = stake_pool.pool_id < registry.pool_count @ StakingError::PoolNotFound
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    #[account(
        mut,
        seeds = [USER_POSITION_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump = user_position.bump,
        constraint = user_position.owner == user.key() @ StakingError::InvalidPositionOwner,
        constraint = user_position.stake_pool == stake_pool.key() @ StakingError::PositionPoolMismatch
    )]
    pub user_position: Box<Account<'info, UserPosition>>,

    pub token_program: Program<'info, Token>,
}

/// Claim all settled rewards.
///
/// # Security
/// - Ledger balances are zeroed before any token leaves a vault
/// - Every vault balance is checked before the first transfer
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = ctx.accounts;
    let now = accounts.stake_pool.current_tick(&clock)?;

    let reward_transfers = transfer::reward_transfers(
        &accounts.stake_pool,
        &accounts.user.key(),
        ctx.remaining_accounts,
    )?;

    let amounts = ledger::claim(&mut accounts.stake_pool, &mut accounts.user_position, now)?;

    transfer::pay_rewards(
        &accounts.token_program,
        accounts.stake_pool.to_account_info(),
        accounts.stake_pool.pool_id,
        accounts.stake_pool.bump,
        &reward_transfers,
        &amounts,
    )?;

    msg!("Pool {}: claimed rewards {:?}", accounts.stake_pool.pool_id, amounts);
    msg!("User: {}", accounts.user.key());

    emit!(RewardClaimed {
        pool_id: accounts.stake_pool.pool_id,
        user: accounts.user.key(),
        amounts,
    });

    Ok(())
}
