//! Add reward stream instruction handler.
//!
//! Attaches another reward token to an existing pool.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardStreamAdded;
use crate::ledger;
use crate::state::{Registry, RewardStream, StakePool};

/// Accounts required for adding a reward stream.
#[derive(Accounts)]
pub struct AddRewardStream<'info> {
    /// The registry authority.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.is_privileged(&authority.key()) @ StakingError::Unauthorized
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump,
        constraint = stake_pool.pool_id < registry.pool_count @ StakingError::PoolNotFound
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// Mint of the new reward token.
    pub reward_mint: Account<'info, Mint>,

    /// Vault funding the new stream, indexed by its stream position.
    #[account(
        init,
        payer = authority,
        seeds = [
            REWARD_VAULT_SEED,
            stake_pool.key().as_ref(),
            &[stake_pool.reward_streams.len() as u8]
        ],
        bump,
        token::mint = reward_mint,
        token::authority = stake_pool
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Append a reward stream emitting `rate` units per tick.
///
/// Existing streams accrue up to the current tick first, so the new stream
/// only rewards stake held from now on.
pub fn handler(ctx: Context<AddRewardStream>, rate: u64) -> Result<()> {
    let clock = Clock::get()?;
    let stake_pool = &mut ctx.accounts.stake_pool;
    let now = stake_pool.current_tick(&clock)?;

    let stream = RewardStream::new(
        ctx.accounts.reward_mint.key(),
        ctx.accounts.reward_vault.key(),
        rate,
    );
    let stream_index = ledger::add_reward_stream(stake_pool, stream, now)?;

    msg!(
        "Pool {}: reward stream {} added for mint {} at rate {}",
        stake_pool.pool_id,
        stream_index,
        ctx.accounts.reward_mint.key(),
        rate
    );

    emit!(RewardStreamAdded {
        pool_id: stake_pool.pool_id,
        stream_index,
        reward_mint: ctx.accounts.reward_mint.key(),
        rate,
    });

    Ok(())
}
