//! Deposit instruction handler.
//!
//! Stakes tokens into a pool, opening the user's position on first use.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Deposited;
use crate::ledger;
use crate::state::{Registry, StakePool, UserPosition};
use crate::transfer;

/// Accounts required for depositing.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The user depositing tokens.
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump,
        constraint = stake_pool.pool_id < registry.pool_count @ StakingError::PoolNotFound
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// User's position in this pool (created on first deposit).
    #[account(
        init_if_needed,
        payer = user,
        space = UserPosition::LEN,
        seeds = [USER_POSITION_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_position: Box<Account<'info, UserPosition>>,

    /// User's token account for the stake mint.
    #[account(
        mut,
        constraint = user_token_account.mint == stake_pool.stake_mint @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool's stake vault.
    #[account(
        mut,
        constraint = stake_vault.key() == stake_pool.stake_vault @ StakingError::VaultMismatch
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Deposit `amount` stake tokens.
///
/// # Arguments
/// * `ctx` - Deposit accounts context
/// * `amount` - Amount of stake tokens to deposit
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = ctx.accounts;
    let now = accounts.stake_pool.current_tick(&clock)?;

    // First deposit opens the position
    if !accounts.user_position.is_initialized() {
        accounts.user_position.owner = accounts.user.key();
        accounts.user_position.stake_pool = accounts.stake_pool.key();
        accounts.user_position.bump = ctx.bumps.user_position;
    }
    require_keys_eq!(
        accounts.user_position.owner,
        accounts.user.key(),
        StakingError::InvalidPositionOwner
    );

    // === LEDGER UPDATE ===

    ledger::deposit(
        &mut accounts.stake_pool,
        &mut accounts.user_position,
        amount,
        now,
    )?;

    // === TOKEN TRANSFER ===

    transfer::pull(
        &accounts.token_program,
        &accounts.user_token_account,
        &accounts.stake_vault,
        &accounts.user,
        amount,
    )?;

    msg!("Deposited {} tokens into pool {}", amount, accounts.stake_pool.pool_id);
    msg!("Position stake: {}", accounts.user_position.staked_amount);

    emit!(Deposited {
        pool_id: accounts.stake_pool.pool_id,
        user: accounts.user.key(),
        amount,
        total_staked: accounts.stake_pool.total_staked,
    });

    Ok(())
}
