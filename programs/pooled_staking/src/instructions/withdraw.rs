//! Withdraw instruction handler.
//!
//! Returns staked tokens once the lock period has elapsed. On pools that pay
//! out on withdraw, the settled rewards are sent in the same instruction and
//! `remaining_accounts` must carry one `(reward_vault, destination)` pair per
//! reward stream.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{RewardClaimed, Withdrawn};
use crate::ledger;
use crate::math::total_amount;
use crate::state::{Registry, StakePool, UserPosition};
use crate::transfer;

/// Accounts required for withdrawing.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The position owner.
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,

    /// The stake pool. Deactivated pools still allow withdrawals.
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

    /// Destination for the returned stake.
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

    pub token_program: Program<'info, Token>,
}

/// Withdraw `amount` stake tokens.
///
/// # Arguments
/// * `ctx` - Withdraw accounts context
/// * `amount` - Amount of stake tokens to withdraw
///
/// # Returns
/// Result indicating success or error
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
    amount: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = ctx.accounts;
    let now = accounts.stake_pool.current_tick(&clock)?;

    let reward_transfers = if accounts.stake_pool.pays_out_on_withdraw() {
        transfer::reward_transfers(
            &accounts.stake_pool,
            &accounts.user.key(),
            ctx.remaining_accounts,
        )?
    } else {
        Vec::new()
    };

    // === LEDGER UPDATE ===

    let payout = ledger::withdraw(
        &mut accounts.stake_pool,
        &mut accounts.user_position,
        amount,
        now,
    )?;

    // === TOKEN TRANSFERS ===

    let pool_id = accounts.stake_pool.pool_id;
    let pool_bump = accounts.stake_pool.bump;

    transfer::push(
        &accounts.token_program,
        accounts.stake_vault.to_account_info(),
        accounts.user_token_account.to_account_info(),
        accounts.stake_pool.to_account_info(),
        pool_id,
        pool_bump,
        amount,
    )?;

    let paid = total_amount(&payout)?;
    if paid > 0 {
        transfer::pay_rewards(
            &accounts.token_program,
            accounts.stake_pool.to_account_info(),
            pool_id,
            pool_bump,
            &reward_transfers,
            &payout,
        )?;
    }

    msg!("Withdrew {} tokens from pool {}", amount, pool_id);
    msg!("Remaining position stake: {}", accounts.user_position.staked_amount);

    emit!(Withdrawn {
        pool_id,
        user: accounts.user.key(),
        amount,
        total_staked: accounts.stake_pool.total_staked,
    });

    if paid > 0 {
        msg!("Paid out rewards: {:?}", payout);
        emit!(RewardClaimed {
            pool_id,
            user: accounts.user.key(),
            amounts: payout,
        });
    }

    Ok(())
}
