/// Admin instruction handlers.
///
/// Handles privileged operations on pools and on the registry.
///
/// ## Security Guarantees
/// - All admin functions require signer == registry.authority
/// - PDA validation ensures correct registry and pool
/// - Parameter bounds checking

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{AuthorityTransferred, LockPeriodUpdated, PoolActiveChanged, RateUpdated};
use crate::ledger;
use crate::state::{Registry, StakePool};

/// Accounts required for pool admin operations.
///
/// ## Security Notes
/// - Authority must be signer
/// - Authority must match registry.authority
/// - Pool PDA validated via seeds
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The admin authority.
    /// SECURITY: Must be signer AND match registry.authority.
    pub authority: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.is_privileged(&authority.key()) @ StakingError::Unauthorized
    )]
    pub registry: Account<'info, Registry>,

    /// The stake pool to modify.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump,
        constraint = stake_pool.pool_id < registry.pool_count @ StakingError::PoolNotFound
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,
}

/// Accounts required for registry admin operations.
#[derive(Accounts)]
pub struct RegistryAdmin<'info> {
    /// The current authority.
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.is_privileged(&authority.key()) @ StakingError::Unauthorized
    )]
    pub registry: Account<'info, Registry>,
}

/// Change one stream's reward rate.
///
/// # Security
/// - Only registry.authority can call this
/// - Rate capped at MAX_REWARD_RATE
/// - Time already elapsed is accrued at the old rate
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `stream_index` - Stream to update
/// * `rate` - New reward units per tick
pub fn set_reward_rate_handler(ctx: Context<AdminControl>, stream_index: u8, rate: u64) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;
    let now = stake_pool.current_tick(&clock)?;

    let old_rate = ledger::set_reward_rate(stake_pool, stream_index, rate, now)?;

    msg!(
        "Pool {} stream {} rate updated: {} -> {}",
        stake_pool.pool_id,
        stream_index,
        old_rate,
        rate
    );
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit!(RateUpdated {
        pool_id: stake_pool.pool_id,
        stream_index,
        old_rate,
        new_rate: rate,
    });

    Ok(())
}

/// Activate or deactivate a pool.
///
/// # Security
/// - Only registry.authority can call this
/// - When inactive, new deposits are blocked
/// - Withdrawing and claiming remain available
pub fn set_pool_active_handler(ctx: Context<AdminControl>, active: bool) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;

    let previous_state = stake_pool.active;
    stake_pool.active = active;

    msg!(
        "Pool {} {} (was {})",
        stake_pool.pool_id,
        if active { "ACTIVATED" } else { "DEACTIVATED" },
        if previous_state { "active" } else { "inactive" }
    );
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit!(PoolActiveChanged {
        pool_id: stake_pool.pool_id,
        active,
    });

    Ok(())
}

/// Change the lock period applied to withdrawals.
///
/// Applies to existing positions as well, measured from their last deposit.
pub fn set_lock_period_handler(ctx: Context<AdminControl>, lock_period: u64) -> Result<()> {
    require!(lock_period <= MAX_LOCK_PERIOD, StakingError::LockPeriodTooLong);

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.lock_period = lock_period;

    msg!("Pool {} lock period set to {}", stake_pool.pool_id, lock_period);

    emit!(LockPeriodUpdated {
        pool_id: stake_pool.pool_id,
        lock_period,
    });

    Ok(())
}

/// Transfer admin authority to a new address.
///
/// # Security
/// - Only current registry.authority can call this
/// - New authority cannot be zero address
/// - Immediate transfer (no timelock)
pub fn transfer_authority_handler(ctx: Context<RegistryAdmin>, new_authority: Pubkey) -> Result<()> {
    require!(
        new_authority != Pubkey::default(),
        StakingError::InvalidAuthority
    );

    let registry = &mut ctx.accounts.registry;
    let old_authority = registry.authority;
    registry.authority = new_authority;

    msg!("Authority transferred");
    msg!("Old authority: {}", old_authority);
    msg!("New authority: {}", new_authority);

    emit!(AuthorityTransferred {
        old_authority,
        new_authority,
    });

    Ok(())
}
