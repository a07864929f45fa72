/// Create pool instruction handler.
///
/// Creates a stake pool with its stake vault and its first reward stream.
///
/// ## Security Guarantees
/// - Only the registry authority can create pools
/// - Stake and reward vaults are PDAs owned by the stake pool
/// - Pool ids are assigned by the registry and never reused

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PoolCreated;
use crate::state::{Registry, RewardStream, StakePool};

/// Accounts required for pool creation.
#[derive(Accounts)]
pub struct CreatePool<'info> {
    /// The registry authority.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The registry handing out the pool id.
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.is_privileged(&authority.key()) @ StakingError::Unauthorized
    )]
    pub registry: Account<'info, Registry>,

    /// The stake pool account to be created.
    /// SECURITY: PDA derived from the next pool id.
    #[account(
        init,
        payer = authority,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED, &registry.pool_count.to_le_bytes()],
        bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// Mint of the asset users stake.
    pub stake_mint: Account<'info, Mint>,

    /// Mint of the first reward stream.
    pub reward_mint: Account<'info, Mint>,

    /// Vault holding staked principal.
    #[account(
        init,
        payer = authority,
        seeds = [STAKE_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = stake_pool
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    /// Vault funding reward stream 0.
    #[account(
        init,
        payer = authority,
        seeds = [REWARD_VAULT_SEED, stake_pool.key().as_ref(), &[0u8]],
        bump,
        token::mint = reward_mint,
        token::authority = stake_pool
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,

    /// Token program for token account operations.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar for rent-exempt calculations.
    pub rent: Sysvar<'info, Rent>,
}

/// Create a new stake pool.
///
/// # Arguments
/// * `ctx` - CreatePool accounts context
/// * `rate` - Reward units per tick for stream 0
/// * `lock_period` - Ticks a deposit stays locked (0 = none)
/// * `clock_kind` - Tick source (0 = unix timestamp, 1 = slot)
/// * `withdraw_policy` - 0 = credit rewards, 1 = pay out on withdraw
pub fn handler(
    ctx: Context<CreatePool>,
    rate: u64,
    lock_period: u64,
    clock_kind: u8,
    withdraw_policy: u8,
) -> Result<()> {
    // === INPUT VALIDATION ===

    require!(rate <= MAX_REWARD_RATE, StakingError::RateTooHigh);
    require!(lock_period <= MAX_LOCK_PERIOD, StakingError::LockPeriodTooLong);
    require!(
        clock_kind == clock_kind::UNIX_TIMESTAMP || clock_kind == clock_kind::SLOT,
        StakingError::InvalidClockKind
    );
    require!(
        withdraw_policy == withdraw_policy::CREDIT || withdraw_policy == withdraw_policy::PAY_OUT,
        StakingError::InvalidWithdrawPolicy
    );

    let clock = Clock::get()?;
    let pool_id = ctx
        .accounts
        .registry
        .next_pool_id()
        .ok_or(StakingError::MathOverflow)?;

    // === STATE INITIALIZATION ===

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.pool_id = pool_id;
    stake_pool.stake_mint = ctx.accounts.stake_mint.key();
    stake_pool.stake_vault = ctx.accounts.stake_vault.key();
    stake_pool.total_staked = 0;
    stake_pool.staker_count = 0;
    stake_pool.lock_period = lock_period;
    stake_pool.clock_kind = clock_kind;
    stake_pool.withdraw_policy = withdraw_policy;
    stake_pool.active = true;
    stake_pool.created_at = clock.unix_timestamp;
    stake_pool.last_accrual = stake_pool.current_tick(&clock)?;
    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.reward_streams = vec![RewardStream::new(
        ctx.accounts.reward_mint.key(),
        ctx.accounts.reward_vault.key(),
        rate,
    )];

    msg!("Stake pool {} created", pool_id);
    msg!("Stake mint: {}", stake_pool.stake_mint);
    msg!("Reward mint: {} at rate {}", ctx.accounts.reward_mint.key(), rate);
    msg!(
        "Lock period: {}, clock kind: {}, withdraw policy: {}",
        lock_period,
        clock_kind,
        withdraw_policy
    );

    emit!(PoolCreated {
        pool_id,
        stake_mint: stake_pool.stake_mint,
        reward_mint: ctx.accounts.reward_mint.key(),
        rates: stake_pool.rates(),
        lock_period,
        clock_kind,
        withdraw_policy,
    });

    Ok(())
}
