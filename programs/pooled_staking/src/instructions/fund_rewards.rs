/// Fund rewards instruction handler.
///
/// Handles depositing reward tokens into a stream's reward vault.
///
/// ## Security Guarantees
/// - Vault must be the one recorded for the stream
/// - Mint validation prevents wrong token deposits
/// - Anyone can fund (no admin restriction)

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardsFunded;
use crate::state::StakePool;
use crate::transfer;

/// Accounts required for funding a reward stream.
#[derive(Accounts)]
pub struct FundRewards<'info> {
    /// The funder (anyone can fund - no admin restriction).
    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        seeds = [STAKE_POOL_SEED, &stake_pool.pool_id.to_le_bytes()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// Funder's token account.
    /// SECURITY: Mint and owner validation.
    #[account(
        mut,
        constraint = funder_token_account.mint == reward_vault.mint @ StakingError::MintMismatch,
        constraint = funder_token_account.owner == funder.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    /// The stream's reward vault, checked against the pool in the handler.
    #[account(
        mut,
        constraint = reward_vault.owner == stake_pool.key() @ StakingError::InvalidTokenAccountOwner
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Fund a reward stream.
///
/// # Arguments
/// * `ctx` - FundRewards accounts context
/// * `stream_index` - Index of the stream to fund
/// * `amount` - Amount of reward tokens to fund
pub fn handler(ctx: Context<FundRewards>, stream_index: u8, amount: u64) -> Result<()> {
    // === INPUT VALIDATION ===

    require!(amount > 0, StakingError::ZeroAmount);

    let stream = ctx.accounts.stake_pool.stream(stream_index)?;
    require_keys_eq!(
        ctx.accounts.reward_vault.key(),
        stream.reward_vault,
        StakingError::VaultMismatch
    );

    // === TOKEN TRANSFER ===

    transfer::pull(
        &ctx.accounts.token_program,
        &ctx.accounts.funder_token_account,
        &ctx.accounts.reward_vault,
        &ctx.accounts.funder,
        amount,
    )?;

    // Reload vault to get updated balance
    ctx.accounts.reward_vault.reload()?;

    msg!(
        "Pool {} stream {} funded with {} tokens",
        ctx.accounts.stake_pool.pool_id,
        stream_index,
        amount
    );
    msg!("New vault balance: {}", ctx.accounts.reward_vault.amount);
    msg!("Funder: {}", ctx.accounts.funder.key());

    emit!(RewardsFunded {
        pool_id: ctx.accounts.stake_pool.pool_id,
        stream_index,
        funder: ctx.accounts.funder.key(),
        amount,
    });

    Ok(())
}
