//! Token movement in and out of pool-owned vaults.
//!
//! Handlers reach this module only after the ledger transition has been
//! applied. A rejected transfer fails the instruction, which discards every
//! account write made before it.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::STAKE_POOL_SEED;
use crate::error::StakingError;
use crate::state::StakePool;

/// A validated reward vault and the user account it pays into.
pub struct RewardTransfer<'info> {
    pub vault: Account<'info, TokenAccount>,
    pub destination: Account<'info, TokenAccount>,
}

/// Pulls `amount` from an account controlled by `authority` into a vault.
pub fn pull<'info>(
    token_program: &Program<'info, Token>,
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    authority: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from: from.to_account_info(),
        to: to.to_account_info(),
        authority: authority.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(token_program.to_account_info(), cpi_accounts);

    token::transfer(cpi_ctx, amount).map_err(|e| {
        msg!("Pull of {} tokens failed: {}", amount, e);
        error!(StakingError::TransferFailed)
    })
}

/// Pushes `amount` out of a pool vault, signed by the pool PDA.
pub fn push<'info>(
    token_program: &Program<'info, Token>,
    vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    stake_pool: AccountInfo<'info>,
    pool_id: u64,
    pool_bump: u8,
    amount: u64,
) -> Result<()> {
    let pool_id_bytes = pool_id.to_le_bytes();
    let seeds = &[STAKE_POOL_SEED, pool_id_bytes.as_ref(), &[pool_bump]];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: vault,
        to,
        authority: stake_pool,
    };
    let cpi_ctx =
        CpiContext::new_with_signer(token_program.to_account_info(), cpi_accounts, signer_seeds);

    token::transfer(cpi_ctx, amount).map_err(|e| {
        msg!("Push of {} tokens failed: {}", amount, e);
        error!(StakingError::TransferFailed)
    })
}

/// Parses `remaining_accounts` as one `(reward_vault, destination)` pair per
/// reward stream, in stream order.
pub fn reward_transfers<'info>(
    pool: &StakePool,
    owner: &Pubkey,
    remaining_accounts: &'info [AccountInfo<'info>],
) -> Result<Vec<RewardTransfer<'info>>> {
    require!(
        remaining_accounts.len() == pool.reward_streams.len() * 2,
        StakingError::RewardAccountsMismatch
    );

    pool.reward_streams
        .iter()
        .zip(remaining_accounts.chunks(2))
        .map(|(stream, pair)| -> Result<RewardTransfer<'info>> {
            let vault = Account::<TokenAccount>::try_from(&pair[0])?;
            let destination = Account::<TokenAccount>::try_from(&pair[1])?;

            require_keys_eq!(vault.key(), stream.reward_vault, StakingError::VaultMismatch);
            require_keys_eq!(destination.mint, stream.reward_mint, StakingError::MintMismatch);
            require_keys_eq!(
                destination.owner,
                *owner,
                StakingError::InvalidTokenAccountOwner
            );

            Ok(RewardTransfer { vault, destination })
        })
        .collect()
}

/// Fails unless every `(vault_balance, amount)` pair can be paid in full.
pub fn ensure_vaults_cover(funds: &[(u64, u64)]) -> Result<()> {
    for (index, (balance, amount)) in funds.iter().enumerate() {
        if balance < amount {
            msg!(
                "Reward vault {} holds {} but owes {}",
                index,
                balance,
                amount
            );
            return err!(StakingError::InsufficientRewardFunds);
        }
    }
    Ok(())
}

/// Pays each non-zero per-stream amount from its vault.
///
/// Every vault balance is checked before the first transfer so an
/// underfunded stream fails the payout as a whole.
pub fn pay_rewards<'info>(
    token_program: &Program<'info, Token>,
    stake_pool: AccountInfo<'info>,
    pool_id: u64,
    pool_bump: u8,
    transfers: &[RewardTransfer<'info>],
    amounts: &[u64],
) -> Result<()> {
    require!(
        transfers.len() == amounts.len(),
        StakingError::RewardAccountsMismatch
    );

    let funds: Vec<(u64, u64)> = transfers
        .iter()
        .zip(amounts)
        .map(|(transfer, amount)| (transfer.vault.amount, *amount))
        .collect();
    ensure_vaults_cover(&funds)?;

    for (transfer, amount) in transfers.iter().zip(amounts) {
        if *amount == 0 {
            continue;
        }
        push(
            token_program,
            transfer.vault.to_account_info(),
            transfer.destination.to_account_info(),
            stake_pool.clone(),
            pool_id,
            pool_bump,
            *amount,
        )?;
    }

    Ok(())
}
