//! Initialize registry instruction handler.
//!
//! Creates the singleton registry that holds the privileged authority and
//! hands out pool ids.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::Registry;

/// Accounts required for registry initialization.
#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    /// Becomes the registry authority.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The registry account to be created.
    /// SECURITY: Fixed seed makes it a singleton.
    #[account(
        init,
        payer = authority,
        space = Registry::LEN,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,
}

/// Initialize the registry with the signer as authority.
pub fn handler(ctx: Context<InitializeRegistry>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;

    registry.authority = ctx.accounts.authority.key();
    registry.pool_count = 0;
    registry.bump = ctx.bumps.registry;

    msg!("Registry initialized");
    msg!("Authority: {}", registry.authority);

    Ok(())
}
