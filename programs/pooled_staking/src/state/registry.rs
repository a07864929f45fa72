use anchor_lang::prelude::*;

/// Singleton holding the privileged authority and the pool id counter.
#[account]
pub struct Registry {
    pub authority: Pubkey,
    pub pool_count: u64,
    pub bump: u8,
}

impl Registry {
    pub const LEN: usize = 8 + 32 + 8 + 1;

    pub fn is_privileged(&self, key: &Pubkey) -> bool {
        self.authority == *key
    }

    /// Reserves the next pool id.
    pub fn next_pool_id(&mut self) -> Option<u64> {
        let id = self.pool_count;
        self.pool_count = self.pool_count.checked_add(1)?;
        Some(id)
    }
}
