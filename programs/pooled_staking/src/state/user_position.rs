use anchor_lang::prelude::*;

use crate::constants::MAX_REWARD_STREAMS;
use crate::error::StakingError;
use crate::math::{accrued_value, to_u64};
use crate::state::StakePool;

/// Per-stream settlement record of a position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamCheckpoint {
    /// `staked_amount * accumulator / SCALE` at the last settlement
    pub debt: u128,
    /// Settled but unpaid reward
    pub claimable: u64,
    pub total_claimed: u64,
}

impl StreamCheckpoint {
    pub const LEN: usize = 16 + 8 + 8;
}

#[account]
#[derive(Default)]
pub struct UserPosition {
    pub owner: Pubkey,
    pub stake_pool: Pubkey,

    pub staked_amount: u64,
    pub last_stake_time: u64,

    pub bump: u8,

    pub checkpoints: Vec<StreamCheckpoint>,
}

impl UserPosition {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 1 + 4 + (StreamCheckpoint::LEN * MAX_REWARD_STREAMS);

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn is_lock_ended(&self, now: u64, lock_period: u64) -> Result<bool> {
        let unlock_at = self
            .last_stake_time
            .checked_add(lock_period)
            .ok_or(StakingError::MathOverflow)?;
        Ok(now >= unlock_at)
    }

    pub fn claimable(&self) -> Vec<u64> {
        self.checkpoints.iter().map(|c| c.claimable).collect()
    }

    /// Streams added to the pool after this position was last touched
    /// start from a zero debt: their accumulator was zero when they were
    /// created and the stake has not changed since.
    fn sync_streams(&mut self, stream_count: usize) {
        if self.checkpoints.len() < stream_count {
            self.checkpoints
                .resize(stream_count, StreamCheckpoint::default());
        }
    }

    /// Moves reward earned since the last settlement into `claimable` and
    /// resets each debt to the current accumulator.
    ///
    /// The pool must already be accrued up to the current tick.
    pub fn settle(&mut self, pool: &StakePool) -> Result<()> {
        self.sync_streams(pool.reward_streams.len());

        let settled = self
            .checkpoints
            .iter()
            .zip(pool.reward_streams.iter())
            .map(|(checkpoint, stream)| -> Result<(u128, u64)> {
                let value = accrued_value(self.staked_amount, stream.accumulator)?;
                let pending = value
                    .checked_sub(checkpoint.debt)
                    .ok_or(StakingError::MathUnderflow)?;
                let claimable = checkpoint
                    .claimable
                    .checked_add(to_u64(pending)?)
                    .ok_or(StakingError::MathOverflow)?;
                Ok((value, claimable))
            })
            .collect::<Result<Vec<(u128, u64)>>>()?;

        for (checkpoint, (debt, claimable)) in self.checkpoints.iter_mut().zip(settled) {
            checkpoint.debt = debt;
            checkpoint.claimable = claimable;
        }
        Ok(())
    }

    /// Recomputes every debt from the current stake. Called after the stake
    /// amount changes, always right after a `settle` against the same pool.
    pub fn reset_debts(&mut self, pool: &StakePool) -> Result<()> {
        self.sync_streams(pool.reward_streams.len());

        let debts = pool
            .reward_streams
            .iter()
            .map(|stream| accrued_value(self.staked_amount, stream.accumulator))
            .collect::<Result<Vec<u128>>>()?;

        for (checkpoint, debt) in self.checkpoints.iter_mut().zip(debts) {
            checkpoint.debt = debt;
        }
        Ok(())
    }

    /// Zeroes every claimable balance and returns what was owed per stream.
    pub fn take_claimable(&mut self) -> Result<Vec<u64>> {
        let totals = self
            .checkpoints
            .iter()
            .map(|c| {
                c.total_claimed
                    .checked_add(c.claimable)
                    .ok_or_else(|| error!(StakingError::MathOverflow))
            })
            .collect::<Result<Vec<u64>>>()?;

        let amounts = self.claimable();
        for (checkpoint, total) in self.checkpoints.iter_mut().zip(totals) {
            checkpoint.claimable = 0;
            checkpoint.total_claimed = total;
        }
        Ok(amounts)
    }
}
