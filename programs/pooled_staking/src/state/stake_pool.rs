use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::math::accumulator_delta;

/// One reward token emitted by a pool at a fixed rate per tick.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardStream {
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    /// Reward base units emitted per tick across the whole pool
    pub rate: u64,
    /// Cumulative reward per unit of stake, scaled by `SCALE`
    pub accumulator: u128,
    pub total_claimed: u64,
}

impl RewardStream {
    pub const LEN: usize = 32 + 32 + 8 + 16 + 8;

    pub fn new(reward_mint: Pubkey, reward_vault: Pubkey, rate: u64) -> Self {
        Self {
            reward_mint,
            reward_vault,
            rate,
            accumulator: 0,
            total_claimed: 0,
        }
    }
}

#[account]
pub struct StakePool {
    pub pool_id: u64,
    pub stake_mint: Pubkey,
    pub stake_vault: Pubkey,

    pub total_staked: u64,
    pub staker_count: u64,

    pub last_accrual: u64,
    pub lock_period: u64,

    pub clock_kind: u8,
    pub withdraw_policy: u8,
    pub active: bool,

    pub created_at: i64,

    pub bump: u8,

    pub reward_streams: Vec<RewardStream>,
}

impl Default for StakePool {
    fn default() -> Self {
        Self {
            pool_id: 0,
            stake_mint: Pubkey::default(),
            stake_vault: Pubkey::default(),
            total_staked: 0,
            staker_count: 0,
            last_accrual: 0,
            lock_period: 0,
            clock_kind: clock_kind::UNIX_TIMESTAMP,
            withdraw_policy: withdraw_policy::CREDIT,
            active: true,
            created_at: 0,
            bump: 0,
            reward_streams: Vec::new(),
        }
    }
}

impl StakePool {
    pub const LEN: usize = 8
        + 8
        + (32 * 2)
        + (8 * 4)
        + 3
        + 8
        + 1
        + 4 + (RewardStream::LEN * MAX_REWARD_STREAMS);

    /// Reads the pool's tick source from the runtime clock.
    pub fn current_tick(&self, clock: &Clock) -> Result<u64> {
        match self.clock_kind {
            clock_kind::UNIX_TIMESTAMP => u64::try_from(clock.unix_timestamp)
                .map_err(|_| error!(StakingError::InvalidTimestamp)),
            clock_kind::SLOT => Ok(clock.slot),
            _ => err!(StakingError::InvalidClockKind),
        }
    }

    pub fn pays_out_on_withdraw(&self) -> bool {
        self.withdraw_policy == withdraw_policy::PAY_OUT
    }

    pub fn rates(&self) -> Vec<u64> {
        self.reward_streams.iter().map(|s| s.rate).collect()
    }

    pub fn stream(&self, index: u8) -> Result<&RewardStream> {
        self.reward_streams
            .get(index as usize)
            .ok_or_else(|| error!(StakingError::InvalidStreamIndex))
    }

    pub fn stream_mut(&mut self, index: u8) -> Result<&mut RewardStream> {
        self.reward_streams
            .get_mut(index as usize)
            .ok_or_else(|| error!(StakingError::InvalidStreamIndex))
    }

    /// Advances every stream's accumulator up to `now`.
    ///
    /// Ticks elapsed while nothing is staked are skipped: their emission is
    /// dropped rather than carried forward.
    pub fn accrue(&mut self, now: u64) -> Result<()> {
        if now <= self.last_accrual {
            return Ok(());
        }

        if self.total_staked > 0 {
            let elapsed = now
                .checked_sub(self.last_accrual)
                .ok_or(StakingError::MathUnderflow)?;

            let next = self
                .reward_streams
                .iter()
                .map(|stream| -> Result<u128> {
                    let delta = accumulator_delta(elapsed, stream.rate, self.total_staked)?;
                    stream
                        .accumulator
                        .checked_add(delta)
                        .ok_or_else(|| error!(StakingError::MathOverflow))
                })
                .collect::<Result<Vec<u128>>>()?;

            for (stream, accumulator) in self.reward_streams.iter_mut().zip(next) {
                stream.accumulator = accumulator;
            }
        }

        self.last_accrual = now;
        Ok(())
    }

    /// Adds per-stream payouts to the lifetime claimed totals.
    pub fn record_payout(&mut self, amounts: &[u64]) -> Result<()> {
        let totals = self
            .reward_streams
            .iter()
            .zip(amounts)
            .map(|(stream, amount)| {
                stream
                    .total_claimed
                    .checked_add(*amount)
                    .ok_or_else(|| error!(StakingError::MathOverflow))
            })
            .collect::<Result<Vec<u64>>>()?;

        for (stream, total) in self.reward_streams.iter_mut().zip(totals) {
            stream.total_claimed = total;
        }
        Ok(())
    }
}
