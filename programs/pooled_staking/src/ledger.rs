//! Ledger state transitions shared by the instruction handlers.
//!
//! Every transition validates its inputs, accrues the pool, settles the
//! position against its old debt, and only then applies its own stake
//! change. Handlers call these before any token CPI so that pool and
//! position already hold their final values when control leaves the
//! program.

use anchor_lang::prelude::*;

use crate::constants::{MAX_REWARD_RATE, MAX_REWARD_STREAMS};
use crate::error::StakingError;
use crate::math::total_amount;
use crate::state::{RewardStream, StakePool, UserPosition};

/// Accrues the pool to `now` and settles the position against it.
pub fn settle(pool: &mut StakePool, position: &mut UserPosition, now: u64) -> Result<()> {
    pool.accrue(now)?;
    position.settle(pool)
}

/// Adds `amount` to the position's stake.
pub fn deposit(
    pool: &mut StakePool,
    position: &mut UserPosition,
    amount: u64,
    now: u64,
) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(pool.active, StakingError::PoolInactive);

    let staked_amount = position
        .staked_amount
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;
    let total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;

    settle(pool, position, now)?;

    if position.staked_amount == 0 {
        pool.staker_count = pool.staker_count.saturating_add(1);
    }
    position.staked_amount = staked_amount;
    position.last_stake_time = now;
    pool.total_staked = total_staked;

    position.reset_debts(pool)
}

/// Removes `amount` from the position's stake.
///
/// Returns the reward to pay per stream: the whole settled balance when the
/// pool pays out on withdraw, zeros when rewards stay claimable.
pub fn withdraw(
    pool: &mut StakePool,
    position: &mut UserPosition,
    amount: u64,
    now: u64,
) -> Result<Vec<u64>> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(
        position.staked_amount >= amount,
        StakingError::InsufficientStake
    );
    require!(
        position.is_lock_ended(now, pool.lock_period)?,
        StakingError::LockPeriodActive
    );

    settle(pool, position, now)?;

    position.staked_amount = position
        .staked_amount
        .checked_sub(amount)
        .ok_or(StakingError::MathUnderflow)?;
    pool.total_staked = pool
        .total_staked
        .checked_sub(amount)
        .ok_or(StakingError::MathUnderflow)?;

    if position.staked_amount == 0 {
        pool.staker_count = pool.staker_count.saturating_sub(1);
    }

    position.reset_debts(pool)?;

    if pool.pays_out_on_withdraw() {
        take_payout(pool, position)
    } else {
        Ok(vec![0; pool.reward_streams.len()])
    }
}

/// Settles and empties every claimable balance of the position.
pub fn claim(pool: &mut StakePool, position: &mut UserPosition, now: u64) -> Result<Vec<u64>> {
    settle(pool, position, now)?;

    require!(
        total_amount(&position.claimable())? > 0,
        StakingError::NoRewards
    );

    take_payout(pool, position)
}

/// Appends a reward stream. Time before `now` is credited to the existing
/// streams only.
pub fn add_reward_stream(pool: &mut StakePool, stream: RewardStream, now: u64) -> Result<u8> {
    require!(stream.rate <= MAX_REWARD_RATE, StakingError::RateTooHigh);
    require!(
        pool.reward_streams.len() < MAX_REWARD_STREAMS,
        StakingError::TooManyRewardStreams
    );

    pool.accrue(now)?;
    pool.reward_streams.push(stream);

    Ok((pool.reward_streams.len() - 1) as u8)
}

/// Replaces a stream's rate and returns the old one. Elapsed time up to
/// `now` accrues at the old rate.
pub fn set_reward_rate(pool: &mut StakePool, stream_index: u8, rate: u64, now: u64) -> Result<u64> {
    require!(rate <= MAX_REWARD_RATE, StakingError::RateTooHigh);
    pool.stream(stream_index)?;

    pool.accrue(now)?;

    let stream = pool.stream_mut(stream_index)?;
    let old_rate = stream.rate;
    stream.rate = rate;

    Ok(old_rate)
}

fn take_payout(pool: &mut StakePool, position: &mut UserPosition) -> Result<Vec<u64>> {
    let amounts = position.take_claimable()?;
    pool.record_payout(&amounts)?;
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use proptest::prelude::*;

    fn pool_with_rates(rates: &[u64]) -> StakePool {
        StakePool {
            reward_streams: rates
                .iter()
                .map(|rate| RewardStream::new(Pubkey::new_unique(), Pubkey::new_unique(), *rate))
                .collect(),
            ..Default::default()
        }
    }

    fn new_position() -> UserPosition {
        UserPosition {
            owner: Pubkey::new_unique(),
            ..Default::default()
        }
    }

    fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: StakingError) {
        assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(expected));
    }

    #[test]
    fn test_sole_depositor_claims_full_emission() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();

        deposit(&mut pool, &mut alice, 100, 0).unwrap();
        assert_eq!(pool.total_staked, 100);
        assert_eq!(pool.staker_count, 1);

        let paid = claim(&mut pool, &mut alice, 10).unwrap();

        assert_eq!(pool.reward_streams[0].accumulator, SCALE);
        assert_eq!(paid, vec![100]);
        assert_eq!(pool.reward_streams[0].total_claimed, 100);
        assert_eq!(alice.checkpoints[0].total_claimed, 100);
    }

    #[test]
    fn test_two_users_split_pro_rata() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        let mut bob = new_position();

        deposit(&mut pool, &mut alice, 100, 0).unwrap();
        deposit(&mut pool, &mut bob, 100, 10).unwrap();

        let alice_paid = claim(&mut pool, &mut alice, 20).unwrap();
        let bob_paid = claim(&mut pool, &mut bob, 20).unwrap();

        assert_eq!(alice_paid, vec![150]);
        assert_eq!(bob_paid, vec![50]);
        assert_eq!(alice_paid[0] + bob_paid[0], 10 * 20);
    }

    #[test]
    fn test_reward_independent_of_other_users_churn() {
        let mut pool = pool_with_rates(&[8]);
        let mut alice = new_position();
        let mut bob = new_position();

        deposit(&mut pool, &mut alice, 100, 0).unwrap();
        deposit(&mut pool, &mut bob, 300, 10).unwrap();
        withdraw(&mut pool, &mut bob, 300, 20).unwrap();
        deposit(&mut pool, &mut bob, 100, 30).unwrap();

        // [0,10) 80 + [10,20) 20 + [20,30) 80 + [30,40) 40
        assert_eq!(claim(&mut pool, &mut alice, 40).unwrap(), vec![220]);
        // [10,20) 60 + [30,40) 40
        assert_eq!(claim(&mut pool, &mut bob, 40).unwrap(), vec![100]);
    }

    #[test]
    fn test_double_claim_same_tick() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_eq!(claim(&mut pool, &mut alice, 10).unwrap(), vec![100]);
        assert_error(claim(&mut pool, &mut alice, 10), StakingError::NoRewards);
    }

    #[test]
    fn test_claim_without_position_rewards() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        assert_error(claim(&mut pool, &mut alice, 5), StakingError::NoRewards);
    }

    #[test]
    fn test_multiple_streams_pay_together() {
        let mut pool = pool_with_rates(&[10, 1]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_eq!(claim(&mut pool, &mut alice, 10).unwrap(), vec![100, 10]);
    }

    #[test]
    fn test_stream_added_later_accrues_from_creation() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        let stream = RewardStream::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);
        assert_eq!(add_reward_stream(&mut pool, stream, 10).unwrap(), 1);

        assert_eq!(claim(&mut pool, &mut alice, 20).unwrap(), vec![200, 50]);
    }

    #[test]
    fn test_add_reward_stream_limits() {
        let mut pool = pool_with_rates(&[1, 1, 1]);

        let too_fast =
            RewardStream::new(Pubkey::new_unique(), Pubkey::new_unique(), MAX_REWARD_RATE + 1);
        assert_error(add_reward_stream(&mut pool, too_fast, 0), StakingError::RateTooHigh);

        let fourth = RewardStream::new(Pubkey::new_unique(), Pubkey::new_unique(), 1);
        assert_eq!(add_reward_stream(&mut pool, fourth, 0).unwrap(), 3);

        let fifth = RewardStream::new(Pubkey::new_unique(), Pubkey::new_unique(), 1);
        assert_error(
            add_reward_stream(&mut pool, fifth, 0),
            StakingError::TooManyRewardStreams,
        );
        assert_eq!(pool.reward_streams.len(), MAX_REWARD_STREAMS);
    }

    #[test]
    fn test_rate_change_accrues_old_rate_first() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_eq!(set_reward_rate(&mut pool, 0, 2, 10).unwrap(), 10);
        assert_eq!(pool.last_accrual, 10);

        // [0,10) at 10 + [10,20) at 2
        assert_eq!(claim(&mut pool, &mut alice, 20).unwrap(), vec![120]);
    }

    #[test]
    fn test_rate_change_validation() {
        let mut pool = pool_with_rates(&[10]);

        assert_error(
            set_reward_rate(&mut pool, 0, MAX_REWARD_RATE + 1, 0),
            StakingError::RateTooHigh,
        );
        assert_error(
            set_reward_rate(&mut pool, 1, 5, 0),
            StakingError::InvalidStreamIndex,
        );
        assert_eq!(pool.reward_streams[0].rate, 10);

        assert_eq!(set_reward_rate(&mut pool, 0, 0, 0).unwrap(), 10);
        assert_eq!(pool.reward_streams[0].rate, 0);
    }

    #[test]
    fn test_deposit_validation() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();

        assert_error(deposit(&mut pool, &mut alice, 0, 0), StakingError::ZeroAmount);

        pool.active = false;
        assert_error(deposit(&mut pool, &mut alice, 5, 0), StakingError::PoolInactive);
        assert_eq!(pool.total_staked, 0);
        assert_eq!(alice.staked_amount, 0);
    }

    #[test]
    fn test_deactivation_only_blocks_deposits() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        pool.active = false;

        assert_error(deposit(&mut pool, &mut alice, 1, 5), StakingError::PoolInactive);
        withdraw(&mut pool, &mut alice, 40, 5).unwrap();
        assert_eq!(claim(&mut pool, &mut alice, 5).unwrap(), vec![50]);
        assert_eq!(pool.total_staked, 60);
    }

    #[test]
    fn test_withdraw_validation() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_error(withdraw(&mut pool, &mut alice, 0, 1), StakingError::ZeroAmount);
        assert_error(
            withdraw(&mut pool, &mut alice, 101, 1),
            StakingError::InsufficientStake,
        );
        assert_eq!(alice.staked_amount, 100);
    }

    #[test]
    fn test_lock_period_boundary() {
        let mut pool = pool_with_rates(&[1]);
        pool.lock_period = 50;
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 10, 100).unwrap();

        assert_error(
            withdraw(&mut pool, &mut alice, 10, 149),
            StakingError::LockPeriodActive,
        );
        withdraw(&mut pool, &mut alice, 5, 150).unwrap();

        // A new deposit restarts the lock
        deposit(&mut pool, &mut alice, 5, 160).unwrap();
        assert_error(
            withdraw(&mut pool, &mut alice, 1, 200),
            StakingError::LockPeriodActive,
        );
        withdraw(&mut pool, &mut alice, 10, 210).unwrap();
        assert_eq!(pool.staker_count, 0);
    }

    #[test]
    fn test_withdraw_credit_policy_keeps_rewards() {
        let mut pool = pool_with_rates(&[10]);
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_eq!(withdraw(&mut pool, &mut alice, 100, 10).unwrap(), vec![0]);
        assert_eq!(alice.claimable(), vec![100]);
        assert_eq!(pool.staker_count, 0);

        // Nothing staked: no further growth, but the credit survives
        assert_eq!(claim(&mut pool, &mut alice, 30).unwrap(), vec![100]);
    }

    #[test]
    fn test_withdraw_pay_out_policy() {
        let mut pool = pool_with_rates(&[10, 2]);
        pool.withdraw_policy = withdraw_policy::PAY_OUT;
        let mut alice = new_position();
        deposit(&mut pool, &mut alice, 100, 0).unwrap();

        assert_eq!(withdraw(&mut pool, &mut alice, 50, 10).unwrap(), vec![100, 20]);
        assert_eq!(alice.claimable(), vec![0, 0]);
        assert_eq!(pool.reward_streams[1].total_claimed, 20);

        // Remaining stake keeps the whole emission
        assert_eq!(withdraw(&mut pool, &mut alice, 50, 20).unwrap(), vec![100, 20]);
    }

    #[test]
    fn test_overflow_aborts_operation() {
        let mut pool = pool_with_rates(&[MAX_REWARD_RATE]);
        pool.reward_streams[0].accumulator = u128::MAX / 2;
        let mut whale = new_position();

        assert_error(
            deposit(&mut pool, &mut whale, u64::MAX, 0),
            StakingError::MathOverflow,
        );
    }

    #[test]
    fn test_large_deposit_after_dust_staker() {
        let mut pool = pool_with_rates(&[1_000_000_000]);
        let mut dust = new_position();
        let mut whale = new_position();

        deposit(&mut pool, &mut dust, 1, 0).unwrap();
        deposit(&mut pool, &mut whale, 10_000_000_000_000, 86_400).unwrap();
        assert_eq!(pool.total_staked, 10_000_000_000_001);

        assert_eq!(
            claim(&mut pool, &mut dust, 86_400).unwrap(),
            vec![86_400 * 1_000_000_000]
        );

        let paid = claim(&mut pool, &mut whale, 86_410).unwrap();
        assert!(paid[0] > 0 && paid[0] <= 10 * 1_000_000_000);
    }

    #[test]
    fn test_staking_total_overflow_rejected_before_settlement() {
        let mut pool = pool_with_rates(&[1]);
        let mut alice = new_position();
        let mut bob = new_position();
        deposit(&mut pool, &mut alice, u64::MAX, 0).unwrap();

        assert_error(deposit(&mut pool, &mut bob, 1, 5), StakingError::MathOverflow);
        assert_eq!(pool.last_accrual, 0);
        assert!(bob.checkpoints.is_empty());
    }

    proptest! {
        #[test]
        fn test_conservation_and_solvency_over_random_sequence(
            ops in proptest::collection::vec(
                (0u8..3, 0usize..2, 0usize..4, 0u64..1_000, 0u64..5),
                0..400,
            ),
        ) {
            let mut pools = vec![pool_with_rates(&[7, 3]), pool_with_rates(&[1_000])];
            let mut positions: Vec<Vec<UserPosition>> = pools
                .iter()
                .map(|_| (0..4).map(|_| new_position()).collect())
                .collect();
            let mut paid = vec![vec![0u64; 2], vec![0u64; 1]];
            let mut now = 0u64;

            for (op, p, u, amount, dt) in ops {
                now += dt;
                let pool = &mut pools[p];
                let position = &mut positions[p][u];

                let payout = match op {
                    0 => deposit(pool, position, amount, now).map(|_| Vec::new()),
                    1 => withdraw(pool, position, amount, now),
                    _ => claim(pool, position, now),
                };
                if let Ok(amounts) = payout {
                    for (total, amount) in paid[p].iter_mut().zip(amounts) {
                        *total += amount;
                    }
                }

                for (pool, users) in pools.iter().zip(&positions) {
                    let staked: u64 = users.iter().map(|u| u.staked_amount).sum();
                    prop_assert_eq!(staked, pool.total_staked);
                    let stakers = users.iter().filter(|u| u.staked_amount > 0).count() as u64;
                    prop_assert_eq!(stakers, pool.staker_count);
                }
            }

            // Everything attributed stays within what the streams emitted
            for (p, pool) in pools.iter_mut().enumerate() {
                for position in positions[p].iter_mut() {
                    settle(pool, position, now).unwrap();
                }
                for (s, stream) in pool.reward_streams.iter().enumerate() {
                    let owed: u64 = positions[p]
                        .iter()
                        .map(|u| u.checkpoints.get(s).map_or(0, |c| c.claimable))
                        .sum();
                    prop_assert!(paid[p][s] + owed <= stream.rate * now);
                    prop_assert_eq!(paid[p][s], stream.total_claimed);
                }
            }
        }
    }
}
