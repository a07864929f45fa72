//! Fixed-point reward math.
//!
//! All reward-per-stake values are scaled by [`SCALE`]. Divisions truncate
//! toward zero so attributed rewards can never exceed what a stream emitted.

use anchor_lang::prelude::*;

use crate::constants::SCALE;
use crate::error::StakingError;

/// Growth of a stream's accumulator over `elapsed` ticks.
///
/// `elapsed * rate * SCALE / total_staked`, truncated.
pub fn accumulator_delta(elapsed: u64, rate: u64, total_staked: u64) -> Result<u128> {
    require!(total_staked > 0, StakingError::DivisionByZero);

    let delta = (elapsed as u128)
        .checked_mul(rate as u128)
        .ok_or(StakingError::MathOverflow)?
        .checked_mul(SCALE)
        .ok_or(StakingError::MathOverflow)?
        .checked_div(total_staked as u128)
        .ok_or(StakingError::DivisionByZero)?;

    Ok(delta)
}

/// Reward value of `amount` stake at the given accumulator, in reward base units.
///
/// `floor(amount * accumulator / SCALE)`, computed on the whole and
/// fractional parts of the accumulator separately so that only a result
/// wider than `u128` overflows.
pub fn accrued_value(amount: u64, accumulator: u128) -> Result<u128> {
    let amount = amount as u128;
    let whole = amount
        .checked_mul(accumulator / SCALE)
        .ok_or(StakingError::MathOverflow)?;
    // amount * (accumulator % SCALE) < 2^64 * 10^12
    let fraction = amount
        .checked_mul(accumulator % SCALE)
        .ok_or(StakingError::MathOverflow)?
        / SCALE;

    let value = whole
        .checked_add(fraction)
        .ok_or(StakingError::MathOverflow)?;

    Ok(value)
}

/// Safe conversion back to u64
pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(StakingError::ConversionOverflow))
}

/// Checked sum of per-stream amounts.
pub fn total_amount(amounts: &[u64]) -> Result<u64> {
    amounts.iter().try_fold(0u64, |acc, amount| {
        acc.checked_add(*amount)
            .ok_or_else(|| error!(StakingError::MathOverflow))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_sole_depositor() {
        // rate 10 over 10 ticks shared by 100 units: 1 reward unit per stake unit
        let delta = accumulator_delta(10, 10, 100).unwrap();
        assert_eq!(delta, SCALE);
        assert_eq!(accrued_value(100, delta).unwrap(), 100);
    }

    #[test]
    fn test_delta_truncates_down() {
        // 1 * 1 * SCALE / 3 loses the remainder
        let delta = accumulator_delta(1, 1, 3).unwrap();
        assert_eq!(delta, SCALE / 3);
        assert!(delta * 3 < SCALE);

        // three equal holders never receive more than the single emitted unit
        let each = accrued_value(1, delta).unwrap();
        assert!(each * 3 <= 1);
    }

    #[test]
    fn test_delta_zero_stake_rejected() {
        assert_eq!(
            accumulator_delta(10, 10, 0).unwrap_err(),
            anchor_lang::error::Error::from(StakingError::DivisionByZero)
        );
    }

    #[test]
    fn test_delta_overflow_detected() {
        assert_eq!(
            accumulator_delta(u64::MAX, u64::MAX, 1).unwrap_err(),
            anchor_lang::error::Error::from(StakingError::MathOverflow)
        );
    }

    #[test]
    fn test_accrued_value_overflow_detected() {
        assert_eq!(
            accrued_value(u64::MAX, u128::MAX / 2).unwrap_err(),
            anchor_lang::error::Error::from(StakingError::MathOverflow)
        );
    }

    #[test]
    fn test_accrued_value_matches_direct_product() {
        let cases = [
            (0u64, 123_456_789u128),
            (1, SCALE - 1),
            (3, SCALE / 3),
            (100, SCALE),
            (7_777, 5 * SCALE + 999_999_999_999),
            (u64::MAX, SCALE - 1),
        ];
        for (amount, accumulator) in cases {
            let direct = (amount as u128) * accumulator / SCALE;
            assert_eq!(accrued_value(amount, accumulator).unwrap(), direct);
        }
    }

    #[test]
    fn test_accrued_value_large_accumulator() {
        // A day of 10^9 per tick over a single staked unit
        let accumulator = accumulator_delta(86_400, 1_000_000_000, 1).unwrap();
        assert_eq!(accumulator, 86_400 * 1_000_000_000 * SCALE);

        // amount * accumulator alone would exceed u128::MAX
        let amount = 10_000_000_000_000u64;
        assert!((amount as u128).checked_mul(accumulator).is_none());
        assert_eq!(
            accrued_value(amount, accumulator).unwrap(),
            amount as u128 * 86_400 * 1_000_000_000
        );
    }

    #[test]
    fn test_max_rate_headroom() {
        // One full century of seconds at the maximum rate with a single unit
        // staked still fits the accumulator.
        let century = 100 * 365 * 86_400u64;
        let delta = accumulator_delta(century, crate::constants::MAX_REWARD_RATE, 1).unwrap();
        assert!(delta.checked_mul(1_000).is_some());
    }

    #[test]
    fn test_to_u64_bounds() {
        assert_eq!(to_u64(u64::MAX as u128).unwrap(), u64::MAX);
        assert_eq!(
            to_u64(u64::MAX as u128 + 1).unwrap_err(),
            anchor_lang::error::Error::from(StakingError::ConversionOverflow)
        );
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(total_amount(&[1, 2, 3]).unwrap(), 6);
        assert_eq!(total_amount(&[]).unwrap(), 0);
        assert_eq!(
            total_amount(&[u64::MAX, 1]).unwrap_err(),
            anchor_lang::error::Error::from(StakingError::MathOverflow)
        );
    }
}
