//! Error types for the Pooled Staking program.
//!
//! Every error aborts the whole instruction; the runtime discards all
//! account writes made before it was raised.
//!
//! ## Error Code Ranges
//! - 6000-6009: Input validation errors
//! - 6010-6019: Pool/position state errors
//! - 6020-6029: Time/lock errors
//! - 6030-6039: Math/overflow errors
//! - 6040-6049: Authorization errors
//! - 6050-6059: Account validation and transfer errors

use anchor_lang::prelude::*;

/// Custom error codes for the Pooled Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors (6000-6009) ==========

    /// [6000] Deposit, withdraw or funding amount is zero.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6001] Reward rate exceeds `MAX_REWARD_RATE`.
    #[msg("Reward rate exceeds the maximum allowed rate")]
    RateTooHigh,

    /// [6002] Lock period exceeds `MAX_LOCK_PERIOD`.
    #[msg("Lock period exceeds the maximum allowed period")]
    LockPeriodTooLong,

    /// [6003] Unknown clock kind.
    #[msg("Invalid clock kind (must be 0=UnixTimestamp, 1=Slot)")]
    InvalidClockKind,

    /// [6004] Unknown withdraw policy.
    #[msg("Invalid withdraw policy (must be 0=Credit, 1=PayOut)")]
    InvalidWithdrawPolicy,

    /// [6005] Stream index does not name a reward stream of this pool.
    #[msg("Reward stream index out of range")]
    InvalidStreamIndex,

    // ========== Pool/Position State Errors (6010-6019) ==========

    /// [6010] Pool does not belong to the registry.
    #[msg("Stake pool not found")]
    PoolNotFound,

    /// [6011] Pool is deactivated; new deposits are rejected.
    #[msg("Stake pool is inactive - deposits are disabled")]
    PoolInactive,

    /// [6012] Withdrawal exceeds the staked balance.
    #[msg("Insufficient staked balance for this operation")]
    InsufficientStake,

    /// [6013] Nothing has been settled for the caller.
    #[msg("No rewards available to claim")]
    NoRewards,

    /// [6014] A reward vault holds less than the payout.
    #[msg("Insufficient reward vault funds for payout")]
    InsufficientRewardFunds,

    /// [6015] Pool already carries `MAX_REWARD_STREAMS` streams.
    #[msg("Maximum number of reward streams reached")]
    TooManyRewardStreams,

    // ========== Time/Lock Errors (6020-6029) ==========

    /// [6020] The lock period since the last deposit has not elapsed.
    #[msg("Lock period has not ended - cannot withdraw yet")]
    LockPeriodActive,

    /// [6021] The runtime clock reported a negative timestamp.
    #[msg("Invalid timestamp detected")]
    InvalidTimestamp,

    // ========== Math/Overflow Errors (6030-6039) ==========

    /// [6030] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6031] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    /// [6032] Division by zero attempted.
    #[msg("Division by zero attempted")]
    DivisionByZero,

    /// [6033] Integer conversion failed (value out of range).
    #[msg("Integer conversion failed - value out of range")]
    ConversionOverflow,

    // ========== Authorization Errors (6040-6049) ==========

    /// [6040] Caller is not the registry authority.
    #[msg("Unauthorized: caller is not the registry authority")]
    Unauthorized,

    /// [6041] New authority is the default pubkey.
    #[msg("Invalid authority: must not be the default pubkey")]
    InvalidAuthority,

    /// [6042] Position belongs to another user.
    #[msg("Unauthorized: position belongs to another user")]
    InvalidPositionOwner,

    // ========== Account Validation / Transfer Errors (6050-6059) ==========

    /// [6050] Token account mint does not match the expected mint.
    #[msg("Token mint mismatch - wrong token for this pool or stream")]
    MintMismatch,

    /// [6051] Vault does not match the one stored in pool state.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6052] Remaining accounts are not (reward vault, user account) pairs in stream order.
    #[msg("Reward accounts must be (vault, destination) pairs for every stream")]
    RewardAccountsMismatch,

    /// [6053] Token account is not owned by the expected wallet.
    #[msg("Token account owner mismatch")]
    InvalidTokenAccountOwner,

    /// [6054] Position does not belong to this pool.
    #[msg("User position does not belong to this pool")]
    PositionPoolMismatch,

    /// [6055] The token program rejected a transfer.
    #[msg("Token transfer failed")]
    TransferFailed,
}
