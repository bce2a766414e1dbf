/// Pool Engine Error Definitions
///
/// This module defines the error codes returned by every engine operation. All
/// failures are local and deterministic: the same state and inputs always produce
/// the same error, and a failed operation never leaves partially applied state.
///
/// These errors are mapped to unique codes by the Anchor framework so that a
/// transport layer can forward them to clients unchanged.
use anchor_lang::prelude::*;

/// Error codes for the concentrated liquidity engine
#[error_code]
pub enum ErrorCode {
    /// Returned when a tick range is out of bounds or improperly formatted
    ///
    /// This error occurs when:
    /// - Position boundaries are outside the MIN_TICK/MAX_TICK range
    /// - Lower tick is greater than or equal to upper tick
    /// - Ticks do not align with the pool's tick spacing
    #[msg("The provided tick range is invalid")]
    InvalidTickRange,

    /// Returned when `initialize` is called on a pool that already has a price
    #[msg("Pool is already initialized")]
    AlreadyInitialized,

    /// Returned when an operation targets a pool that has not been initialized
    #[msg("Pool is not initialized")]
    NotInitialized,

    /// Returned when an operation would drive pool, tick or position liquidity
    /// below zero, or when a price move requires more liquidity than is active
    #[msg("Insufficient liquidity")]
    InsufficientLiquidity,

    /// Returned when the swap price limit is on the wrong side of, or equal to,
    /// the current pool price
    #[msg("Price limit already reached")]
    PriceLimitAlreadyReached,

    /// Returned when a price is outside [MIN_SQRT_PRICE, MAX_SQRT_PRICE)
    #[msg("Price is outside the supported bounds")]
    PriceOutOfBounds,

    /// Returned when fixed-point arithmetic exceeds the representable range
    /// or divides by zero
    #[msg("Arithmetic overflow")]
    Overflow,

    /// Returned when a swap is requested for a zero amount
    #[msg("Swap amount must be non-zero")]
    ZeroAmountSpecified,

    /// Returned when a pool key uses a tick spacing outside the supported range
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing,

    /// Returned when an LP fee exceeds the maximum, or when a dynamic fee update
    /// targets a pool with a static fee
    #[msg("Invalid LP fee")]
    InvalidFee,

    /// Returned when a protocol fee share exceeds MAX_PROTOCOL_FEE
    #[msg("Invalid protocol fee")]
    InvalidProtocolFee,

    /// Returned when the pool key's currencies are equal or not sorted
    #[msg("Pool currencies must be distinct and sorted")]
    InvalidPoolKey,

    /// Returned when a tick's gross liquidity would exceed the per-tick maximum
    #[msg("Tick liquidity exceeds the maximum per tick")]
    TickLiquidityOverflow,

    /// Returned when a zero liquidity delta is applied to an empty position
    #[msg("Cannot update a position with no liquidity")]
    CannotUpdateEmptyPosition,

    /// Returned when an exact output swap is attempted on a pool charging a 100% fee
    #[msg("Exact output swaps are not possible with a 100% LP fee")]
    InvalidFeeForExactOutput,
}
