/// Pool Engine Protocol Constants
///
/// This module defines the fixed parameters and boundaries that govern every pool
/// handled by the engine: the tick domain, the matching sqrt price domain, the
/// fixed-point scaling factors, and the fee configuration limits.
use primitive_types::U256;

/// The minimum tick index supported in the protocol
///
/// Defines the lowest possible price representation in the system.
/// Calculated as log_1.0001(2^-128), the smallest price whose square root
/// still fits the Q64.96 representation.
pub const MIN_TICK: i32 = -887272;

/// The maximum tick index supported in the protocol
///
/// Defines the highest possible price representation in the system.
/// Calculated as log_1.0001(2^128).
pub const MAX_TICK: i32 = 887272;

/// The minimum square root price, equal to `get_sqrt_price_at_tick(MIN_TICK)`
///
/// Represented in Q64.96 fixed point (sqrt(P) * 2^96). A pool price may sit at
/// this value but never below it.
pub const MIN_SQRT_PRICE: U256 = U256([4295128739, 0, 0, 0]);

/// The maximum square root price, equal to `get_sqrt_price_at_tick(MAX_TICK)`
///
/// 1461446703485210103287273052203988822378723970342 in Q64.96. Prices are
/// always strictly below this value.
pub const MAX_SQRT_PRICE: U256 = U256([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963, 0]);

/// Largest value representable in 160 bits, the width of a sqrt price
pub const MAX_U160: U256 = U256([u64::MAX, u64::MAX, 0xffff_ffff, 0]);

/// Resolution of Q64.96 values
pub const RESOLUTION: u32 = 96;

/// 2^96, the scaling factor of sqrt prices
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// 2^128, the scaling factor of fee growth accumulators (Q128.128)
pub const Q128: U256 = U256([0, 0, 1, 0]);

/// Fee denominator: fees are expressed in pips (hundredths of a basis point)
///
/// A fee of 3000 therefore means 3000 / 1_000_000 = 0.3%.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// The maximum LP fee: 100% of the input amount
pub const MAX_LP_FEE: u32 = 1_000_000;

/// Sentinel fee value marking a pool whose LP fee is set at runtime
///
/// Pools created with this fee start at an LP fee of zero and are updated
/// through `update_dynamic_lp_fee`.
pub const DYNAMIC_FEE_FLAG: u32 = 0x80_0000;

/// Protocol fee denominator
///
/// The protocol fee is a share of the LP fee taken on every swap step.
/// For example, if protocol fee is set to 1667, the protocol receives
/// 1667/10000 (≈16.67%) of all collected fees.
pub const PROTOCOL_FEE_DENOMINATOR: u16 = 10000;

/// The maximum protocol fee share (25% of the LP fee)
pub const MAX_PROTOCOL_FEE: u16 = 2500;

/// The smallest tick spacing a pool may use
pub const MIN_TICK_SPACING: i32 = 1;

/// The largest tick spacing a pool may use
pub const MAX_TICK_SPACING: i32 = 16384;

/// Standard fee tiers available (in pips)
///
/// Lowest fee tier (0.01%)
/// Optimized for stable pairs with minimal price impact.
pub const FEE_TIER_LOWEST: u32 = 100;

/// Low fee tier (0.05%)
/// Correlated pairs and mainstream tokens.
pub const FEE_TIER_LOW: u32 = 500;

/// Medium fee tier (0.3%)
/// Balanced for most pairs with moderate volatility.
pub const FEE_TIER_MEDIUM: u32 = 3000;

/// High fee tier (1%)
/// Designed for exotic pairs or high volatility tokens.
pub const FEE_TIER_HIGH: u32 = 10000;

/// Tick spacing per fee tier
///
/// Tick spacing for the lowest fee tier (0.01%)
/// Each tick represents a 0.01% price change, using single-tick granularity.
pub const TICK_SPACING_LOWEST: i32 = 1;

/// Tick spacing for the low fee tier (0.05%)
/// Price changes of 0.1% (10 * 0.01%).
pub const TICK_SPACING_LOW: i32 = 10;

/// Tick spacing for the medium fee tier (0.3%)
/// Price changes of 0.6% (60 * 0.01%) using coarser granularity.
pub const TICK_SPACING_MEDIUM: i32 = 60;

/// Tick spacing for the high fee tier (1%)
/// Price changes of 2% (200 * 0.01%).
pub const TICK_SPACING_HIGH: i32 = 200;

/// Returns the conventional tick spacing for one of the standard fee tiers
pub fn standard_tick_spacing(fee: u32) -> Option<i32> {
    match fee {
        FEE_TIER_LOWEST => Some(TICK_SPACING_LOWEST),
        FEE_TIER_LOW => Some(TICK_SPACING_LOW),
        FEE_TIER_MEDIUM => Some(TICK_SPACING_MEDIUM),
        FEE_TIER_HIGH => Some(TICK_SPACING_HIGH),
        _ => None,
    }
}
