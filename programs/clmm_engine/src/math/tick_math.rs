//! Tick ⇄ sqrt price conversion.
//!
//! A tick `t` corresponds to the price `1.0001^t`, and its sqrt price is stored as
//! `sqrt(1.0001^t) * 2^96`. The forward conversion multiplies together precomputed
//! Q128.128 factors for every set bit of `|t|`; the inverse searches the tick domain
//! with that same forward function, so the two directions can never disagree.

use crate::constants::{MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, Q128};
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// `1 / sqrt(1.0001)^(2^i)` in Q128.128 for `i` in `0..20`
///
/// 20 bits cover every |tick| up to 2^20 - 1 > MAX_TICK.
const TICK_RATIOS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001, // bit 0
    0xfff97272373d413259a46990580e213a, // bit 1
    0xfff2e50f5f656932ef12357cf3c7fdcc, // bit 2
    0xffe5caca7e10e4e61c3624eaa0941cd0, // bit 3
    0xffcb9843d60f6159c9db58835c926644, // bit 4
    0xff973b41fa98c081472e6896dfb254c0, // bit 5
    0xff2ea16466c96a3843ec78b326b52861, // bit 6
    0xfe5dee046a99a2a811c461f1969c3053, // bit 7
    0xfcbe86c7900a88aedcffc83b479aa3a4, // bit 8
    0xf987a7253ac413176f2b074cf7815e54, // bit 9
    0xf3392b0822b70005940c7a398e4b70f3, // bit 10
    0xe7159475a2c29b7443b29c7fa6e889d9, // bit 11
    0xd097f3bdfd2022b8845ad8f792aa5825, // bit 12
    0xa9f746462d870fdf8a65dc1f90e061e5, // bit 13
    0x70d869a156d2a1b890bb3df62baf32f7, // bit 14
    0x31be135f97d08fd981231505542fcfa6, // bit 15
    0x09aa508b5b7a84e1c677de54f3e99bc9, // bit 16
    0x005d6af8dedb81196699c329225ee604, // bit 17
    0x00002216e584f5fa1ea926041bedfe98, // bit 18
    0x00000000048a170391f7dc42444e8fa2, // bit 19
];

/// Calculates sqrt(1.0001^tick) * 2^96
///
/// # Arguments
/// * `tick` - The tick index, within [MIN_TICK, MAX_TICK]
///
/// # Returns
/// * `Result<U256>` - The Q64.96 sqrt price (at most 160 bits), rounded up so that
///   `get_tick_at_sqrt_price` of the result is exactly `tick`
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<U256> {
    require!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        ErrorCode::InvalidTickRange
    );

    let abs_tick = tick.unsigned_abs();

    // Binary exponentiation over the precomputed negative powers
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(TICK_RATIOS[0])
    } else {
        Q128
    };
    for (bit, factor) in TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128;
        }
    }

    // Positive ticks use the reciprocal of the negative-power product
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let remainder = ratio & U256::from(u32::MAX);
    let sqrt_price = ratio >> 32;
    if remainder.is_zero() {
        Ok(sqrt_price)
    } else {
        Ok(sqrt_price + U256::one())
    }
}

/// Calculates the greatest tick whose sqrt price is less than or equal to `sqrt_price_x96`
///
/// # Arguments
/// * `sqrt_price_x96` - A Q64.96 sqrt price within [MIN_SQRT_PRICE, MAX_SQRT_PRICE)
///
/// # Returns
/// * `Result<i32>` - The tick `t` with `get_sqrt_price_at_tick(t) <= sqrt_price_x96 <
///   get_sqrt_price_at_tick(t + 1)`
pub fn get_tick_at_sqrt_price(sqrt_price_x96: U256) -> Result<i32> {
    require!(
        sqrt_price_x96 >= MIN_SQRT_PRICE && sqrt_price_x96 < MAX_SQRT_PRICE,
        ErrorCode::PriceOutOfBounds
    );

    // Invariant: sqrt_price_at(low) <= sqrt_price_x96, and every tick above `high`
    // maps to a larger sqrt price.
    let mut low = MIN_TICK;
    let mut high = MAX_TICK - 1;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_price_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// The lowest tick usable by a pool with the given spacing
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// The highest tick usable by a pool with the given spacing
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}
