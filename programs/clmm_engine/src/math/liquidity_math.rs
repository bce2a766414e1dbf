//! Liquidity arithmetic: signed deltas and liquidity for token budgets.

use crate::constants::Q96;
use crate::errors::ErrorCode;
use crate::math::full_math::mul_div;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Adds a signed liquidity delta to an unsigned liquidity value
///
/// # Arguments
/// * `liquidity` - The liquidity before the change
/// * `delta` - The signed change
///
/// # Returns
/// * `Result<u128>` - The new liquidity, `InsufficientLiquidity` if it would be
///   negative, or `Overflow` if it would exceed u128
#[inline(always)]
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| error!(ErrorCode::InsufficientLiquidity))
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or_else(|| error!(ErrorCode::Overflow))
    }
}

fn to_u128(value: U256) -> Result<u128> {
    require!(value <= U256::from(u128::MAX), ErrorCode::Overflow);
    Ok(value.low_u128())
}

/// Liquidity received for `amount0` of token0 between two sqrt prices
pub fn get_liquidity_for_amount_0(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount0: U256,
) -> Result<u128> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    require!(sqrt_lower < sqrt_upper, ErrorCode::InvalidTickRange);
    let intermediate = mul_div(sqrt_lower, sqrt_upper, Q96)?;
    to_u128(mul_div(amount0, intermediate, sqrt_upper - sqrt_lower)?)
}

/// Liquidity received for `amount1` of token1 between two sqrt prices
pub fn get_liquidity_for_amount_1(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount1: U256,
) -> Result<u128> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    require!(sqrt_lower < sqrt_upper, ErrorCode::InvalidTickRange);
    to_u128(mul_div(amount1, Q96, sqrt_upper - sqrt_lower)?)
}

/// Computes the maximum liquidity that can be minted for a range given token budgets
///
/// # Arguments
/// * `sqrt_price_x96` - The current pool sqrt price
/// * `sqrt_price_a_x96` - One range boundary
/// * `sqrt_price_b_x96` - The other range boundary
/// * `amount0` - Token0 budget
/// * `amount1` - Token1 budget
///
/// # Returns
/// * `Result<u128>` - Liquidity limited by whichever budget binds first at the current price
pub fn get_liquidity_for_amounts(
    sqrt_price_x96: U256,
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_price_x96 <= sqrt_lower {
        get_liquidity_for_amount_0(sqrt_lower, sqrt_upper, amount0)
    } else if sqrt_price_x96 < sqrt_upper {
        let liquidity0 = get_liquidity_for_amount_0(sqrt_price_x96, sqrt_upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount_1(sqrt_lower, sqrt_price_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount_1(sqrt_lower, sqrt_upper, amount1)
    }
}

#[inline(always)]
fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
