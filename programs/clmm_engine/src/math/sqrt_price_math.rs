//! Price movement and token amount math for a single liquidity range.
//!
//! Within a range of constant liquidity `L`:
//! - token0 amount between two sqrt prices is `L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)`
//! - token1 amount between two sqrt prices is `L * (sqrt_b - sqrt_a)`
//!
//! Rounding is always explicit. Amounts owed to the pool round up and amounts paid by
//! the pool round down; price moves round in whichever direction keeps the pool solvent.

use crate::constants::{MAX_U160, Q96, RESOLUTION};
use crate::errors::ErrorCode;
use crate::math::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Calculates the next sqrt price after adding or removing `amount` of token0
///
/// Always rounds up: when adding token0 the price moves down less than exact, and
/// when removing token0 it moves up more than exact.
///
/// # Arguments
/// * `sqrt_price_x96` - The starting sqrt price
/// * `liquidity` - The active liquidity
/// * `amount` - How much token0 is added or removed
/// * `add` - Whether the amount is added to (true) or removed from (false) the pool
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator1 = U256::from(liquidity) << RESOLUTION;

    if add {
        // Exact formula first: L * sqrtP / (L + amount * sqrtP)
        if let Some(product) = amount.checked_mul(sqrt_price_x96) {
            if let Some(denominator) = numerator1.checked_add(product) {
                return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
            }
        }
        // Fallback that cannot overflow: L / (L / sqrtP + amount)
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::Overflow))?;
        div_rounding_up(numerator1, denominator)
    } else {
        let product = amount
            .checked_mul(sqrt_price_x96)
            .ok_or_else(|| error!(ErrorCode::Overflow))?;
        require!(numerator1 > product, ErrorCode::InsufficientLiquidity);
        let next = mul_div_rounding_up(numerator1, sqrt_price_x96, numerator1 - product)?;
        require!(next <= MAX_U160, ErrorCode::Overflow);
        Ok(next)
    }
}

/// Calculates the next sqrt price after adding or removing `amount` of token1
///
/// Always rounds down: when adding token1 the price moves up less than exact, and
/// when removing token1 it moves down more than exact.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);
    let liquidity = U256::from(liquidity);
    if add {
        let quotient = if amount <= MAX_U160 {
            (amount << RESOLUTION) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or_else(|| error!(ErrorCode::Overflow))?;
        require!(next <= MAX_U160, ErrorCode::Overflow);
        Ok(next)
    } else {
        let quotient = if amount <= MAX_U160 {
            div_rounding_up(amount << RESOLUTION, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };
        require!(sqrt_price_x96 > quotient, ErrorCode::InsufficientLiquidity);
        Ok(sqrt_price_x96 - quotient)
    }
}

/// Calculates the next sqrt price given an input amount of token0 or token1
///
/// # Arguments
/// * `sqrt_price_x96` - The starting sqrt price
/// * `liquidity` - The active liquidity, must be non-zero
/// * `amount_in` - How much of the input token is swapped in
/// * `zero_for_one` - Whether the input is token0 (price moves down)
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    require!(!sqrt_price_x96.is_zero(), ErrorCode::PriceOutOfBounds);
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Calculates the next sqrt price given an output amount of token0 or token1
///
/// # Arguments
/// * `sqrt_price_x96` - The starting sqrt price
/// * `liquidity` - The active liquidity, must be non-zero
/// * `amount_out` - How much of the output token is swapped out
/// * `zero_for_one` - Whether the output is token1 (price moves down)
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256> {
    require!(!sqrt_price_x96.is_zero(), ErrorCode::PriceOutOfBounds);
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Calculates the amount of token0 between two sqrt prices for a given liquidity
///
/// `L * 2^96 * (sqrt_b - sqrt_a) / sqrt_b / sqrt_a`
///
/// # Arguments
/// * `sqrt_price_a_x96` - One boundary sqrt price
/// * `sqrt_price_b_x96` - The other boundary sqrt price
/// * `liquidity` - The liquidity active between the two prices
/// * `round_up` - Whether to round the amount up or down
pub fn get_amount_0_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_lower, sqrt_upper) = if sqrt_price_a_x96 > sqrt_price_b_x96 {
        (sqrt_price_b_x96, sqrt_price_a_x96)
    } else {
        (sqrt_price_a_x96, sqrt_price_b_x96)
    };
    require!(!sqrt_lower.is_zero(), ErrorCode::PriceOutOfBounds);

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_upper - sqrt_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_upper)?,
            sqrt_lower,
        )
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_upper)? / sqrt_lower)
    }
}

/// Calculates the amount of token1 between two sqrt prices for a given liquidity
///
/// `L * (sqrt_b - sqrt_a) / 2^96`
pub fn get_amount_1_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_lower, sqrt_upper) = if sqrt_price_a_x96 > sqrt_price_b_x96 {
        (sqrt_price_b_x96, sqrt_price_a_x96)
    } else {
        (sqrt_price_a_x96, sqrt_price_b_x96)
    };

    if round_up {
        mul_div_rounding_up(U256::from(liquidity), sqrt_upper - sqrt_lower, Q96)
    } else {
        mul_div(U256::from(liquidity), sqrt_upper - sqrt_lower, Q96)
    }
}
