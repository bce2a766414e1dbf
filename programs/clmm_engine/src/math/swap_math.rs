//! Computation of a single swap step within one range of constant liquidity.

use crate::constants::MAX_LP_FEE;
use crate::errors::ErrorCode;
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Outcome of a single swap step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// The sqrt price after the step, never beyond the step target
    pub sqrt_price_next_x96: U256,
    /// Input token consumed by the price move, excluding the fee
    pub amount_in: U256,
    /// Output token released by the price move
    pub amount_out: U256,
    /// Input token taken as LP fee
    pub fee_amount: U256,
}

/// Computes the result of swapping some amount in or out within one liquidity range
///
/// The direction is implied by the prices: a target at or below the current price is a
/// token0 → token1 swap. For exact input the fee is taken from the remaining amount
/// before the price move; for exact output it is charged on top of the computed input.
/// Either way the fee is rounded up.
///
/// # Arguments
/// * `sqrt_price_current_x96` - The current sqrt price
/// * `sqrt_price_target_x96` - The price that cannot be exceeded in this step
/// * `liquidity` - The active liquidity
/// * `amount_remaining` - How much input (exact input) or output (exact output) is left
/// * `exact_input` - Whether `amount_remaining` is an input amount
/// * `fee_pips` - The LP fee in hundredths of a basis point
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
    exact_input: bool,
    fee_pips: u32,
) -> Result<SwapStep> {
    require!(fee_pips <= MAX_LP_FEE, ErrorCode::InvalidFee);

    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let max_fee = U256::from(MAX_LP_FEE);
    let fee = U256::from(fee_pips);

    let sqrt_price_next_x96;
    let mut amount_in;
    let mut amount_out;
    let fee_amount;

    if exact_input {
        let amount_remaining_less_fee = mul_div(amount_remaining, max_fee - fee, max_fee)?;
        amount_in = if zero_for_one {
            get_amount_0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
        } else {
            get_amount_1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
        };

        if amount_remaining_less_fee >= amount_in {
            // The whole way to the target
            sqrt_price_next_x96 = sqrt_price_target_x96;
            fee_amount = if fee_pips == MAX_LP_FEE {
                amount_in
            } else {
                mul_div_rounding_up(amount_in, fee, max_fee - fee)?
            };
        } else {
            // Exhausted before the target: whatever is not input is fee
            amount_in = amount_remaining_less_fee;
            sqrt_price_next_x96 = get_next_sqrt_price_from_input(
                sqrt_price_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?;
            fee_amount = amount_remaining - amount_in;
        }

        amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?
        } else {
            get_amount_0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?
        };
    } else {
        require!(fee_pips < MAX_LP_FEE, ErrorCode::InvalidFeeForExactOutput);

        amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, false)?
        } else {
            get_amount_0_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, false)?
        };

        if amount_remaining >= amount_out {
            sqrt_price_next_x96 = sqrt_price_target_x96;
        } else {
            amount_out = amount_remaining;
            sqrt_price_next_x96 = get_next_sqrt_price_from_output(
                sqrt_price_current_x96,
                liquidity,
                amount_remaining,
                zero_for_one,
            )?;
        }

        amount_in = if zero_for_one {
            get_amount_0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?
        } else {
            get_amount_1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?
        };
        fee_amount = mul_div_rounding_up(amount_in, fee, max_fee - fee)?;
    }

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
