/// Swap Engine
///
/// Executes swaps by walking the price through initialized tick boundaries. Each
/// iteration swaps within one range of constant liquidity, takes the LP fee from
/// the input, distributes it between the protocol and the in-range liquidity, and
/// crosses the boundary tick when the step reaches it.
///
/// The walk itself is a pure function of the pool (`compute_swap`). Tick crossings
/// are recorded in a staging list and only written back by `Pool::swap` once the
/// whole walk has succeeded, so a failing swap never leaves a partial update.
use crate::constants::{
    MAX_LP_FEE, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, PROTOCOL_FEE_DENOMINATOR,
    Q128,
};
use crate::errors::ErrorCode;
use crate::math::full_math::mul_div;
use crate::math::liquidity_math::add_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::pool::Pool;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// The amount a swap fixes: what the trader pays in, or what they receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSpecified {
    /// Swap exactly this much of the input token
    ExactInput(U256),
    /// Receive exactly this much of the output token
    ExactOutput(U256),
}

impl AmountSpecified {
    pub fn amount(&self) -> U256 {
        match self {
            AmountSpecified::ExactInput(amount) | AmountSpecified::ExactOutput(amount) => *amount,
        }
    }

    pub fn is_exact_input(&self) -> bool {
        matches!(self, AmountSpecified::ExactInput(_))
    }
}

/// Parameters of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParams {
    /// True to swap token0 for token1 (price moves down)
    pub zero_for_one: bool,
    pub amount_specified: AmountSpecified,
    /// Price the swap may not move past. `None` means no limit other than the global bounds.
    pub sqrt_price_limit_x96: Option<U256>,
}

impl SwapParams {
    pub fn exact_input(zero_for_one: bool, amount: U256) -> Self {
        Self {
            zero_for_one,
            amount_specified: AmountSpecified::ExactInput(amount),
            sqrt_price_limit_x96: None,
        }
    }

    pub fn exact_output(zero_for_one: bool, amount: U256) -> Self {
        Self {
            zero_for_one,
            amount_specified: AmountSpecified::ExactOutput(amount),
            sqrt_price_limit_x96: None,
        }
    }

    pub fn with_price_limit(mut self, sqrt_price_limit_x96: U256) -> Self {
        self.sqrt_price_limit_x96 = Some(sqrt_price_limit_x96);
        self
    }
}

/// Outcome of a swap
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Input token paid by the trader, fees included
    pub amount_in: U256,
    /// Output token received by the trader
    pub amount_out: U256,
    /// Total fee taken from the input, protocol share included
    pub fee_amount: U256,
    /// Portion of `fee_amount` accrued to the protocol
    pub protocol_fee_amount: U256,
    /// Pool sqrt price after the swap
    pub sqrt_price_x96: U256,
    /// Pool tick after the swap
    pub tick: i32,
    /// Active liquidity after the swap
    pub liquidity: u128,
    /// Number of initialized ticks crossed
    pub ticks_crossed: u32,
}

/// A staged tick crossing: the global fee growth at the moment the tick was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCrossing {
    pub tick: i32,
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
    /// Active liquidity after the crossing
    pub liquidity_after: u128,
}

/// The complete effect of a swap, computed without touching the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapComputation {
    pub zero_for_one: bool,
    pub result: SwapResult,
    /// Final global fee growth of the input token
    pub fee_growth_global_x128: U256,
    /// Tick crossings in the order they happened
    pub crossings: Vec<TickCrossing>,
}

fn resolve_price_limit(pool: &Pool, params: &SwapParams) -> Result<U256> {
    let sqrt_price_x96 = pool.slot0.sqrt_price_x96;
    if params.zero_for_one {
        let limit = params
            .sqrt_price_limit_x96
            .unwrap_or(MIN_SQRT_PRICE + U256::one());
        require!(limit < sqrt_price_x96, ErrorCode::PriceLimitAlreadyReached);
        require!(limit > MIN_SQRT_PRICE, ErrorCode::PriceOutOfBounds);
        Ok(limit)
    } else {
        let limit = params
            .sqrt_price_limit_x96
            .unwrap_or(MAX_SQRT_PRICE - U256::one());
        require!(limit > sqrt_price_x96, ErrorCode::PriceLimitAlreadyReached);
        require!(limit < MAX_SQRT_PRICE, ErrorCode::PriceOutOfBounds);
        Ok(limit)
    }
}

fn checked_add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or_else(|| error!(ErrorCode::Overflow))
}

fn checked_sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or_else(|| error!(ErrorCode::Overflow))
}

/// Computes the full effect of a swap against a pool without modifying it
///
/// # Arguments
/// * `pool` - The pool to swap against
/// * `params` - Direction, specified amount and optional price limit
///
/// # Returns
/// * `Result<SwapComputation>` - The swap outcome plus everything needed to commit it
pub fn compute_swap(pool: &Pool, params: &SwapParams) -> Result<SwapComputation> {
    require!(pool.is_initialized(), ErrorCode::NotInitialized);
    let amount_specified = params.amount_specified.amount();
    require!(!amount_specified.is_zero(), ErrorCode::ZeroAmountSpecified);

    let exact_input = params.amount_specified.is_exact_input();
    let zero_for_one = params.zero_for_one;
    let slot0 = pool.slot0;
    if !exact_input {
        require!(
            slot0.lp_fee < MAX_LP_FEE,
            ErrorCode::InvalidFeeForExactOutput
        );
    }
    let sqrt_price_limit_x96 = resolve_price_limit(pool, params)?;

    let protocol_fee = U256::from(slot0.protocol_fee);
    let protocol_fee_denominator = U256::from(PROTOCOL_FEE_DENOMINATOR);
    let (fee_growth_other_x128, mut fee_growth_global_x128) = if zero_for_one {
        (pool.fee_growth_global_1_x128, pool.fee_growth_global_0_x128)
    } else {
        (pool.fee_growth_global_0_x128, pool.fee_growth_global_1_x128)
    };

    let mut amount_remaining = amount_specified;
    let mut amount_in = U256::zero();
    let mut amount_out = U256::zero();
    let mut fee_amount = U256::zero();
    let mut protocol_fee_amount = U256::zero();
    let mut sqrt_price_x96 = slot0.sqrt_price_x96;
    let mut tick = slot0.tick;
    let mut liquidity = pool.liquidity;
    let mut crossings = Vec::new();

    while !amount_remaining.is_zero() && sqrt_price_x96 != sqrt_price_limit_x96 {
        let sqrt_price_start_x96 = sqrt_price_x96;

        let (tick_next, initialized) = match pool.ticks.next_initialized_tick(tick, zero_for_one) {
            Some(next) => (next.clamp(MIN_TICK, MAX_TICK), true),
            None if zero_for_one => (MIN_TICK, false),
            None => (MAX_TICK, false),
        };
        let sqrt_price_next_x96 = get_sqrt_price_at_tick(tick_next)?;

        let sqrt_price_target_x96 = if zero_for_one {
            sqrt_price_next_x96.max(sqrt_price_limit_x96)
        } else {
            sqrt_price_next_x96.min(sqrt_price_limit_x96)
        };

        let step = compute_swap_step(
            sqrt_price_x96,
            sqrt_price_target_x96,
            liquidity,
            amount_remaining,
            exact_input,
            slot0.lp_fee,
        )?;
        sqrt_price_x96 = step.sqrt_price_next_x96;

        let step_in = checked_add(step.amount_in, step.fee_amount)?;
        amount_remaining = if exact_input {
            checked_sub(amount_remaining, step_in)?
        } else {
            checked_sub(amount_remaining, step.amount_out)?
        };
        amount_in = checked_add(amount_in, step_in)?;
        amount_out = checked_add(amount_out, step.amount_out)?;
        fee_amount = checked_add(fee_amount, step.fee_amount)?;

        let mut lp_fee_amount = step.fee_amount;
        if !protocol_fee.is_zero() {
            let protocol_share = mul_div(step.fee_amount, protocol_fee, protocol_fee_denominator)?;
            lp_fee_amount -= protocol_share;
            protocol_fee_amount = checked_add(protocol_fee_amount, protocol_share)?;
        }

        // Zero-liquidity ranges accrue nothing
        if liquidity > 0 && !lp_fee_amount.is_zero() {
            let growth = mul_div(lp_fee_amount, Q128, U256::from(liquidity))?;
            fee_growth_global_x128 = fee_growth_global_x128.overflowing_add(growth).0;
        }

        if sqrt_price_x96 == sqrt_price_next_x96 {
            if initialized {
                let (fee_growth_global_0_x128, fee_growth_global_1_x128) = if zero_for_one {
                    (fee_growth_global_x128, fee_growth_other_x128)
                } else {
                    (fee_growth_other_x128, fee_growth_global_x128)
                };
                let liquidity_net = pool.ticks.get_or_default(tick_next).liquidity_net;
                let liquidity_net = if zero_for_one {
                    liquidity_net
                        .checked_neg()
                        .ok_or_else(|| error!(ErrorCode::Overflow))?
                } else {
                    liquidity_net
                };
                liquidity = add_delta(liquidity, liquidity_net)?;
                crossings.push(TickCrossing {
                    tick: tick_next,
                    fee_growth_global_0_x128,
                    fee_growth_global_1_x128,
                    liquidity_after: liquidity,
                });
            }
            tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if sqrt_price_x96 != sqrt_price_start_x96 {
            tick = get_tick_at_sqrt_price(sqrt_price_x96)?;
        }
    }

    Ok(SwapComputation {
        zero_for_one,
        result: SwapResult {
            amount_in,
            amount_out,
            fee_amount,
            protocol_fee_amount,
            sqrt_price_x96,
            tick,
            liquidity,
            ticks_crossed: crossings.len() as u32,
        },
        fee_growth_global_x128,
        crossings,
    })
}

impl Pool {
    /// Executes a swap and commits its effect to the pool.
    ///
    /// # Arguments
    /// * `params` - Direction, specified amount and optional price limit
    ///
    /// # Returns
    /// * `Result<SwapResult>` - Amounts exchanged and the resulting pool state
    pub fn swap(&mut self, params: SwapParams) -> Result<SwapResult> {
        let computation = compute_swap(self, &params)?;
        let result = computation.result;

        let protocol_fees = if computation.zero_for_one {
            self.protocol_fees_0
        } else {
            self.protocol_fees_1
        };
        let protocol_fees = checked_add(protocol_fees, result.protocol_fee_amount)?;

        // Commit
        for crossing in &computation.crossings {
            let liquidity_net = self.ticks.cross(
                crossing.tick,
                crossing.fee_growth_global_0_x128,
                crossing.fee_growth_global_1_x128,
            );
            msg!(
                "Crossed tick {}, liquidity_net: {}. Pool liquidity: {}",
                crossing.tick,
                liquidity_net,
                crossing.liquidity_after
            );
        }

        if computation.zero_for_one {
            self.fee_growth_global_0_x128 = computation.fee_growth_global_x128;
            self.protocol_fees_0 = protocol_fees;
        } else {
            self.fee_growth_global_1_x128 = computation.fee_growth_global_x128;
            self.protocol_fees_1 = protocol_fees;
        }
        self.slot0.sqrt_price_x96 = result.sqrt_price_x96;
        self.slot0.tick = result.tick;
        self.liquidity = result.liquidity;

        msg!(
            "Swap executed: zero_for_one={}, amount_in={}, amount_out={}, fee={}, protocol_fee={}, tick={}, liquidity={}",
            computation.zero_for_one,
            result.amount_in,
            result.amount_out,
            result.fee_amount,
            result.protocol_fee_amount,
            result.tick,
            result.liquidity
        );
        Ok(result)
    }

    /// Computes the outcome of a swap without changing the pool
    pub fn quote_swap(&self, params: SwapParams) -> Result<SwapResult> {
        Ok(compute_swap(self, &params)?.result)
    }
}
