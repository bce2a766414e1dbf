use arbitrary::Arbitrary;
use clmm_engine::constants::{MAX_LP_FEE, MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use clmm_engine::math::swap_math::compute_swap_step;
use honggfuzz::fuzz;
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
struct SwapStepInput {
    current: u128,
    target: u128,
    liquidity: u128,
    amount_remaining: u128,
    exact_input: bool,
    fee_pips: u32,
}

fn in_price_range(value: u128) -> U256 {
    let value = U256::from(value);
    if value < MIN_SQRT_PRICE {
        MIN_SQRT_PRICE
    } else if value >= MAX_SQRT_PRICE {
        MAX_SQRT_PRICE - U256::one()
    } else {
        value
    }
}

fn fuzz_swap_step(input: SwapStepInput) {
    let current = in_price_range(input.current);
    let target = in_price_range(input.target);
    let amount_remaining = U256::from(input.amount_remaining);
    let fee_pips = input.fee_pips % MAX_LP_FEE;

    let Ok(step) = compute_swap_step(
        current,
        target,
        input.liquidity,
        amount_remaining,
        input.exact_input,
        fee_pips,
    ) else {
        return;
    };

    // The step never moves past its target
    if current >= target {
        assert!(step.sqrt_price_next_x96 <= current && step.sqrt_price_next_x96 >= target);
    } else {
        assert!(step.sqrt_price_next_x96 >= current && step.sqrt_price_next_x96 <= target);
    }

    if input.exact_input {
        assert!(step.amount_in + step.fee_amount <= amount_remaining);
        if step.sqrt_price_next_x96 != target {
            assert_eq!(step.amount_in + step.fee_amount, amount_remaining);
        }
    } else {
        assert!(step.amount_out <= amount_remaining);
    }
}

fn main() {
    loop {
        fuzz!(|data: SwapStepInput| {
            fuzz_swap_step(data);
        });
    }
}
