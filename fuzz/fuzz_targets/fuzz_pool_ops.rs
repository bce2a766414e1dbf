use anchor_lang::prelude::Pubkey;
use arbitrary::Arbitrary;
use clmm_engine::constants::{FEE_TIER_MEDIUM, TICK_SPACING_MEDIUM};
use clmm_engine::math::tick_math::get_sqrt_price_at_tick;
use clmm_engine::{Pool, PoolKey, SwapParams};
use honggfuzz::fuzz;
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
enum PoolOp {
    ModifyLiquidity {
        owner: u8,
        lower: i8,
        width: u8,
        liquidity_delta: i64,
    },
    Swap {
        zero_for_one: bool,
        exact_input: bool,
        amount: u64,
    },
    Collect {
        owner: u8,
        lower: i8,
        width: u8,
    },
}

#[derive(Debug, Clone, Arbitrary)]
struct PoolScenario {
    start_tick: i16,
    protocol_fee: u16,
    ops: Vec<PoolOp>,
}

fn range(lower: i8, width: u8) -> (i32, i32) {
    let tick_lower = lower as i32 * TICK_SPACING_MEDIUM;
    (tick_lower, tick_lower + (width as i32 % 16 + 1) * TICK_SPACING_MEDIUM)
}

fn owner(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed % 4 + 10; 32])
}

/// Active liquidity equals the net liquidity of every initialized tick at or below
/// the current tick
fn check_invariants(pool: &Pool) {
    let slot0 = pool.slot0();
    let net: i128 = pool
        .ticks()
        .iter()
        .filter(|(tick, _)| **tick <= slot0.tick)
        .map(|(_, info)| info.liquidity_net)
        .sum();
    assert_eq!(net, pool.liquidity() as i128);
    assert!(get_sqrt_price_at_tick(slot0.tick).unwrap() <= slot0.sqrt_price_x96);
}

fn fuzz_pool_ops(scenario: PoolScenario) {
    let key = PoolKey::new(
        Pubkey::new_from_array([1; 32]),
        Pubkey::new_from_array([2; 32]),
        FEE_TIER_MEDIUM,
        TICK_SPACING_MEDIUM,
    );
    let Ok(mut pool) = Pool::new(key) else {
        return;
    };
    let start = get_sqrt_price_at_tick(scenario.start_tick as i32).unwrap();
    if pool.initialize(start, scenario.protocol_fee % 2501).is_err() {
        return;
    }

    for op in scenario.ops.iter().take(64) {
        let before = pool.clone();
        let outcome = match *op {
            PoolOp::ModifyLiquidity {
                owner: seed,
                lower,
                width,
                liquidity_delta,
            } => {
                let (tick_lower, tick_upper) = range(lower, width);
                pool.modify_liquidity(owner(seed), tick_lower, tick_upper, liquidity_delta as i128)
                    .map(|_| ())
            }
            PoolOp::Swap {
                zero_for_one,
                exact_input,
                amount,
            } => {
                let params = if exact_input {
                    SwapParams::exact_input(zero_for_one, U256::from(amount))
                } else {
                    SwapParams::exact_output(zero_for_one, U256::from(amount))
                };
                pool.swap(params).map(|result| {
                    assert!(result.protocol_fee_amount <= result.fee_amount);
                })
            }
            PoolOp::Collect {
                owner: seed,
                lower,
                width,
            } => {
                let (tick_lower, tick_upper) = range(lower, width);
                pool.collect(owner(seed), tick_lower, tick_upper, U256::MAX, U256::MAX)
                    .map(|_| ())
            }
        };

        if outcome.is_err() {
            assert_eq!(pool.slot0(), before.slot0());
            assert_eq!(pool.liquidity(), before.liquidity());
            assert_eq!(pool.ticks(), before.ticks());
            assert_eq!(pool.positions(), before.positions());
        }
        check_invariants(&pool);
    }
}

fn main() {
    loop {
        fuzz!(|data: PoolScenario| {
            fuzz_pool_ops(data);
        });
    }
}
