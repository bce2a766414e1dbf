//! Property-based tests for pool state
//!
//! Runs random sequences of liquidity changes and swaps against a single pool and
//! checks the accounting invariants after every operation.

use crate::constants::*;
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::{Pool, PoolKey};
use crate::swap::SwapParams;
use anchor_lang::prelude::Pubkey;
use primitive_types::U256;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add {
        owner: u8,
        lower: i32,
        width: i32,
        liquidity: u128,
    },
    Remove {
        owner: u8,
        lower: i32,
        width: i32,
        percent: u8,
    },
    Poke {
        owner: u8,
        lower: i32,
        width: i32,
    },
    Swap {
        zero_for_one: bool,
        exact_input: bool,
        amount: u128,
    },
}

mod strategies {
    use super::*;

    pub fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0u8..3, -20i32..20, 1i32..10, 1_000_000u128..1_000_000_000_000_000_000_000u128)
                .prop_map(|(owner, lower, width, liquidity)| Op::Add { owner, lower, width, liquidity }),
            2 => (0u8..3, -20i32..20, 1i32..10, 1u8..=100)
                .prop_map(|(owner, lower, width, percent)| Op::Remove { owner, lower, width, percent }),
            1 => (0u8..3, -20i32..20, 1i32..10)
                .prop_map(|(owner, lower, width)| Op::Poke { owner, lower, width }),
            4 => (any::<bool>(), any::<bool>(), 1u128..1_000_000_000_000_000_000u128)
                .prop_map(|(zero_for_one, exact_input, amount)| Op::Swap { zero_for_one, exact_input, amount }),
        ]
    }

    /// Starting tick of the pool, near the ranges positions are placed in
    pub fn start_tick() -> impl Strategy<Value = i32> {
        -1200i32..1200
    }

    pub fn protocol_fee() -> impl Strategy<Value = u16> {
        0..=MAX_PROTOCOL_FEE
    }
}

fn owner(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed + 10; 32])
}

fn range(lower: i32, width: i32) -> (i32, i32) {
    let tick_lower = lower * TICK_SPACING_MEDIUM;
    (tick_lower, tick_lower + width * TICK_SPACING_MEDIUM)
}

fn new_pool(start_tick: i32, protocol_fee: u16) -> Pool {
    let key = PoolKey::new(
        Pubkey::new_from_array([1; 32]),
        Pubkey::new_from_array([2; 32]),
        FEE_TIER_MEDIUM,
        TICK_SPACING_MEDIUM,
    );
    let mut pool = Pool::new(key).unwrap();
    pool.initialize(get_sqrt_price_at_tick(start_tick).unwrap(), protocol_fee)
        .unwrap();
    pool
}

fn apply(pool: &mut Pool, op: &Op) -> anchor_lang::Result<()> {
    match *op {
        Op::Add { owner: seed, lower, width, liquidity } => {
            let (tick_lower, tick_upper) = range(lower, width);
            pool.modify_liquidity(owner(seed), tick_lower, tick_upper, liquidity as i128)?;
        }
        Op::Remove { owner: seed, lower, width, percent } => {
            let (tick_lower, tick_upper) = range(lower, width);
            let held = pool
                .position(&owner(seed), tick_lower, tick_upper)
                .map_or(0, |position| position.liquidity);
            let delta = (held / 100 * percent as u128).max(1);
            pool.modify_liquidity(owner(seed), tick_lower, tick_upper, -(delta as i128))?;
        }
        Op::Poke { owner: seed, lower, width } => {
            let (tick_lower, tick_upper) = range(lower, width);
            pool.modify_liquidity(owner(seed), tick_lower, tick_upper, 0)?;
        }
        Op::Swap { zero_for_one, exact_input, amount } => {
            let params = if exact_input {
                SwapParams::exact_input(zero_for_one, U256::from(amount))
            } else {
                SwapParams::exact_output(zero_for_one, U256::from(amount))
            };
            let quote = pool.quote_swap(params)?;
            let result = pool.swap(params)?;
            assert_eq!(quote, result);
            if exact_input {
                assert!(result.amount_in <= U256::from(amount));
            } else {
                assert!(result.amount_out <= U256::from(amount));
            }
            assert!(result.protocol_fee_amount <= result.fee_amount);
        }
    }
    Ok(())
}

/// Active liquidity must equal the net liquidity of every initialized tick at or
/// below the current tick
fn check_invariants(pool: &Pool) -> std::result::Result<(), TestCaseError> {
    let slot0 = pool.slot0();
    prop_assert!(slot0.sqrt_price_x96 >= MIN_SQRT_PRICE);
    prop_assert!(slot0.sqrt_price_x96 < MAX_SQRT_PRICE);
    prop_assert!(get_sqrt_price_at_tick(slot0.tick).unwrap() <= slot0.sqrt_price_x96);
    if slot0.tick < MAX_TICK {
        prop_assert!(slot0.sqrt_price_x96 <= get_sqrt_price_at_tick(slot0.tick + 1).unwrap());
    }

    let net: i128 = pool
        .ticks()
        .iter()
        .filter(|(tick, _)| **tick <= slot0.tick)
        .map(|(_, info)| info.liquidity_net)
        .sum();
    prop_assert_eq!(net, pool.liquidity() as i128);

    for (tick, info) in pool.ticks().iter() {
        prop_assert!(info.liquidity_gross > 0);
        prop_assert!(info.liquidity_net.unsigned_abs() <= info.liquidity_gross);
        prop_assert!(pool.ticks().bitmap().is_initialized(*tick, TICK_SPACING_MEDIUM));
    }

    // Gross liquidity of each tick is the sum over positions bounded by it
    let mut gross = std::collections::BTreeMap::<i32, u128>::new();
    for (key, position) in pool.positions().iter() {
        *gross.entry(key.tick_lower).or_default() += position.liquidity;
        *gross.entry(key.tick_upper).or_default() += position.liquidity;
    }
    gross.retain(|_, liquidity| *liquidity > 0);
    let table: std::collections::BTreeMap<i32, u128> = pool
        .ticks()
        .iter()
        .map(|(tick, info)| (*tick, info.liquidity_gross))
        .collect();
    prop_assert_eq!(gross, table);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_pool_invariants_hold_across_operations(
        start_tick in strategies::start_tick(),
        protocol_fee in strategies::protocol_fee(),
        ops in prop::collection::vec(strategies::op(), 1..40),
    ) {
        let mut pool = new_pool(start_tick, protocol_fee);
        for op in &ops {
            let slot0 = pool.slot0();
            let liquidity = pool.liquidity();
            let growth = pool.fee_growth_globals();
            let ticks = pool.ticks().clone();
            let positions = pool.positions().clone();

            if apply(&mut pool, op).is_err() {
                // A failed operation leaves no trace
                prop_assert_eq!(pool.slot0(), slot0);
                prop_assert_eq!(pool.liquidity(), liquidity);
                prop_assert_eq!(pool.fee_growth_globals(), growth);
                prop_assert_eq!(pool.ticks(), &ticks);
                prop_assert_eq!(pool.positions(), &positions);
            }

            // Fee growth only moves forward at these magnitudes
            let (growth_0, growth_1) = pool.fee_growth_globals();
            prop_assert!(growth_0 >= growth.0 && growth_1 >= growth.1);
            check_invariants(&pool)?;
        }
    }

    #[test]
    fn test_poke_is_idempotent(
        start_tick in strategies::start_tick(),
        ops in prop::collection::vec(strategies::op(), 1..30),
    ) {
        let mut pool = new_pool(start_tick, 0);
        for op in &ops {
            let _ = apply(&mut pool, op);
        }
        let keys: Vec<_> = pool
            .positions()
            .iter()
            .filter(|(_, position)| position.liquidity > 0)
            .map(|(key, _)| *key)
            .collect();
        for key in keys {
            pool.modify_liquidity(key.owner, key.tick_lower, key.tick_upper, 0).unwrap();
            let before = pool.position(&key.owner, key.tick_lower, key.tick_upper);
            let result = pool
                .modify_liquidity(key.owner, key.tick_lower, key.tick_upper, 0)
                .unwrap();
            prop_assert!(result.fees0.is_zero() && result.fees1.is_zero());
            prop_assert!(result.amount0.is_zero() && result.amount1.is_zero());
            prop_assert_eq!(pool.position(&key.owner, key.tick_lower, key.tick_upper), before);
        }
    }

    #[test]
    fn test_add_then_remove_never_returns_more(
        start_tick in strategies::start_tick(),
        lower in -20i32..20,
        width in 1i32..10,
        liquidity in 1u128..1_000_000_000_000_000_000_000u128,
    ) {
        let mut pool = new_pool(start_tick, 0);
        let (tick_lower, tick_upper) = range(lower, width);
        let added = pool
            .modify_liquidity(owner(0), tick_lower, tick_upper, liquidity as i128)
            .unwrap();
        let removed = pool
            .modify_liquidity(owner(0), tick_lower, tick_upper, -(liquidity as i128))
            .unwrap();
        prop_assert!(removed.amount0 <= added.amount0);
        prop_assert!(removed.amount1 <= added.amount1);
        prop_assert!(added.amount0.saturating_sub(removed.amount0) <= U256::one());
        prop_assert!(added.amount1.saturating_sub(removed.amount1) <= U256::one());
        prop_assert_eq!(pool.liquidity(), 0);
        prop_assert!(pool.ticks().is_empty());
    }
}
