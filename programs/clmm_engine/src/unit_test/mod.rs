//! Unit tests for the engine, one file per module.

mod math_test;

use crate::constants::{FEE_TIER_MEDIUM, TICK_SPACING_MEDIUM};
use crate::state::{Pool, PoolKey};
use anchor_lang::prelude::Pubkey;
use primitive_types::U256;

/// Parses a decimal literal too large for u128
pub fn u256(value: &str) -> U256 {
    U256::from_dec_str(value).unwrap()
}

/// Deterministic key whose ordering follows `seed`
pub fn pubkey(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed; 32])
}

/// 0.3% pool with tick spacing 60
pub fn medium_key() -> PoolKey {
    PoolKey::new(pubkey(1), pubkey(2), FEE_TIER_MEDIUM, TICK_SPACING_MEDIUM)
}

/// A 0.3% pool initialized at price 1 (tick 0)
pub fn pool_at_price_one() -> Pool {
    let mut pool = Pool::new(medium_key()).unwrap();
    pool.initialize(crate::constants::Q96, 0).unwrap();
    pool
}
