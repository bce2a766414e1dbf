//! Concentrated liquidity pool engine.
//!
//! Maintains each pool's price and tick, tracks liquidity provided over arbitrary
//! tick ranges, executes swaps across tick boundaries and accounts the fees owed to
//! every position. All state lives in memory and is owned by the caller, typically
//! through a [`PoolManager`].
//!
//! ```ignore
//! let mut manager = PoolManager::new(ManagerConfig::default())?;
//! let key = PoolKey::new(usdc, sol, FEE_TIER_MEDIUM, TICK_SPACING_MEDIUM);
//! manager.initialize(key, Q96)?;
//! manager.modify_liquidity(&key, owner, -600, 600, 1_000_000_000)?;
//! let result = manager.swap(&key, SwapParams::exact_input(true, U256::from(1_000u64)))?;
//! ```

// Modules for constants, errors, core math, and state definitions
pub mod constants;
pub mod errors;
pub mod math;
pub mod pool_manager;
pub mod position;
pub mod state;
pub mod swap;
pub mod tick;
pub mod tick_bitmap;

#[cfg(test)]
pub mod unit_test;

#[cfg(test)]
mod property_based_test;

pub use errors::ErrorCode;
pub use pool_manager::{ManagerConfig, PoolManager};
pub use position::{PositionInfo, PositionKey, PositionLedger};
pub use state::{ModifyLiquidityResult, Pool, PoolId, PoolKey, Slot0};
pub use swap::{compute_swap, AmountSpecified, SwapComputation, SwapParams, SwapResult};
pub use tick::{TickInfo, TickTable};
pub use tick_bitmap::TickBitmap;

pub use primitive_types::U256;
