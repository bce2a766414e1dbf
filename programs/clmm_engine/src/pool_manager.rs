/// Pool Manager
///
/// Routes decoded intents to the pool identified by a `PoolKey`. The manager is an
/// ordinary owned value holding every pool it created; there is no process-wide
/// state, and exclusive access to a pool follows from `&mut PoolManager`.
use crate::constants::MAX_PROTOCOL_FEE;
use crate::errors::ErrorCode;
use crate::position::PositionInfo;
use crate::state::pool::{ModifyLiquidityResult, Pool, Slot0};
use crate::state::pool_key::{PoolId, PoolKey};
use crate::swap::{SwapParams, SwapResult};
use crate::tick::TickInfo;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::HashMap;

/// Runtime configuration of a `PoolManager`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Protocol share of the LP fee applied to newly initialized pools
    pub default_protocol_fee: u16,
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.default_protocol_fee <= MAX_PROTOCOL_FEE,
            ErrorCode::InvalidProtocolFee
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PoolManager {
    config: ManagerConfig,
    pools: HashMap<PoolId, Pool>,
}

impl PoolManager {
    /// Creates an empty manager with a validated configuration
    pub fn new(config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pools: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Number of pools created by this manager
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Creates and initializes the pool for `key`
    ///
    /// # Arguments
    /// * `key` - The pool key, validated before the pool is created
    /// * `sqrt_price_x96` - The initial sqrt price
    ///
    /// # Returns
    /// * `Result<i32>` - The initial tick, or `AlreadyInitialized` if the pool exists
    pub fn initialize(&mut self, key: PoolKey, sqrt_price_x96: U256) -> Result<i32> {
        let id = key.id()?;
        require!(
            !self.pools.contains_key(&id),
            ErrorCode::AlreadyInitialized
        );
        let mut pool = Pool::new(key)?;
        let tick = pool.initialize(sqrt_price_x96, self.config.default_protocol_fee)?;
        self.pools.insert(id, pool);
        Ok(tick)
    }

    /// Shared access to an existing pool
    pub fn pool(&self, key: &PoolKey) -> Result<&Pool> {
        self.pools
            .get(&key.id()?)
            .ok_or_else(|| error!(ErrorCode::NotInitialized))
    }

    /// Exclusive access to an existing pool
    pub fn pool_mut(&mut self, key: &PoolKey) -> Result<&mut Pool> {
        self.pools
            .get_mut(&key.id()?)
            .ok_or_else(|| error!(ErrorCode::NotInitialized))
    }

    pub fn modify_liquidity(
        &mut self,
        key: &PoolKey,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<ModifyLiquidityResult> {
        self.pool_mut(key)?
            .modify_liquidity(owner, tick_lower, tick_upper, liquidity_delta)
    }

    pub fn swap(&mut self, key: &PoolKey, params: SwapParams) -> Result<SwapResult> {
        self.pool_mut(key)?.swap(params)
    }

    pub fn quote_swap(&self, key: &PoolKey, params: SwapParams) -> Result<SwapResult> {
        self.pool(key)?.quote_swap(params)
    }

    pub fn collect(
        &mut self,
        key: &PoolKey,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: U256,
        amount1_requested: U256,
    ) -> Result<(U256, U256)> {
        self.pool_mut(key)?.collect(
            owner,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        )
    }

    pub fn get_slot0(&self, key: &PoolKey) -> Result<Slot0> {
        Ok(self.pool(key)?.slot0())
    }

    pub fn get_liquidity(&self, key: &PoolKey) -> Result<u128> {
        Ok(self.pool(key)?.liquidity())
    }

    pub fn get_position(
        &self,
        key: &PoolKey,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<Option<PositionInfo>> {
        Ok(self.pool(key)?.position(owner, tick_lower, tick_upper))
    }

    pub fn get_tick_info(&self, key: &PoolKey, tick: i32) -> Result<Option<TickInfo>> {
        Ok(self.pool(key)?.tick_info(tick))
    }

    pub fn set_protocol_fee(&mut self, key: &PoolKey, protocol_fee: u16) -> Result<()> {
        self.pool_mut(key)?.set_protocol_fee(protocol_fee)
    }

    pub fn update_dynamic_lp_fee(&mut self, key: &PoolKey, lp_fee: u32) -> Result<()> {
        self.pool_mut(key)?.update_dynamic_lp_fee(lp_fee)
    }

    pub fn collect_protocol(
        &mut self,
        key: &PoolKey,
        amount0_requested: U256,
        amount1_requested: U256,
    ) -> Result<(U256, U256)> {
        self.pool_mut(key)?
            .collect_protocol(amount0_requested, amount1_requested)
    }
}
