use crate::constants::{MAX_LP_FEE, MAX_PROTOCOL_FEE, MAX_TICK, MIN_TICK};
use crate::errors::ErrorCode;
use crate::math::liquidity_math::add_delta;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::position::{PositionInfo, PositionKey, PositionLedger};
use crate::state::pool_key::{PoolId, PoolKey};
use crate::tick::{self, max_liquidity_per_tick, TickInfo, TickTable};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Price, tick and fee configuration of a pool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    /// The current sqrt price in Q64.96. Zero while the pool is uninitialized.
    pub sqrt_price_x96: U256,
    /// The current tick
    pub tick: i32,
    /// Share of the LP fee taken by the protocol, in units of 1/10000
    pub protocol_fee: u16,
    /// LP fee charged on swap input, in pips
    pub lp_fee: u32,
}

/// Token amounts and fees resulting from a liquidity change
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifyLiquidityResult {
    /// Token0 the caller pays in (adding) or receives (removing)
    pub amount0: U256,
    /// Token1 the caller pays in (adding) or receives (removing)
    pub amount1: U256,
    /// Token0 fees credited to the position by this call
    pub fees0: U256,
    /// Token1 fees credited to the position by this call
    pub fees1: U256,
}

/// State of a single concentrated liquidity pool.
///
/// A pool is created uninitialized from its key, becomes tradable once `initialize`
/// sets its price, and is never destroyed. Every mutating operation computes its
/// full effect before writing anything, so a failed call leaves the pool unchanged.
#[derive(Debug, Clone)]
pub struct Pool {
    pub(crate) key: PoolKey,
    pub(crate) slot0: Slot0,
    /// Liquidity active in the current tick range
    pub(crate) liquidity: u128,
    /// Token0 fees per unit of liquidity over the life of the pool (Q128.128, wrapping)
    pub(crate) fee_growth_global_0_x128: U256,
    /// Token1 fees per unit of liquidity over the life of the pool (Q128.128, wrapping)
    pub(crate) fee_growth_global_1_x128: U256,
    pub(crate) protocol_fees_0: U256,
    pub(crate) protocol_fees_1: U256,
    pub(crate) ticks: TickTable,
    pub(crate) positions: PositionLedger,
    pub(crate) max_liquidity_per_tick: u128,
}

impl Pool {
    /// Creates an uninitialized pool for a validated key
    pub fn new(key: PoolKey) -> Result<Self> {
        key.validate()?;
        Ok(Self {
            key,
            slot0: Slot0::default(),
            liquidity: 0,
            fee_growth_global_0_x128: U256::zero(),
            fee_growth_global_1_x128: U256::zero(),
            protocol_fees_0: U256::zero(),
            protocol_fees_1: U256::zero(),
            ticks: TickTable::new(key.tick_spacing),
            positions: PositionLedger::new(),
            max_liquidity_per_tick: max_liquidity_per_tick(key.tick_spacing),
        })
    }

    /// Sets the initial price of the pool.
    ///
    /// # Arguments
    /// * `sqrt_price_x96` - The initial sqrt price, within `[MIN_SQRT_PRICE, MAX_SQRT_PRICE)`
    /// * `protocol_fee` - The initial protocol share of the LP fee
    ///
    /// # Returns
    /// * `Result<i32>` - The tick matching the initial price
    pub fn initialize(&mut self, sqrt_price_x96: U256, protocol_fee: u16) -> Result<i32> {
        require!(!self.is_initialized(), ErrorCode::AlreadyInitialized);
        require!(
            protocol_fee <= MAX_PROTOCOL_FEE,
            ErrorCode::InvalidProtocolFee
        );
        let tick = get_tick_at_sqrt_price(sqrt_price_x96)?;

        self.slot0 = Slot0 {
            sqrt_price_x96,
            tick,
            protocol_fee,
            lp_fee: if self.key.is_dynamic_fee() {
                0
            } else {
                self.key.fee
            },
        };

        msg!(
            "Pool initialized: sqrt_price_x96={}, tick={}, lp_fee={}, protocol_fee={}",
            sqrt_price_x96,
            tick,
            self.slot0.lp_fee,
            protocol_fee
        );
        Ok(tick)
    }

    pub fn is_initialized(&self) -> bool {
        !self.slot0.sqrt_price_x96.is_zero()
    }

    fn require_initialized(&self) -> Result<()> {
        require!(self.is_initialized(), ErrorCode::NotInitialized);
        Ok(())
    }

    /// Validates position boundaries against the global range and the pool's spacing
    fn check_ticks(&self, tick_lower: i32, tick_upper: i32) -> Result<()> {
        let spacing = self.key.tick_spacing;
        require!(tick_lower < tick_upper, ErrorCode::InvalidTickRange);
        require!(tick_lower >= MIN_TICK, ErrorCode::InvalidTickRange);
        require!(tick_upper <= MAX_TICK, ErrorCode::InvalidTickRange);
        require!(
            tick_lower % spacing == 0 && tick_upper % spacing == 0,
            ErrorCode::InvalidTickRange
        );
        Ok(())
    }

    /// Token amounts represented by `liquidity` over a range at the current price
    fn amounts_for_liquidity(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        round_up: bool,
    ) -> Result<(U256, U256)> {
        let sqrt_price_lower = get_sqrt_price_at_tick(tick_lower)?;
        let sqrt_price_upper = get_sqrt_price_at_tick(tick_upper)?;
        let Slot0 {
            sqrt_price_x96,
            tick,
            ..
        } = self.slot0;

        if tick < tick_lower {
            // Range entirely above the price: only token0
            let amount0 =
                get_amount_0_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
            Ok((amount0, U256::zero()))
        } else if tick < tick_upper {
            let amount0 =
                get_amount_0_delta(sqrt_price_x96, sqrt_price_upper, liquidity, round_up)?;
            let amount1 =
                get_amount_1_delta(sqrt_price_lower, sqrt_price_x96, liquidity, round_up)?;
            Ok((amount0, amount1))
        } else {
            // Range entirely below the price: only token1
            let amount1 =
                get_amount_1_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
            Ok((U256::zero(), amount1))
        }
    }

    /// Adds or removes liquidity for an owner's range.
    ///
    /// Both boundary ticks, the position and the token amounts are computed first and
    /// committed together. Active liquidity changes only when the current tick is in
    /// `[tick_lower, tick_upper)`. Fees earned by the position are credited to its owed
    /// balances and withdrawn with `collect`.
    ///
    /// # Arguments
    /// * `owner` - The position owner
    /// * `tick_lower` - The lower boundary, a multiple of the tick spacing
    /// * `tick_upper` - The upper boundary, a multiple of the tick spacing
    /// * `liquidity_delta` - Positive to add, negative to remove, zero to only accrue fees
    pub fn modify_liquidity(
        &mut self,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<ModifyLiquidityResult> {
        self.require_initialized()?;
        self.check_ticks(tick_lower, tick_upper)?;

        let tick_current = self.slot0.tick;
        let fee_growth_0 = self.fee_growth_global_0_x128;
        let fee_growth_1 = self.fee_growth_global_1_x128;

        let (lower_info, flipped_lower) = self.ticks.preview_update(
            tick_lower,
            tick_current,
            liquidity_delta,
            fee_growth_0,
            fee_growth_1,
            false,
            self.max_liquidity_per_tick,
        )?;
        let (upper_info, flipped_upper) = self.ticks.preview_update(
            tick_upper,
            tick_current,
            liquidity_delta,
            fee_growth_0,
            fee_growth_1,
            true,
            self.max_liquidity_per_tick,
        )?;

        let (inside_0, inside_1) = tick::fee_growth_inside(
            &lower_info,
            &upper_info,
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_0,
            fee_growth_1,
        );

        let position_key = PositionKey::new(owner, tick_lower, tick_upper);
        let (position_info, fees0, fees1) = self
            .positions
            .get_or_default(&position_key)
            .updated(liquidity_delta, inside_0, inside_1)?;

        let (amount0, amount1) = if liquidity_delta == 0 {
            (U256::zero(), U256::zero())
        } else {
            self.amounts_for_liquidity(
                tick_lower,
                tick_upper,
                liquidity_delta.unsigned_abs(),
                liquidity_delta > 0,
            )?
        };

        let liquidity_after = if tick_lower <= tick_current && tick_current < tick_upper {
            add_delta(self.liquidity, liquidity_delta)?
        } else {
            self.liquidity
        };

        // Commit
        self.ticks.apply(tick_lower, lower_info, flipped_lower)?;
        self.ticks.apply(tick_upper, upper_info, flipped_upper)?;
        self.positions.apply(position_key, position_info);
        self.liquidity = liquidity_after;

        msg!(
            "Liquidity modified: owner={}, range=[{}, {}], delta={}, amount0={}, amount1={}, pool liquidity={}",
            owner,
            tick_lower,
            tick_upper,
            liquidity_delta,
            amount0,
            amount1,
            self.liquidity
        );

        Ok(ModifyLiquidityResult {
            amount0,
            amount1,
            fees0,
            fees1,
        })
    }

    /// Withdraws fees owed to a position, capped at the owed amounts.
    ///
    /// # Returns
    /// * `Result<(U256, U256)>` - The token0 and token1 amounts collected
    pub fn collect(
        &mut self,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: U256,
        amount1_requested: U256,
    ) -> Result<(U256, U256)> {
        self.require_initialized()?;
        let (amount0, amount1) = self.positions.collect(
            &owner,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        );
        msg!(
            "Fees collected: owner={}, range=[{}, {}], amount0={}, amount1={}",
            owner,
            tick_lower,
            tick_upper,
            amount0,
            amount1
        );
        Ok((amount0, amount1))
    }

    /// Sets the protocol share of the LP fee for future swaps
    pub fn set_protocol_fee(&mut self, protocol_fee: u16) -> Result<()> {
        self.require_initialized()?;
        require!(
            protocol_fee <= MAX_PROTOCOL_FEE,
            ErrorCode::InvalidProtocolFee
        );
        let previous = self.slot0.protocol_fee;
        self.slot0.protocol_fee = protocol_fee;
        msg!("Protocol fee updated: {} -> {}", previous, protocol_fee);
        Ok(())
    }

    /// Sets the LP fee of a dynamic-fee pool
    pub fn update_dynamic_lp_fee(&mut self, lp_fee: u32) -> Result<()> {
        self.require_initialized()?;
        require!(
            self.key.is_dynamic_fee() && lp_fee <= MAX_LP_FEE,
            ErrorCode::InvalidFee
        );
        let previous = self.slot0.lp_fee;
        self.slot0.lp_fee = lp_fee;
        msg!("Dynamic LP fee updated: {} -> {}", previous, lp_fee);
        Ok(())
    }

    /// Withdraws accrued protocol fees, capped at the accrued amounts
    pub fn collect_protocol(
        &mut self,
        amount0_requested: U256,
        amount1_requested: U256,
    ) -> Result<(U256, U256)> {
        self.require_initialized()?;
        let amount0 = amount0_requested.min(self.protocol_fees_0);
        let amount1 = amount1_requested.min(self.protocol_fees_1);
        self.protocol_fees_0 -= amount0;
        self.protocol_fees_1 -= amount1;
        msg!(
            "Protocol fees collected: amount0={}, amount1={}",
            amount0,
            amount1
        );
        Ok((amount0, amount1))
    }

    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    pub fn id(&self) -> Result<PoolId> {
        self.key.id()
    }

    pub fn slot0(&self) -> Slot0 {
        self.slot0
    }

    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Global fee growth for token0 and token1
    pub fn fee_growth_globals(&self) -> (U256, U256) {
        (self.fee_growth_global_0_x128, self.fee_growth_global_1_x128)
    }

    /// Protocol fees accrued and not yet collected
    pub fn protocol_fees(&self) -> (U256, U256) {
        (self.protocol_fees_0, self.protocol_fees_1)
    }

    pub fn max_liquidity_per_tick(&self) -> u128 {
        self.max_liquidity_per_tick
    }

    pub fn tick_info(&self, tick: i32) -> Option<TickInfo> {
        self.ticks.get(tick).copied()
    }

    pub fn ticks(&self) -> &TickTable {
        &self.ticks
    }

    pub fn position(&self, owner: &Pubkey, tick_lower: i32, tick_upper: i32) -> Option<PositionInfo> {
        self.positions.get(owner, tick_lower, tick_upper).copied()
    }

    pub fn positions(&self) -> &PositionLedger {
        &self.positions
    }

    /// Current fee growth inside a range
    pub fn fee_growth_inside(&self, tick_lower: i32, tick_upper: i32) -> Result<(U256, U256)> {
        self.require_initialized()?;
        self.check_ticks(tick_lower, tick_upper)?;
        Ok(self.ticks.fee_growth_inside(
            tick_lower,
            tick_upper,
            self.slot0.tick,
            self.fee_growth_global_0_x128,
            self.fee_growth_global_1_x128,
        ))
    }

    /// Token amounts a position would receive if fully withdrawn at the current price
    ///
    /// Rounded down, excluding owed fees. An unknown position holds nothing.
    pub fn position_token_amounts(
        &self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(U256, U256)> {
        self.require_initialized()?;
        self.check_ticks(tick_lower, tick_upper)?;
        let liquidity = self
            .positions
            .get(owner, tick_lower, tick_upper)
            .map_or(0, |position| position.liquidity);
        if liquidity == 0 {
            return Ok((U256::zero(), U256::zero()));
        }
        self.amounts_for_liquidity(tick_lower, tick_upper, liquidity, false)
    }
}
