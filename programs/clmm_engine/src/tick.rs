/// Defines the state and bookkeeping logic for initialized ticks.
///
/// In the concentrated liquidity model the price range is divided into discrete
/// ticks. When liquidity providers create positions they reference a lower and an
/// upper tick; each referenced tick records how much liquidity starts or stops being
/// active when the price crosses it, and a snapshot of the fee growth that happened
/// on its "outside" (the side away from the current price).
use crate::errors::ErrorCode;
use crate::math::liquidity_math::add_delta;
use crate::math::tick_math::{max_usable_tick, min_usable_tick};
use crate::tick_bitmap::TickBitmap;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

/// State of an initialized tick
///
/// A tick is present in a `TickTable` exactly when `liquidity_gross > 0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Total liquidity of all positions referencing this tick as a boundary
    pub liquidity_gross: u128,
    /// Liquidity added to the active liquidity when the tick is crossed left to right
    pub liquidity_net: i128,
    /// Token0 fee growth per unit of liquidity on the other side of this tick (Q128.128)
    pub fee_growth_outside_0_x128: U256,
    /// Token1 fee growth per unit of liquidity on the other side of this tick (Q128.128)
    pub fee_growth_outside_1_x128: U256,
}

impl TickInfo {
    /// Returns the tick state after a position boundary changes by `liquidity_delta`
    ///
    /// # Arguments
    /// * `tick` - The index of this tick
    /// * `tick_current` - The pool's current tick
    /// * `liquidity_delta` - The signed liquidity change of the position
    /// * `fee_growth_global_0_x128` - Current global token0 fee growth
    /// * `fee_growth_global_1_x128` - Current global token1 fee growth
    /// * `upper` - Whether this tick is the upper boundary of the position
    /// * `max_liquidity` - Maximum gross liquidity the tick may hold
    ///
    /// # Returns
    /// * `Result<(TickInfo, bool)>` - The new state and whether the tick flipped
    ///   between initialized and uninitialized
    #[allow(clippy::too_many_arguments)]
    pub fn updated(
        &self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<(TickInfo, bool)> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;
        require!(
            liquidity_gross_after <= max_liquidity,
            ErrorCode::TickLiquidityOverflow
        );

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);
        let mut next = *self;

        if liquidity_gross_before == 0 && tick <= tick_current {
            // By convention all growth before initialization happened below the tick
            next.fee_growth_outside_0_x128 = fee_growth_global_0_x128;
            next.fee_growth_outside_1_x128 = fee_growth_global_1_x128;
        }

        next.liquidity_gross = liquidity_gross_after;
        next.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or_else(|| error!(ErrorCode::Overflow))?;

        Ok((next, flipped))
    }

    /// Returns the tick state after the price crosses it
    ///
    /// Outside snapshots become `global - outside`, wrapping modulo 2^256.
    pub fn crossed(&self, fee_growth_global_0_x128: U256, fee_growth_global_1_x128: U256) -> TickInfo {
        TickInfo {
            fee_growth_outside_0_x128: fee_growth_global_0_x128
                .overflowing_sub(self.fee_growth_outside_0_x128)
                .0,
            fee_growth_outside_1_x128: fee_growth_global_1_x128
                .overflowing_sub(self.fee_growth_outside_1_x128)
                .0,
            ..*self
        }
    }
}

/// Maximum gross liquidity per tick so that the sum over all usable ticks fits in u128
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = min_usable_tick(tick_spacing);
    let max_tick = max_usable_tick(tick_spacing);
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}

/// Fee growth per unit of liquidity inside `[tick_lower, tick_upper)`
///
/// Computed as `global - below(lower) - above(upper)`; every subtraction wraps, and only
/// differences between two readings of this value are meaningful.
pub fn fee_growth_inside(
    lower: &TickInfo,
    upper: &TickInfo,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let (below_0, below_1) = if tick_current >= tick_lower {
        (lower.fee_growth_outside_0_x128, lower.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128
                .overflowing_sub(lower.fee_growth_outside_0_x128)
                .0,
            fee_growth_global_1_x128
                .overflowing_sub(lower.fee_growth_outside_1_x128)
                .0,
        )
    };

    let (above_0, above_1) = if tick_current < tick_upper {
        (upper.fee_growth_outside_0_x128, upper.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128
                .overflowing_sub(upper.fee_growth_outside_0_x128)
                .0,
            fee_growth_global_1_x128
                .overflowing_sub(upper.fee_growth_outside_1_x128)
                .0,
        )
    };

    (
        fee_growth_global_0_x128
            .overflowing_sub(below_0)
            .0
            .overflowing_sub(above_0)
            .0,
        fee_growth_global_1_x128
            .overflowing_sub(below_1)
            .0
            .overflowing_sub(above_1)
            .0,
    )
}

/// Sparse table of initialized ticks for one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTable {
    tick_spacing: i32,
    ticks: BTreeMap<i32, TickInfo>,
    bitmap: TickBitmap,
}

impl TickTable {
    /// Creates an empty table for ticks aligned to `tick_spacing`
    pub fn new(tick_spacing: i32) -> Self {
        Self {
            tick_spacing,
            ticks: BTreeMap::new(),
            bitmap: TickBitmap::new(),
        }
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    /// Returns the tick's state, or `None` if the tick is not initialized
    pub fn get(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    /// Returns the tick's state, with an uninitialized tick reading as all zeros
    pub fn get_or_default(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, tick: i32) -> bool {
        self.bitmap.is_initialized(tick, self.tick_spacing)
    }

    /// Number of initialized ticks
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Iterates initialized ticks in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (&i32, &TickInfo)> {
        self.ticks.iter()
    }

    pub fn bitmap(&self) -> &TickBitmap {
        &self.bitmap
    }

    /// Computes a tick update without applying it
    #[allow(clippy::too_many_arguments)]
    pub fn preview_update(
        &self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<(TickInfo, bool)> {
        self.get_or_default(tick).updated(
            tick,
            tick_current,
            liquidity_delta,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
            upper,
            max_liquidity,
        )
    }

    /// Stores a previewed tick state, toggling the bitmap if the tick flipped
    ///
    /// A state with zero gross liquidity removes the tick from the table.
    pub fn apply(&mut self, tick: i32, info: TickInfo, flipped: bool) -> Result<()> {
        if flipped {
            self.bitmap.flip_tick(tick, self.tick_spacing)?;
        }
        if info.liquidity_gross == 0 {
            self.ticks.remove(&tick);
        } else {
            self.ticks.insert(tick, info);
        }
        Ok(())
    }

    /// Updates a tick for a position boundary change
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the tick flipped between initialized and uninitialized
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool> {
        let (info, flipped) = self.preview_update(
            tick,
            tick_current,
            liquidity_delta,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
            upper,
            max_liquidity,
        )?;
        self.apply(tick, info, flipped)?;
        Ok(flipped)
    }

    /// Transitions a tick as the price crosses it
    ///
    /// # Returns
    /// * `i128` - The tick's liquidity net, or zero for an uninitialized tick
    pub fn cross(
        &mut self,
        tick: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> i128 {
        match self.ticks.get_mut(&tick) {
            Some(info) => {
                *info = info.crossed(fee_growth_global_0_x128, fee_growth_global_1_x128);
                info.liquidity_net
            }
            None => 0,
        }
    }

    /// Finds the next initialized tick at or below (`lte`) or strictly above `from`
    pub fn next_initialized_tick(&self, from: i32, lte: bool) -> Option<i32> {
        self.bitmap
            .next_initialized_tick(from, self.tick_spacing, lte)
    }

    /// Fee growth inside a range using the table's stored snapshots
    pub fn fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        tick_current: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> (U256, U256) {
        fee_growth_inside(
            &self.get_or_default(tick_lower),
            &self.get_or_default(tick_upper),
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
        )
    }
}
