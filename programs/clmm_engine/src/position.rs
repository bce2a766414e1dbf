/// Defines the state for liquidity positions and the per-pool position ledger.
///
/// A position is identified by its owner and tick boundaries. It stores the
/// liquidity it contributes, the fee growth inside its range as of its last update,
/// and the fees it has earned but not yet collected.
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

use crate::constants::Q128;
use crate::errors::ErrorCode;
use crate::math::full_math::mul_div;
use crate::math::liquidity_math::add_delta;

/// Identifies a position within a pool
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct PositionKey {
    /// The account that owns this position
    pub owner: Pubkey,
    /// The lower tick boundary. Liquidity is active when the pool's current tick is
    /// at or above this value.
    pub tick_lower: i32,
    /// The upper tick boundary. Liquidity is active when the pool's current tick is
    /// below this value.
    pub tick_upper: i32,
}

impl PositionKey {
    pub fn new(owner: Pubkey, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            owner,
            tick_lower,
            tick_upper,
        }
    }
}

/// State of a single position
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    /// Liquidity provided by this position
    pub liquidity: u128,
    /// Token0 fee growth inside the range at the last update (Q128.128)
    pub fee_growth_inside_0_last_x128: U256,
    /// Token1 fee growth inside the range at the last update (Q128.128)
    pub fee_growth_inside_1_last_x128: U256,
    /// Token0 fees earned and not yet collected
    pub tokens_owed_0: U256,
    /// Token1 fees earned and not yet collected
    pub tokens_owed_1: U256,
}

impl PositionInfo {
    /// Returns the position after applying a liquidity change, crediting fees
    /// earned since the last update
    ///
    /// # Arguments
    /// * `liquidity_delta` - The signed liquidity change
    /// * `fee_growth_inside_0_x128` - Current token0 fee growth inside the range
    /// * `fee_growth_inside_1_x128` - Current token1 fee growth inside the range
    ///
    /// # Returns
    /// * `Result<(PositionInfo, U256, U256)>` - The new state and the token0 and token1
    ///   fees credited by this update
    pub fn updated(
        &self,
        liquidity_delta: i128,
        fee_growth_inside_0_x128: U256,
        fee_growth_inside_1_x128: U256,
    ) -> Result<(PositionInfo, U256, U256)> {
        if liquidity_delta == 0 {
            require!(self.liquidity > 0, ErrorCode::CannotUpdateEmptyPosition);
        }
        let liquidity = add_delta(self.liquidity, liquidity_delta)?;

        let fees_0 = mul_div(
            fee_growth_inside_0_x128
                .overflowing_sub(self.fee_growth_inside_0_last_x128)
                .0,
            U256::from(self.liquidity),
            Q128,
        )?;
        let fees_1 = mul_div(
            fee_growth_inside_1_x128
                .overflowing_sub(self.fee_growth_inside_1_last_x128)
                .0,
            U256::from(self.liquidity),
            Q128,
        )?;

        let next = PositionInfo {
            liquidity,
            fee_growth_inside_0_last_x128: fee_growth_inside_0_x128,
            fee_growth_inside_1_last_x128: fee_growth_inside_1_x128,
            tokens_owed_0: self
                .tokens_owed_0
                .checked_add(fees_0)
                .ok_or_else(|| error!(ErrorCode::Overflow))?,
            tokens_owed_1: self
                .tokens_owed_1
                .checked_add(fees_1)
                .ok_or_else(|| error!(ErrorCode::Overflow))?,
        };
        Ok((next, fees_0, fees_1))
    }
}

/// All positions of one pool
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PositionLedger {
    positions: BTreeMap<PositionKey, PositionInfo>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: &Pubkey, tick_lower: i32, tick_upper: i32) -> Option<&PositionInfo> {
        self.positions
            .get(&PositionKey::new(*owner, tick_lower, tick_upper))
    }

    /// Returns the position state, with an unknown position reading as all zeros
    pub fn get_or_default(&self, key: &PositionKey) -> PositionInfo {
        self.positions.get(key).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionInfo)> {
        self.positions.iter()
    }

    /// Stores a previewed position state
    ///
    /// Positions are kept after their liquidity returns to zero so that owed fees
    /// remain collectable.
    pub fn apply(&mut self, key: PositionKey, info: PositionInfo) {
        self.positions.insert(key, info);
    }

    /// Applies a liquidity change to a position and credits the fees it earned
    ///
    /// # Returns
    /// * `Result<(U256, U256)>` - The token0 and token1 fees credited by this update
    pub fn update(
        &mut self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
        fee_growth_inside_0_x128: U256,
        fee_growth_inside_1_x128: U256,
    ) -> Result<(U256, U256)> {
        let key = PositionKey::new(*owner, tick_lower, tick_upper);
        let (info, fees_0, fees_1) = self.get_or_default(&key).updated(
            liquidity_delta,
            fee_growth_inside_0_x128,
            fee_growth_inside_1_x128,
        )?;
        self.apply(key, info);
        Ok((fees_0, fees_1))
    }

    /// Withdraws owed fees, capped at what the position is owed
    ///
    /// # Returns
    /// * `(U256, U256)` - The amounts actually collected; `{0, 0}` for an unknown position
    pub fn collect(
        &mut self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        amount_0_requested: U256,
        amount_1_requested: U256,
    ) -> (U256, U256) {
        let key = PositionKey::new(*owner, tick_lower, tick_upper);
        match self.positions.get_mut(&key) {
            Some(info) => {
                let amount_0 = amount_0_requested.min(info.tokens_owed_0);
                let amount_1 = amount_1_requested.min(info.tokens_owed_1);
                info.tokens_owed_0 -= amount_0;
                info.tokens_owed_1 -= amount_1;
                (amount_0, amount_1)
            }
            None => (U256::zero(), U256::zero()),
        }
    }
}
