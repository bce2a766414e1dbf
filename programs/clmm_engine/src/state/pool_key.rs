use crate::constants::{DYNAMIC_FEE_FLAG, MAX_LP_FEE, MAX_TICK_SPACING, MIN_TICK_SPACING};
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;

/// Identifies a pool: the ordered currency pair, the fee tier, the tick spacing and
/// an optional extension identifier.
///
/// Two keys that differ in any field describe different pools, even for the same
/// currency pair.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    /// The lower-ordered currency of the pair
    pub currency0: Pubkey,
    /// The higher-ordered currency of the pair
    pub currency1: Pubkey,
    /// LP fee in pips, or `DYNAMIC_FEE_FLAG`
    pub fee: u32,
    /// Spacing between usable ticks
    pub tick_spacing: i32,
    /// Optional extension identifier. Carried as identity only.
    pub hooks: Option<Pubkey>,
}

/// Deterministic 32-byte pool identifier
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct PoolId(pub [u8; 32]);

impl PoolKey {
    pub fn new(currency0: Pubkey, currency1: Pubkey, fee: u32, tick_spacing: i32) -> Self {
        Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Pubkey) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Whether the LP fee of this pool is set at runtime
    pub fn is_dynamic_fee(&self) -> bool {
        self.fee == DYNAMIC_FEE_FLAG
    }

    /// Checks that the key describes a pool the engine can run
    ///
    /// # Returns
    /// * `InvalidPoolKey` - The currencies are equal or not in ascending order
    /// * `InvalidTickSpacing` - The spacing is outside `[MIN_TICK_SPACING, MAX_TICK_SPACING]`
    /// * `InvalidFee` - The fee exceeds `MAX_LP_FEE` and is not the dynamic sentinel
    pub fn validate(&self) -> Result<()> {
        require!(self.currency0 < self.currency1, ErrorCode::InvalidPoolKey);
        require!(
            (MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&self.tick_spacing),
            ErrorCode::InvalidTickSpacing
        );
        require!(
            self.is_dynamic_fee() || self.fee <= MAX_LP_FEE,
            ErrorCode::InvalidFee
        );
        Ok(())
    }

    /// Derives the pool identifier: SHA-256 of the Borsh encoding of the key
    pub fn id(&self) -> Result<PoolId> {
        let mut encoded = Vec::with_capacity(32 + 32 + 4 + 4 + 33);
        AnchorSerialize::serialize(self, &mut encoded)
            .map_err(|_| error!(ErrorCode::InvalidPoolKey))?;
        Ok(PoolId(hash(&encoded).to_bytes()))
    }
}
