//! 256-bit multiply-divide with a 512-bit intermediate.
//!
//! Every price and fee computation in the engine funnels through these helpers so
//! that the product of two 256-bit values never overflows before the division.

use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

/// Narrows a 512-bit value back to 256 bits, failing if any high limb is set
#[inline(always)]
fn narrow(value: U512) -> Result<U256> {
    let limbs = value.0;
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return err!(ErrorCode::Overflow);
    }
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Calculates ⌊a·b / denominator⌋ with full precision
///
/// # Arguments
/// * `a` - The multiplicand
/// * `b` - The multiplier
/// * `denominator` - The divisor
///
/// # Returns
/// * `Result<U256>` - The floored quotient, or `Overflow` if the denominator is
///   zero or the quotient does not fit in 256 bits
#[inline(always)]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(!denominator.is_zero(), ErrorCode::Overflow);
    let product = a.full_mul(b);
    narrow(product / U512::from(denominator))
}

/// Calculates ⌈a·b / denominator⌉ with full precision
///
/// Used wherever rounding must favour the pool, e.g. amounts a trader pays in.
#[inline(always)]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(!denominator.is_zero(), ErrorCode::Overflow);
    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let quotient = narrow(product / denominator)?;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or_else(|| error!(ErrorCode::Overflow))
    }
}

/// Divides two 256-bit values, rounding up
///
/// Returns `Overflow` for a zero divisor.
#[inline(always)]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256> {
    require!(!b.is_zero(), ErrorCode::Overflow);
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        // quotient < U256::MAX whenever b > 1, and b == 1 never leaves a remainder
        Ok(quotient + U256::one())
    }
}
