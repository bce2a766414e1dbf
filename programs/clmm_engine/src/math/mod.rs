/// Pool Engine Math Library
///
/// This module implements the fixed-point arithmetic required for concentrated
/// liquidity: multiply-divide with 512-bit intermediates, tick and sqrt price
/// conversion, token amounts for liquidity ranges, and single swap steps.
///
/// Sqrt prices use Q64.96 (scaled by 2^96) and fee growth uses Q128.128 (scaled by
/// 2^128). No floating point is used anywhere, so identical inputs always produce
/// bit-identical outputs.
pub mod full_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use full_math::*;
pub use liquidity_math::*;
pub use sqrt_price_math::*;
pub use swap_math::*;
pub use tick_math::*;
