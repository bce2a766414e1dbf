/// Tick Bitmap Module
///
/// This module implements a space-efficient bitmap for tracking initialized ticks.
/// It allows for fast traversal of initialized ticks during swap operations without
/// needing to explicitly check every possible tick value.
///
/// Ticks are first compressed by the pool's tick spacing. Each compressed tick maps to
/// one bit of a 256-bit word, and only non-empty words are stored, keyed by their word
/// position. Searching for the next initialized tick therefore inspects at most the
/// current word plus one ordered-map lookup, regardless of how far away the tick is.
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

/// Number of bits in a word
pub const WORD_SIZE: i32 = 256;

/// Compresses a tick by the tick spacing
///
/// # Parameters
/// * `tick` - The tick index, must be a multiple of `tick_spacing`
/// * `tick_spacing` - The spacing between usable ticks
///
/// # Returns
/// * `Result<i32>` - The compressed tick, `InvalidTickSpacing` for a non-positive
///   spacing or `InvalidTickRange` for a misaligned tick
pub fn compress_tick(tick: i32, tick_spacing: i32) -> Result<i32> {
    require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
    require!(tick % tick_spacing == 0, ErrorCode::InvalidTickRange);
    Ok(tick / tick_spacing)
}

/// Calculates the word position and bit position of a compressed tick
///
/// Uses floor semantics so that negative compressed ticks land in negative words
/// (e.g. -1 is bit 255 of word -1).
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xff) as u8)
}

/// Sparse bitmap of initialized ticks for one pool
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickBitmap {
    /// Map from word positions to non-zero bitmap words
    words: BTreeMap<i16, U256>,
}

impl TickBitmap {
    /// Creates a new empty tick bitmap
    pub fn new() -> Self {
        Self {
            words: BTreeMap::new(),
        }
    }

    /// Returns the bitmap word at a word position (zero if absent)
    pub fn word(&self, word_pos: i16) -> U256 {
        self.words.get(&word_pos).copied().unwrap_or_default()
    }

    /// Number of non-empty words stored
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Flips the initialized state of a tick
    ///
    /// # Parameters
    /// * `tick` - The tick to flip, must be aligned to `tick_spacing`
    /// * `tick_spacing` - The spacing between usable ticks
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: i32) -> Result<()> {
        let compressed = compress_tick(tick, tick_spacing)?;
        let (word_pos, bit_pos) = position(compressed);
        let flipped = self.word(word_pos) ^ (U256::one() << bit_pos as u32);

        if flipped.is_zero() {
            self.words.remove(&word_pos);
        } else {
            self.words.insert(word_pos, flipped);
        }
        Ok(())
    }

    /// Checks if a specific tick is initialized in the bitmap
    pub fn is_initialized(&self, tick: i32, tick_spacing: i32) -> bool {
        match compress_tick(tick, tick_spacing) {
            Ok(compressed) => {
                let (word_pos, bit_pos) = position(compressed);
                !(self.word(word_pos) & (U256::one() << bit_pos as u32)).is_zero()
            }
            Err(_) => false,
        }
    }

    /// Finds the next initialized tick in the given direction
    ///
    /// # Parameters
    /// * `tick` - The starting tick, need not be aligned to the spacing
    /// * `tick_spacing` - The spacing between usable ticks
    /// * `lte` - If true, search for the greatest initialized tick at or below `tick`;
    ///   if false, search for the least initialized tick strictly above `tick`
    ///
    /// # Returns
    /// * `Option<i32>` - The initialized tick, or `None` if no tick exists in that direction
    pub fn next_initialized_tick(&self, tick: i32, tick_spacing: i32, lte: bool) -> Option<i32> {
        if tick_spacing <= 0 {
            return None;
        }
        let compressed = tick.div_euclid(tick_spacing);

        let (word_pos, bit) = if lte {
            let (word_pos, bit_pos) = position(compressed);
            // All bits at or below bit_pos
            let mask = if bit_pos == 255 {
                U256::MAX
            } else {
                (U256::one() << (bit_pos as u32 + 1)) - U256::one()
            };
            let masked = self.word(word_pos) & mask;

            if masked.is_zero() {
                let (lower_pos, lower_word) = self.words.range(..word_pos).next_back()?;
                (*lower_pos, 255 - lower_word.leading_zeros())
            } else {
                (word_pos, 255 - masked.leading_zeros())
            }
        } else {
            let (word_pos, bit_pos) = position(compressed.checked_add(1)?);
            // All bits at or above bit_pos
            let mask = !((U256::one() << bit_pos as u32) - U256::one());
            let masked = self.word(word_pos) & mask;

            if masked.is_zero() {
                let (upper_pos, upper_word) = self.words.range(word_pos.checked_add(1)?..).next()?;
                (*upper_pos, upper_word.trailing_zeros())
            } else {
                (word_pos, masked.trailing_zeros())
            }
        };

        Some((word_pos as i32 * WORD_SIZE + bit as i32) * tick_spacing)
    }
}
