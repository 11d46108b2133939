//! Variable-width LZW codec for GIF image data.
//!
//! GIF LZW reserves two codes on top of the raw symbol alphabet: the
//! *clear* code (`1 << min_code_size`) resets the dictionary, and the
//! *end-of-information* code (`clear + 1`) terminates the stream. Code
//! widths grow with the dictionary, starting at `min_code_size + 1` bits
//! and capped at 12 bits by the 4096-entry ceiling.
//!
//! When the dictionary saturates, the compressor emits a clear code and
//! starts over. Other encoders instead keep running at 12 bits for a while
//! (a *deferred clear*); the decompressor accepts both by pinning its read
//! width once the table is full and installing no further entries until a
//! clear arrives.

mod compress;
mod decompress;

pub use compress::compress;
pub use decompress::decompress;

/// Hard ceiling on dictionary entries (12-bit codes).
pub(crate) const MAX_CODEBOOK_ENTRIES: u16 = 1 << 12;

/// Largest code a saturated dictionary can hold.
pub(crate) const HIGHEST_CODEBOOK_ENTRY: u16 = MAX_CODEBOOK_ENTRIES - 1;

/// Sentinel for absent trie links and an unset previous code.
pub(crate) const INVALID_CODE: u16 = u16::MAX;

/// The dictionary-reset code for a given minimum code size.
#[inline]
pub(crate) fn clear_code(min_code_size: u8) -> u16 {
    1 << min_code_size
}

/// The end-of-information code for a given minimum code size.
#[inline]
pub(crate) fn eoi_code(min_code_size: u8) -> u16 {
    clear_code(min_code_size) + 1
}
