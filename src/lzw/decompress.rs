//! LZW decompression: a parent-linked entry table rebuilt one code behind
//! the compressor.

use alloc::vec;
use alloc::vec::Vec;

use super::{clear_code, eoi_code, HIGHEST_CODEBOOK_ENTRY, INVALID_CODE, MAX_CODEBOOK_ENTRIES};
use crate::bits::{FixedBitWriter, VarBitReader};
use crate::error::GifError;

/// One dictionary entry. Sequences are stored as parent links; `next` is
/// the in-node scratch used to replay a back-traced chain front to back
/// without a separate stack.
#[derive(Clone, Copy)]
struct Entry {
    parent: u16,
    next: u16,
    /// Symbol this entry appends to its parent's sequence.
    decoded: u8,
    /// First symbol of the full sequence.
    base: u8,
}

struct DecompressCodebook {
    min_code_size: u8,
    codebook_size: u16,
    prev_code: u16,
    table: Vec<Entry>,
}

impl DecompressCodebook {
    fn new(min_code_size: u8) -> Self {
        let mut book = Self {
            min_code_size,
            codebook_size: 0,
            prev_code: INVALID_CODE,
            table: vec![
                Entry {
                    parent: INVALID_CODE,
                    next: INVALID_CODE,
                    decoded: 0,
                    base: 0,
                };
                usize::from(MAX_CODEBOOK_ENTRIES)
            ],
        };
        book.reset();
        book
    }

    fn reset(&mut self) {
        self.codebook_size = eoi_code(self.min_code_size) + 1;
        self.prev_code = INVALID_CODE;
        for i in 0..self.codebook_size {
            self.table[usize::from(i)] = Entry {
                parent: INVALID_CODE,
                next: INVALID_CODE,
                decoded: i as u8,
                base: i as u8,
            };
        }
    }

    /// Read width: one step behind the compressor, pinned at 12 bits once
    /// the table saturates so deferred-clear streams keep decoding.
    fn read_width(&self) -> u32 {
        32 - u32::from(self.codebook_size.min(HIGHEST_CODEBOOK_ENTRY)).leading_zeros()
    }

    fn saturated(&self) -> bool {
        self.codebook_size == MAX_CODEBOOK_ENTRIES
    }

    /// Emit the sequence for `code` by back-tracing parent links to the
    /// root entry, caching the forward path in the scratch links, then
    /// walking it front to back.
    fn emit_sequence(&mut self, code: u16, out: &mut FixedBitWriter) {
        let mut cur = code;
        self.table[usize::from(cur)].next = INVALID_CODE;
        while self.table[usize::from(cur)].parent != INVALID_CODE {
            let child = cur;
            cur = self.table[usize::from(cur)].parent;
            self.table[usize::from(cur)].next = child;
        }
        while cur != INVALID_CODE {
            out.write(u32::from(self.table[usize::from(cur)].decoded));
            cur = self.table[usize::from(cur)].next;
        }
    }

    fn install(&mut self, parent: u16, decoded: u8, base: u8) {
        self.table[usize::from(self.codebook_size)] = Entry {
            parent,
            next: INVALID_CODE,
            decoded,
            base,
        };
        self.codebook_size += 1;
    }

    /// Consume the mandatory clear code at the head of the stream.
    fn expect_initial_clear(&self, input: &mut VarBitReader<'_>) -> Result<(), GifError> {
        if input.is_eof() {
            return Err(GifError::UnexpectedEof);
        }
        let start = input.read_value(self.read_width()) as u16;
        if start != clear_code(self.min_code_size) {
            return Err(GifError::MissingInitialClearCode);
        }
        if input.is_eof() {
            return Err(GifError::UnexpectedEof);
        }
        Ok(())
    }

    /// Process one code. Returns `true` when end-of-information was
    /// consumed.
    fn step(
        &mut self,
        input: &mut VarBitReader<'_>,
        out: &mut FixedBitWriter,
    ) -> Result<bool, GifError> {
        if input.is_eof() {
            return Err(GifError::UnexpectedEof);
        }

        let code = input.read_value(self.read_width()) as u16;
        if code == eoi_code(self.min_code_size) {
            input.seek_end();
            return Ok(true);
        }
        if code == clear_code(self.min_code_size) {
            self.reset();
            return Ok(false);
        }
        // A data code with nothing after it means the stream lost its
        // end-of-information code.
        if input.is_eof() {
            return Err(GifError::UnexpectedEof);
        }

        if self.prev_code == INVALID_CODE {
            // First code after a clear: must name a root entry.
            if code >= self.codebook_size {
                return Err(GifError::InvalidCompressCode);
            }
            out.write(u32::from(self.table[usize::from(code)].base));
        } else if code < self.codebook_size {
            self.emit_sequence(code, out);
            if !self.saturated() {
                let decoded = self.table[usize::from(code)].base;
                let base = self.table[usize::from(self.prev_code)].base;
                self.install(self.prev_code, decoded, base);
            }
        } else if code == self.codebook_size {
            // The sequence being named is the one the compressor is in the
            // middle of defining: previous sequence plus its own first
            // symbol.
            if self.prev_code >= self.codebook_size {
                return Err(GifError::InvalidCompressCode);
            }
            self.emit_sequence(self.prev_code, out);
            let base = self.table[usize::from(self.prev_code)].base;
            out.write(u32::from(base));
            if !self.saturated() {
                self.install(self.prev_code, base, base);
            }
        } else {
            return Err(GifError::InvalidCompressCode);
        }

        self.prev_code = code;
        Ok(false)
    }
}

/// Decompress a GIF LZW stream into `min_code_size`-wide symbols.
///
/// Returns the decoded index buffer and the number of bits written to it.
/// `min_code_size` must be in `2..=8`.
pub fn decompress(data: &[u8], min_code_size: u8) -> Result<(Vec<u8>, usize), GifError> {
    debug_assert!((2..=8).contains(&min_code_size));
    let mut input = VarBitReader::new(data, data.len() * 8);
    let mut out = FixedBitWriter::new(u32::from(min_code_size));
    let mut book = DecompressCodebook::new(min_code_size);

    book.expect_initial_clear(&mut input)?;
    while !input.is_eof() {
        if book.step(&mut input, &mut out)? {
            break;
        }
    }

    let bits = out.bit_len();
    Ok((out.finish(), bits))
}
