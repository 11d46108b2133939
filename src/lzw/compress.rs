//! LZW compression: a trie keyed by symbol sequences.

use alloc::vec;
use alloc::vec::Vec;

use super::{clear_code, eoi_code, INVALID_CODE, MAX_CODEBOOK_ENTRIES};
use crate::bits::{BitField, FixedBitReader, VarBitWriter};

/// Miss sentinel meaning the input ran out on a fully mapped sequence.
const EOF_UNIT: u16 = u16::MAX;

/// A trie node: one child slot per possible next symbol, plus the code
/// emitted for the sequence ending here.
#[derive(Clone)]
struct TrieNode {
    children: [u16; 256],
    code: u16,
}

impl TrieNode {
    fn reset(&mut self, code: u16) {
        self.children.fill(INVALID_CODE);
        self.code = code;
    }
}

/// Result of one lookup pass: the code to emit, the node it stopped at,
/// and the symbol that missed (or [`EOF_UNIT`]).
struct Lookup {
    output: BitField,
    entry: u16,
    miss: u16,
}

/// Compression dictionary.
///
/// The node table runs to a couple of megabytes, so it lives in a `Vec`
/// rather than inline in the struct.
struct CompressCodebook {
    min_code_size: u8,
    codebook_size: u16,
    root: TrieNode,
    table: Vec<TrieNode>,
}

impl CompressCodebook {
    fn new(min_code_size: u8) -> Self {
        let empty = TrieNode {
            children: [INVALID_CODE; 256],
            code: 0,
        };
        let mut book = Self {
            min_code_size,
            codebook_size: 0,
            root: empty.clone(),
            table: vec![empty; usize::from(MAX_CODEBOOK_ENTRIES)],
        };
        book.reset();
        book
    }

    /// Restore the initial codebook: identity entries for every raw symbol
    /// plus the two reserved codes.
    fn reset(&mut self) {
        self.codebook_size = eoi_code(self.min_code_size) + 1;
        self.root.children.fill(INVALID_CODE);
        for i in 0..self.codebook_size {
            self.table[usize::from(i)].reset(i);
            self.root.children[usize::from(i)] = i;
        }
    }

    /// Output width for the current dictionary: `ceil(log2(codebook_size))`,
    /// always at least `min_code_size + 1`.
    fn code_width(&self) -> u32 {
        32 - u32::from(self.codebook_size - 1).leading_zeros()
    }

    /// The clear code at the current output width.
    fn clear_code_field(&self) -> BitField {
        BitField::from_value(u32::from(clear_code(self.min_code_size)), self.code_width())
    }

    /// Walk the trie from the root until the input runs out or a
    /// transition misses. On a miss the last symbol is pushed back so the
    /// next lookup restarts on it.
    fn lookup(&self, input: &mut FixedBitReader<'_>) -> Lookup {
        let mut unit = input.read_value() as usize;
        let mut entry = INVALID_CODE;
        let mut node = &self.root;
        while node.children[unit] != INVALID_CODE && !input.is_eof() {
            entry = node.children[unit];
            node = &self.table[usize::from(entry)];
            unit = input.read_value() as usize;
        }
        if node.children[unit] != INVALID_CODE {
            // Input exhausted and the final transition succeeded.
            let last = node.children[unit];
            return Lookup {
                output: BitField::from_value(
                    u32::from(self.table[usize::from(last)].code),
                    self.code_width(),
                ),
                entry: last,
                miss: EOF_UNIT,
            };
        }
        input.rewind(1);
        Lookup {
            output: BitField::from_value(u32::from(node.code), self.code_width()),
            entry,
            miss: unit as u16,
        }
    }

    /// Install the missed transition. Returns an extra code to append when
    /// the stream ends (eoi) or the dictionary is full (clear, after a
    /// full reset).
    fn update(&mut self, last: &Lookup) -> Option<BitField> {
        if last.miss == EOF_UNIT {
            return Some(BitField::from_value(
                u32::from(eoi_code(self.min_code_size)),
                self.code_width(),
            ));
        }

        let next_code = self.codebook_size;
        if next_code == MAX_CODEBOOK_ENTRIES {
            let clear = self.clear_code_field();
            self.reset();
            return Some(clear);
        }

        self.table[usize::from(last.entry)].children[usize::from(last.miss)] = next_code;
        self.table[usize::from(next_code)].reset(next_code);
        self.codebook_size += 1;
        None
    }
}

/// Compress `nbits` worth of `min_code_size`-wide symbols from `indices`
/// into a GIF LZW stream, including the leading clear code and the
/// trailing end-of-information code.
///
/// `min_code_size` must be in `2..=8`.
pub fn compress(indices: &[u8], nbits: usize, min_code_size: u8) -> Vec<u8> {
    debug_assert!((2..=8).contains(&min_code_size));
    let mut input = FixedBitReader::new(indices, nbits, u32::from(min_code_size));
    let mut out = VarBitWriter::new();
    let mut book = CompressCodebook::new(min_code_size);

    out.write(book.clear_code_field());
    if input.is_eof() {
        out.write(BitField::from_value(
            u32::from(eoi_code(min_code_size)),
            book.code_width(),
        ));
        return out.finish();
    }

    while !input.is_eof() {
        let result = book.lookup(&mut input);
        out.write(result.output);
        if let Some(extra) = book.update(&result) {
            out.write(extra);
        }
    }
    out.finish()
}
