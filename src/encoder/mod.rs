//! GIF container writer.
//!
//! Frames are appended as they arrive; the header, logical screen
//! descriptor, global color table, and looping extension live in a region
//! reserved up front and are backfilled by [`GifEncoder::finish`]. The
//! logical screen grows to the maximum extent any frame reaches.
//!
//! # Example
//!
//! ```rust
//! use zengif::{ColorTableEntry, GifEncoder, IndexedFrame};
//!
//! let palette = vec![ColorTableEntry::new(0, 0, 0), ColorTableEntry::new(255, 255, 255)];
//! let frame = IndexedFrame::from_indices(&[0, 1, 1, 0], 2, palette, 0, 0, 2, 2, None);
//!
//! let mut encoder = GifEncoder::new();
//! encoder.add_frame(&frame, Some(10));
//! let bytes = encoder.finish();
//! assert_eq!(&bytes[..6], b"GIF89a");
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::canvas::IndexedFrame;
use crate::format::{
    padded_color_table, ColorTableEntry, DisposalMethod, GraphicsControlExtension,
    ImageDescriptor, LogicalScreenDescriptor, APPLICATION_LABEL, APPLICATION_SIZE,
    EXTENSION_INTRODUCER, GIF89_MAGIC, GRAPHICS_CONTROL_LABEL, GRAPHICS_CONTROL_SIZE,
    IMAGE_SEPARATOR, NETSCAPE_AUTH, NETSCAPE_ID, TRAILER,
};
use crate::lzw;

const HEADER_LEN: usize = 6;
const LSD_LEN: usize = 7;
const GCT_LEN: usize = 256 * 3;
/// Introducer + label + size byte, 11-byte payload, 5-byte loop sub-block.
const NETSCAPE_LEN: usize = 3 + APPLICATION_SIZE as usize + 5;
const RESERVED_LEN: usize = HEADER_LEN + LSD_LEN + GCT_LEN + NETSCAPE_LEN;

/// Largest sub-block payload.
const MAX_SUBBLOCK: usize = 255;

/// Streaming GIF writer with a reserved, backfilled header region.
pub struct GifEncoder {
    sink: Vec<u8>,
    max_width: u16,
    max_height: u16,
    frame_count: usize,
}

impl GifEncoder {
    /// Start a new GIF stream with the backfill region reserved.
    pub fn new() -> Self {
        Self {
            sink: vec![0; RESERVED_LEN],
            max_width: 0,
            max_height: 0,
            frame_count: 0,
        }
    }

    /// Number of frames appended so far.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Append one quantized frame.
    ///
    /// A graphics control block is emitted when the frame carries a
    /// transparent index or a `delay` (in 10 ms units) is given. A
    /// non-empty frame palette becomes a local color table, padded to the
    /// next power-of-two entry count.
    pub fn add_frame(&mut self, frame: &IndexedFrame, delay: Option<u16>) {
        self.max_width = self.max_width.max(frame.x.saturating_add(frame.width));
        self.max_height = self.max_height.max(frame.y.saturating_add(frame.height));

        if frame.transparent_index.is_some() || delay.is_some() {
            let control = GraphicsControlExtension {
                disposal: DisposalMethod::None,
                user_input: false,
                transparent_enabled: frame.transparent_index.is_some(),
                delay: delay.unwrap_or(0),
                transparent_index: frame.transparent_index.unwrap_or(0),
            };
            self.sink.push(EXTENSION_INTRODUCER);
            self.sink.push(GRAPHICS_CONTROL_LABEL);
            self.sink.push(GRAPHICS_CONTROL_SIZE);
            self.sink.extend_from_slice(&control.to_bytes());
            self.sink.push(0);
        }

        let lct_present = !frame.palette.is_empty();
        let (lct_len, lct_size) = if lct_present {
            padded_color_table(frame.palette.len())
        } else {
            (0, 0)
        };
        let descriptor = ImageDescriptor {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            lct_present,
            interlaced: false,
            sorted: false,
            lct_size,
        };
        self.sink.push(IMAGE_SEPARATOR);
        self.sink.extend_from_slice(&descriptor.to_bytes());

        if lct_present {
            for entry in &frame.palette {
                self.sink.extend_from_slice(&[entry.r, entry.g, entry.b]);
            }
            // Pad the table to its declared power-of-two entry count.
            let padding = (lct_len - frame.palette.len()) * 3;
            self.sink.extend(core::iter::repeat(0u8).take(padding));
        }

        self.sink.push(frame.bits_per_index);
        let compressed = lzw::compress(&frame.indices, frame.bit_len, frame.bits_per_index);
        write_subblocks(&mut self.sink, &compressed);

        self.frame_count += 1;
    }

    /// Terminate the stream, backfill the header region, and return the
    /// finished bytes.
    pub fn finish(self) -> Vec<u8> {
        self.finish_inner(None)
    }

    /// Like [`finish`](Self::finish), but also writes `global` (up to 256
    /// entries) into the reserved global color table region.
    pub fn finish_with_palette(self, global: &[ColorTableEntry]) -> Vec<u8> {
        self.finish_inner(Some(global))
    }

    fn finish_inner(mut self, global: Option<&[ColorTableEntry]>) -> Vec<u8> {
        self.sink.push(TRAILER);

        // The looping extension below is an 89a block, so the header is
        // always the 89a one.
        self.sink[..HEADER_LEN].copy_from_slice(GIF89_MAGIC);

        let screen = LogicalScreenDescriptor {
            canvas_width: self.max_width,
            canvas_height: self.max_height,
            gct_present: true,
            color_resolution: 0,
            sort_flag: false,
            gct_size: 7,
            bg_color_index: 0,
            pixel_aspect_ratio: 0,
        };
        self.sink[HEADER_LEN..HEADER_LEN + LSD_LEN].copy_from_slice(&screen.to_bytes());

        if let Some(global) = global {
            let base = HEADER_LEN + LSD_LEN;
            for (i, entry) in global.iter().take(256).enumerate() {
                self.sink[base + i * 3..base + i * 3 + 3]
                    .copy_from_slice(&[entry.r, entry.g, entry.b]);
            }
        }

        let netscape = &mut self.sink[HEADER_LEN + LSD_LEN + GCT_LEN..RESERVED_LEN];
        netscape[0] = EXTENSION_INTRODUCER;
        netscape[1] = APPLICATION_LABEL;
        netscape[2] = APPLICATION_SIZE;
        netscape[3..11].copy_from_slice(NETSCAPE_ID);
        netscape[11..14].copy_from_slice(NETSCAPE_AUTH);
        // Loop sub-block: length, type, loop count (0 = forever), terminator.
        netscape[14] = 0x03;
        netscape[15] = 0x01;
        netscape[16] = 0;
        netscape[17] = 0;
        netscape[18] = 0;

        self.sink
    }

    /// Finish the stream into a `std::io` writer.
    #[cfg(feature = "std")]
    pub fn finish_to<W: std::io::Write>(self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.finish())
    }

    /// Finish the stream into a file at `path`.
    #[cfg(feature = "std")]
    pub fn finish_to_path<P: AsRef<std::path::Path>>(self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.finish())
    }
}

impl Default for GifEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame `data` into sub-blocks of at most 255 bytes plus the zero
/// terminator.
fn write_subblocks(sink: &mut Vec<u8>, data: &[u8]) {
    for chunk in data.chunks(MAX_SUBBLOCK) {
        sink.push(chunk.len() as u8);
        sink.extend_from_slice(chunk);
    }
    sink.push(0);
}
