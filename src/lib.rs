//! Decoding and Encoding of GIF Images
//!
//! Copyright (C) 2025 Imazen LLC
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU Affero General Public License as published
//! by the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! For commercial licensing inquiries: support@imazen.io
//!
//! This crate provides both encoding and decoding of GIF87a and GIF89a
//! images, including animations: LSB-first bit streams, the variable-width
//! LZW codec with its clear/end-of-information codes and deferred-clear
//! handling, block-level container parsing, and frame composition onto an
//! RGBA canvas honoring disposal methods.
//!
//! Color quantization is out of scope: the encoder consumes frames that an
//! external quantizer has already reduced to an [`IndexedFrame`] (indices,
//! palette, optional transparent index).
//!
//! # Features
//!
//! - `std` (default): file-path conveniences ([`decode_file`],
//!   [`GifEncoder::finish_to_path`]) and `std::io` interop. Everything
//!   else works without it.
//!
//! # no_std Support
//!
//! Both encoding and decoding work in `no_std` environments (requires
//! `alloc`):
//! ```toml
//! [dependencies]
//! zengif = { version = "...", default-features = false }
//! ```
//!
//! # Decoding
//!
//! [`GifDecoder`] parses the container up front and decodes pixels on
//! demand:
//!
//! ```rust,no_run
//! use zengif::GifDecoder;
//!
//! let gif_data: &[u8] = &[]; // your GIF data
//! let decoder = GifDecoder::new(gif_data)?;
//! println!("{}x{}, {} frame(s)", decoder.width(), decoder.height(), decoder.frame_count());
//!
//! for frame in decoder.frames() {
//!     let canvas = frame?;
//!     // canvas.data() is RGBA, canvas.width() x canvas.height()
//! }
//! # Ok::<(), zengif::GifError>(())
//! ```
//!
//! # Encoding
//!
//! ```rust
//! use zengif::{ColorTableEntry, GifEncoder, IndexedFrame};
//!
//! let palette = vec![ColorTableEntry::new(0, 0, 0), ColorTableEntry::new(255, 255, 255)];
//! let frame = IndexedFrame::from_indices(&[0, 1, 1, 0], 2, palette, 0, 0, 2, 2, None);
//!
//! let mut encoder = GifEncoder::new();
//! encoder.add_frame(&frame, Some(10));
//! let gif_bytes = encoder.finish();
//! # assert!(!gif_bytes.is_empty());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

/// LSB-first bit streams over byte buffers.
pub mod bits;
/// RGBA canvas composition for decoded frames.
pub mod canvas;
/// GIF container parsing and on-demand frame decoding.
pub mod decoder;
/// GIF container writing.
pub mod encoder;
/// Wire-format descriptors and packed-byte layouts.
pub mod format;
/// Variable-width LZW compression and decompression.
pub mod lzw;

mod error;
mod slice_reader;

pub use canvas::{Canvas, IndexedFrame};
#[cfg(feature = "std")]
pub use decoder::decode_file;
pub use decoder::{FrameContext, Frames, GifDecoder};
pub use encoder::GifEncoder;
pub use error::GifError;
pub use format::{
    ColorTableEntry, DisposalMethod, GraphicsControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, NetscapeExtension, Version,
};
