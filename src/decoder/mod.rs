//! GIF container parsing and on-demand frame decoding.
//!
//! [`GifDecoder`] parses a GIF file at the block level, recording frame
//! metadata and the byte offset of each frame's compressed data without
//! decoding pixels. Frames are decompressed and composited on request,
//! either one at a time through [`GifDecoder::decode_frame`] or in
//! sequence through the [`Frames`] iterator, which carries canvas state
//! across disposal methods.
//!
//! # Example
//!
//! ```rust,no_run
//! use zengif::GifDecoder;
//!
//! let data: &[u8] = &[]; // your GIF data
//! let decoder = GifDecoder::new(data)?;
//! println!("{}x{}, {} frame(s)", decoder.width(), decoder.height(), decoder.frame_count());
//!
//! for frame in decoder.frames() {
//!     let canvas = frame?;
//!     println!("canvas has {} bytes of RGBA", canvas.data().len());
//! }
//! # Ok::<(), zengif::GifError>(())
//! ```

mod animation;

pub use animation::Frames;

use alloc::string::String;
use alloc::vec::Vec;

use crate::canvas::{paint, prepare_frame, Canvas, DequantParams, IndexedFrame};
use crate::error::GifError;
use crate::format::{
    color_table_len, ColorTableEntry, GraphicsControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, NetscapeExtension, Version, APPLICATION_LABEL, APPLICATION_SIZE,
    COMMENT_LABEL, EXTENSION_INTRODUCER, GIF87_MAGIC, GIF89_MAGIC, GRAPHICS_CONTROL_LABEL,
    GRAPHICS_CONTROL_SIZE, IMAGE_SEPARATOR, NETSCAPE_AUTH, NETSCAPE_ID, PLAINTEXT_LABEL,
    PLAINTEXT_SIZE, TRAILER,
};
use crate::lzw;
use crate::slice_reader::SliceReader;

/// Per-frame metadata recorded during the container parse.
///
/// Created while parsing and immutable afterwards; the compressed pixel
/// data itself stays in the byte source and is read on demand starting at
/// the recorded offset.
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// Zero-based ordinal in parse order.
    pub frame_number: usize,
    /// The graphics control extension attached to this frame, if any.
    pub control: Option<GraphicsControlExtension>,
    /// The frame's image descriptor.
    pub descriptor: ImageDescriptor,
    /// Local color table; empty when the global table applies.
    pub local_color_table: Vec<ColorTableEntry>,
    /// Minimum LZW code size for the frame's compressed data, 2..=8.
    pub min_code_size: u8,
    /// Byte offset where the compressed image sub-blocks begin.
    image_data_start: usize,
}

impl FrameContext {
    /// The frame's transparent index, if its control block enables one.
    pub fn transparency(&self) -> Option<u8> {
        self.control.as_ref().and_then(|gce| gce.transparency())
    }

    /// Frame delay in 10 ms units, 0 when no control block was present.
    pub fn delay(&self) -> u16 {
        self.control.as_ref().map_or(0, |gce| gce.delay)
    }
}

/// Parsed GIF container over a borrowed byte source.
///
/// Parsing records block structure only; pixel data is decompressed per
/// frame when asked for. The byte source must stay alive for the life of
/// the decoder.
pub struct GifDecoder<'a> {
    data: &'a [u8],
    version: Version,
    screen: LogicalScreenDescriptor,
    global_color_table: Vec<ColorTableEntry>,
    frames: Vec<FrameContext>,
    netscape: Option<NetscapeExtension>,
    comments: Vec<String>,
}

impl<'a> GifDecoder<'a> {
    /// Parse a GIF file from a byte slice.
    pub fn new(data: &'a [u8]) -> Result<Self, GifError> {
        let mut reader = SliceReader::new(data);

        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic)?;
        let version = if &magic == GIF87_MAGIC {
            Version::Gif87a
        } else if &magic == GIF89_MAGIC {
            Version::Gif89a
        } else {
            return Err(GifError::InvalidHeader);
        };

        let mut lsd = [0u8; 7];
        reader.read_exact(&mut lsd)?;
        let screen = LogicalScreenDescriptor::from_bytes(&lsd);

        let global_color_table = if screen.gct_present {
            read_color_table(&mut reader, screen.gct_size)?
        } else {
            Vec::new()
        };

        let mut decoder = Self {
            data,
            version,
            screen,
            global_color_table,
            frames: Vec::new(),
            netscape: None,
            comments: Vec::new(),
        };

        let mut active_control: Option<GraphicsControlExtension> = None;
        loop {
            let marker = reader.read_u8()?;
            let consume_control = active_control.is_some();

            match marker {
                EXTENSION_INTRODUCER => {
                    if decoder.version != Version::Gif89a {
                        return Err(GifError::NotSupported);
                    }
                    decoder.parse_extension(&mut reader, &mut active_control)?;
                }
                IMAGE_SEPARATOR => decoder.parse_image(&mut reader, &mut active_control)?,
                TRAILER => break,
                _ => {}
            }

            // A control block applies to exactly the next block; anything
            // older is dropped.
            if consume_control {
                active_control = None;
            }
        }

        Ok(decoder)
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u16 {
        self.screen.canvas_width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u16 {
        self.screen.canvas_height
    }

    /// Number of frames in parse order.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The container version declared in the header.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The parsed logical screen descriptor.
    pub fn screen_descriptor(&self) -> &LogicalScreenDescriptor {
        &self.screen
    }

    /// The global color table; empty when the file carries none.
    pub fn global_color_table(&self) -> &[ColorTableEntry] {
        &self.global_color_table
    }

    /// Index of the background color in the global table.
    pub fn background_color_index(&self) -> u8 {
        self.screen.bg_color_index
    }

    /// NETSCAPE loop count, if the file carries a looping extension.
    pub fn loop_count(&self) -> Option<u16> {
        self.netscape.as_ref().map(|n| n.loop_count)
    }

    /// Comment extension payloads, one string per extension.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Frame metadata in parse order.
    pub fn frame_contexts(&self) -> &[FrameContext] {
        &self.frames
    }

    /// Decode a single frame onto a canvas prepared from `previous`.
    ///
    /// `previous` is the carry-forward canvas from the preceding frame and
    /// must match the logical screen dimensions; use
    /// [`Canvas::blank`] (or the [`Frames`] iterator, which manages this)
    /// for the first frame.
    pub fn decode_frame(
        &self,
        frame: &FrameContext,
        previous: &Canvas,
    ) -> Result<Canvas, GifError> {
        let mut reader = SliceReader::new(self.data);
        reader.seek_to(frame.image_data_start)?;
        let compressed = concat_subblocks(&mut reader)?;

        let (indices, bit_len) = lzw::decompress(&compressed, frame.min_code_size)?;

        let desc = &frame.descriptor;
        let indexed = IndexedFrame {
            indices,
            palette: Vec::new(),
            bits_per_index: frame.min_code_size,
            bit_len,
            x: desc.x,
            y: desc.y,
            width: desc.width,
            height: desc.height,
            transparent_index: frame.transparency(),
        };
        let params = DequantParams {
            interlaced: desc.interlaced,
            disposal: frame.control.as_ref().map(|gce| gce.disposal),
        };
        // Local table wins over the global one; the choice is resolved
        // here rather than stored in the frame.
        let palette = if desc.lct_present {
            &frame.local_color_table
        } else {
            &self.global_color_table
        };

        let mut canvas = prepare_frame(previous, &params, desc.x, desc.y, desc.width, desc.height);
        paint(&mut canvas, &params, &indexed, palette);
        Ok(canvas)
    }

    /// Iterate over decoded frames, carrying canvas state between them.
    pub fn frames(&self) -> Frames<'a, '_> {
        Frames::new(self)
    }

    /// Decode every frame in order, handing each canvas to `callback`.
    pub fn foreach_frame<F>(&self, mut callback: F) -> Result<(), GifError>
    where
        F: FnMut(Canvas),
    {
        for frame in self.frames() {
            callback(frame?);
        }
        Ok(())
    }

    fn parse_extension(
        &mut self,
        reader: &mut SliceReader<'a>,
        active_control: &mut Option<GraphicsControlExtension>,
    ) -> Result<(), GifError> {
        let label = reader.read_u8()?;
        match label {
            GRAPHICS_CONTROL_LABEL => {
                let size = reader.read_u8()?;
                if size != GRAPHICS_CONTROL_SIZE {
                    return Err(GifError::InvalidBlockSize(size));
                }
                let mut payload = [0u8; 4];
                reader.read_exact(&mut payload)?;
                if reader.read_u8()? != 0 {
                    return Err(GifError::MissingBlockTerminator);
                }
                *active_control = Some(GraphicsControlExtension::from_bytes(&payload));
                Ok(())
            }
            PLAINTEXT_LABEL => {
                let size = reader.read_u8()?;
                if size != PLAINTEXT_SIZE {
                    return Err(GifError::InvalidBlockSize(size));
                }
                reader.skip(usize::from(PLAINTEXT_SIZE))?;
                skip_subblocks(reader)
            }
            APPLICATION_LABEL => {
                let size = reader.read_u8()?;
                if size != APPLICATION_SIZE {
                    return Err(GifError::InvalidBlockSize(size));
                }
                self.parse_application(reader)
            }
            COMMENT_LABEL => {
                let payload = concat_subblocks(reader)?;
                self.comments
                    .push(String::from_utf8_lossy(&payload).into_owned());
                Ok(())
            }
            other => Err(GifError::InvalidExtensionLabel(other)),
        }
    }

    fn parse_application(&mut self, reader: &mut SliceReader<'a>) -> Result<(), GifError> {
        let mut identifier = [0u8; 8];
        reader.read_exact(&mut identifier)?;
        let mut auth = [0u8; 3];
        reader.read_exact(&mut auth)?;

        if &identifier != NETSCAPE_ID || &auth != NETSCAPE_AUTH {
            // Unknown application data is consumed silently.
            return skip_subblocks(reader);
        }

        let first_len = reader.read_u8()?;
        if first_len != 3 {
            reader.seek_back(1);
            return skip_subblocks(reader);
        }
        let sub_type = reader.read_u8()?;
        if sub_type == 0x01 {
            let loop_count = reader.read_u16_le()?;
            self.netscape = Some(NetscapeExtension { loop_count });
        } else {
            // Unknown NETSCAPE sub-block type: skip its two payload bytes.
            reader.skip(2)?;
        }
        if reader.read_u8()? != 0 {
            return Err(GifError::InvalidApplicationData);
        }
        Ok(())
    }

    fn parse_image(
        &mut self,
        reader: &mut SliceReader<'a>,
        active_control: &mut Option<GraphicsControlExtension>,
    ) -> Result<(), GifError> {
        let frame_number = self.frames.len();

        let mut desc_bytes = [0u8; 9];
        reader.read_exact(&mut desc_bytes)?;
        let descriptor = ImageDescriptor::from_bytes(&desc_bytes);

        let local_color_table = if descriptor.lct_present {
            read_color_table(reader, descriptor.lct_size)?
        } else {
            Vec::new()
        };

        let min_code_size = reader.read_u8()?;
        if !(2..=8).contains(&min_code_size) {
            return Err(GifError::NotSupported);
        }

        let image_data_start = reader.position();
        // Frame pixels are decoded on demand; skip them for now.
        skip_subblocks(reader)?;

        self.frames.push(FrameContext {
            frame_number,
            control: active_control.take(),
            descriptor,
            local_color_table,
            min_code_size,
            image_data_start,
        });
        Ok(())
    }
}

/// Read `2^(size_exponent + 1)` color table entries.
fn read_color_table(
    reader: &mut SliceReader<'_>,
    size_exponent: u8,
) -> Result<Vec<ColorTableEntry>, GifError> {
    let len = color_table_len(size_exponent);
    let raw = reader.take_slice(len * 3)?;
    Ok(raw
        .chunks_exact(3)
        .map(|rgb| ColorTableEntry::new(rgb[0], rgb[1], rgb[2]))
        .collect())
}

/// Skip a sub-block run, consuming its zero terminator.
fn skip_subblocks(reader: &mut SliceReader<'_>) -> Result<(), GifError> {
    loop {
        let len = reader.read_u8()?;
        if len == 0 {
            return Ok(());
        }
        reader.skip(usize::from(len))?;
    }
}

/// Concatenate a sub-block run's payload bytes, consuming the terminator.
pub(crate) fn concat_subblocks(reader: &mut SliceReader<'_>) -> Result<Vec<u8>, GifError> {
    let mut out = Vec::new();
    loop {
        let len = reader.read_u8()?;
        if len == 0 {
            return Ok(out);
        }
        out.extend_from_slice(reader.take_slice(usize::from(len))?);
    }
}

/// Read a GIF file from disk and hand every decoded frame to `callback`.
#[cfg(feature = "std")]
pub fn decode_file<P, F>(path: P, callback: F) -> Result<(), GifError>
where
    P: AsRef<std::path::Path>,
    F: FnMut(Canvas),
{
    let data = std::fs::read(path).map_err(|_| GifError::FileNotFound)?;
    GifDecoder::new(&data)?.foreach_frame(callback)
}
