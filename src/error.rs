//! Error type shared by the container, LZW, and bit-stream layers.

use thiserror::Error;

/// Errors that can occur while parsing or decoding a GIF.
///
/// Parsing is fail-fast: the first error terminates the parse and is
/// returned verbatim. Partial state held by the decoder at that point is
/// kept for diagnostics but must not be treated as a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GifError {
    /// The input path could not be opened.
    #[cfg(feature = "std")]
    #[error("File not found")]
    FileNotFound,

    /// The byte source ended in the middle of a block, sub-block run, or
    /// compressed code stream.
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// The first six bytes are neither `GIF87a` nor `GIF89a`.
    #[error("Invalid GIF header")]
    InvalidHeader,

    /// The file uses a block its declared version does not allow, or a
    /// minimum code size outside the range this crate decodes.
    #[error("Not supported by the declared GIF version")]
    NotSupported,

    /// An extension introducer was followed by an unknown label.
    #[error("Invalid extension label {0:#04x}")]
    InvalidExtensionLabel(u8),

    /// A fixed-size extension block was not closed by a zero byte.
    #[error("Missing block terminator")]
    MissingBlockTerminator,

    /// A NETSCAPE looping block did not have the documented layout.
    #[error("Invalid application extension data")]
    InvalidApplicationData,

    /// An extension declared a block size other than the one its label
    /// requires.
    #[error("Invalid block size {0}")]
    InvalidBlockSize(u8),

    /// The compressed stream did not begin with a clear code.
    #[error("Missing initial LZW clear code")]
    MissingInitialClearCode,

    /// A compressed code referenced an entry no conforming encoder could
    /// have produced.
    #[error("Invalid LZW compress code")]
    InvalidCompressCode,

    /// A new dictionary entry would have exceeded the 4096-entry ceiling
    /// without a preceding clear code.
    #[error("LZW dictionary overflow")]
    DictionaryOverflow,
}
