//! Frame-by-frame animation decoding with carried canvas state.

use crate::canvas::Canvas;
use crate::error::GifError;
use crate::format::DisposalMethod;

use super::GifDecoder;

/// Iterator over decoded frames.
///
/// Each item is the composited canvas for one frame. Between frames the
/// iterator applies the frame's disposal method to decide what the next
/// frame is painted on top of: `RestoreToBackground` clears the frame's
/// region from the carried state, `RestoreToPrevious` leaves the carried
/// state untouched, everything else carries the painted canvas forward.
///
/// The first decode error ends iteration after being yielded.
pub struct Frames<'a, 'd> {
    decoder: &'d GifDecoder<'a>,
    index: usize,
    carry: Canvas,
    failed: bool,
}

impl<'a, 'd> Frames<'a, 'd> {
    pub(super) fn new(decoder: &'d GifDecoder<'a>) -> Self {
        Self {
            decoder,
            index: 0,
            carry: Canvas::blank(decoder.width(), decoder.height()),
            failed: false,
        }
    }
}

impl Iterator for Frames<'_, '_> {
    type Item = Result<Canvas, GifError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.decoder.frame_count() {
            return None;
        }
        let frame = &self.decoder.frame_contexts()[self.index];

        let canvas = match self.decoder.decode_frame(frame, &self.carry) {
            Ok(canvas) => canvas,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };

        match frame.control.as_ref().map(|gce| gce.disposal) {
            Some(DisposalMethod::RestoreToBackground) => {
                let mut next = canvas.clone();
                next.clear_active();
                self.carry = next;
            }
            Some(DisposalMethod::RestoreToPrevious) => {}
            _ => self.carry = canvas.clone(),
        }

        self.index += 1;
        Some(Ok(canvas))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.decoder.frame_count() - self.index;
        (0, Some(remaining))
    }
}
