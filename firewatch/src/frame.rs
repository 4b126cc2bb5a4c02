//! Video frames and the capability that supplies them.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// One RGBA8 frame, row-major. The buffer is shared and never mutated.
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Bytes,
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: impl Into<Bytes>) -> Result<Self> {
        let pixels = pixels.into();
        let expected = width
            .checked_mul(height)
            .and_then(|count| count.checked_mul(CHANNELS))
            .ok_or(Error::FrameTooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(Error::InvalidFrame {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Frame filled with a single opaque color.
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let pixels: Vec<u8> = std::iter::repeat([rgb[0], rgb[1], rgb[2], 255])
            .take(width * height)
            .flatten()
            .collect();

        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

/// Supplier of frames for the detection cycle.
///
/// Returning `None` means no frame is available right now; the cycle is skipped.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Option<Frame>,
{
    fn next_frame(&mut self) -> Option<Frame> {
        self()
    }
}
