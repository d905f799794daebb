//! Pixel output: the paint interface, color packing, and a word buffer.
//!
//! The renderer's only side effect is the paint callback. Workers write
//! disjoint row bands, so the target needs no locking - only tolerance for
//! concurrent writes to distinct pixels, which [`PixelBuffer`] provides with
//! relaxed atomic stores.

use glam::Vec4;
use std::sync::atomic::{AtomicU32, Ordering};

/// Pack an RGBA float color into a `0x00RRGGBB` word.
///
/// Channels are scaled by 255, truncated, and wrapped into their byte with
/// `& 0xff`; alpha is dropped. Values outside `[0, 1]` wrap rather than
/// saturate.
#[must_use]
pub fn pack(color: Vec4) -> u32 {
    let r = (color.x * 255.0) as i32 & 0xff;
    let g = (color.y * 255.0) as i32 & 0xff;
    let b = (color.z * 255.0) as i32 & 0xff;
    ((r << 16) | (g << 8) | b) as u32
}

/// Sink for rendered pixels.
///
/// `paint` is called concurrently from worker threads, each owning a
/// disjoint set of rows; implementations must be non-blocking.
pub trait Paint: Sync {
    /// Store one packed `0x00RRGGBB` pixel.
    fn paint(&self, x: u32, y: u32, color: u32);
}

/// The renderer's view of the output image: dimensions plus the paint sink.
pub struct Framebuffer<'a> {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Destination for packed pixels.
    pub target: &'a dyn Paint,
}

/// Owned pixel storage implementing [`Paint`] with relaxed atomic words.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl PixelBuffer {
    /// Allocate a zeroed `width` × `height` buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::new();
        pixels.resize_with((width as usize) * (height as usize), || AtomicU32::new(0));
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packed word at `(x, y)`.
    ///
    /// # Panics
    ///
    /// When the coordinates are out of bounds.
    #[must_use]
    pub fn word(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[(y * self.width + x) as usize].load(Ordering::Relaxed)
    }

    /// Expand the buffer to tightly packed RGBA bytes (alpha forced opaque),
    /// row-major from the top-left - the layout PNG encoders expect.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for word in &self.pixels {
            let word = word.load(Ordering::Relaxed);
            bytes.push((word >> 16) as u8);
            bytes.push((word >> 8) as u8);
            bytes.push(word as u8);
            bytes.push(0xff);
        }
        bytes
    }
}

impl Paint for PixelBuffer {
    fn paint(&self, x: u32, y: u32, color: u32) {
        debug_assert!(x < self.width && y < self.height, "paint out of bounds");
        self.pixels[(y * self.width + x) as usize].store(color, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_primary_colors() {
        assert_eq!(pack(Vec4::new(1.0, 0.0, 0.0, 1.0)), 0x00ff_0000);
        assert_eq!(pack(Vec4::new(0.0, 1.0, 0.0, 0.0)), 0x0000_ff00);
        assert_eq!(pack(Vec4::new(0.0, 0.0, 1.0, 0.5)), 0x0000_00ff);
        assert_eq!(pack(Vec4::ZERO), 0);
    }

    #[test]
    fn pack_drops_alpha_and_truncates() {
        assert_eq!(pack(Vec4::new(0.5, 0.5, 0.5, 0.0)), 0x007f_7f7f);
        // Out-of-range channels wrap through the byte mask.
        assert_eq!(pack(Vec4::new(2.0, 0.0, 0.0, 1.0)), 0x00fe_0000);
    }

    #[test]
    fn paint_and_read_back() {
        let buffer = PixelBuffer::new(4, 3);
        buffer.paint(0, 0, 0x00ff_0000);
        buffer.paint(3, 2, 0x0000_00ff);
        assert_eq!(buffer.word(0, 0), 0x00ff_0000);
        assert_eq!(buffer.word(3, 2), 0x0000_00ff);
        assert_eq!(buffer.word(1, 1), 0);
    }

    #[test]
    fn rgba_expansion_is_row_major() {
        let buffer = PixelBuffer::new(2, 1);
        buffer.paint(0, 0, 0x0011_2233);
        buffer.paint(1, 0, 0x0044_5566);
        assert_eq!(
            buffer.to_rgba(),
            vec![0x11, 0x22, 0x33, 0xff, 0x44, 0x55, 0x66, 0xff]
        );
    }
}
