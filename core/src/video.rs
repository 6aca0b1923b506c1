//! Framebuffer staging for a 2D canvas

use crate::engine::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// RGBA staging buffer the engine renders into and the host presents.
///
/// Engines produce packed `0xAARRGGBB` pixels; canvases want `R, G, B, A`
/// byte order.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    rgba: Vec<u8>,
    width: usize,
    height: usize,
    frame_count: u64,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rgba: vec![0; 4 * width * height],
            width,
            height,
            frame_count: 0,
        }
    }

    /// Copy a frame of packed ARGB pixels in and count it.
    ///
    /// Extra input pixels are ignored; a short frame leaves the tail of the
    /// previous one in place.
    pub fn blit_argb(&mut self, pixels: &[u32]) {
        for (dst, &pixel) in self.rgba.chunks_exact_mut(4).zip(pixels) {
            dst[0] = (pixel >> 16) as u8;
            dst[1] = (pixel >> 8) as u8;
            dst[2] = pixel as u8;
            dst[3] = (pixel >> 24) as u8;
        }
        self.frame_count += 1;
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames blitted since creation
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
