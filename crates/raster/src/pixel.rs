//! RGBA8 pixel buffer implementing [`Surface`].
//!
//! Pixel `(x, y)` covers the square `[x, x+1) x [y, y+1)` and is sampled at
//! its center. Colors are blended source-over with straight alpha.

use constellation_core::color::{Rgba, Srgb};
use constellation_core::error::SimError;
use constellation_core::surface::Surface;

/// Row-major RGBA8 raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    background: [u8; 4],
    data: Vec<u8>,
}

impl RasterSurface {
    /// Creates a transparent raster.
    ///
    /// Returns `SimError::InvalidDimensions` if either side is zero or the
    /// byte count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let len = byte_len(width, height).ok_or(SimError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            background: [0, 0, 0, 0],
            data: vec![0; len],
        })
    }

    /// Sets the color `clear_rect` paints and fills the whole buffer with it.
    pub fn with_background(mut self, background: Rgba) -> Self {
        let [r, g, b] = background.color.to_rgb8();
        self.background = [r, g, b, (background.alpha.clamp(0.0, 1.0) * 255.0).round() as u8];
        let bg = self.background;
        self.data.chunks_exact_mut(4).for_each(|px| px.copy_from_slice(&bg));
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Number of pixels that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        self.data
            .chunks_exact(4)
            .filter(|px| **px != self.background[..])
            .count()
    }

    /// Indices of the pixels whose centers fall in `[lo, hi]`, clipped to
    /// an axis of `len` pixels.
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = ((hi - 0.5).floor() + 1.0).min(len as f64);
        if start >= end {
            return 0..0;
        }
        start as usize..end as usize
    }

    fn blend(&mut self, index: usize, rgb: [u8; 3], alpha: f64) {
        let px = &mut self.data[index * 4..index * 4 + 4];
        let sa = alpha.clamp(0.0, 1.0);
        let da = px[3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let s = rgb[c] as f64;
            let d = px[c] as f64;
            px[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
        }
        px[3] = (out_a * 255.0).round() as u8;
    }
}

fn byte_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(4)
}

impl Surface for RasterSurface {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    /// Reallocates to the rounded size, filled with the background.
    /// Non-positive or unrepresentable sizes give an empty buffer.
    fn resize(&mut self, width: f64, height: f64) {
        let w = if width.is_finite() { width.round().max(0.0) as usize } else { 0 };
        let h = if height.is_finite() { height.round().max(0.0) as usize } else { 0 };
        let (w, h, len) = match byte_len(w, h) {
            Some(len) => (w, h, len),
            None => (0, 0, 0),
        };
        self.width = w;
        self.height = h;
        self.data = self.background.repeat(len / 4);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let bg = self.background;
        for py in Self::span(y, y + height, self.height) {
            for px in Self::span(x, x + width, self.width) {
                let i = (py * self.width + px) * 4;
                self.data[i..i + 4].copy_from_slice(&bg);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Srgb) {
        let rgb = color.to_rgb8();
        let r2 = radius * radius;
        for py in Self::span(cy - radius, cy + radius, self.height) {
            for px in Self::span(cx - radius, cx + radius, self.width) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(py * self.width + px, rgb, 1.0);
                }
            }
        }
    }

    /// DDA walk with a square pen of side `max(width, 1)`. Each covered
    /// pixel is blended once, so overlapping pen stamps do not darken.
    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, width: f64) {
        if color.alpha <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width.max(1.0) / 2.0;
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let mut covered = Vec::new();
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let (x, y) = (x0 + dx * t, y0 + dy * t);
            for py in Self::span(y - half, y + half, self.height) {
                for px in Self::span(x - half, x + half, self.width) {
                    covered.push(py * self.width + px);
                }
            }
        }
        covered.sort_unstable();
        covered.dedup();
        let rgb = color.color.to_rgb8();
        for index in covered {
            self.blend(index, rgb, color.alpha);
        }
    }
}
