//! PNG output of a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so browser builds never pull in
//! the `image` crate.

use constellation_core::error::SimError;
use std::path::Path;

use crate::pixel::RasterSurface;

/// Writes the raster as an RGBA PNG.
///
/// Returns `SimError::InvalidDimensions` if the raster is empty or its
/// dimensions overflow `u32`, or `SimError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), SimError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(SimError::InvalidDimensions);
    }
    let w = u32::try_from(surface.width()).map_err(|_| SimError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| SimError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.data().to_vec())
        .ok_or_else(|| SimError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))
}
