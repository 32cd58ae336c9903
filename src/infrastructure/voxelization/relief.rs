//! Relief extrusion of raster images.
//!
//! Each non-dark pixel becomes a column of voxels whose height grows with the
//! pixel's brightness, colored like the pixel.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::application::ports::VoxelizeError;
use crate::domain::{Rgb, SourceFormat, SourceKind, Voxel, VoxelSet};

/// Pixels whose channel sum is below this are background.
pub const DARKNESS_THRESHOLD: u32 = 50;

/// Brightness per voxel of column height; near-white pixels reach 10.
pub const BRIGHTNESS_PER_LEVEL: u32 = 25;

pub fn voxelize_image(
    data: &[u8],
    format: SourceFormat,
    resolution: u32,
) -> Result<VoxelSet, VoxelizeError> {
    if resolution == 0 {
        return Err(VoxelizeError::ZeroResolution);
    }
    let decoded = image::load_from_memory(data)
        .map_err(|e| VoxelizeError::load(format, e.to_string()))?;
    let fitted = fit_within(decoded, resolution);

    tracing::debug!(
        width = fitted.width(),
        height = fitted.height(),
        "Image downscaled for extrusion"
    );

    Ok(extrude_pixels(&fitted.to_rgb8()))
}

/// Shrinks the image so its longest side is at most `resolution`, keeping the
/// aspect ratio. Smaller images are left untouched.
fn fit_within(image: DynamicImage, resolution: u32) -> DynamicImage {
    if image.width().max(image.height()) > resolution {
        image.resize(resolution, resolution, FilterType::Triangle)
    } else {
        image
    }
}

pub fn extrude_pixels(pixels: &RgbImage) -> VoxelSet {
    let height = pixels.height();
    let mut voxels = Vec::new();

    for (x, y, pixel) in pixels.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let sum = u32::from(r) + u32::from(g) + u32::from(b);
        if sum < DARKNESS_THRESHOLD {
            continue;
        }

        // floor((sum / 3) / 25) without leaving integer arithmetic.
        let levels = sum / (3 * BRIGHTNESS_PER_LEVEL);
        let color = Rgb::new(r, g, b);
        let column = [f64::from(x), f64::from(height - y)];
        voxels.extend(
            (0..levels).map(|z| Voxel::new([column[0], column[1], f64::from(z)], color)),
        );
    }

    VoxelSet::new(SourceKind::Image, voxels)
}
