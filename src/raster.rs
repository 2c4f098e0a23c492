use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{PasteError, PasteResult};
use crate::foundation::region::Region;
use crate::grid::buffer::Grid;

/// One RGBA8 pixel.
pub type Rgba = [u8; 4];

/// Wrap an RGBA image as a 2-D grid with origin `[0, 0]`.
pub fn grid_from_rgba(img: &image::RgbaImage) -> PasteResult<Grid<Rgba, 2>> {
    let (w, h) = img.dimensions();
    let region = Region::from_arrays([0, 0], [u64::from(w), u64::from(h)]);
    let data = img.pixels().map(|p| p.0).collect();
    Grid::from_vec(region, data)
}

/// Convert a 2-D RGBA grid back into an image. The grid origin is dropped.
pub fn grid_to_rgba(grid: &Grid<Rgba, 2>) -> PasteResult<image::RgbaImage> {
    let size = grid.region().size.0;
    let w = u32::try_from(size[0])
        .map_err(|_| PasteError::validation(format!("grid width {} exceeds u32", size[0])))?;
    let h = u32::try_from(size[1])
        .map_err(|_| PasteError::validation(format!("grid height {} exceeds u32", size[1])))?;
    let bytes = grid.as_slice().iter().flatten().copied().collect::<Vec<u8>>();
    image::RgbaImage::from_raw(w, h, bytes)
        .ok_or_else(|| PasteError::validation("rgba buffer does not match grid size"))
}

/// Decode any format `image` understands into an RGBA grid.
pub fn load_rgba(path: impl AsRef<Path>) -> PasteResult<Grid<Rgba, 2>> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("decode image '{}'", path.display()))?
        .to_rgba8();
    grid_from_rgba(&img)
}

pub fn save_png(grid: &Grid<Rgba, 2>, path: impl AsRef<Path>) -> PasteResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    let img = grid_to_rgba(grid)?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/raster.rs"]
mod tests;
