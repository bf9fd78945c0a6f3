use crate::histogram::Histogram;
use crate::raster::{PixelLayout, Raster};

/// Rendering collaborator the dispatcher hands images and histograms to.
///
/// Implementations may block (e.g. until a window closes); the session
/// itself never waits on them beyond the call.
pub trait Viewer {
    fn show_image(&mut self, image: &Raster, title: Option<&str>) -> anyhow::Result<()>;
    fn show_histogram(&mut self, histogram: &Histogram) -> anyhow::Result<()>;
}

/// What a viewer should draw: alpha dropped, gray kept as gray.
pub fn display_view(raster: &Raster) -> Raster {
    let layout = match raster.layout() {
        PixelLayout::Gray | PixelLayout::Rgb => return raster.clone(),
        PixelLayout::GrayAlpha => PixelLayout::Gray,
        PixelLayout::Rgba => PixelLayout::Rgb,
    };

    let keep = layout.channels();
    let mut data = Vec::with_capacity(raster.pixel_count() * keep);
    for pixel in raster.data().chunks_exact(raster.channels()) {
        data.extend_from_slice(&pixel[..keep]);
    }

    Raster {
        width: raster.width(),
        height: raster.height(),
        layout,
        data,
    }
}
