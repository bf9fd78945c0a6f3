use crate::config::Resample;
use crate::error::{EditError, Result};
use crate::ops::Transform;
use crate::raster::Raster;

/// Resample to exactly `width x height`. Aspect ratio is not preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
    pub filter: Resample,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: Resample::default(),
        }
    }
}

impl Transform for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, input: &Raster) -> Result<Raster> {
        if self.width == 0 || self.height == 0 {
            return Err(EditError::InvalidDimensions {
                width: self.width.into(),
                height: self.height.into(),
            });
        }
        if input.dimensions() == (self.width, self.height) {
            return Ok(input.clone());
        }

        let resized = input
            .to_dynamic()?
            .resize_exact(self.width, self.height, self.filter.filter());
        Ok(Raster::from_dynamic(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelLayout;

    #[test]
    fn exact_target_size() {
        let buf = Raster::new(37, 11, PixelLayout::Rgb);
        for (w, h) in [(1, 1), (100, 3), (37, 200), (5, 5)] {
            let result = Resize::new(w, h).apply(&buf).unwrap();
            assert_eq!(result.dimensions(), (w, h));
            assert_eq!(result.layout(), PixelLayout::Rgb);
            assert_eq!(result.data().len(), (w * h * 3) as usize);
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let buf = Raster::new(4, 4, PixelLayout::Gray);
        let err = Resize::new(0, 4).apply(&buf).unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidDimensions {
                width: 0,
                height: 4
            }
        ));
    }

    #[test]
    fn solid_color_survives_downscale() {
        let buf = Raster::filled(64, 48, PixelLayout::Rgba, &[200, 100, 50, 255]).unwrap();
        let result = Resize::new(16, 12).apply(&buf).unwrap();
        for pixel in result.data().chunks_exact(4) {
            assert_eq!(pixel, [200, 100, 50, 255]);
        }
    }

    #[test]
    fn same_size_is_identity() {
        let data = (0..48).map(|v| v as u8).collect();
        let buf = Raster::from_data(4, 4, PixelLayout::Rgb, data).unwrap();
        assert_eq!(Resize::new(4, 4).apply(&buf).unwrap(), buf);
    }

    #[test]
    fn gray_alpha_keeps_layout() {
        let buf = Raster::new(10, 10, PixelLayout::GrayAlpha);
        let result = Resize {
            width: 3,
            height: 7,
            filter: Resample::Nearest,
        }
        .apply(&buf)
        .unwrap();
        assert_eq!(result.layout(), PixelLayout::GrayAlpha);
        assert_eq!(result.dimensions(), (3, 7));
    }
}
