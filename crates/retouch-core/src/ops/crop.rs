use crate::error::{EditError, Result};
use crate::ops::Transform;
use crate::raster::Raster;

/// Cut out the box `[left, right) x [top, bottom)`.
///
/// Boxes are never clipped: a box that is empty or reaches past the image
/// edge is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Crop {
    fn validate(&self, width: u32, height: u32) -> Result<()> {
        let Self {
            left,
            top,
            right,
            bottom,
        } = *self;
        if left >= right || top >= bottom {
            return Err(EditError::InvalidRegion(format!(
                "({left}, {top}, {right}, {bottom}) is empty; need left < right and top < bottom"
            )));
        }
        if right > width || bottom > height {
            return Err(EditError::InvalidRegion(format!(
                "({left}, {top}, {right}, {bottom}) exceeds the {width}x{height} image"
            )));
        }
        Ok(())
    }
}

impl Transform for Crop {
    fn name(&self) -> &'static str {
        "crop"
    }

    fn apply(&self, input: &Raster) -> Result<Raster> {
        self.validate(input.width, input.height)?;

        let channels = input.channels();
        let dst_w = self.right - self.left;
        let dst_h = self.bottom - self.top;
        let row_len = dst_w as usize * channels;
        let mut data = Vec::with_capacity(row_len * dst_h as usize);

        for row in self.top..self.bottom {
            let row_start = (row as usize * input.width as usize + self.left as usize) * channels;
            data.extend_from_slice(&input.data[row_start..row_start + row_len]);
        }

        Ok(Raster {
            width: dst_w,
            height: dst_h,
            layout: input.layout,
            data,
        })
    }
}
