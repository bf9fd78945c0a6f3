use crate::error::Result;
use crate::ops::Transform;
use crate::raster::Raster;

/// Photometric negative: every sample `v` becomes `255 - v`, alpha included.
pub struct Invert;

impl Transform for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn apply(&self, input: &Raster) -> Result<Raster> {
        let mut output = input.clone();
        for v in &mut output.data {
            *v = u8::MAX - *v;
        }
        Ok(output)
    }
}
