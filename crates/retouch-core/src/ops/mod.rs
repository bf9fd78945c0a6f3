mod crop;
mod invert;
mod resize;
mod rotate;
mod swap;

pub use crop::Crop;
pub use invert::Invert;
pub use resize::Resize;
pub use rotate::Rotate;
pub use swap::{ChannelOrder, SwapChannels};

use crate::error::Result;
use crate::raster::Raster;

/// A single in-place edit a session can apply to its image.
///
/// `apply` borrows the current raster and returns its replacement, so a
/// failing transform leaves the caller's image untouched.
pub trait Transform {
    fn name(&self) -> &'static str;
    fn apply(&self, input: &Raster) -> Result<Raster>;
}
