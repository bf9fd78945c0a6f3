use crate::error::{EditError, Result};
use crate::ops::Transform;
use crate::raster::Raster;

/// A permutation of the three color channels.
///
/// Output channel `i` takes its samples from input channel `order[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelOrder([usize; 3]);

impl ChannelOrder {
    /// RGB -> BGR.
    pub const REVERSE: Self = Self([2, 1, 0]);

    pub fn new(order: [usize; 3]) -> Result<Self> {
        let mut seen = [false; 3];
        for &c in &order {
            if c >= 3 || seen[c] {
                return Err(EditError::InvalidChannelOrder(
                    order.iter().map(|&c| c as i64).collect(),
                ));
            }
            seen[c] = true;
        }
        Ok(Self(order))
    }

    /// Validate loosely typed input, e.g. user-entered indices.
    pub fn from_indices(indices: &[i64]) -> Result<Self> {
        let invalid = || EditError::InvalidChannelOrder(indices.to_vec());
        let [a, b, c] = indices else {
            return Err(invalid());
        };
        let index = |v: i64| usize::try_from(v).map_err(|_| invalid());
        Self::new([index(*a)?, index(*b)?, index(*c)?]).map_err(|_| invalid())
    }

    pub fn indices(&self) -> [usize; 3] {
        self.0
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::REVERSE
    }
}

/// Reorder the channels of a 3-channel image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapChannels {
    pub order: ChannelOrder,
}

impl Transform for SwapChannels {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn apply(&self, input: &Raster) -> Result<Raster> {
        if input.channels() != 3 {
            return Err(EditError::UnsupportedChannelCount(input.channels()));
        }

        let [r, g, b] = self.order.indices();
        let mut output = input.clone();
        for (dst, src) in output
            .data
            .chunks_exact_mut(3)
            .zip(input.data.chunks_exact(3))
        {
            dst[0] = src[r];
            dst[1] = src[g];
            dst[2] = src[b];
        }
        Ok(output)
    }
}
