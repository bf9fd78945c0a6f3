use crate::raster::Raster;

pub const NUM_BINS: usize = 256;

/// Per-channel sample counts of a raster's color channels.
///
/// Gray images yield one channel, color images three. Alpha is never
/// counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    channels: Vec<[u32; NUM_BINS]>,
    max_count: u32,
}

impl Histogram {
    pub fn from_raster(raster: &Raster) -> Self {
        let stride = raster.channels();
        let color = raster.layout().color_channels();
        let mut channels = vec![[0u32; NUM_BINS]; color];

        for pixel in raster.data().chunks_exact(stride) {
            for (bins, &v) in channels.iter_mut().zip(pixel) {
                bins[v as usize] += 1;
            }
        }

        let max_count = channels
            .iter()
            .flat_map(|bins| bins.iter())
            .copied()
            .max()
            .unwrap_or(0);

        Self {
            channels,
            max_count,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&[u32; NUM_BINS]> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[[u32; NUM_BINS]] {
        &self.channels
    }

    /// Largest single bucket across all channels.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Samples counted per channel, i.e. the pixel count.
    pub fn total(&self) -> u64 {
        self.channels
            .first()
            .map(|bins| bins.iter().map(|&c| u64::from(c)).sum())
            .unwrap_or(0)
    }
}
