use anyhow::Context;
use image::{DynamicImage, ImageBuffer};
use tracing::debug;

/// Channel layout of a [`Raster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }

    /// Number of leading channels that carry color (alpha excluded).
    pub fn color_channels(self) -> usize {
        match self {
            Self::Gray | Self::GrayAlpha => 1,
            Self::Rgb | Self::Rgba => 3,
        }
    }
}

/// 8-bit interleaved image buffer, the only pixel representation a session
/// works with.
///
/// Samples are stored row-major as `[c0, c1, .., c0, c1, ..]` with
/// `layout.channels()` samples per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) layout: PixelLayout,
    pub(crate) data: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Self {
        Self {
            width,
            height,
            layout,
            data: vec![0; width as usize * height as usize * layout.channels()],
        }
    }

    pub fn from_data(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        anyhow::ensure!(
            data.len() == expected,
            "expected {expected} samples for {width}x{height} {layout:?}, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Solid image where every pixel equals `pixel`.
    pub fn filled(
        width: u32,
        height: u32,
        layout: PixelLayout,
        pixel: &[u8],
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            pixel.len() == layout.channels(),
            "{layout:?} pixels have {} channels, got {}",
            layout.channels(),
            pixel.len()
        );
        let data = pixel.repeat(width as usize * height as usize);
        Self::from_data(width, height, layout, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[start..start + c])
    }

    /// Take ownership of a decoded image.
    ///
    /// 8-bit buffers are moved in unchanged. Wider or float samples are
    /// narrowed to 8 bit here, once, keeping the source's color and alpha
    /// presence.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (layout, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelLayout::Gray, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelLayout::GrayAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelLayout::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelLayout::Rgba, buf.into_raw()),
            other => {
                let color = other.color();
                debug!(?color, "narrowing decoded samples to 8 bit");
                match (color.has_color(), color.has_alpha()) {
                    (false, false) => (PixelLayout::Gray, other.into_luma8().into_raw()),
                    (false, true) => (PixelLayout::GrayAlpha, other.into_luma_alpha8().into_raw()),
                    (true, false) => (PixelLayout::Rgb, other.into_rgb8().into_raw()),
                    (true, true) => (PixelLayout::Rgba, other.into_rgba8().into_raw()),
                }
            }
        };
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    /// Hand the buffer to the `image` crate, keeping layout and channel order.
    pub fn to_dynamic(&self) -> anyhow::Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let data = self.data.clone();
        let img = match self.layout {
            PixelLayout::Gray => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
            PixelLayout::GrayAlpha => {
                ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLumaA8)
            }
            PixelLayout::Rgb => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
            PixelLayout::Rgba => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        };
        img.with_context(|| format!("buffer does not match {w}x{h} {:?}", self.layout))
    }
}
