use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageFormat;
use tracing::info;

use retouch_core::{Histogram, Raster, Viewer};

use crate::chart::render_histogram;

/// Viewer that writes every image and histogram it is shown to a
/// numbered PNG in `dir`.
pub struct PreviewWriter {
    dir: PathBuf,
    written: u32,
    last: Option<PathBuf>,
}

impl PreviewWriter {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("create preview dir: {}", dir.display()))?;
        Ok(Self {
            dir,
            written: 0,
            last: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent preview, if any.
    pub fn last_written(&self) -> Option<&Path> {
        self.last.as_deref()
    }

    /// Next free path for a preview called `title`.
    fn next_path(&mut self, title: &str) -> PathBuf {
        self.written += 1;
        self.dir
            .join(format!("{:03}-{}.png", self.written, slug(title)))
    }

    fn store(&mut self, title: &str, img: &image::DynamicImage) -> Result<PathBuf> {
        let path = self.next_path(title);
        img.save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("write preview: {}", path.display()))?;
        info!(?path, "wrote preview");
        self.last = Some(path.clone());
        Ok(path)
    }
}

impl Viewer for PreviewWriter {
    fn show_image(&mut self, image: &Raster, title: Option<&str>) -> Result<()> {
        let img = image.to_dynamic()?;
        self.store(title.unwrap_or("image"), &img)?;
        Ok(())
    }

    fn show_histogram(&mut self, histogram: &Histogram) -> Result<()> {
        let title = if histogram.channel_count() == 1 {
            "grayscale histogram"
        } else {
            "color histogram"
        };
        let chart = image::DynamicImage::ImageRgb8(render_histogram(histogram));
        self.store(title, &chart)?;
        Ok(())
    }
}

/// Lowercase file-name-safe form of a title.
fn slug(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "image".into()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::PixelLayout;

    #[test]
    fn writes_numbered_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PreviewWriter::new(dir.path().join("previews")).unwrap();
        assert!(writer.last_written().is_none());

        let raster = Raster::filled(3, 2, PixelLayout::Rgb, &[1, 2, 3]).unwrap();
        writer.show_image(&raster, Some("Original Image")).unwrap();
        let first = writer.last_written().unwrap().to_path_buf();
        assert!(first.ends_with("001-original_image.png"));

        writer
            .show_histogram(&Histogram::from_raster(&raster))
            .unwrap();
        let second = writer.last_written().unwrap();
        assert!(second.ends_with("002-color_histogram.png"));

        let reloaded = image::open(&first).unwrap().into_rgb8();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.get_pixel(2, 1).0, [1, 2, 3]);
    }

    #[test]
    fn untitled_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PreviewWriter::new(dir.path().to_path_buf()).unwrap();
        let raster = Raster::new(1, 1, PixelLayout::Gray);
        writer.show_image(&raster, None).unwrap();
        assert!(writer.last_written().unwrap().ends_with("001-image.png"));
        assert_eq!(writer.dir(), dir.path());
    }

    #[test]
    fn slug_replaces_separators() {
        assert_eq!(slug("Edge Detection"), "edge_detection");
        assert_eq!(slug("  "), "image");
        assert_eq!(slug("a/b"), "a_b");
    }
}
