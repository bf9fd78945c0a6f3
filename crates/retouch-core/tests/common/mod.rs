#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use retouch_core::{Histogram, Raster, Viewer};

/// Write a solid RGB image and return its path.
pub fn solid_rgb(dir: &Path, name: &str, width: u32, height: u32, pixel: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(pixel))
        .save(&path)
        .unwrap();
    path
}

/// RGB image whose pixel (x, y) is `[x, y, x ^ y]`.
pub fn gradient_rgb(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]))
        .save(&path)
        .unwrap();
    path
}

pub fn gray(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_fn(width, height, |x, y| Luma([(x + y * width) as u8]))
        .save(&path)
        .unwrap();
    path
}

pub fn rgba(dir: &Path, name: &str, width: u32, height: u32, pixel: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba(pixel))
        .save(&path)
        .unwrap();
    path
}

/// Viewer that remembers everything it was asked to show.
#[derive(Default)]
pub struct RecordingViewer {
    pub images: Vec<(Raster, Option<String>)>,
    pub histograms: Vec<Histogram>,
}

impl Viewer for RecordingViewer {
    fn show_image(&mut self, image: &Raster, title: Option<&str>) -> anyhow::Result<()> {
        self.images.push((image.clone(), title.map(str::to_owned)));
        Ok(())
    }

    fn show_histogram(&mut self, histogram: &Histogram) -> anyhow::Result<()> {
        self.histograms.push(histogram.clone());
        Ok(())
    }
}

/// Viewer whose window never opens.
pub struct BrokenViewer;

impl Viewer for BrokenViewer {
    fn show_image(&mut self, _image: &Raster, _title: Option<&str>) -> anyhow::Result<()> {
        anyhow::bail!("no display available")
    }

    fn show_histogram(&mut self, _histogram: &Histogram) -> anyhow::Result<()> {
        anyhow::bail!("no display available")
    }
}
