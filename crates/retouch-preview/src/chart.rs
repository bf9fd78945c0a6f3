use image::{Rgb, RgbImage};

use retouch_core::Histogram;
use retouch_core::histogram::NUM_BINS;

pub const CHART_HEIGHT: u32 = 240;
const BIN_WIDTH: u32 = 2;
pub const CHART_WIDTH: u32 = NUM_BINS as u32 * BIN_WIDTH;

const BACKGROUND: [f32; 3] = [0.1, 0.1, 0.1];
const CHANNEL_ALPHA: f32 = 0.4;
const GRAY_ALPHA: f32 = 0.7;

/// Draw each channel as a semi-transparent filled area over a dark
/// background. Bar heights are log-scaled so sparse buckets stay visible.
pub fn render_histogram(histogram: &Histogram) -> RgbImage {
    let mut canvas = vec![BACKGROUND; (CHART_WIDTH * CHART_HEIGHT) as usize];

    let max = (histogram.max_count() as f32).ln_1p();
    let h = CHART_HEIGHT as f32;

    let styles: &[([f32; 3], f32)] = if histogram.channel_count() == 1 {
        &[([0.5, 0.5, 0.5], GRAY_ALPHA)]
    } else {
        &[
            ([1.0, 0.0, 0.0], CHANNEL_ALPHA),
            ([0.0, 1.0, 0.0], CHANNEL_ALPHA),
            ([0.0, 0.4, 1.0], CHANNEL_ALPHA),
        ]
    };

    if max > 0.0 {
        for (bins, &(color, alpha)) in histogram.channels().iter().zip(styles) {
            for (i, &count) in bins.iter().enumerate() {
                let normalized = (count as f32).ln_1p() / max;
                let bar_h = (normalized * h).round() as u32;
                for y in CHART_HEIGHT - bar_h..CHART_HEIGHT {
                    for dx in 0..BIN_WIDTH {
                        let x = i as u32 * BIN_WIDTH + dx;
                        let px = &mut canvas[(y * CHART_WIDTH + x) as usize];
                        for (v, c) in px.iter_mut().zip(color) {
                            *v = *v * (1.0 - alpha) + c * alpha;
                        }
                    }
                }
            }
        }
    }

    RgbImage::from_fn(CHART_WIDTH, CHART_HEIGHT, |x, y| {
        let px = canvas[(y * CHART_WIDTH + x) as usize];
        Rgb(px.map(|v| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8))
    })
}
