use crate::error::{EditError, Result};
use crate::ops::Transform;
use crate::raster::Raster;

const QUARTER_TURN_TOLERANCE: f64 = 1e-9;
/// Slack subtracted before rounding the expanded canvas up, so float noise
/// in sin/cos does not add a spurious row or column.
const CANVAS_TOLERANCE: f64 = 1e-6;

/// Counter-clockwise rotation about the image centre.
///
/// The canvas grows to hold the whole rotated image. Uncovered pixels are
/// all-zero samples: black, or transparent black when the layout has alpha.
/// Exact multiples of 90 degrees are lossless.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotate {
    pub degrees: f64,
}

impl Transform for Rotate {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn apply(&self, input: &Raster) -> Result<Raster> {
        if !self.degrees.is_finite() {
            return Err(EditError::InvalidAngle(self.degrees));
        }

        let turns = self.degrees.rem_euclid(360.0);
        let quarters = turns / 90.0;
        if (quarters - quarters.round()).abs() < QUARTER_TURN_TOLERANCE {
            return Ok(match quarters.round() as u32 % 4 {
                0 => input.clone(),
                1 => remap(input, input.height, input.width, |x, y| {
                    (input.width - 1 - y, x)
                }),
                2 => remap(input, input.width, input.height, |x, y| {
                    (input.width - 1 - x, input.height - 1 - y)
                }),
                _ => remap(input, input.height, input.width, |x, y| {
                    (y, input.height - 1 - x)
                }),
            });
        }

        Ok(rotate_free(input, turns.to_radians()))
    }
}

/// Build a `width x height` raster where each pixel is copied from the
/// source pixel `source(x, y)` names.
fn remap(
    input: &Raster,
    width: u32,
    height: u32,
    source: impl Fn(u32, u32) -> (u32, u32),
) -> Raster {
    let channels = input.channels();
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = source(x, y);
            let idx = (sy as usize * input.width as usize + sx as usize) * channels;
            data.extend_from_slice(&input.data[idx..idx + channels]);
        }
    }
    Raster {
        width,
        height,
        layout: input.layout,
        data,
    }
}

/// Nearest-neighbour rotation by an arbitrary angle with canvas expansion.
fn rotate_free(input: &Raster, theta: f64) -> Raster {
    let (sin, cos) = theta.sin_cos();
    let (w, h) = (f64::from(input.width), f64::from(input.height));

    let out_w = (w * cos.abs() + h * sin.abs() - CANVAS_TOLERANCE).ceil().max(1.0);
    let out_h = (w * sin.abs() + h * cos.abs() - CANVAS_TOLERANCE).ceil().max(1.0);

    let channels = input.channels();
    let mut output = Raster::new(out_w as u32, out_h as u32, input.layout);

    for y in 0..output.height {
        for x in 0..output.width {
            // Offsets from the output centre, in y-down image space.
            let dx = f64::from(x) + 0.5 - out_w / 2.0;
            let dy = f64::from(y) + 0.5 - out_h / 2.0;
            let sx = dx * cos - dy * sin + w / 2.0;
            let sy = dx * sin + dy * cos + h / 2.0;
            if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                continue;
            }

            let src = (sy as usize * input.width as usize + sx as usize) * channels;
            let dst = (y as usize * output.width as usize + x as usize) * channels;
            output.data[dst..dst + channels].copy_from_slice(&input.data[src..src + channels]);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelLayout;

    // 3x2 gray image:
    //   0 1 2
    //   3 4 5
    fn small() -> Raster {
        Raster::from_data(3, 2, PixelLayout::Gray, vec![0, 1, 2, 3, 4, 5]).unwrap()
    }

    fn rotate(buf: &Raster, degrees: f64) -> Raster {
        Rotate { degrees }.apply(buf).unwrap()
    }

    #[test]
    fn zero_and_full_turn_are_identity() {
        let buf = small();
        assert_eq!(rotate(&buf, 0.0), buf);
        assert_eq!(rotate(&buf, 360.0), buf);
        assert_eq!(rotate(&buf, -720.0), buf);
    }

    #[test]
    fn quarter_turn_counter_clockwise() {
        let result = rotate(&small(), 90.0);
        assert_eq!(result.dimensions(), (2, 3));
        // 2 5
        // 1 4
        // 0 3
        assert_eq!(result.data(), &[2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn half_turn() {
        let result = rotate(&small(), 180.0);
        assert_eq!(result.dimensions(), (3, 2));
        assert_eq!(result.data(), &[5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn negative_quarter_is_clockwise() {
        let buf = small();
        let cw = rotate(&buf, -90.0);
        assert_eq!(cw, rotate(&buf, 270.0));
        // 3 0
        // 4 1
        // 5 2
        assert_eq!(cw.data(), &[3, 0, 4, 1, 5, 2]);
    }

    #[test]
    fn four_quarter_turns_restore_input() {
        let buf = small();
        let mut current = buf.clone();
        for _ in 0..4 {
            current = rotate(&current, 90.0);
        }
        assert_eq!(current, buf);
    }

    #[test]
    fn diagonal_expands_canvas_and_fills_black() {
        let buf = Raster::filled(10, 10, PixelLayout::Rgb, &[255, 255, 255]).unwrap();
        let result = rotate(&buf, 45.0);
        // 10 * sqrt(2) = 14.14..
        assert_eq!(result.dimensions(), (15, 15));
        assert_eq!(result.pixel(0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(result.pixel(14, 14), Some(&[0u8, 0, 0][..]));
        assert_eq!(result.pixel(7, 7), Some(&[255u8, 255, 255][..]));
    }

    #[test]
    fn exposed_area_is_transparent_with_alpha() {
        let buf = Raster::filled(8, 4, PixelLayout::Rgba, &[9, 9, 9, 255]).unwrap();
        let result = rotate(&buf, 30.0);
        assert_eq!(result.layout(), PixelLayout::Rgba);
        assert_eq!(result.pixel(0, 0), Some(&[0u8, 0, 0, 0][..]));
    }

    /// Centre of mass of the pixels equal to `value`, in pixel-centre
    /// coordinates.
    fn centroid(buf: &Raster, value: u8) -> (f64, f64) {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.pixel(x, y) == Some(&[value][..]) {
                    sx += f64::from(x) + 0.5;
                    sy += f64::from(y) + 0.5;
                    n += 1.0;
                }
            }
        }
        assert!(n > 0.0, "no pixel with value {value}");
        (sx / n, sy / n)
    }

    #[test]
    fn free_angle_turns_counter_clockwise() {
        // 21x21 field with a 3x3 mark centred 5 px right of the middle.
        let mut buf = Raster::filled(21, 21, PixelLayout::Gray, &[100]).unwrap();
        for y in 9..12 {
            for x in 14..17 {
                buf.data[(y * 21 + x) as usize] = 255;
            }
        }

        let result = rotate(&buf, 30.0);
        assert_eq!(result.dimensions(), (29, 29));
        let (cx, cy) = (14.5, 14.5);
        let (mx, my) = centroid(&result, 255);

        // Counter-clockwise on screen moves a point right of centre upwards:
        // about (cx + 4.3, cy - 2.5).
        assert!(mx > cx + 3.0 && mx < cx + 5.5, "mark x {mx}");
        assert!(my < cy - 1.5 && my > cy - 3.5, "mark y {my}");

        // And the opposite turn mirrors it below centre.
        let (_, my) = centroid(&rotate(&buf, -30.0), 255);
        assert!(my > cy + 1.5, "mark y {my}");
    }

    #[test]
    fn non_finite_angle_is_rejected() {
        let buf = small();
        for degrees in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Rotate { degrees }.apply(&buf),
                Err(EditError::InvalidAngle(_))
            ));
        }
    }
}
