//! Color and texture statistics over a sampled buffer.
//!
//! Two passes over the pixels: the first accumulates channel sums,
//! brightness and the dark-pixel count; the second measures how far
//! each pixel's brightness strays from the mean.
//!
//! All arithmetic is done in `f64` with no intermediate rounding.

use crate::types::{AnalysisError, ColorStatistics, InputDefect, PixelBuffer};

/// Pixels whose brightness is strictly below this count as dark.
pub const DARK_PIXEL_THRESHOLD: f64 = 60.0;

/// Divisor mapping a brightness standard deviation (0..=127.5) onto the
/// uniformity percentage scale.
const UNIFORMITY_SCALE: f64 = 2.55;

/// Brightness of a single pixel: the plain mean of its three channels.
#[must_use]
pub fn pixel_brightness([r, g, b]: [u8; 3]) -> f64 {
    (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
}

/// Saturation of a color given as channel averages, in percent.
///
/// Returns `0.0` for black instead of dividing by zero.
#[must_use]
pub fn saturation(avg_red: f64, avg_green: f64, avg_blue: f64) -> f64 {
    let max = avg_red.max(avg_green).max(avg_blue);
    let min = avg_red.min(avg_green).min(avg_blue);
    if max == 0.0 {
        0.0
    } else {
        (max - min) / max * 100.0
    }
}

/// Compute [`ColorStatistics`] over every pixel of `buffer`.
///
/// # Errors
///
/// Returns [`InputDefect::EmptyImage`] if the buffer holds no pixels.
#[allow(clippy::cast_precision_loss)]
pub fn extract(buffer: &PixelBuffer) -> Result<ColorStatistics, AnalysisError> {
    if buffer.is_empty() {
        return Err(InputDefect::EmptyImage {
            width: buffer.width(),
            height: buffer.height(),
        }
        .into());
    }

    // Bounded by the buffer size, which fits in memory, so exact in f64.
    let n = buffer.pixel_count() as f64;

    let mut total_red = 0.0;
    let mut total_green = 0.0;
    let mut total_blue = 0.0;
    let mut total_brightness = 0.0;
    let mut dark_pixels: u64 = 0;

    for pixel in buffer.rgb() {
        let [r, g, b] = pixel;
        total_red += f64::from(r);
        total_green += f64::from(g);
        total_blue += f64::from(b);

        let brightness = pixel_brightness(pixel);
        total_brightness += brightness;
        if brightness < DARK_PIXEL_THRESHOLD {
            dark_pixels += 1;
        }
    }

    let avg_red = total_red / n;
    let avg_green = total_green / n;
    let avg_blue = total_blue / n;
    let brightness = total_brightness / n;

    let squared_deviation: f64 = buffer
        .rgb()
        .map(|pixel| {
            let delta = pixel_brightness(pixel) - brightness;
            delta * delta
        })
        .sum();
    let std_dev = (squared_deviation / n).sqrt();
    let uniformity = (100.0 - std_dev / UNIFORMITY_SCALE).max(0.0);

    let dark_spot_ratio = dark_pixels as f64 / n * 100.0;

    Ok(ColorStatistics {
        avg_red,
        avg_green,
        avg_blue,
        brightness,
        saturation: saturation(avg_red, avg_green, avg_blue),
        uniformity,
        dark_spot_ratio,
    })
}
