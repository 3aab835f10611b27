use image::{DynamicImage, RgbImage};
use log::debug;

use super::{channel::AdjustmentSpec, source};
use crate::ChromaError;

type Lut = [u8; 256];

/// Scales the channels listed in `factors` and returns a new image.
///
/// Every scaled value is clamped to [0, 255] and then truncated toward zero, so
/// `scale_value(100, 2.555)` is 255 and `scale_value(3, 0.9)` is 2. Channels
/// without a factor are copied as-is. The input is never modified.
pub fn adjust(image: &DynamicImage, factors: &AdjustmentSpec) -> Result<RgbImage, ChromaError> {
    let source = source::rgb_view(image)?;
    let mut adjusted = source.clone();

    if factors.is_identity() {
        return Ok(adjusted);
    }

    let tables = lookup_tables(factors);
    for pixel in adjusted.pixels_mut() {
        for (value, table) in pixel.0.iter_mut().zip(&tables) {
            if let Some(table) = table {
                *value = table[usize::from(*value)];
            }
        }
    }

    debug!(
        "adjusted {}x{} image: {}",
        adjusted.width(),
        adjusted.height(),
        factors.iter().map(|(c, f)| format!("{c}={f}")).collect::<Vec<_>>().join(" ")
    );

    Ok(adjusted)
}

/// Multiplies one 8-bit value by `factor` with saturating, truncating conversion.
pub fn scale_value(value: u8, factor: f64) -> u8 {
    // `as` maps NaN to 0.
    (f64::from(value) * factor).clamp(0.0, 255.0) as u8
}

fn lookup_tables(factors: &AdjustmentSpec) -> [Option<Lut>; 3] {
    let mut tables = [None; 3];
    for (channel, factor) in factors.iter() {
        let mut table = [0u8; 256];
        for (value, slot) in (0..=u8::MAX).zip(table.iter_mut()) {
            *slot = scale_value(value, factor);
        }
        tables[channel.index()] = Some(table);
    }
    tables
}
