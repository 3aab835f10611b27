use image::{DynamicImage, RgbImage};

use crate::image_pipeline::source;
use crate::{Channel, ChromaError};

/// One bin per possible 8-bit value.
pub const BIN_COUNT: usize = 256;

/// Per-channel pixel counts; bin `k` holds the number of pixels whose value is exactly `k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [[u64; BIN_COUNT]; 3],
}

impl Histogram {
    pub fn from_image(image: &DynamicImage) -> Result<Self, ChromaError> {
        source::rgb_view(image).map(Self::from_rgb)
    }

    pub fn from_rgb(image: &RgbImage) -> Self {
        let mut counts = [[0u64; BIN_COUNT]; 3];
        for pixel in image.pixels() {
            for (bins, &value) in counts.iter_mut().zip(pixel.0.iter()) {
                bins[usize::from(value)] += 1;
            }
        }
        Self { counts }
    }

    pub fn channel(&self, channel: Channel) -> &[u64; BIN_COUNT] {
        &self.counts[channel.index()]
    }

    pub fn total(&self, channel: Channel) -> u64 {
        self.channel(channel).iter().sum()
    }

    pub fn pixel_count(&self) -> u64 {
        self.total(Channel::Red)
    }

    /// Tallest bin across all three channels.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}
