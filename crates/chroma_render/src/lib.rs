mod histogram;
mod image_pipeline;

use image::{ColorType, DynamicImage, RgbImage};
use log::debug;

pub use histogram::{
    bins::{Histogram, BIN_COUNT},
    plot::{HistogramPlotter, PlotArtifact, PlotOptions},
    render::RenderError,
};
pub use image_pipeline::{
    adjust::{adjust, scale_value},
    channel::{AdjustmentSpec, Channel, ParseChannelError},
};

use image_pipeline::source;

#[derive(Debug, thiserror::Error)]
pub enum ChromaError {
    #[error("expected an 8-bit RGB image, got {0:?}")]
    InvalidImageFormat(ColorType),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("failed to render histogram plot: {0}")]
    RenderingFailure(#[from] RenderError),
}

/// The four artifacts produced for one input image.
#[derive(Clone, Debug)]
pub struct ProcessOutput {
    pub original: RgbImage,
    pub adjusted: RgbImage,
    pub original_plot: PlotArtifact,
    pub adjusted_plot: PlotArtifact,
}

#[derive(Clone, Debug, Default)]
pub struct ColorPipeline {
    plotter: HistogramPlotter,
}

impl ColorPipeline {
    pub fn new(options: PlotOptions) -> Self {
        Self { plotter: HistogramPlotter::new(options) }
    }

    /// Plots the original, adjusts it, and plots the adjusted copy.
    ///
    /// The original plot and the adjust-then-plot branch run on separate rayon
    /// workers, each with its own rendering context.
    pub fn process(
        &self,
        image: &DynamicImage,
        factors: &AdjustmentSpec,
    ) -> Result<ProcessOutput, ChromaError> {
        let original = source::rgb_view(image)?;
        debug!(
            "processing {}x{} image with factors {:?}",
            original.width(),
            original.height(),
            factors
        );

        let (original_plot, adjusted) = rayon::join(
            || self.plotter.plot_rgb(original),
            || -> Result<_, ChromaError> {
                let adjusted = adjust(image, factors)?;
                let plot = self.plotter.plot_rgb(&adjusted)?;
                Ok((adjusted, plot))
            },
        );

        let original_plot = original_plot?;
        let (adjusted, adjusted_plot) = adjusted?;

        Ok(ProcessOutput { original: original.clone(), adjusted, original_plot, adjusted_plot })
    }
}
