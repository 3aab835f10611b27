use image::{DynamicImage, Rgb, RgbImage};
use log::debug;

use super::axis::Axis;
use super::bins::{Histogram, BIN_COUNT};
use super::render::{RenderContext, RenderError, FOREGROUND};
use crate::image_pipeline::source;
use crate::{Channel, ChromaError};

const MARGIN_LEFT: u32 = 84;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 44;
const MARGIN_BOTTOM: u32 = 60;
const MIN_PLOT_AREA: u32 = 16;
const TICK_LENGTH: f32 = 5.0;
const Y_TICK_TARGET: usize = 5;

#[derive(Clone, Debug)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    /// Pixel height of tick labels and axis titles.
    pub font_size: f32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            font_size: 14.0,
            title: "Color Distribution".to_owned(),
            x_label: "Color value".to_owned(),
            y_label: "Pixels".to_owned(),
        }
    }
}

/// PNG-encoded line chart of one image's channel histograms.
#[derive(Clone, Debug)]
pub struct PlotArtifact {
    png: Vec<u8>,
    width: u32,
    height: u32,
    histogram: Histogram,
}

impl PlotArtifact {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png_bytes(self) -> Vec<u8> {
        self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }
}

#[derive(Clone, Debug, Default)]
pub struct HistogramPlotter {
    options: PlotOptions,
}

impl HistogramPlotter {
    pub fn new(options: PlotOptions) -> Self {
        Self { options }
    }

    pub fn plot(&self, image: &DynamicImage) -> Result<PlotArtifact, ChromaError> {
        self.plot_rgb(source::rgb_view(image)?)
    }

    pub fn plot_rgb(&self, image: &RgbImage) -> Result<PlotArtifact, ChromaError> {
        source::ensure_non_empty(image)?;
        let histogram = Histogram::from_rgb(image);
        let png = self.render(&histogram)?;

        debug!(
            "plotted histogram for {}x{} image ({} bytes)",
            image.width(),
            image.height(),
            png.len()
        );

        Ok(PlotArtifact { png, width: self.options.width, height: self.options.height, histogram })
    }

    fn render(&self, histogram: &Histogram) -> Result<Vec<u8>, RenderError> {
        let options = &self.options;
        let (width, height) = (options.width, options.height);
        if width < MARGIN_LEFT + MARGIN_RIGHT + MIN_PLOT_AREA
            || height < MARGIN_TOP + MARGIN_BOTTOM + MIN_PLOT_AREA
        {
            return Err(RenderError::Canvas { width, height });
        }

        let mut context = RenderContext::new(width, height, options.font_size)?;
        let area = PlotArea {
            left: MARGIN_LEFT as f32,
            top: MARGIN_TOP as f32,
            right: (width - MARGIN_RIGHT) as f32,
            bottom: (height - MARGIN_BOTTOM) as f32,
            x_axis: Axis::fixed((BIN_COUNT - 1) as f64, 50.0),
            y_axis: Axis::nice(histogram.max_count() as f64, Y_TICK_TARGET),
        };

        for channel in Channel::ALL {
            draw_series(&mut context, &area, histogram.channel(channel), series_color(channel));
        }
        draw_axes(&mut context, &area);
        draw_labels(&mut context, &area, options);

        context.encode_png()
    }
}

/// Matplotlib's `r`, `g` and `b` shorthand colors.
fn series_color(channel: Channel) -> Rgb<u8> {
    match channel {
        Channel::Red => Rgb([255, 0, 0]),
        Channel::Green => Rgb([0, 128, 0]),
        Channel::Blue => Rgb([0, 0, 255]),
    }
}

struct PlotArea {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    x_axis: Axis,
    y_axis: Axis,
}

impl PlotArea {
    fn x(&self, value: f64) -> f32 {
        self.left + self.x_axis.fraction(value) as f32 * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f32 {
        self.bottom - self.y_axis.fraction(value) as f32 * (self.bottom - self.top)
    }
}

/// Plots every bin against its left edge.
fn draw_series(
    context: &mut RenderContext,
    area: &PlotArea,
    bins: &[u64; BIN_COUNT],
    color: Rgb<u8>,
) {
    let points: Vec<(f32, f32)> = bins
        .iter()
        .enumerate()
        .map(|(edge, &count)| (area.x(edge as f64), area.y(count as f64)))
        .collect();

    for segment in points.windows(2) {
        context.line(segment[0], segment[1], color);
    }
}

fn draw_axes(context: &mut RenderContext, area: &PlotArea) {
    let left = area.left as i32;
    let top = area.top as i32;
    context.frame(
        left,
        top,
        (area.right - area.left) as u32 + 1,
        (area.bottom - area.top) as u32 + 1,
    );

    for tick in area.x_axis.ticks() {
        let x = area.x(tick);
        context.line((x, area.bottom), (x, area.bottom + TICK_LENGTH), FOREGROUND);
        let label_y = (area.bottom + TICK_LENGTH + 3.0) as i32;
        context.text_centered(x as i32, label_y, &format!("{tick}"));
    }

    for tick in area.y_axis.ticks() {
        let y = area.y(tick);
        context.line((area.left - TICK_LENGTH, y), (area.left, y), FOREGROUND);
        let label_x = (area.left - TICK_LENGTH - 3.0) as i32;
        context.text_right(label_x, y as i32, &format!("{}", tick as u64));
    }
}

fn draw_labels(context: &mut RenderContext, area: &PlotArea, options: &PlotOptions) {
    let (width, height) = context.dimensions();
    let center_x = ((area.left + area.right) / 2.0) as i32;
    let center_y = ((area.top + area.bottom) / 2.0) as i32;

    context.text_centered(center_x, (height - 24) as i32, &options.x_label);
    context.text_vertical(6, center_y, &options.y_label);

    context.with_scale(options.font_size * 1.2);
    let (_, title_height) = context.text_size(&options.title);
    let title_y = (MARGIN_TOP.saturating_sub(title_height) / 2) as i32;
    context.text_centered((width / 2) as i32, title_y, &options.title);
}
