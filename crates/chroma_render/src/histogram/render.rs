use std::io::Cursor;

use ab_glyph::{FontRef, InvalidFont, PxScale};
use image::{imageops, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("plot font could not be parsed")]
    Font(#[from] InvalidFont),
    #[error("failed to encode plot: {0}")]
    Encode(#[from] image::ImageError),
    #[error("plot canvas {width}x{height} is too small")]
    Canvas { width: u32, height: u32 },
}

/// Drawing state owned by a single plot call.
///
/// Each context parses its own font handle and owns its canvas; nothing is shared
/// between contexts, and the context is consumed by [`RenderContext::encode_png`].
pub struct RenderContext {
    canvas: RgbImage,
    font: FontRef<'static>,
    scale: PxScale,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, font_size: f32) -> Result<Self, RenderError> {
        let font = FontRef::try_from_slice(FONT_DATA)?;
        let canvas = RgbImage::from_pixel(width, height, BACKGROUND);
        Ok(Self { canvas, font, scale: PxScale::from(font_size) })
    }

    pub fn with_scale(&mut self, font_size: f32) -> &mut Self {
        self.scale = PxScale::from(font_size);
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        draw_line_segment_mut(&mut self.canvas, from, to, color);
    }

    pub fn frame(&mut self, x: i32, y: i32, width: u32, height: u32) {
        draw_hollow_rect_mut(&mut self.canvas, Rect::at(x, y).of_size(width, height), FOREGROUND);
    }

    pub fn text_size(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str) {
        draw_text_mut(&mut self.canvas, FOREGROUND, x, y, self.scale, &self.font, text);
    }

    /// Draws `text` horizontally centered on `center_x`, top edge at `y`.
    pub fn text_centered(&mut self, center_x: i32, y: i32, text: &str) {
        let (width, _) = self.text_size(text);
        self.text(center_x - (width / 2) as i32, y, text);
    }

    /// Draws `text` right-aligned to `right_x`, vertically centered on `center_y`.
    pub fn text_right(&mut self, right_x: i32, center_y: i32, text: &str) {
        let (width, height) = self.text_size(text);
        self.text(right_x - width as i32, center_y - (height / 2) as i32, text);
    }

    /// Draws `text` rotated to read bottom-to-top, centered on `center_y`.
    pub fn text_vertical(&mut self, x: i32, center_y: i32, text: &str) {
        let (width, height) = self.text_size(text);
        let mut label = RgbImage::from_pixel(width + 2, height + 2, BACKGROUND);
        draw_text_mut(&mut label, FOREGROUND, 1, 1, self.scale, &self.font, text);
        let rotated = imageops::rotate270(&label);
        let top = i64::from(center_y) - i64::from(rotated.height() / 2);
        imageops::overlay(&mut self.canvas, &rotated, i64::from(x), top);
    }

    pub fn encode_png(self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
