use image::{DynamicImage, RgbImage};

use crate::ChromaError;

/// Borrows the RGB8 buffer behind `image`, rejecting other layouts and empty images.
pub fn rgb_view(image: &DynamicImage) -> Result<&RgbImage, ChromaError> {
    let rgb = image.as_rgb8().ok_or_else(|| ChromaError::InvalidImageFormat(image.color()))?;
    ensure_non_empty(rgb)?;
    Ok(rgb)
}

pub fn ensure_non_empty(image: &RgbImage) -> Result<(), ChromaError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ChromaError::EmptyImage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{ColorType, RgbaImage};

    use super::*;

    #[test]
    fn rgba_is_rejected() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        assert!(matches!(rgb_view(&image), Err(ChromaError::InvalidImageFormat(ColorType::Rgba8))));
    }

    #[test]
    fn sixteen_bit_rgb_is_rejected() {
        let image = DynamicImage::new_rgb16(2, 2);
        assert!(matches!(rgb_view(&image), Err(ChromaError::InvalidImageFormat(ColorType::Rgb16))));
    }

    #[test]
    fn zero_width_is_empty() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 5));
        assert!(matches!(rgb_view(&image), Err(ChromaError::EmptyImage)));
    }

    #[test]
    fn rgb8_is_borrowed() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(3, 1));
        let view = rgb_view(&image).unwrap();
        assert_eq!(view.dimensions(), (3, 1));
    }
}
