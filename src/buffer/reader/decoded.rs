use std::path::Path;

use crate::{
    buffer::{ImageReader, PixelBuffer},
    color::ColorSpace,
    error::Error,
};

pub struct DecodedImageReader<'a> {
    file_path: &'a Path,
}

impl<'a> DecodedImageReader<'a> {
    pub fn new(file_path: &'a Path) -> Self {
        Self { file_path }
    }

    fn decoding_failed(&self, reason: String) -> Error {
        Error::ImageDecodingFailed(self.file_path.display().to_string(), reason)
    }
}

impl ImageReader for DecodedImageReader<'_> {
    fn read_image(&mut self) -> crate::Result<PixelBuffer> {
        let decoded = image::open(self.file_path).map_err(|e| self.decoding_failed(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!(
            "Decoded {} as {}x{} RGB",
            self.file_path.display(),
            width,
            height
        );
        PixelBuffer::new(width, height, ColorSpace::Rgb, rgb.into_raw())
    }
}
