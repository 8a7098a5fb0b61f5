use crate::color::ColorSpace;
use crate::error::Error;
use crate::region::Rect;

pub mod converter;
pub mod reader;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<PixelBuffer>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    color_space: ColorSpace,
    samples: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        samples: Vec<u8>,
    ) -> crate::Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(color_space.channels()));
        if expected != Some(samples.len()) {
            return Err(Error::DimensionMismatch(format!(
                "{}x{} {} buffer cannot hold {} samples",
                width,
                height,
                color_space,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            color_space,
            samples,
        })
    }

    pub fn filled(width: u32, height: u32, color_space: ColorSpace, pixel: &[u8]) -> crate::Result<Self> {
        if pixel.len() != color_space.channels() {
            return Err(Error::DimensionMismatch(format!(
                "{} pixel needs {} channels, got {}",
                color_space,
                color_space.channels(),
                pixel.len()
            )));
        }
        let samples = pixel.repeat(width as usize * height as usize);
        Self::new(width, height, color_space, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn channels(&self) -> usize {
        self.color_space.channels()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn pixel(&self, column_index: u32, row_index: u32) -> &[u8] {
        let channels = self.channels();
        let start = (row_index as usize * self.width as usize + column_index as usize) * channels;
        &self.samples[start..start + channels]
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.samples.chunks_exact(self.channels())
    }

    pub fn crop(&self, rect: &Rect) -> crate::Result<PixelBuffer> {
        if !rect.fits_within(self.width, self.height) {
            return Err(Error::InvalidRegion(format!(
                "{} lies outside the {}x{} image",
                rect, self.width, self.height
            )));
        }
        let channels = self.channels();
        let row_length = rect.width() as usize * channels;
        let mut samples = Vec::with_capacity(rect.pixel_count() * channels);
        for row_index in rect.y1..rect.y2 {
            let start = (row_index as usize * self.width as usize + rect.x1 as usize) * channels;
            samples.extend_from_slice(&self.samples[start..start + row_length]);
        }
        PixelBuffer::new(rect.width(), rect.height(), self.color_space, samples)
    }
}
