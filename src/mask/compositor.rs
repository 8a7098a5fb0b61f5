use super::Mask;
use crate::{
    buffer::{converter, PixelBuffer},
    color::{ColorSpace, RGBColorFormat},
    error::Error,
    region::Rect,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOp {
    /// Keep what the canvas already marks and add the region's matches.
    #[default]
    Or,
    /// Overwrite the rectangle with the region mask.
    Replace,
}

pub fn union_ranges(masks: &[Mask]) -> crate::Result<Mask> {
    let (first, rest) = masks
        .split_first()
        .ok_or_else(|| Error::DimensionMismatch("union of zero masks".to_owned()))?;
    let mut bits = first.bits().to_vec();
    for mask in rest {
        if !mask.has_same_dimensions(first) {
            return Err(Error::DimensionMismatch(format!(
                "cannot union {}x{} mask with {}x{} mask",
                first.width(),
                first.height(),
                mask.width(),
                mask.height()
            )));
        }
        for (bit, other) in bits.iter_mut().zip(mask.bits()) {
            *bit |= *other;
        }
    }
    Mask::from_bits(first.width(), first.height(), bits)
}

pub fn resample_nearest(mask: &Mask, width: u32, height: u32) -> Mask {
    if mask.width() == width && mask.height() == height {
        return mask.clone();
    }
    if mask.pixel_count() == 0 {
        return Mask::new(width, height);
    }
    let mut bits = Vec::with_capacity(width as usize * height as usize);
    for row_index in 0..height {
        let source_row = (row_index as u64 * mask.height() as u64 / height as u64) as u32;
        for column_index in 0..width {
            let source_column = (column_index as u64 * mask.width() as u64 / width as u64) as u32;
            bits.push(mask.get(source_column, source_row));
        }
    }
    Mask {
        width,
        height,
        bits,
    }
}

/// Writes `region_mask` into the `rect` area of a copy of `canvas`.
///
/// Pixels outside `rect` keep their canvas value. A region mask whose size
/// differs from `rect` is resampled to it first.
pub fn overlay(canvas: &Mask, rect: &Rect, region_mask: &Mask, op: CompositeOp) -> crate::Result<Mask> {
    if !rect.fits_within(canvas.width(), canvas.height()) {
        return Err(Error::DimensionMismatch(format!(
            "region {} exceeds the {}x{} canvas",
            rect,
            canvas.width(),
            canvas.height()
        )));
    }
    let region_mask = resample_nearest(region_mask, rect.width(), rect.height());
    let mut result = canvas.clone();
    let canvas_width = canvas.width() as usize;
    for (row_offset, region_row) in region_mask
        .bits()
        .chunks(rect.width().max(1) as usize)
        .enumerate()
    {
        let start = (rect.y1 as usize + row_offset) * canvas_width + rect.x1 as usize;
        let canvas_row = &mut result.bits[start..start + region_row.len()];
        for (bit, region_bit) in canvas_row.iter_mut().zip(region_row) {
            *bit = match op {
                CompositeOp::Or => *bit | *region_bit,
                CompositeOp::Replace => *region_bit,
            };
        }
    }
    Ok(result)
}

pub fn highlight(
    buffer: &PixelBuffer,
    mask: &Mask,
    color: RGBColorFormat<u8>,
) -> crate::Result<PixelBuffer> {
    if mask.width() != buffer.width() || mask.height() != buffer.height() {
        return Err(Error::DimensionMismatch(format!(
            "{}x{} mask does not cover {}x{} buffer",
            mask.width(),
            mask.height(),
            buffer.width(),
            buffer.height()
        )));
    }
    let rgb = converter::convert(buffer, buffer.color_space(), ColorSpace::Rgb)?;
    let samples = rgb
        .pixels()
        .zip(mask.bits())
        .flat_map(|(pixel, matched)| {
            if *matched {
                [color.red, color.green, color.blue]
            } else {
                [pixel[0], pixel[1], pixel[2]]
            }
        })
        .collect();
    PixelBuffer::new(rgb.width(), rgb.height(), ColorSpace::Rgb, samples)
}
