use crate::error::Error;

pub mod compositor;

/// Binary per-pixel membership, row-major; `true` marks a matching pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> crate::Result<Self> {
        if bits.len() != width as usize * height as usize {
            return Err(Error::DimensionMismatch(format!(
                "{}x{} mask needs {} entries, got {}",
                width,
                height,
                width as usize * height as usize,
                bits.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.bits.len()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn get(&self, column_index: u32, row_index: u32) -> bool {
        self.bits[row_index as usize * self.width as usize + column_index as usize]
    }

    pub fn count_matched(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn has_same_dimensions(&self, other: &Mask) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn to_luma_bytes(&self) -> Vec<u8> {
        self.bits
            .iter()
            .map(|bit| if *bit { u8::MAX } else { 0 })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledMask {
    pub band: String,
    pub mask: Mask,
}

impl LabeledMask {
    pub fn new(band: impl Into<String>, mask: Mask) -> Self {
        Self {
            band: band.into(),
            mask,
        }
    }
}
