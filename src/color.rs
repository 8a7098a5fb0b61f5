use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Largest hue value of the 8-bit hue convention (degrees halved).
pub const HUE_MAX: u8 = 179;

/// The channel layout a buffer or a band is expressed in.
///
/// HSV follows the 8-bit convention used throughout the crate: hue is stored
/// as degrees / 2 in `0..=179`, saturation and value in `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Rgb,
    Bgr,
    Hsv,
    Grayscale,
}

impl ColorSpace {
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb | Self::Bgr | Self::Hsv => 3,
            Self::Grayscale => 1,
        }
    }

    pub fn channel_max(&self, channel: usize) -> u8 {
        match (self, channel) {
            (Self::Hsv, 0) => HUE_MAX,
            _ => u8::MAX,
        }
    }
}

impl Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Bgr => write!(f, "BGR"),
            Self::Hsv => write!(f, "HSV"),
            Self::Grayscale => write!(f, "grayscale"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RGBColorFormat<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
}

pub struct RangeColorFormat<T> {
    max: T,
    red: T,
    green: T,
    blue: T,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HSVColorFormat<T> {
    pub hue: T,
    pub saturation: T,
    pub value: T,
}

pub struct LumaColorFormat<T> {
    pub luma: T,
}

impl RGBColorFormat<u8> {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        RGBColorFormat { red, green, blue }
    }

    pub fn from_bgr(blue: u8, green: u8, red: u8) -> Self {
        RGBColorFormat { red, green, blue }
    }
}

impl RangeColorFormat<u16> {
    pub fn new(max: u16, red: u16, green: u16, blue: u16) -> crate::Result<Self> {
        for value in [red, green, blue] {
            if value > max {
                return Err(crate::Error::ColorValueExceedsMaxValue(value, max));
            }
        }
        Ok(RangeColorFormat {
            max,
            red,
            green,
            blue,
        })
    }

    fn rescale(&self, value: u16) -> u8 {
        if self.max == 0 {
            return 0;
        }
        (value as f32 * u8::MAX as f32 / self.max as f32).round() as u8
    }
}

impl From<&RangeColorFormat<u16>> for RGBColorFormat<u8> {
    fn from(value: &RangeColorFormat<u16>) -> Self {
        RGBColorFormat {
            red: value.rescale(value.red),
            green: value.rescale(value.green),
            blue: value.rescale(value.blue),
        }
    }
}

impl From<RangeColorFormat<u16>> for RGBColorFormat<u8> {
    fn from(value: RangeColorFormat<u16>) -> Self {
        RGBColorFormat::from(&value)
    }
}

impl From<&RGBColorFormat<u8>> for HSVColorFormat<u8> {
    fn from(value: &RGBColorFormat<u8>) -> Self {
        let red = value.red as f32;
        let green = value.green as f32;
        let blue = value.blue as f32;
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;

        let degrees = if delta == 0_f32 {
            0_f32
        } else if max == red {
            60_f32 * (green - blue) / delta
        } else if max == green {
            120_f32 + 60_f32 * (blue - red) / delta
        } else {
            240_f32 + 60_f32 * (red - green) / delta
        };
        let degrees = if degrees < 0_f32 {
            degrees + 360_f32
        } else {
            degrees
        };
        let hue = (degrees / 2_f32).round() as u16 % (HUE_MAX as u16 + 1);
        let saturation = if max == 0_f32 {
            0_f32
        } else {
            (delta * 255_f32 / max).round()
        };

        HSVColorFormat {
            hue: hue as u8,
            saturation: saturation as u8,
            value: max as u8,
        }
    }
}

impl From<&RGBColorFormat<u8>> for LumaColorFormat<u8> {
    fn from(value: &RGBColorFormat<u8>) -> Self {
        let weighted_red = value.red as f32 * 0.299_f32;
        let weighted_green = value.green as f32 * 0.587_f32;
        let weighted_blue = value.blue as f32 * 0.114_f32;
        let luma = (weighted_red + weighted_green + weighted_blue).round();
        LumaColorFormat {
            luma: luma.min(255_f32) as u8,
        }
    }
}
