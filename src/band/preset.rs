use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::{Band, BandRange};
use crate::color::ColorSpace;

pub const DEFAULT_DARK_THRESHOLD: u8 = 164;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BandPreset {
    BgrFiber,
    HsvFiber,
    DarkDefect,
}

impl ValueEnum for BandPreset {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::BgrFiber, Self::HsvFiber, Self::DarkDefect]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::BgrFiber => Some(PossibleValue::new("bgr-fiber")),
            Self::HsvFiber => Some(PossibleValue::new("hsv-fiber")),
            Self::DarkDefect => Some(PossibleValue::new("dark-defect")),
        }
    }
}

impl BandPreset {
    /// Builds the preset's bands; `dark_threshold` is the inclusive upper
    /// gray level of the dark band.
    pub fn bands(&self, dark_threshold: u8) -> crate::Result<Vec<Band>> {
        match self {
            Self::BgrFiber => Ok(vec![
                Band::new(
                    "red",
                    ColorSpace::Bgr,
                    vec![BandRange::from_bounds(&[0, 0, 90], &[120, 120, 255])],
                )?,
                Band::new(
                    "blue",
                    ColorSpace::Bgr,
                    vec![BandRange::from_bounds(&[90, 0, 0], &[255, 120, 120])],
                )?,
            ]),
            Self::HsvFiber => Ok(vec![
                Band::new(
                    "red",
                    ColorSpace::Hsv,
                    vec![
                        BandRange::from_bounds(&[0, 100, 100], &[10, 255, 255]),
                        BandRange::from_bounds(&[160, 100, 100], &[179, 255, 255]),
                    ],
                )?,
                Band::new(
                    "blue",
                    ColorSpace::Hsv,
                    vec![BandRange::from_bounds(&[90, 50, 50], &[130, 255, 255])],
                )?,
            ]),
            Self::DarkDefect => Ok(vec![Band::new(
                "dark",
                ColorSpace::Grayscale,
                vec![BandRange::from_bounds(&[0], &[dark_threshold])],
            )?]),
        }
    }
}
