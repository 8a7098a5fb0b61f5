use serde::{Deserialize, Serialize};

use crate::{color::ColorSpace, error::Error};

pub mod mask;
pub mod preset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct ChannelRange {
    pub low: u8,
    pub high: u8,
}

impl ChannelRange {
    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.low <= value && value <= self.high
    }
}

impl From<[u8; 2]> for ChannelRange {
    fn from(value: [u8; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<ChannelRange> for [u8; 2] {
    fn from(value: ChannelRange) -> Self {
        [value.low, value.high]
    }
}

/// One box in color space: a pixel lies inside iff every channel does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandRange {
    channels: Vec<ChannelRange>,
}

impl BandRange {
    pub fn new(channels: Vec<ChannelRange>) -> Self {
        Self { channels }
    }

    pub fn from_bounds(lower: &[u8], upper: &[u8]) -> Self {
        let channels = lower
            .iter()
            .zip(upper)
            .map(|(low, high)| ChannelRange::new(*low, *high))
            .collect();
        Self { channels }
    }

    pub fn channels(&self) -> &[ChannelRange] {
        &self.channels
    }

    pub fn contains(&self, pixel: &[u8]) -> bool {
        self.channels
            .iter()
            .zip(pixel)
            .all(|(range, value)| range.contains(*value))
    }
}

/// A named classification rule over one or two ranges of one color space.
///
/// Two ranges express bands that wrap around the hue circle; a pixel inside
/// either range belongs to the band once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BandDefinition")]
pub struct Band {
    name: String,
    color_space: ColorSpace,
    ranges: Vec<BandRange>,
}

impl Band {
    pub const MAX_RANGES: usize = 2;

    pub fn new(
        name: impl Into<String>,
        color_space: ColorSpace,
        ranges: Vec<BandRange>,
    ) -> crate::Result<Self> {
        let band = Self {
            name: name.into(),
            color_space,
            ranges,
        };
        band.validate()?;
        Ok(band)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn ranges(&self) -> &[BandRange] {
        &self.ranges
    }

    pub fn contains(&self, pixel: &[u8]) -> bool {
        self.ranges.iter().any(|range| range.contains(pixel))
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidBand(format!("'{}': {}", self.name, reason))
    }

    fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty".to_owned()));
        }
        if self.name.contains(|c: char| c == '/' || c == '\\') || self.name.contains("..") {
            return Err(self.invalid("name must not contain path separators or '..'".to_owned()));
        }
        if self.ranges.is_empty() || self.ranges.len() > Self::MAX_RANGES {
            return Err(self.invalid(format!(
                "needs 1 to {} ranges, got {}",
                Self::MAX_RANGES,
                self.ranges.len()
            )));
        }
        let channels = self.color_space.channels();
        for range in &self.ranges {
            if range.channels().len() != channels {
                return Err(self.invalid(format!(
                    "{} ranges need {} channels, got {}",
                    self.color_space,
                    channels,
                    range.channels().len()
                )));
            }
            for (channel, bounds) in range.channels().iter().enumerate() {
                if bounds.low > bounds.high {
                    return Err(self.invalid(format!(
                        "channel {} lower bound {} exceeds upper bound {}",
                        channel, bounds.low, bounds.high
                    )));
                }
                let channel_max = self.color_space.channel_max(channel);
                if bounds.high > channel_max {
                    return Err(self.invalid(format!(
                        "channel {} upper bound {} exceeds {} maximum of {}",
                        channel, bounds.high, self.color_space, channel_max
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct BandDefinition {
    name: String,
    color_space: ColorSpace,
    ranges: Vec<BandRange>,
}

impl TryFrom<BandDefinition> for Band {
    type Error = Error;

    fn try_from(value: BandDefinition) -> Result<Self, Self::Error> {
        Band::new(value.name, value.color_space, value.ranges)
    }
}
