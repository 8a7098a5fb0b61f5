use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// A half-open pixel rectangle: columns `x1..x2`, rows `y1..y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2 && self.x2 <= width && self.y2 <= height
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    WholeImage,
    Rect(Rect),
}

impl Region {
    /// Turns the region into a rectangle valid for a `width` x `height` image.
    ///
    /// The whole image of a zero-sized buffer resolves to an empty rectangle;
    /// explicit rectangles must have a positive area.
    pub fn resolve(&self, width: u32, height: u32) -> crate::Result<Rect> {
        match self {
            Self::WholeImage => Ok(Rect::new(0, 0, width, height)),
            Self::Rect(rect) => {
                if rect.x1 >= rect.x2 || rect.y1 >= rect.y2 {
                    return Err(Error::InvalidRegion(format!("{} has zero area", rect)));
                }
                if !rect.fits_within(width, height) {
                    return Err(Error::InvalidRegion(format!(
                        "{} lies outside the {}x{} image",
                        rect, width, height
                    )));
                }
                Ok(*rect)
            }
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coordinates = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|e| format!("region '{}' is not a list of pixel coordinates: {}", s, e))?;
        match coordinates[..] {
            [x1, y1, x2, y2] => Ok(Region::Rect(Rect::new(x1, y1, x2, y2))),
            _ => Err(format!(
                "region '{}' must have the form x1,y1,x2,y2",
                s
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Rect, Region};
    use crate::error::Error;

    #[test]
    fn resolve_whole_image() {
        let rect = Region::WholeImage.resolve(20, 10).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 20, 10));
        assert_eq!(rect.pixel_count(), 200);
    }

    #[test]
    fn resolve_whole_empty_image() {
        let rect = Region::WholeImage.resolve(0, 0).unwrap();
        assert_eq!(rect.pixel_count(), 0);
    }

    #[test]
    fn reject_zero_area() {
        let result = Region::Rect(Rect::new(3, 1, 3, 5)).resolve(10, 10);
        assert!(matches!(result, Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn reject_out_of_bounds() {
        let result = Region::Rect(Rect::new(0, 0, 11, 5)).resolve(10, 10);
        assert!(matches!(result, Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn accept_full_extent() {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(Region::Rect(rect).resolve(10, 10).unwrap(), rect);
    }

    #[test]
    fn parse_region() {
        let region: Region = " 1, 2,30 ,40".parse().unwrap();
        assert_eq!(region, Region::Rect(Rect::new(1, 2, 30, 40)));
    }

    #[test]
    fn parse_malformed_region() {
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("a,b,c,d".parse::<Region>().is_err());
        assert!("1,2,3,-4".parse::<Region>().is_err());
    }
}
