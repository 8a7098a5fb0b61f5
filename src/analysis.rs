use std::collections::HashMap;

use crate::{
    accumulator::RegionAccumulator,
    band::{self, Band},
    buffer::{converter, PixelBuffer},
    color::ColorSpace,
    error::Error,
    mask::{
        compositor::{self, CompositeOp},
        LabeledMask, Mask,
    },
    region::{Rect, Region},
    report::{PercentageReport, ReportAnnotations},
};

#[derive(Clone, Debug, Default)]
pub struct AnalysisOptions {
    pub bands: Vec<Band>,
    /// Regions in the order they were drawn; empty means the whole image.
    pub regions: Vec<Region>,
    pub annotations: ReportAnnotations,
}

pub struct AnalysisOutcome {
    pub report: PercentageReport,
    pub regions: Vec<Rect>,
    /// Image-sized masks with the matches of all regions, one per band.
    pub overlays: Vec<LabeledMask>,
}

impl AnalysisOutcome {
    pub fn overlay(&self, band: &str) -> Option<&Mask> {
        self.overlays
            .iter()
            .find(|labeled| labeled.band == band)
            .map(|labeled| &labeled.mask)
    }
}

pub struct Analyzer<'a> {
    image: &'a PixelBuffer,
    options: &'a AnalysisOptions,
}

impl<'a> Analyzer<'a> {
    pub fn new(image: &'a PixelBuffer, options: &'a AnalysisOptions) -> Self {
        Self { image, options }
    }

    fn regions(&self) -> Vec<Region> {
        if self.options.regions.is_empty() {
            vec![Region::WholeImage]
        } else {
            self.options.regions.clone()
        }
    }

    fn check_bands(&self) -> crate::Result<()> {
        if self.options.bands.is_empty() {
            return Err(Error::InvalidBand("no bands configured".to_owned()));
        }
        for (index, band) in self.options.bands.iter().enumerate() {
            if self.options.bands[..index]
                .iter()
                .any(|other| other.name() == band.name())
            {
                return Err(Error::InvalidBand(format!(
                    "band name '{}' is used more than once",
                    band.name()
                )));
            }
        }
        Ok(())
    }

    fn empty_overlays(&self) -> Vec<LabeledMask> {
        self.options
            .bands
            .iter()
            .map(|band| LabeledMask::new(band.name(), Mask::new(self.image.width(), self.image.height())))
            .collect()
    }

    fn classify_region(&self, crop: &PixelBuffer) -> crate::Result<Vec<LabeledMask>> {
        let mut converted: HashMap<ColorSpace, PixelBuffer> = HashMap::new();
        let mut masks = Vec::with_capacity(self.options.bands.len());
        for band in &self.options.bands {
            let color_space = band.color_space();
            if !converted.contains_key(&color_space) {
                let buffer = converter::convert(crop, crop.color_space(), color_space)?;
                converted.insert(color_space, buffer);
            }
            let buffer = &converted[&color_space];
            masks.push(LabeledMask::new(band.name(), band::mask::compute(buffer, band)?));
        }
        Ok(masks)
    }

    fn overlay_region(
        overlays: &mut [LabeledMask],
        rect: &Rect,
        masks: &[LabeledMask],
    ) -> crate::Result<()> {
        for (overlay, labeled) in overlays.iter_mut().zip(masks) {
            overlay.mask = compositor::overlay(&overlay.mask, rect, &labeled.mask, CompositeOp::Or)?;
        }
        Ok(())
    }

    pub fn analyze(&self) -> crate::Result<AnalysisOutcome> {
        self.check_bands()?;
        let mut accumulator = RegionAccumulator::new();
        accumulator.reset();
        let mut overlays = self.empty_overlays();
        let mut rects = Vec::new();

        for (region_index, region) in self.regions().iter().enumerate() {
            let rect = region.resolve(self.image.width(), self.image.height())?;
            log::info!("Analyzing region {} at {}", region_index + 1, rect);
            if rect.pixel_count() == 0 {
                log::warn!("Region {} contains no pixels", region_index + 1);
            }
            let crop = self.image.crop(&rect)?;
            let masks = self.classify_region(&crop)?;
            accumulator.add_region(region_index, &masks, crop.pixel_count())?;
            Self::overlay_region(&mut overlays, &rect, &masks)?;
            rects.push(rect);
        }

        let aggregate = accumulator.finalize();
        let report = PercentageReport::assemble(
            accumulator.region_results(),
            &aggregate,
            self.options.annotations.clone(),
        );
        Ok(AnalysisOutcome {
            report,
            regions: rects,
            overlays,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{AnalysisOptions, Analyzer};
    use crate::{
        band::{preset::BandPreset, Band, BandRange},
        buffer::PixelBuffer,
        color::ColorSpace,
        error::Error,
        region::{Rect, Region},
    };

    fn red_band() -> Band {
        Band::new(
            "red",
            ColorSpace::Rgb,
            vec![BandRange::from_bounds(&[200, 0, 0], &[255, 50, 50])],
        )
        .unwrap()
    }

    fn red_block_image() -> PixelBuffer {
        let mut samples = Vec::new();
        for row_index in 0..4 {
            for column_index in 0..4 {
                if row_index < 2 && column_index < 2 {
                    samples.extend_from_slice(&[255, 0, 0]);
                } else {
                    samples.extend_from_slice(&[255, 255, 255]);
                }
            }
        }
        PixelBuffer::new(4, 4, ColorSpace::Rgb, samples).unwrap()
    }

    #[test]
    fn whole_image_without_regions() {
        let image = red_block_image();
        let options = AnalysisOptions {
            bands: vec![red_band()],
            ..Default::default()
        };
        let outcome = Analyzer::new(&image, &options).analyze().unwrap();
        let region = &outcome.report.regions[0].bands[0];
        assert_eq!(region.matched, 4);
        assert_eq!(region.total, 16);
        assert_eq!(region.percentage, 25_f64);
        assert_eq!(outcome.regions, vec![Rect::new(0, 0, 4, 4)]);
    }

    #[test]
    fn crops_are_aggregated_and_overlaid() {
        let image = red_block_image();
        let options = AnalysisOptions {
            bands: vec![red_band()],
            regions: vec![
                Region::Rect(Rect::new(0, 0, 2, 1)),
                Region::Rect(Rect::new(1, 1, 4, 4)),
            ],
            ..Default::default()
        };
        let outcome = Analyzer::new(&image, &options).analyze().unwrap();
        assert_eq!(outcome.report.regions[0].bands[0].percentage, 100_f64);
        assert_eq!(outcome.report.regions[1].bands[0].matched, 1);
        // (2 + 1) of (2 + 9) pixels
        let overall = outcome.report.overall_percentage("red").unwrap();
        assert!((overall - 300_f64 / 11_f64).abs() < 1e-9);

        let overlay = outcome.overlay("red").unwrap();
        assert_eq!(overlay.count_matched(), 3);
        assert!(overlay.get(0, 0) && overlay.get(1, 0) && overlay.get(1, 1));
        assert!(!overlay.get(0, 1), "outside every region");
    }

    #[test]
    fn bands_in_different_color_spaces() {
        let image = red_block_image();
        let mut bands = BandPreset::HsvFiber.bands(0).unwrap();
        bands.extend(BandPreset::DarkDefect.bands(100).unwrap());
        let options = AnalysisOptions {
            bands,
            ..Default::default()
        };
        let outcome = Analyzer::new(&image, &options).analyze().unwrap();
        assert_eq!(outcome.report.overall_percentage("red"), Some(25_f64));
        assert_eq!(outcome.report.overall_percentage("blue"), Some(0_f64));
        // pure red has luma 76, white 255
        assert_eq!(outcome.report.overall_percentage("dark"), Some(25_f64));
    }

    #[test]
    fn reject_region_outside_image() {
        let image = red_block_image();
        let options = AnalysisOptions {
            bands: vec![red_band()],
            regions: vec![Region::Rect(Rect::new(0, 0, 5, 4))],
            ..Default::default()
        };
        let result = Analyzer::new(&image, &options).analyze();
        assert!(matches!(result, Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn reject_duplicate_band_names() {
        let image = red_block_image();
        let options = AnalysisOptions {
            bands: vec![red_band(), red_band()],
            ..Default::default()
        };
        let result = Analyzer::new(&image, &options).analyze();
        assert!(matches!(result, Err(Error::InvalidBand(_))));
    }

    #[test]
    fn empty_image_reports_zero() {
        let image = PixelBuffer::new(0, 0, ColorSpace::Rgb, Vec::new()).unwrap();
        let options = AnalysisOptions {
            bands: vec![red_band()],
            ..Default::default()
        };
        let outcome = Analyzer::new(&image, &options).analyze().unwrap();
        assert_eq!(outcome.report.overall_percentage("red"), Some(0_f64));
    }
}
