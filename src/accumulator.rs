use serde::Serialize;

use crate::{error::Error, logger, mask::LabeledMask};

/// Share of `matched` in `total` in percent; 0 for an empty total.
pub fn percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0_f64;
    }
    matched as f64 * 100_f64 / total as f64
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionResult {
    pub region_index: usize,
    pub band: String,
    pub matched: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandTotals {
    pub band: String,
    pub matched: usize,
    pub total: usize,
}

impl BandTotals {
    fn new(band: &str) -> Self {
        Self {
            band: band.to_owned(),
            matched: 0,
            total: 0,
        }
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.matched, self.total)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateResult {
    bands: Vec<BandTotals>,
}

impl AggregateResult {
    pub fn bands(&self) -> &[BandTotals] {
        &self.bands
    }

    pub fn band(&self, name: &str) -> Option<&BandTotals> {
        self.bands.iter().find(|totals| totals.band == name)
    }

    fn band_mut(&mut self, name: &str) -> &mut BandTotals {
        let position = match self.bands.iter().position(|totals| totals.band == name) {
            Some(position) => position,
            None => {
                self.bands.push(BandTotals::new(name));
                self.bands.len() - 1
            }
        };
        &mut self.bands[position]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumulatorState {
    Empty,
    Accumulating,
    Finalized,
}

pub struct RegionAccumulator {
    state: AccumulatorState,
    aggregate: AggregateResult,
    region_results: Vec<RegionResult>,
}

impl RegionAccumulator {
    pub fn new() -> Self {
        Self {
            state: AccumulatorState::Empty,
            aggregate: AggregateResult::default(),
            region_results: Vec::new(),
        }
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    pub fn reset(&mut self) {
        self.aggregate = AggregateResult::default();
        self.region_results.clear();
        self.state = AccumulatorState::Accumulating;
    }

    /// Counts each mask of one region and adds it to the band totals.
    ///
    /// Every mask must cover exactly `region_pixel_count` pixels. The masks
    /// are all checked before any total changes, so a rejected region leaves
    /// the accumulator as it was.
    ///
    /// # Panics
    ///
    /// When called after `finalize` without an intervening `reset`.
    pub fn add_region(
        &mut self,
        region_index: usize,
        masks: &[LabeledMask],
        region_pixel_count: usize,
    ) -> crate::Result<Vec<RegionResult>> {
        if self.state == AccumulatorState::Finalized {
            panic!("Region {} added to a finalized accumulator", region_index);
        }
        if let Some(mismatch) = masks
            .iter()
            .find(|labeled| labeled.mask.pixel_count() != region_pixel_count)
        {
            return Err(Error::InvalidRegion(format!(
                "region {} has {} pixels but the mask of band '{}' covers {}",
                region_index,
                region_pixel_count,
                mismatch.band,
                mismatch.mask.pixel_count()
            )));
        }
        self.state = AccumulatorState::Accumulating;

        let results: Vec<RegionResult> = masks
            .iter()
            .map(|labeled| {
                let matched = labeled.mask.count_matched();
                RegionResult {
                    region_index,
                    band: labeled.band.clone(),
                    matched,
                    total: region_pixel_count,
                    percentage: percentage(matched, region_pixel_count),
                }
            })
            .collect();
        for result in &results {
            let totals = self.aggregate.band_mut(&result.band);
            totals.matched += result.matched;
            totals.total += result.total;
        }
        logger::log_region_results(&results);
        self.region_results.extend(results.iter().cloned());
        Ok(results)
    }

    pub fn finalize(&mut self) -> AggregateResult {
        self.state = AccumulatorState::Finalized;
        self.aggregate.clone()
    }

    pub fn region_results(&self) -> &[RegionResult] {
        &self.region_results
    }
}

impl Default for RegionAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
