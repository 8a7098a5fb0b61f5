use std::fmt::Display;

use serde::Serialize;

use crate::{
    accumulator::{AggregateResult, RegionResult},
    error::Error,
};

const REPORT_TITLE: &str = "Color Area Percentage Report";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportAnnotations {
    pub identifier: Option<String>,
    pub date: Option<String>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandPercentage {
    pub band: String,
    pub matched: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionEntry {
    /// One-based number shown to users.
    pub number: usize,
    pub index: usize,
    pub bands: Vec<BandPercentage>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PercentageReport {
    pub annotations: ReportAnnotations,
    pub regions: Vec<RegionEntry>,
    pub overall: Vec<BandPercentage>,
}

impl PercentageReport {
    pub fn assemble(
        region_results: &[RegionResult],
        aggregate: &AggregateResult,
        annotations: ReportAnnotations,
    ) -> Self {
        let mut regions: Vec<RegionEntry> = Vec::new();
        for result in region_results {
            let band = BandPercentage {
                band: result.band.clone(),
                matched: result.matched,
                total: result.total,
                percentage: result.percentage,
            };
            match regions
                .iter_mut()
                .find(|entry| entry.index == result.region_index)
            {
                Some(entry) => entry.bands.push(band),
                None => regions.push(RegionEntry {
                    number: result.region_index + 1,
                    index: result.region_index,
                    bands: vec![band],
                }),
            }
        }
        let overall = aggregate
            .bands()
            .iter()
            .map(|totals| BandPercentage {
                band: totals.band.clone(),
                matched: totals.matched,
                total: totals.total,
                percentage: totals.percentage(),
            })
            .collect();
        Self {
            annotations,
            regions,
            overall,
        }
    }

    pub fn overall_percentage(&self, band: &str) -> Option<f64> {
        self.overall
            .iter()
            .find(|entry| entry.band == band)
            .map(|entry| entry.percentage)
    }

    /// `report-<id>-<date>`, or `report-<date>` without identifier.
    pub fn suggested_file_stem(&self) -> String {
        let date = self
            .annotations
            .date
            .as_deref()
            .filter(|date| !date.is_empty())
            .unwrap_or("unknown");
        match self.annotations.identifier.as_deref() {
            Some(identifier) if !identifier.is_empty() => {
                format!("report-{}-{}", identifier, date)
            }
            _ => format!("report-{}", date),
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::ReportSerializationFailed(e.to_string()))
    }
}

impl Display for PercentageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", REPORT_TITLE)?;
        if let Some(identifier) = &self.annotations.identifier {
            writeln!(f, "ID: {}", identifier)?;
        }
        if let Some(date) = &self.annotations.date {
            writeln!(f, "Date: {}", date)?;
        }
        for region in &self.regions {
            writeln!(f)?;
            writeln!(f, "Region {}:", region.number)?;
            for band in &region.bands {
                writeln!(f, "  {} area percentage: {:.2}%", band.band, band.percentage)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Overall Results")?;
        for band in &self.overall {
            writeln!(
                f,
                "  Total {} area percentage: {:.2}%",
                band.band, band.percentage
            )?;
        }
        if let Some(comments) = &self.annotations.comments {
            writeln!(f)?;
            writeln!(f, "Comments")?;
            writeln!(f, "  {}", comments)?;
        }
        Ok(())
    }
}
