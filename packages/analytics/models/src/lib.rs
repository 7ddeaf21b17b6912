#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by a period analysis run.
//!
//! These are handed to the presentation layer (HTTP API, CLI) as-is and
//! carry no behavior beyond formatting helpers.

use geojson::FeatureCollection;
use screening_map_screening_models::SiteAggregate;
use serde::{Deserialize, Serialize};

/// Global Moran's I with its normal-approximation inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoranResult {
    /// Observed statistic `I`.
    pub i: f64,
    /// Expected value under the null, `-1 / (n - 1)`.
    pub expected_i: f64,
    /// Standardized score of `I`.
    pub z_score: f64,
    /// Two-sided p-value of `z_score` under the standard normal.
    pub p_value: f64,
}

/// Everything computed for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalysis {
    /// Site summaries, sorted by average screening level (descending).
    pub sites: Vec<SiteAggregate>,
    /// Mean screening level over every record in the period.
    pub period_average: f64,
    /// Spatial autocorrelation of the site averages.
    pub moran: MoranResult,
    /// One point feature per site, ready for the map widget.
    pub features: FeatureCollection,
}

impl PeriodAnalysis {
    /// The period average rounded to two decimal places for display.
    #[must_use]
    pub fn rounded_period_average(&self) -> f64 {
        round_to(self.period_average, 2)
    }
}

/// Rounds `value` to `places` decimal places (half away from zero).
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
