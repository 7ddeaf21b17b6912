#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the screening map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analysis result types to allow independent evolution of the API
//! contract.

use geojson::FeatureCollection;
use screening_map_analytics_models::{MoranResult, PeriodAnalysis};
use screening_map_map_models::MapConfig;
use screening_map_screening_models::SiteAggregate;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A selectable collection period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPeriod {
    /// Period name (e.g. `"Period3"`).
    pub name: String,
    /// Whether data has been collected for this period.
    pub available: bool,
}

/// Form body of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeForm {
    /// Selected period name.
    pub period: Option<String>,
}

/// Initial view handed to the map widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    /// View, zoom, and palette settings.
    pub view: MapConfig,
    /// One point feature per site.
    pub features: FeatureCollection,
}

/// Full analysis of one period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalysis {
    /// Period name.
    pub period: String,
    /// Site summaries, highest average screening level first.
    pub sites: Vec<SiteAggregate>,
    /// Period-wide average screening level, rounded to two places.
    pub period_average: f64,
    /// Global Moran's I of the site averages.
    pub moran: MoranResult,
    /// Map view and features.
    pub map: ApiMap,
}

impl ApiAnalysis {
    /// Packages an analysis for the API.
    #[must_use]
    pub fn new(period: String, analysis: PeriodAnalysis, view: MapConfig) -> Self {
        let period_average = analysis.rounded_period_average();
        Self {
            period,
            sites: analysis.sites,
            period_average,
            moran: analysis.moran,
            map: ApiMap {
                view,
                features: analysis.features,
            },
        }
    }
}

/// Error body returned for any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error kind (e.g. `"insufficient_sites"`).
    pub kind: String,
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(kind: &str, error: impl Into<String>) -> Self {
        Self {
            kind: kind.to_owned(),
            error: error.into(),
        }
    }
}
