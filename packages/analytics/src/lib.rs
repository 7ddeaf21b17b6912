#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Screening statistics for one period of site-visit records.
//!
//! The pipeline is pure and synchronous: raw records are geolocated
//! ([`coordinates`]), reduced to per-site averages ([`aggregate`]), tested
//! for spatial clustering with a global Moran's I ([`moran`]), and packaged
//! as map features. [`pipeline::analyze_period`] runs every step; each step
//! is also usable on its own.

pub mod aggregate;
pub mod coordinates;
pub mod moran;
pub mod normal;
pub mod pipeline;

pub use screening_map_analytics_models::{MoranResult, PeriodAnalysis};
pub use screening_map_spatial::SpatialError;

use thiserror::Error;

/// Errors that can occur during a period analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A record's combined coordinate field could not be parsed.
    #[error(
        "Malformed coordinates in record {row} ({organization}, {address}): {reason}"
    )]
    MalformedCoordinate {
        /// Zero-based index of the record in the period.
        row: usize,
        /// Organization of the offending record.
        organization: String,
        /// Address of the offending record.
        address: String,
        /// The raw coordinate field, if present.
        value: Option<String>,
        /// What was wrong with it.
        reason: coordinates::CoordinateError,
    },

    /// The period contains no records.
    #[error("No screening records for this period")]
    EmptyDataset,

    /// The spatial weight graph could not be built.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// The number of values does not match the weight graph.
    #[error("Expected {expected} values for the weight graph, got {actual}")]
    ValueCountMismatch {
        /// Number of sites in the weight graph.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Every site has the same value, so Moran's I is undefined.
    #[error("Moran's I is undefined: all {count} site values are identical")]
    ZeroVariance {
        /// Number of sites.
        count: usize,
    },

    /// The weight graph gives I no variance under the null, so its z-score
    /// is undefined.
    #[error("Moran's I z-score is undefined: zero null variance over {count} sites")]
    DegenerateVariance {
        /// Number of sites.
        count: usize,
    },
}
