#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site-visit screening record types.
//!
//! A period's data arrives as [`RawRecord`]s (one per screening event),
//! becomes [`GeolocatedRecord`]s once the combined coordinate field has been
//! parsed, and is finally reduced to one [`SiteAggregate`] per
//! organization/address pair.

use serde::{Deserialize, Serialize};

/// One screening event as read from a period's tabular source.
///
/// Field names on the wire match the column headers of the period CSV
/// files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Name of the organization that ran the screening.
    #[serde(rename = "Organization")]
    pub organization: String,
    /// Street address of the site visited.
    #[serde(rename = "Address")]
    pub address: String,
    /// Pre-geocoded coordinate pair formatted as `"<lat>,<lon>"`.
    #[serde(rename = "coordinates", default)]
    pub coordinates: Option<String>,
    /// Screening level recorded for this event.
    #[serde(rename = "Screening Level")]
    pub screening_level: f64,
}

impl RawRecord {
    /// Creates a record with a coordinate string.
    #[must_use]
    pub fn new(organization: &str, address: &str, coordinates: &str, screening_level: f64) -> Self {
        Self {
            organization: organization.to_owned(),
            address: address.to_owned(),
            coordinates: Some(coordinates.to_owned()),
            screening_level,
        }
    }
}

/// A [`RawRecord`] with its coordinate field parsed into numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocatedRecord {
    /// The source record.
    #[serde(flatten)]
    pub record: RawRecord,
    /// Parsed latitude.
    pub latitude: f64,
    /// Parsed longitude.
    pub longitude: f64,
}

impl GeolocatedRecord {
    /// Organization name of the underlying record.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.record.organization
    }

    /// Address of the underlying record.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.record.address
    }

    /// Screening level of the underlying record.
    #[must_use]
    pub const fn screening_level(&self) -> f64 {
        self.record.screening_level
    }
}

/// Per-site summary: one row per distinct organization/address pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAggregate {
    /// Organization name.
    pub organization: String,
    /// Site address.
    pub address: String,
    /// Mean screening level across every record for this site.
    pub average_screening_level: f64,
    /// Number of records that were averaged.
    pub record_count: usize,
    /// Longitude of the first record observed for this site.
    pub longitude: f64,
    /// Latitude of the first record observed for this site.
    pub latitude: f64,
}

impl SiteAggregate {
    /// The representative point as planar `[longitude, latitude]`.
    #[must_use]
    pub const fn point(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
