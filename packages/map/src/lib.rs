#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Render-ready site features for the map widget.
//!
//! Every site becomes a `GeoJSON` point feature carrying its summary
//! attributes and a style category. Categories are assigned per
//! organization in order of first appearance, so every site run by the same
//! organization gets the same marker color within a run.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use screening_map_map_models::MapConfig;
use screening_map_screening_models::SiteAggregate;
use serde_json::Value;

/// Errors that can occur while preparing map data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Style categories need at least one palette entry.
    #[error("Map palette is empty")]
    EmptyPalette,
}

/// Builds the site feature collection for a configured palette.
#[derive(Debug, Clone)]
pub struct MapDataBuilder {
    palette: Vec<String>,
}

impl MapDataBuilder {
    /// Creates a builder using the palette from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::EmptyPalette`] if the palette has no colors.
    pub fn new(config: &MapConfig) -> Result<Self, MapError> {
        if config.palette.is_empty() {
            return Err(MapError::EmptyPalette);
        }
        Ok(Self {
            palette: config.palette.clone(),
        })
    }

    /// Number of distinct style categories.
    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.palette.len()
    }

    /// Maps each organization to a style category.
    ///
    /// Organizations are indexed from 0 in order of first appearance in
    /// `sites`; the category is that index modulo the palette size.
    #[must_use]
    pub fn style_categories(&self, sites: &[SiteAggregate]) -> BTreeMap<String, usize> {
        let mut categories = BTreeMap::new();
        let mut next_index = 0_usize;

        for site in sites {
            categories
                .entry(site.organization.clone())
                .or_insert_with(|| {
                    let category = next_index % self.palette.len();
                    next_index += 1;
                    category
                });
        }

        categories
    }

    /// Builds one point feature per site, in the order given.
    #[must_use]
    pub fn build(&self, sites: &[SiteAggregate]) -> FeatureCollection {
        let categories = self.style_categories(sites);

        let features: Vec<Feature> = sites
            .iter()
            .map(|site| {
                let category = categories.get(&site.organization).copied().unwrap_or(0);
                self.site_feature(site, category)
            })
            .collect();

        log::debug!(
            "Built {} map features for {} organizations",
            features.len(),
            categories.len()
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn site_feature(&self, site: &SiteAggregate, category: usize) -> Feature {
        let point = geo::Point::new(site.longitude, site.latitude);

        let mut properties = JsonObject::new();
        properties.insert("address".to_owned(), Value::from(site.address.as_str()));
        properties.insert(
            "organization".to_owned(),
            Value::from(site.organization.as_str()),
        );
        properties.insert(
            "averageScreeningLevel".to_owned(),
            Value::from(site.average_screening_level),
        );
        properties.insert("styleCategory".to_owned(), Value::from(category));
        properties.insert(
            "markerColor".to_owned(),
            Value::from(self.palette[category].as_str()),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::from(&point))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}
