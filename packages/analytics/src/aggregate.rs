//! Per-site aggregation and the period-wide average.

use std::collections::BTreeMap;

use screening_map_screening_models::{GeolocatedRecord, SiteAggregate};

/// Running totals for one organization/address group.
struct SiteAccumulator {
    total: f64,
    count: usize,
    longitude: f64,
    latitude: f64,
}

/// Reduces records to one [`SiteAggregate`] per organization/address pair.
///
/// Each site's value is the mean screening level of its records; its
/// location is the first coordinate observed for it (coordinates are not
/// averaged). Groups are formed in `(organization, address)` key order and
/// then stably sorted by average screening level, highest first, so the
/// result does not depend on record order.
#[must_use]
pub fn aggregate_sites(records: &[GeolocatedRecord]) -> Vec<SiteAggregate> {
    let mut groups: BTreeMap<(&str, &str), SiteAccumulator> = BTreeMap::new();

    for record in records {
        groups
            .entry((record.organization(), record.address()))
            .and_modify(|group| {
                group.total += record.screening_level();
                group.count += 1;
            })
            .or_insert_with(|| SiteAccumulator {
                total: record.screening_level(),
                count: 1,
                longitude: record.longitude,
                latitude: record.latitude,
            });
    }

    let mut sites: Vec<SiteAggregate> = groups
        .into_iter()
        .map(|((organization, address), group)| {
            #[allow(clippy::cast_precision_loss)]
            let average_screening_level = group.total / group.count as f64;
            SiteAggregate {
                organization: organization.to_owned(),
                address: address.to_owned(),
                average_screening_level,
                record_count: group.count,
                longitude: group.longitude,
                latitude: group.latitude,
            }
        })
        .collect();

    sites.sort_by(|a, b| {
        b.average_screening_level
            .total_cmp(&a.average_screening_level)
    });

    log::debug!(
        "Aggregated {} records into {} sites",
        records.len(),
        sites.len()
    );

    sites
}

/// Mean screening level over every record, ignoring site grouping.
///
/// Returns `None` for an empty period, where the average is undefined.
#[must_use]
pub fn period_average(records: &[GeolocatedRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(GeolocatedRecord::screening_level).sum();
    #[allow(clippy::cast_precision_loss)]
    Some(total / records.len() as f64)
}
