//! End-to-end analysis of one period.

use screening_map_analytics_models::{MoranResult, PeriodAnalysis};
use screening_map_map::MapDataBuilder;
use screening_map_screening_models::{RawRecord, SiteAggregate};
use screening_map_spatial::SpatialWeights;

use crate::{AnalyticsError, aggregate, coordinates, moran};

/// Runs the full pipeline over one period's records.
///
/// Records are geolocated, aggregated per site, tested for spatial
/// autocorrelation, and packaged as map features. Each call owns all of its
/// intermediate data; nothing is cached between calls.
///
/// # Errors
///
/// * [`AnalyticsError::MalformedCoordinate`] for the first bad record.
/// * [`AnalyticsError::EmptyDataset`] if there are no records.
/// * [`AnalyticsError::Spatial`] if there are fewer than two sites.
/// * [`AnalyticsError::ZeroVariance`] if every site has the same average.
/// * [`AnalyticsError::DegenerateVariance`] if the site graph leaves I with
///   no null variance, as with exactly two sites.
pub fn analyze_period(
    records: Vec<RawRecord>,
    map: &MapDataBuilder,
) -> Result<PeriodAnalysis, AnalyticsError> {
    let records = coordinates::geolocate(records)?;
    let period_average =
        aggregate::period_average(&records).ok_or(AnalyticsError::EmptyDataset)?;

    let sites = aggregate::aggregate_sites(&records);
    log::info!(
        "Analyzing {} records across {} sites",
        records.len(),
        sites.len()
    );

    let moran = site_autocorrelation(&sites)?;
    let features = map.build(&sites);

    Ok(PeriodAnalysis {
        sites,
        period_average,
        moran,
        features,
    })
}

/// Moran's I of the site averages over their k-nearest-neighbor graph.
///
/// # Errors
///
/// Returns [`AnalyticsError::Spatial`] for fewer than two sites,
/// [`AnalyticsError::ZeroVariance`] if every site average is equal, or
/// [`AnalyticsError::DegenerateVariance`] if I has no null variance.
pub fn site_autocorrelation(sites: &[SiteAggregate]) -> Result<MoranResult, AnalyticsError> {
    let points: Vec<[f64; 2]> = sites.iter().map(SiteAggregate::point).collect();
    let weights = SpatialWeights::knn(&points)?;
    let values: Vec<f64> = sites.iter().map(|s| s.average_screening_level).collect();
    moran::moran(&values, &weights)
}
