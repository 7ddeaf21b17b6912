//! Global Moran's I over site values.
//!
//! ```text
//! I  = (n / S0) · Σᵢⱼ wᵢⱼ zᵢ zⱼ / Σᵢ zᵢ²        zᵢ = xᵢ − x̄
//! EI = −1 / (n − 1)
//! VI = (n² S1 − n S2 + 3 S0²) / ((n² − 1) S0²) − EI²
//! z  = (I − EI) / √VI
//! p  = 2 · (1 − Φ(|z|))
//! ```
//!
//! The variance is the normal-approximation one: it depends only on `n` and
//! the weight moments `S0`, `S1`, `S2`.

use screening_map_analytics_models::MoranResult;
use screening_map_spatial::SpatialWeights;

use crate::{AnalyticsError, normal};

/// Computes Moran's I for `values`, where `values[i]` belongs to row `i` of
/// `weights`.
///
/// # Errors
///
/// * [`AnalyticsError::ValueCountMismatch`] if `values` and `weights`
///   disagree on the number of sites.
/// * [`AnalyticsError::ZeroVariance`] if every value is identical.
/// * [`AnalyticsError::DegenerateVariance`] if the weight graph leaves the
///   null variance of I at zero (e.g. two sites pointing at each other).
pub fn moran(values: &[f64], weights: &SpatialWeights) -> Result<MoranResult, AnalyticsError> {
    let count = values.len();
    if count != weights.len() {
        return Err(AnalyticsError::ValueCountMismatch {
            expected: weights.len(),
            actual: count,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let deviations: Vec<f64> = values.iter().map(|x| x - mean).collect();

    let sum_squares: f64 = deviations.iter().map(|z| z * z).sum();
    // Deviations within rounding noise of the largest magnitude count as zero.
    let scale = values.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let noise = 4.0 * f64::EPSILON * scale;
    if sum_squares <= n * noise * noise {
        return Err(AnalyticsError::ZeroVariance { count });
    }

    let cross_products: f64 = weights
        .edges()
        .map(|(i, j, w)| w * deviations[i] * deviations[j])
        .sum();

    let s0 = weights.s0();
    let i = (n / s0) * cross_products / sum_squares;
    let expected_i = -1.0 / (n - 1.0);

    let n2 = n * n;
    let s0_2 = s0 * s0;
    let variance = (n2 * weights.s1() - n * weights.s2() + 3.0 * s0_2) / ((n2 - 1.0) * s0_2)
        - expected_i * expected_i;
    if !variance.is_finite() || variance <= f64::EPSILON {
        return Err(AnalyticsError::DegenerateVariance { count });
    }

    let z_score = (i - expected_i) / variance.sqrt();
    let p_value = normal::two_sided_p_value(z_score);

    log::debug!("Moran's I over {count} sites: I={i} EI={expected_i} z={z_score} p={p_value}");

    Ok(MoranResult {
        i,
        expected_i,
        z_score,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn harlem_weights() -> SpatialWeights {
        SpatialWeights::knn(&[
            [-73.950, 40.810],
            [-73.949, 40.811],
            [-73.940, 40.800],
            [-73.941, 40.801],
        ])
        .unwrap()
    }

    #[test]
    fn matches_reference_four_site_values() {
        let result = moran(&[7.0, 5.0, 2.0, 1.5], &harlem_weights()).unwrap();
        assert!((result.i - -0.184_210_526_315_789_46).abs() < TOLERANCE);
        assert!((result.expected_i - -1.0 / 3.0).abs() < TOLERANCE);
        assert!((result.z_score - 0.756_190_648_967_62).abs() < TOLERANCE);
        assert!((result.p_value - 0.449_534_898_462_115_6).abs() < TOLERANCE);
    }

    #[test]
    fn identical_values_are_degenerate() {
        assert_eq!(
            moran(&[3.0, 3.0, 3.0, 3.0], &harlem_weights()),
            Err(AnalyticsError::ZeroVariance { count: 4 })
        );
    }

    #[test]
    fn small_magnitude_values_keep_their_spread() {
        let result = moran(&[7e-10, 5e-10, 2e-10, 1.5e-10], &harlem_weights()).unwrap();
        assert!((result.i - -0.184_210_526_315_789_46).abs() < TOLERANCE);
        assert!((result.z_score - 0.756_190_648_967_62).abs() < TOLERANCE);
    }

    #[test]
    fn all_zero_values_are_degenerate() {
        assert_eq!(
            moran(&[0.0, 0.0, 0.0, 0.0], &harlem_weights()),
            Err(AnalyticsError::ZeroVariance { count: 4 })
        );
    }

    #[test]
    fn two_sites_have_no_null_variance() {
        let weights = SpatialWeights::knn(&[[-73.950, 40.810], [-73.940, 40.800]]).unwrap();
        assert_eq!(
            moran(&[7.0, 2.0], &weights),
            Err(AnalyticsError::DegenerateVariance { count: 2 })
        );
    }

    #[test]
    fn value_count_must_match_graph() {
        assert_eq!(
            moran(&[1.0, 2.0], &harlem_weights()),
            Err(AnalyticsError::ValueCountMismatch {
                expected: 4,
                actual: 2,
            })
        );
    }

    #[test]
    fn clustered_values_correlate_positively() {
        // Two tight clusters far apart: high values west, low values east.
        let points: Vec<[f64; 2]> = vec![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [0.1, 0.1],
            [10.0, 0.0],
            [10.1, 0.0],
            [10.0, 0.1],
            [10.1, 0.1],
        ];
        let weights = SpatialWeights::knn(&points).unwrap();
        let result = moran(&[9.0, 8.5, 9.5, 9.0, 1.0, 1.5, 0.5, 1.0], &weights).unwrap();
        assert!(result.i > 0.5);
        assert!(result.z_score > 0.0);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn independent_of_site_order() {
        let forward = moran(&[7.0, 5.0, 2.0, 1.5], &harlem_weights()).unwrap();

        let permuted_weights = SpatialWeights::knn(&[
            [-73.941, 40.801],
            [-73.940, 40.800],
            [-73.949, 40.811],
            [-73.950, 40.810],
        ])
        .unwrap();
        let permuted = moran(&[1.5, 2.0, 5.0, 7.0], &permuted_weights).unwrap();

        assert!((forward.i - permuted.i).abs() < 1e-12);
        assert!((forward.z_score - permuted.z_score).abs() < 1e-12);
        assert!((forward.p_value - permuted.p_value).abs() < 1e-12);
    }
}
