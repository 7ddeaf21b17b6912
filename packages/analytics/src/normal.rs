//! Standard normal distribution helpers.

/// Complementary error function.
///
/// Chebyshev fit with fractional error below 1.2e-7 everywhere.
#[must_use]
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = t.mul_add(0.170_872_77, -0.822_152_23);
    let poly = t.mul_add(poly, 1.488_515_87);
    let poly = t.mul_add(poly, -1.135_203_98);
    let poly = t.mul_add(poly, 0.278_868_07);
    let poly = t.mul_add(poly, -0.186_288_06);
    let poly = t.mul_add(poly, 0.096_784_18);
    let poly = t.mul_add(poly, 0.374_091_96);
    let poly = t.mul_add(poly, 1.000_023_68);
    let poly = t.mul_add(poly, -1.265_512_23);
    let value = t * (-z).mul_add(z, poly).exp();

    if x >= 0.0 { value } else { 2.0 - value }
}

/// Cumulative distribution function of the standard normal.
#[must_use]
pub fn standard_normal_cdf(x: f64) -> f64 {
    (0.5 * erfc(-x / std::f64::consts::SQRT_2)).clamp(0.0, 1.0)
}

/// Two-sided p-value of a z-score: `2 · (1 − Φ(|z|))`.
#[must_use]
pub fn two_sided_p_value(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
}
