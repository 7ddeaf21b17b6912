//! Plain-text rendering of a period analysis.

use std::fmt::Write as _;

use screening_map_analytics_models::PeriodAnalysis;

/// Renders the site table, period average, and Moran's I result.
pub fn render(period: &str, analysis: &PeriodAnalysis) -> String {
    let mut out = String::new();

    let org_width = column_width(analysis.sites.iter().map(|s| s.organization.as_str()), 12);
    let addr_width = column_width(analysis.sites.iter().map(|s| s.address.as_str()), 7);

    let _ = writeln!(out, "{period}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<org_width$}  {:<addr_width$}  {:>9}  {:>10}  {:>10}",
        "Organization", "Address", "Avg Level", "Longitude", "Latitude"
    );
    for site in &analysis.sites {
        let _ = writeln!(
            out,
            "{:<org_width$}  {:<addr_width$}  {:>9.2}  {:>10.5}  {:>10.5}",
            site.organization,
            site.address,
            site.average_screening_level,
            site.longitude,
            site.latitude
        );
    }

    let moran = &analysis.moran;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Period average screening level: {:.2}",
        analysis.rounded_period_average()
    );
    let _ = writeln!(
        out,
        "Moran's I: I={:.4} EI={:.4} z={:.4} p={:.4}",
        moran.i, moran.expected_i, moran.z_score, moran.p_value
    );

    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0).max(header)
}
