//! Parsing of the combined `"<lat>,<lon>"` coordinate field.

use screening_map_screening_models::{GeolocatedRecord, RawRecord};

use crate::AnalyticsError;

/// Why a coordinate field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    /// The record has no coordinate field.
    #[error("coordinate field is missing")]
    Missing,

    /// The field has no comma separating latitude and longitude.
    #[error("expected \"<lat>,<lon>\", found no comma")]
    NoSeparator,

    /// One half of the field is not a finite number.
    #[error("{axis} '{text}' is not a valid number")]
    InvalidNumber {
        /// `"latitude"` or `"longitude"`.
        axis: &'static str,
        /// The trimmed text that failed to parse.
        text: String,
    },
}

/// Parses `"<lat>,<lon>"` into `(latitude, longitude)`.
///
/// Splits on the first comma and trims both halves.
///
/// # Errors
///
/// Returns [`CoordinateError::NoSeparator`] if there is no comma, or
/// [`CoordinateError::InvalidNumber`] if either half is not a finite
/// number.
pub fn parse_coordinates(raw: &str) -> Result<(f64, f64), CoordinateError> {
    let (lat, lon) = raw.split_once(',').ok_or(CoordinateError::NoSeparator)?;
    Ok((parse_axis("latitude", lat)?, parse_axis("longitude", lon)?))
}

fn parse_axis(axis: &'static str, text: &str) -> Result<f64, CoordinateError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CoordinateError::InvalidNumber {
            axis,
            text: text.to_owned(),
        })
}

/// Parses the coordinate field of every record.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedCoordinate`] for the first record
/// whose field is missing or malformed. No records are skipped.
pub fn geolocate(records: Vec<RawRecord>) -> Result<Vec<GeolocatedRecord>, AnalyticsError> {
    records
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let parsed = record
                .coordinates
                .as_deref()
                .ok_or(CoordinateError::Missing)
                .and_then(parse_coordinates);

            match parsed {
                Ok((latitude, longitude)) => Ok(GeolocatedRecord {
                    record,
                    latitude,
                    longitude,
                }),
                Err(reason) => {
                    log::warn!("Rejecting record {row}: {reason}");
                    Err(AnalyticsError::MalformedCoordinate {
                        row,
                        organization: record.organization,
                        address: record.address,
                        value: record.coordinates,
                        reason,
                    })
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_exactly() {
        assert_eq!(parse_coordinates("40.81,-73.94"), Ok((40.81, -73.94)));
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_coordinates(" 40.81 , -73.94 "), Ok((40.81, -73.94)));
    }

    #[test]
    fn rejects_missing_comma() {
        assert_eq!(parse_coordinates("bad"), Err(CoordinateError::NoSeparator));
    }

    #[test]
    fn rejects_non_numeric_part() {
        assert_eq!(
            parse_coordinates("40.81,west"),
            Err(CoordinateError::InvalidNumber {
                axis: "longitude",
                text: "west".to_owned(),
            })
        );
    }

    #[test]
    fn splits_on_first_comma_only() {
        assert!(matches!(
            parse_coordinates("40.81,-73.94,12"),
            Err(CoordinateError::InvalidNumber {
                axis: "longitude",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(parse_coordinates("NaN,-73.94").is_err());
        assert!(parse_coordinates("40.81,inf").is_err());
    }

    #[test]
    fn rejects_empty_halves() {
        assert!(matches!(
            parse_coordinates(",-73.94"),
            Err(CoordinateError::InvalidNumber {
                axis: "latitude",
                ..
            })
        ));
    }

    #[test]
    fn geolocates_records_in_order() {
        let records = vec![
            RawRecord::new("A", "1 Main St", "40.81,-73.94", 3.0),
            RawRecord::new("B", "2 Main St", "40.80,-73.95", 4.0),
        ];
        let located = geolocate(records).unwrap();
        assert_eq!(located.len(), 2);
        assert_eq!(located[0].latitude, 40.81);
        assert_eq!(located[0].longitude, -73.94);
        assert_eq!(located[1].organization(), "B");
        assert_eq!(located[1].screening_level(), 4.0);
    }

    #[test]
    fn identifies_offending_record() {
        let records = vec![
            RawRecord::new("A", "1 Main St", "40.81,-73.94", 3.0),
            RawRecord::new("B", "2 Main St", "bad", 4.0),
        ];
        assert_eq!(
            geolocate(records),
            Err(AnalyticsError::MalformedCoordinate {
                row: 1,
                organization: "B".to_owned(),
                address: "2 Main St".to_owned(),
                value: Some("bad".to_owned()),
                reason: CoordinateError::NoSeparator,
            })
        );
    }

    #[test]
    fn rejects_absent_field() {
        let mut record = RawRecord::new("A", "1 Main St", "", 3.0);
        record.coordinates = None;
        assert!(matches!(
            geolocate(vec![record]),
            Err(AnalyticsError::MalformedCoordinate {
                row: 0,
                value: None,
                reason: CoordinateError::Missing,
                ..
            })
        ));
    }
}
