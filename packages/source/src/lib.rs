#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Period-scoped screening data source.
//!
//! Each collection period has one CSV file, `<data_dir>/Period<N>.csv`,
//! with the columns `Organization`, `Address`, `coordinates` and
//! `Screening Level`. A period whose file does not exist yet is reported as
//! [`SourceError::NotCollected`] so callers can tell "no data yet" apart
//! from a broken file.

pub mod period;

use std::path::PathBuf;

pub use period::PeriodId;
use screening_map_screening_models::RawRecord;

/// Default directory holding the period CSV files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default number of collection periods.
pub const DEFAULT_PERIOD_COUNT: u32 = 8;

/// Errors that can occur while loading a period.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The name is not one of the configured periods.
    #[error("Unknown period '{name}'")]
    UnknownPeriod {
        /// The name that was requested.
        name: String,
    },

    /// The period is valid but its data file does not exist yet.
    #[error("Data not yet collected for {period} ({})", path.display())]
    NotCollected {
        /// The requested period.
        period: PeriodId,
        /// Where the file was expected.
        path: PathBuf,
    },

    /// I/O error while reading the data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is not valid CSV for screening records.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: csv::Error,
    },
}

/// Where period files live and how many periods exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Directory containing `Period<N>.csv` files.
    pub data_dir: PathBuf,
    /// Periods are numbered `1..=period_count`.
    pub period_count: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            period_count: DEFAULT_PERIOD_COUNT,
        }
    }
}

/// A configured period and whether its data file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAvailability {
    /// The period.
    pub period: PeriodId,
    /// Whether `Period<N>.csv` is present.
    pub available: bool,
}

/// Reads period data files from a directory.
#[derive(Debug, Clone)]
pub struct PeriodSource {
    config: SourceConfig,
}

impl PeriodSource {
    /// Creates a source for the given configuration.
    #[must_use]
    pub const fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// The configuration this source reads with.
    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Every configured period, in order.
    #[must_use]
    pub fn periods(&self) -> Vec<PeriodId> {
        (1..=self.config.period_count).map(PeriodId::new).collect()
    }

    /// Every configured period with whether its file exists.
    #[must_use]
    pub fn available_periods(&self) -> Vec<PeriodAvailability> {
        self.periods()
            .into_iter()
            .map(|period| PeriodAvailability {
                available: self.path(period).is_file(),
                period,
            })
            .collect()
    }

    /// Parses a period name and checks it is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownPeriod`] if the name is malformed or
    /// outside `1..=period_count`.
    pub fn resolve(&self, name: &str) -> Result<PeriodId, SourceError> {
        name.parse::<PeriodId>()
            .ok()
            .filter(|period| (1..=self.config.period_count).contains(&period.number()))
            .ok_or_else(|| SourceError::UnknownPeriod {
                name: name.to_owned(),
            })
    }

    /// Path of the data file for `period`.
    #[must_use]
    pub fn path(&self, period: PeriodId) -> PathBuf {
        self.config.data_dir.join(format!("{period}.csv"))
    }

    /// Loads every record of `period`.
    ///
    /// # Errors
    ///
    /// * [`SourceError::NotCollected`] if the file does not exist.
    /// * [`SourceError::Io`] if it cannot be opened.
    /// * [`SourceError::Csv`] if a row cannot be parsed.
    pub fn load(&self, period: PeriodId) -> Result<Vec<RawRecord>, SourceError> {
        let path = self.path(period);
        if !path.is_file() {
            return Err(SourceError::NotCollected { period, path });
        }

        let file = std::fs::File::open(&path)?;
        let records = read_records(file).map_err(|source| SourceError::Csv {
            path: path.clone(),
            source,
        })?;

        log::info!(
            "Loaded {} records for {period} from {}",
            records.len(),
            path.display()
        );

        Ok(records)
    }
}

/// Parses screening records from CSV with a header row.
///
/// # Errors
///
/// Returns the first [`csv::Error`] encountered.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader.deserialize().collect()
}
