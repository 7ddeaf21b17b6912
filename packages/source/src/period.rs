//! Collection period identifiers (`Period1`, `Period2`, ...).

use std::fmt;
use std::str::FromStr;

/// Prefix shared by every period name.
const PERIOD_PREFIX: &str = "Period";

/// A numbered collection period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodId(u32);

impl PeriodId {
    /// Creates the identifier for period `number`.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The period number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PERIOD_PREFIX}{}", self.0)
    }
}

/// Error returned when a string is not a `Period<N>` name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period name '{0}': expected Period<N>")]
pub struct InvalidPeriodError(pub String);

impl FromStr for PeriodId {
    type Err = InvalidPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix(PERIOD_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
            .ok_or_else(|| InvalidPeriodError(s.to_owned()))
    }
}

impl serde::Serialize for PeriodId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PeriodId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
