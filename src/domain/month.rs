use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{validate_date, ValidationError};

/// A calendar month, written `MM-YYYY` on the wire.
///
/// Fields are ordered year first so the derived `Ord` is chronological. The
/// store keeps months in the year-major [`Month::sortable`] form so that
/// comparisons in SQL agree with this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: u16,
    month: u8,
}

impl Month {
    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Storage encoding, `YYYY-MM`
    pub fn sortable(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Parse the `YYYY-MM` storage encoding back into a month
    pub fn from_sortable(value: &str) -> Result<Self, ValidationError> {
        match value.split_once('-') {
            Some((year, month)) => format!("{}-{}", month, year).parse(),
            None => Err(ValidationError::InvalidDate(value.into())),
        }
    }
}

impl FromStr for Month {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate_date(value)?;

        // Shape is checked above: two ASCII digits, a hyphen, four ASCII digits
        let invalid = || ValidationError::InvalidDate(value.into());
        let month = value[..2].parse().map_err(|_| invalid())?;
        let year = value[3..].parse().map_err(|_| invalid())?;

        Ok(Self { year, month })
    }
}

impl TryFrom<String> for Month {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}
