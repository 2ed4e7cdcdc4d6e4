use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::JdgTaxError;
use crate::types::{MonthIndex, HORIZON_MONTHS};
use crate::JdgTaxResult;

/// A calendar month, written `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> JdgTaxResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(JdgTaxError::DateError(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(JdgTaxError::DateError(format!(
                "year must have four digits, got {year}"
            )));
        }
        Ok(CalendarMonth { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        CalendarMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months after this one; fails past 9999-12.
    pub fn plus_months(&self, n: u32) -> JdgTaxResult<Self> {
        let ordinal = self.ordinal() + i64::from(n);
        let year = i32::try_from(ordinal.div_euclid(12))
            .map_err(|_| JdgTaxError::DateError(format!("{self} plus {n} months is out of range")))?;
        CalendarMonth::new(year, ordinal.rem_euclid(12) as u32 + 1)
    }

    /// Signed number of calendar months from `earlier` to `self`.
    pub fn months_since(&self, earlier: &CalendarMonth) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for CalendarMonth {
    type Err = JdgTaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || JdgTaxError::DateError(format!("expected YYYY-MM, got '{s}'"));

        let (y, m) = s.split_once('-').ok_or_else(malformed)?;
        if y.len() != 4 || m.len() != 2 || !y.chars().chain(m.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(malformed());
        }
        let year: i32 = y.parse().map_err(|_| malformed())?;
        let month: u32 = m.parse().map_err(|_| malformed())?;
        CalendarMonth::new(year, month)
    }
}

impl TryFrom<String> for CalendarMonth {
    type Error = JdgTaxError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CalendarMonth> for String {
    fn from(m: CalendarMonth) -> String {
        m.to_string()
    }
}

/// `count` consecutive months starting at `base`.
pub fn generate_months(base: CalendarMonth, count: usize) -> JdgTaxResult<Vec<CalendarMonth>> {
    let count = u32::try_from(count)
        .map_err(|_| JdgTaxError::DateError(format!("cannot list {count} months")))?;
    (0..count).map(|i| base.plus_months(i)).collect()
}

/// The full projection horizon starting at `base`.
pub fn horizon(base: CalendarMonth) -> JdgTaxResult<Vec<CalendarMonth>> {
    generate_months(base, HORIZON_MONTHS)
}

/// Month indices grouped by calendar year, years ascending.
pub fn group_by_year(months: &[CalendarMonth]) -> BTreeMap<i32, Vec<MonthIndex>> {
    let mut years: BTreeMap<i32, Vec<MonthIndex>> = BTreeMap::new();
    for (i, m) in months.iter().enumerate() {
        years.entry(m.year).or_default().push(i);
    }
    years
}
