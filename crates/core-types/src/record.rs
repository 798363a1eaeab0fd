use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The date format accepted for records, e.g. `2024-01-31`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The largest accepted revenue or expense, 10^15.
///
/// Totals and ratios over any realistic number of records stay well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// One dated business observation.
///
/// A `Record` is immutable and always valid: both amounts lie in `0..=MAX_AMOUNT` and
/// the date is a real calendar date. The only ways to obtain one are [`Record::new`],
/// [`Record::parse`] and deserialization, all of which validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    date: NaiveDate,
    revenue: Decimal,
    expense: Decimal,
}

impl Record {
    pub fn new(date: NaiveDate, revenue: Decimal, expense: Decimal) -> Result<Self, CoreError> {
        check_amount("revenue", revenue, date)?;
        check_amount("expense", expense, date)?;
        Ok(Self {
            date,
            revenue,
            expense,
        })
    }

    /// Builds a record from an ISO `YYYY-MM-DD` date string.
    pub fn parse(date: &str, revenue: Decimal, expense: Decimal) -> Result<Self, CoreError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|e| CoreError::InvalidRecord(format!("unparseable date '{date}': {e}")))?;
        Self::new(parsed, revenue, expense)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn revenue(&self) -> Decimal {
        self.revenue
    }

    pub fn expense(&self) -> Decimal {
        self.expense
    }

    /// Revenue minus expense. May be negative.
    pub fn profit(&self) -> Decimal {
        self.revenue - self.expense
    }
}

fn check_amount(field: &str, amount: Decimal, date: NaiveDate) -> Result<(), CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::InvalidRecord(format!(
            "{field} must be non-negative, got {amount} on {date}"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(CoreError::InvalidRecord(format!(
            "{field} must be at most {MAX_AMOUNT}, got {amount} on {date}"
        )));
    }
    Ok(())
}

/// The unvalidated wire shape of a record, as it arrives from a form, a file or a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub revenue: Decimal,
    pub expense: Decimal,
}

impl TryFrom<RawRecord> for Record {
    type Error = CoreError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Record::parse(&raw.date, raw.revenue, raw.expense)
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            revenue: record.revenue,
            expense: record.expense,
        }
    }
}
