use crate::error::AnalyticsError;
use crate::report::{
    BusinessHealth, Forecast, ForecastPoint, GrowthRate, Insights, PeakRevenue, Suggestion,
    Summary,
};
use crate::trend::Trend;
use chrono::{Days, NaiveDate};
use core_types::Record;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Lower bound for the growth-rate denominator, so a break-even earlier half does not divide by zero.
pub const GROWTH_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// The longest forecast the engine will produce, in periods.
pub const MAX_HORIZON: i64 = 3650;

/// Forecast amounts are rounded to cents.
const MONEY_DP: u32 = 2;

/// A stateless calculator for deriving business metrics from revenue/expense records.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals and half-over-half profit growth.
    ///
    /// The input does not need to be sorted and may be empty. The result depends only
    /// on the multiset of records, not on their order.
    ///
    /// Never panics: a growth rate beyond `Decimal`'s range saturates at `Decimal::MAX`
    /// (or `Decimal::MIN` for a collapse).
    pub fn summarize(&self, records: &[Record]) -> Summary {
        if records.is_empty() {
            return Summary::empty();
        }

        let sorted = sorted_by_date(records);
        let total_revenue = saturating_sum(sorted.iter().map(Record::revenue));
        let total_expense = saturating_sum(sorted.iter().map(Record::expense));

        let growth_rate = if sorted.len() < 2 {
            GrowthRate::Unavailable
        } else {
            let (earlier, later) = sorted.split_at(sorted.len() / 2);
            let earlier_profit = profit(earlier);
            let later_profit = profit(later);
            let denominator = earlier_profit.abs().max(GROWTH_EPSILON);
            let change = later_profit.saturating_sub(earlier_profit);
            let rate = change.checked_div(denominator).unwrap_or(if change.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            });
            GrowthRate::Available(rate)
        };

        tracing::debug!(
            records = sorted.len(),
            %total_revenue,
            %total_expense,
            growth = %growth_rate,
            "Summarized records."
        );

        Summary {
            record_count: sorted.len(),
            total_revenue,
            total_expense,
            total_profit: total_revenue.saturating_sub(total_expense),
            growth_rate,
        }
    }

    /// Extrapolates separate least-squares trends for revenue and expense.
    ///
    /// The time axis is the day offset from the earliest record, so irregular spacing is
    /// respected. Future points are spaced by the median gap between distinct dates.
    pub fn forecast(&self, records: &[Record], horizon: i64) -> Result<Forecast, AnalyticsError> {
        if !(1..=MAX_HORIZON).contains(&horizon) {
            return Err(AnalyticsError::InvalidHorizon {
                horizon,
                max: MAX_HORIZON,
            });
        }

        let sorted = sorted_by_date(records);
        let distinct_dates = distinct_dates(&sorted);
        if distinct_dates.len() < 2 {
            return Err(AnalyticsError::InsufficientData(format!(
                "forecast needs records on at least 2 distinct dates, got {}",
                distinct_dates.len()
            )));
        }

        let first_date = distinct_dates[0];
        let last_date = distinct_dates[distinct_dates.len() - 1];

        let mut revenue_points = Vec::with_capacity(sorted.len());
        let mut expense_points = Vec::with_capacity(sorted.len());
        for record in &sorted {
            let x = Decimal::from(day_offset(first_date, record.date()));
            revenue_points.push((x, record.revenue()));
            expense_points.push((x, record.expense()));
        }

        let revenue_trend = Trend::fit(&revenue_points)?;
        let expense_trend = Trend::fit(&expense_points)?;
        let interval_days = median_gap_days(&distinct_dates);
        let last_offset = day_offset(first_date, last_date);

        // `horizon` is within 1..=MAX_HORIZON here, so the conversion cannot fail.
        let steps = horizon as u64;
        let mut points = Vec::with_capacity(steps as usize);
        for step in 1..=steps {
            let days_ahead = step * interval_days as u64;
            let date = last_date
                .checked_add_days(Days::new(days_ahead))
                .ok_or_else(|| {
                    AnalyticsError::Calculation(format!(
                        "forecast date {days_ahead} days after {last_date} is out of range"
                    ))
                })?;
            let x = Decimal::from(last_offset) + Decimal::from(days_ahead);

            points.push(ForecastPoint {
                date,
                predicted_revenue: clamp_amount(revenue_trend.predict(x)?),
                predicted_expense: clamp_amount(expense_trend.predict(x)?),
            });
        }

        tracing::debug!(
            records = sorted.len(),
            horizon,
            interval_days,
            revenue_slope = %revenue_trend.slope_per_day,
            expense_slope = %expense_trend.slope_per_day,
            "Computed forecast."
        );

        Ok(Forecast {
            horizon: points.len(),
            interval_days,
            revenue_trend,
            expense_trend,
            points,
        })
    }

    /// The dashboard analysis: per-period growth, margin, peak, next-period projections
    /// and the health and suggestion labels derived from them.
    ///
    /// A percentage that does not fit in a `Decimal` (a jump from a near-zero revenue,
    /// say) is reported as `AnalyticsError::Calculation`.
    pub fn insights(&self, records: &[Record]) -> Result<Insights, AnalyticsError> {
        if records.len() < 2 {
            return Err(AnalyticsError::InsufficientData(format!(
                "insights need at least 2 records, got {}",
                records.len()
            )));
        }

        let sorted = sorted_by_date(records);
        let summary = self.summarize(&sorted);

        let period_growth_pct = sorted
            .windows(2)
            .map(|w| {
                let previous = w[0].revenue();
                if previous.is_zero() {
                    return Ok(None);
                }
                percentage(w[1].revenue() - previous, previous, "period growth").map(Some)
            })
            .collect::<Result<Vec<Option<Decimal>>, AnalyticsError>>()?;

        let defined: Vec<Decimal> = period_growth_pct.iter().flatten().copied().collect();
        let average_growth_pct = if defined.is_empty() {
            None
        } else {
            let total = defined
                .iter()
                .try_fold(Decimal::ZERO, |acc, pct| acc.checked_add(*pct))
                .ok_or_else(|| overflow("average growth"))?;
            Some(total / Decimal::from(defined.len()))
        };

        let profit_margin_pct = if summary.total_revenue.is_zero() {
            None
        } else {
            Some(percentage(
                summary.total_profit,
                summary.total_revenue,
                "profit margin",
            )?)
        };

        let next_period_revenue = match self.forecast(&sorted, 1) {
            Ok(forecast) => forecast.points.first().map(|p| p.predicted_revenue),
            Err(AnalyticsError::InsufficientData(_)) => None,
            Err(e) => return Err(e),
        };

        let profit_series: Vec<Decimal> = sorted.iter().map(Record::profit).collect();
        let first_profit = profit_series[0];
        let last_profit = profit_series[profit_series.len() - 1];
        // The mean of consecutive differences telescopes to (last - first) / (n - 1).
        let average_profit_change =
            (last_profit - first_profit) / Decimal::from(profit_series.len() - 1);

        let peak_revenue = peak_revenue(&sorted);
        let health = BusinessHealth::from_average_growth(average_growth_pct);
        let suggestion = Suggestion::from_profit_margin(profit_margin_pct);

        tracing::debug!(records = sorted.len(), %health, %suggestion, "Computed insights.");

        Ok(Insights {
            record_count: summary.record_count,
            total_revenue: summary.total_revenue,
            total_expense: summary.total_expense,
            total_profit: summary.total_profit,
            period_growth_pct,
            average_growth_pct,
            profit_margin_pct,
            next_period_revenue,
            next_period_profit: last_profit + average_profit_change,
            peak_revenue,
            health,
            suggestion,
            profit_series,
        })
    }
}

/// A date-ordered copy. Records sharing a date are ordered by amount, so the result is
/// the same for any permutation of the input.
fn sorted_by_date(records: &[Record]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.revenue().cmp(&b.revenue()))
            .then_with(|| a.expense().cmp(&b.expense()))
    });
    sorted
}

fn profit(records: &[Record]) -> Decimal {
    saturating_sum(records.iter().map(Record::profit))
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part / whole * 100`, or `Calculation` when the result leaves `Decimal`'s range.
fn percentage(part: Decimal, whole: Decimal, what: &str) -> Result<Decimal, AnalyticsError> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> AnalyticsError {
    AnalyticsError::Calculation(format!("{what} is outside the representable range"))
}

fn distinct_dates(sorted: &[Record]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = sorted.iter().map(Record::date).collect();
    dates.dedup();
    dates
}

fn day_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Median gap between consecutive distinct dates, in whole days and at least 1.
///
/// For an even number of gaps, the two middle gaps are averaged and rounded down.
fn median_gap_days(distinct_dates: &[NaiveDate]) -> i64 {
    let mut gaps: Vec<i64> = distinct_dates
        .windows(2)
        .map(|w| day_offset(w[0], w[1]))
        .collect();
    if gaps.is_empty() {
        return 1;
    }
    gaps.sort_unstable();

    let mid = gaps.len() / 2;
    let median = if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2
    } else {
        gaps[mid]
    };
    median.max(1)
}

fn clamp_amount(value: Decimal) -> Decimal {
    value
        .max(Decimal::ZERO)
        .round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// First record with the highest revenue. `sorted` must be non-empty.
fn peak_revenue(sorted: &[Record]) -> PeakRevenue {
    let mut peak = 0;
    for (i, record) in sorted.iter().enumerate().skip(1) {
        if record.revenue() > sorted[peak].revenue() {
            peak = i;
        }
    }
    PeakRevenue {
        position: peak + 1,
        date: sorted[peak].date(),
        revenue: sorted[peak].revenue(),
    }
}
