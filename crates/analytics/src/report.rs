use crate::trend::Trend;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate totals and growth for a set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub record_count: usize,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    /// Always exactly `total_revenue - total_expense`.
    pub total_profit: Decimal,
    pub growth_rate: GrowthRate,
}

impl Summary {
    /// A zeroed-out summary with growth unavailable, as produced for an empty input.
    pub fn empty() -> Self {
        Self {
            record_count: 0,
            total_revenue: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            growth_rate: GrowthRate::Unavailable,
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Profit growth of the later half of the records over the earlier half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum GrowthRate {
    /// A ratio: `1` means the later half earned twice the profit of the earlier half.
    Available(Decimal),
    /// Fewer than two records, so there are no two periods to compare.
    Unavailable,
}

impl GrowthRate {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            GrowthRate::Available(rate) => Some(*rate),
            GrowthRate::Unavailable => None,
        }
    }
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthRate::Available(rate) => write!(f, "{rate}"),
            GrowthRate::Unavailable => f.write_str("insufficient data"),
        }
    }
}

/// Projected revenue and expense for a number of future periods.
///
/// Predicted values are clamped at zero. This is a business rule, not a numerical
/// correction: a falling trend can be extrapolated below zero, but neither revenue
/// nor expense can be negative, so the forecast bottoms out at zero instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub horizon: usize,
    /// Spacing between projected dates, taken from the median gap in the input.
    pub interval_days: i64,
    pub revenue_trend: Trend,
    pub expense_trend: Trend,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_revenue: Decimal,
    pub predicted_expense: Decimal,
}

impl ForecastPoint {
    pub fn predicted_profit(&self) -> Decimal {
        self.predicted_revenue - self.predicted_expense
    }
}

/// The dashboard's analysis of a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub record_count: usize,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub total_profit: Decimal,
    /// Revenue growth in percent for each record over the one before it, in date order.
    /// `None` where the previous revenue was zero.
    pub period_growth_pct: Vec<Option<Decimal>>,
    pub average_growth_pct: Option<Decimal>,
    /// `None` when there is no revenue at all.
    pub profit_margin_pct: Option<Decimal>,
    /// `None` when every record falls on the same date.
    pub next_period_revenue: Option<Decimal>,
    pub next_period_profit: Decimal,
    pub peak_revenue: PeakRevenue,
    pub health: BusinessHealth,
    pub suggestion: Suggestion,
    pub profit_series: Vec<Decimal>,
}

/// The record with the highest revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakRevenue {
    /// 1-based position in date order.
    pub position: usize,
    pub date: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessHealth {
    VeryStrongGrowth,
    HealthyGrowth,
    Stable,
    Declining,
}

impl BusinessHealth {
    /// Classifies an average growth percentage. Unknown growth counts as declining.
    pub fn from_average_growth(average_growth_pct: Option<Decimal>) -> Self {
        match average_growth_pct {
            Some(g) if g > Decimal::from(7) => BusinessHealth::VeryStrongGrowth,
            Some(g) if g > Decimal::from(2) => BusinessHealth::HealthyGrowth,
            Some(g) if g > Decimal::ZERO => BusinessHealth::Stable,
            _ => BusinessHealth::Declining,
        }
    }
}

impl fmt::Display for BusinessHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BusinessHealth::VeryStrongGrowth => "Very strong growth",
            BusinessHealth::HealthyGrowth => "Healthy growth",
            BusinessHealth::Stable => "Stable business",
            BusinessHealth::Declining => "Declining business",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    ExcellentProfitControl,
    ReduceExpensesOrImprovePricing,
}

impl Suggestion {
    /// A margin of 30% or more counts as excellent.
    pub fn from_profit_margin(profit_margin_pct: Option<Decimal>) -> Self {
        match profit_margin_pct {
            Some(m) if m >= Decimal::from(30) => Suggestion::ExcellentProfitControl,
            _ => Suggestion::ReduceExpensesOrImprovePricing,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Suggestion::ExcellentProfitControl => "Excellent profit control",
            Suggestion::ReduceExpensesOrImprovePricing => "Reduce expenses or improve pricing",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn health_thresholds_are_strict() {
        assert_eq!(
            BusinessHealth::from_average_growth(Some(dec!(7.01))),
            BusinessHealth::VeryStrongGrowth
        );
        assert_eq!(
            BusinessHealth::from_average_growth(Some(dec!(7))),
            BusinessHealth::HealthyGrowth
        );
        assert_eq!(
            BusinessHealth::from_average_growth(Some(dec!(2))),
            BusinessHealth::Stable
        );
        assert_eq!(
            BusinessHealth::from_average_growth(Some(dec!(0))),
            BusinessHealth::Declining
        );
        assert_eq!(
            BusinessHealth::from_average_growth(None),
            BusinessHealth::Declining
        );
    }

    #[test]
    fn suggestion_threshold_is_inclusive() {
        assert_eq!(
            Suggestion::from_profit_margin(Some(dec!(30))),
            Suggestion::ExcellentProfitControl
        );
        assert_eq!(
            Suggestion::from_profit_margin(Some(dec!(29.99))),
            Suggestion::ReduceExpensesOrImprovePricing
        );
        assert_eq!(
            Suggestion::from_profit_margin(None),
            Suggestion::ReduceExpensesOrImprovePricing
        );
    }

    #[test]
    fn growth_rate_serializes_with_a_status_tag() {
        let available = serde_json::to_value(GrowthRate::Available(dec!(1))).unwrap();
        assert_eq!(available["status"], "available");
        assert_eq!(available["value"], "1");

        let unavailable = serde_json::to_value(GrowthRate::Unavailable).unwrap();
        assert_eq!(unavailable, serde_json::json!({ "status": "unavailable" }));
    }
}
