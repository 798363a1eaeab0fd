use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A straight line `y = intercept + slope_per_day * x`, where `x` is a day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub slope_per_day: Decimal,
    pub intercept: Decimal,
}

impl Trend {
    /// Fits an ordinary-least-squares line through `(x, y)` points.
    ///
    /// Needs at least two points with distinct `x`, otherwise the slope is undefined.
    pub fn fit(points: &[(Decimal, Decimal)]) -> Result<Self, AnalyticsError> {
        if points.len() < 2 {
            return Err(AnalyticsError::InsufficientData(format!(
                "a trend needs at least 2 points, got {}",
                points.len()
            )));
        }

        let n = Decimal::from(points.len());
        let (sum_x, sum_y) = points.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(sx, sy), &(x, y)| Ok::<_, AnalyticsError>((add(sx, x)?, add(sy, y)?)),
        )?;
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let mut sxx = Decimal::ZERO;
        let mut sxy = Decimal::ZERO;
        for &(x, y) in points {
            let dx = x - mean_x;
            sxx = add(sxx, mul(dx, dx)?)?;
            sxy = add(sxy, mul(dx, y - mean_y)?)?;
        }

        if sxx.is_zero() {
            return Err(AnalyticsError::InsufficientData(
                "all points share the same time index".to_string(),
            ));
        }

        let slope_per_day = sxy
            .checked_div(sxx)
            .ok_or_else(|| overflow("slope"))?;
        let intercept = mean_y - mul(slope_per_day, mean_x)?;

        Ok(Self {
            slope_per_day,
            intercept,
        })
    }

    /// Evaluates the line at day offset `x`. The result is unclamped.
    pub fn predict(&self, x: Decimal) -> Result<Decimal, AnalyticsError> {
        add(self.intercept, mul(self.slope_per_day, x)?)
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, AnalyticsError> {
    a.checked_add(b).ok_or_else(|| overflow("sum"))
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, AnalyticsError> {
    a.checked_mul(b).ok_or_else(|| overflow("product"))
}

fn overflow(what: &str) -> AnalyticsError {
    AnalyticsError::Calculation(format!("decimal overflow while computing trend {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fits_an_exact_line() {
        let points = [(dec!(0), dec!(10)), (dec!(1), dec!(12)), (dec!(2), dec!(14))];
        let trend = Trend::fit(&points).unwrap();
        assert_eq!(trend.slope_per_day, dec!(2));
        assert_eq!(trend.intercept, dec!(10));
        assert_eq!(trend.predict(dec!(5)).unwrap(), dec!(20));
    }

    #[test]
    fn fits_noisy_points_by_least_squares() {
        // y = 1 + x with residuals +1, -1, -1, +1
        let points = [
            (dec!(0), dec!(2)),
            (dec!(1), dec!(1)),
            (dec!(2), dec!(2)),
            (dec!(3), dec!(5)),
        ];
        let trend = Trend::fit(&points).unwrap();
        assert_eq!(trend.slope_per_day, dec!(1));
        assert_eq!(trend.intercept, dec!(1));
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let points = [(dec!(0), dec!(7)), (dec!(10), dec!(7))];
        let trend = Trend::fit(&points).unwrap();
        assert!(trend.slope_per_day.is_zero());
        assert_eq!(trend.predict(dec!(100)).unwrap(), dec!(7));
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(matches!(
            Trend::fit(&[(dec!(0), dec!(1))]),
            Err(AnalyticsError::InsufficientData(_))
        ));
        assert!(matches!(
            Trend::fit(&[(dec!(3), dec!(1)), (dec!(3), dec!(9))]),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn reports_overflow_instead_of_panicking() {
        let points = [(dec!(0), Decimal::MAX), (dec!(1), Decimal::MAX)];
        assert!(matches!(
            Trend::fit(&points),
            Err(AnalyticsError::Calculation(_))
        ));
    }
}
