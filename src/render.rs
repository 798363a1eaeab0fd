use analytics::{Forecast, GrowthRate, Insights, Summary};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn metric_row(table: &mut Table, name: &str, value: String) {
    table.add_row(vec![
        Cell::new(name),
        Cell::new(value).set_alignment(CellAlignment::Right),
    ]);
}

pub fn summary_table(summary: &Summary) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    metric_row(&mut table, "Records", summary.record_count.to_string());
    metric_row(&mut table, "Total revenue", money(summary.total_revenue));
    metric_row(&mut table, "Total expense", money(summary.total_expense));
    metric_row(&mut table, "Total profit", money(summary.total_profit));
    let growth = match summary.growth_rate {
        // The engine reports a ratio; show it as a percentage when that fits.
        GrowthRate::Available(rate) => match rate.checked_mul(Decimal::ONE_HUNDRED) {
            Some(pct) => percent(Some(pct)),
            None => format!("{:.2}x", rate),
        },
        GrowthRate::Unavailable => GrowthRate::Unavailable.to_string(),
    };
    metric_row(&mut table, "Profit growth", growth);
    table
}

pub fn forecast_table(forecast: &Forecast) -> Table {
    let mut table = new_table(&["Date", "Revenue", "Expense", "Profit"]);
    for point in &forecast.points {
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m-%d")),
            Cell::new(money(point.predicted_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(money(point.predicted_expense)).set_alignment(CellAlignment::Right),
            Cell::new(money(point.predicted_profit())).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn insights_table(insights: &Insights) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    metric_row(&mut table, "Records", insights.record_count.to_string());
    metric_row(&mut table, "Total revenue", money(insights.total_revenue));
    metric_row(&mut table, "Total profit", money(insights.total_profit));
    metric_row(&mut table, "Average growth", percent(insights.average_growth_pct));
    metric_row(&mut table, "Profit margin", percent(insights.profit_margin_pct));
    metric_row(
        &mut table,
        "Highest revenue",
        format!(
            "#{} on {} ({})",
            insights.peak_revenue.position,
            insights.peak_revenue.date,
            money(insights.peak_revenue.revenue)
        ),
    );
    metric_row(
        &mut table,
        "Next period revenue",
        insights
            .next_period_revenue
            .map(money)
            .unwrap_or_else(|| "n/a".to_string()),
    );
    metric_row(&mut table, "Next period profit", money(insights.next_period_profit));
    metric_row(&mut table, "Insight", insights.health.to_string());
    metric_row(&mut table, "Suggestion", insights.suggestion.to_string());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;
    use core_types::Record;
    use rust_decimal_macros::dec;

    fn records() -> Vec<Record> {
        vec![
            Record::parse("2024-01-01", dec!(1000), dec!(600)).unwrap(),
            Record::parse("2024-02-01", dec!(1500), dec!(700)).unwrap(),
        ]
    }

    #[test]
    fn summary_shows_growth_as_percent() {
        let summary = AnalyticsEngine::new().summarize(&records());
        let rendered = summary_table(&summary).to_string();
        assert!(rendered.contains("1200.00"));
        assert!(rendered.contains("100.00%"));
    }

    #[test]
    fn saturated_growth_is_shown_as_a_ratio() {
        let summary = Summary {
            growth_rate: GrowthRate::Available(Decimal::MAX),
            ..Summary::empty()
        };
        let rendered = summary_table(&summary).to_string();
        assert!(rendered.contains(&format!("{:.2}x", Decimal::MAX)));
    }

    #[test]
    fn summary_of_nothing_says_insufficient_data() {
        let rendered = summary_table(&Summary::empty()).to_string();
        assert!(rendered.contains("insufficient data"));
    }

    #[test]
    fn forecast_has_one_row_per_point() {
        let forecast = AnalyticsEngine::new().forecast(&records(), 2).unwrap();
        let rendered = forecast_table(&forecast).to_string();
        assert!(rendered.contains("2024-03-03"));
        assert!(rendered.contains("2024-04-03"));
    }

    #[test]
    fn insights_include_labels() {
        let insights = AnalyticsEngine::new().insights(&records()).unwrap();
        let rendered = insights_table(&insights).to_string();
        assert!(rendered.contains("Very strong growth"));
        assert!(rendered.contains("Excellent profit control"));
    }
}
