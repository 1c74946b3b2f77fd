use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockSource {
    History,
    PurchaseOrder,
    Forecast,
}

impl StockSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::History => "History",
            Self::PurchaseOrder => "Purchase orders",
            Self::Forecast => "Forecast",
        }
    }
}

impl std::fmt::Display for StockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A signed change in stock on a given day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockDelta {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// The three series returned by the stock endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockSeries {
    #[serde(default)]
    pub history: Vec<StockDelta>,
    #[serde(default, alias = "purchaseOrders")]
    pub purchase_orders: Vec<StockDelta>,
    #[serde(default)]
    pub forecast: Vec<StockDelta>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockPoint {
    pub date: NaiveDate,
    pub quantity: f64,
    pub source: StockSource,
}

/// Merges the three series into one running-total series ordered by date.
///
/// On equal dates history comes first, then purchase orders, then forecast;
/// within one source the input order is kept.
pub fn aggregate_stock(series: &StockSeries) -> Vec<StockPoint> {
    let mut merged: Vec<(NaiveDate, StockSource, f64)> = series
        .history
        .iter()
        .map(|d| (d.date, StockSource::History, d.quantity))
        .chain(
            series
                .purchase_orders
                .iter()
                .map(|d| (d.date, StockSource::PurchaseOrder, d.quantity)),
        )
        .chain(
            series
                .forecast
                .iter()
                .map(|d| (d.date, StockSource::Forecast, d.quantity)),
        )
        .collect();

    merged.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let mut total = 0.0;
    merged
        .into_iter()
        .map(|(date, source, quantity)| {
            total += quantity;
            StockPoint {
                date,
                quantity: total,
                source,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default()
    }

    fn delta(d: u32, quantity: f64) -> StockDelta {
        StockDelta {
            date: day(d),
            quantity,
        }
    }

    #[test]
    fn running_total_over_merged_series() {
        let series = StockSeries {
            history: vec![delta(3, 5.0), delta(1, 10.0)],
            purchase_orders: vec![delta(5, 20.0)],
            forecast: vec![delta(4, -8.0), delta(6, -12.0)],
        };

        let points = aggregate_stock(&series);
        let totals: Vec<f64> = points.iter().map(|p| p.quantity).collect();
        assert_eq!(totals, vec![10.0, 15.0, 7.0, 27.0, 15.0]);

        let sources: Vec<StockSource> = points.iter().map(|p| p.source).collect();
        assert_eq!(
            sources,
            vec![
                StockSource::History,
                StockSource::History,
                StockSource::Forecast,
                StockSource::PurchaseOrder,
                StockSource::Forecast,
            ]
        );
    }

    #[test]
    fn equal_dates_order_history_before_forecast() {
        let series = StockSeries {
            history: vec![delta(2, 4.0)],
            purchase_orders: vec![delta(2, 1.0)],
            forecast: vec![delta(2, -2.0)],
        };
        let points = aggregate_stock(&series);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].source, StockSource::History);
        assert_eq!(points[1].source, StockSource::PurchaseOrder);
        assert_eq!(points[2].quantity, 3.0);
    }

    #[test]
    fn empty_series_yields_no_points() {
        assert!(aggregate_stock(&StockSeries::default()).is_empty());
    }

    #[test]
    fn decodes_camel_case_purchase_orders() {
        let series: StockSeries = serde_json::from_str(
            r#"{"history": [{"date": "2024-03-01", "quantity": 2}],
                "purchaseOrders": [{"date": "2024-03-09", "quantity": 10.5}]}"#,
        )
        .expect("decode");
        assert_eq!(series.purchase_orders.len(), 1);
        assert!(series.forecast.is_empty());
    }
}
