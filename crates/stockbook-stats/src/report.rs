//! Aggregation result types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Direction of sales across the last two weeks of a range.
///
/// Ranges shorter than 14 days are always [`Trend::Stable`]; there is not
/// enough history to compare two full weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

/// One day's total revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Sales statistics over an inclusive date range.
///
/// Revenue figures are recomputed from price and units on every read; the
/// stored `totalAmount` field is never trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// Total revenue over the range.
    pub total_sales: f64,
    /// Total units sold (fractional for weighed goods).
    pub total_items: f64,
    /// Days with at least one item record. Empty and missing buckets do
    /// not count.
    pub total_days: u32,
    /// `total_sales / total_days`, zero when no day had items.
    pub average_daily: f64,
    /// Highest-revenue day among days with items; first such day wins a
    /// tie.
    pub best_day: Option<DayTotal>,
    /// Lowest-revenue day among days with revenue above zero. A zero-sales
    /// day is never the worst day, while it can be the best when every day
    /// is zero; the asymmetry is long-standing and kept.
    pub worst_day: Option<DayTotal>,
    /// Revenue by category label.
    pub category_breakdown: BTreeMap<String, f64>,
    /// Units sold by unit-type label.
    pub unit_type_breakdown: BTreeMap<String, f64>,
    pub trend: Trend,
    /// Full English name of the weekday with the most item records; the
    /// weekday encountered first from the range start wins a tie. `None`
    /// when the range holds no items.
    pub most_active_weekday: Option<String>,
}

/// One product's aggregate over a trailing window, grouped by exact name
/// and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    pub category: String,
    pub total_quantity: f64,
    pub total_revenue: f64,
    /// Number of item records, not units.
    pub sale_count: u32,
    /// `total_revenue / total_quantity`, zero when nothing was sold.
    pub average_price: f64,
}
