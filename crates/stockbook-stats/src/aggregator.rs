//! The read-side fold over inventory buckets.
//!
//! Aggregation is infallible: it reads through the inventory store's
//! degraded-read path, so a day that cannot be read counts as empty (and
//! is logged there). Scans take no bucket locks and never block writers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};

use stockbook_core::dates::{days_inclusive, range_len_days, weekday_name};
use stockbook_core::Clock;
use stockbook_inventory::InventoryStore;
use stockbook_store::Kv;

use crate::report::{DayTotal, SalesReport, TopItem, Trend};

/// Sales statistics over the date-bucketed inventory.
pub struct SalesAggregator<K> {
    inventory: Arc<InventoryStore<K>>,
    clock: Arc<dyn Clock>,
}

impl<K: Kv> SalesAggregator<K> {
    pub fn new(inventory: Arc<InventoryStore<K>>, clock: Arc<dyn Clock>) -> Self {
        Self { inventory, clock }
    }

    /// Statistics over the inclusive range `start..=end`.
    ///
    /// An inverted range yields the empty report. See [`SalesReport`] for
    /// the field-by-field rules.
    pub async fn statistics(&self, start: NaiveDate, end: NaiveDate) -> SalesReport {
        if start > end {
            return SalesReport::default();
        }

        let mut report = SalesReport::default();
        let mut daily_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        // (weekday name, record count) in first-encounter order.
        let mut weekday_counts: Vec<(String, usize)> = Vec::new();

        for date in days_inclusive(start, end) {
            let items = self.inventory.items(date).await;
            if items.is_empty() {
                continue;
            }

            let mut daily_total = 0.0;
            for item in &items {
                let revenue = item.revenue();
                daily_total += revenue;
                report.total_sales += revenue;
                report.total_items += item.units_sold;
                *report
                    .category_breakdown
                    .entry(item.category.clone())
                    .or_insert(0.0) += revenue;
                *report
                    .unit_type_breakdown
                    .entry(item.unit_type.clone())
                    .or_insert(0.0) += item.units_sold;
            }
            report.total_days += 1;
            daily_totals.insert(date, daily_total);

            let weekday = weekday_name(date.weekday());
            match weekday_counts.iter_mut().find(|entry| entry.0 == weekday) {
                Some(entry) => entry.1 += items.len(),
                None => weekday_counts.push((weekday.to_string(), items.len())),
            }

            // Strict comparisons, so the first day encountered keeps a tie.
            if report
                .best_day
                .as_ref()
                .map_or(true, |best| daily_total > best.total)
            {
                report.best_day = Some(DayTotal {
                    date,
                    total: daily_total,
                });
            }
            if daily_total > 0.0
                && report
                    .worst_day
                    .as_ref()
                    .map_or(true, |worst| daily_total < worst.total)
            {
                report.worst_day = Some(DayTotal {
                    date,
                    total: daily_total,
                });
            }
        }

        report.average_daily = if report.total_days > 0 {
            report.total_sales / f64::from(report.total_days)
        } else {
            0.0
        };
        report.trend = trend_of(&daily_totals, start, end);
        report.most_active_weekday = most_active(&weekday_counts);
        report
    }

    /// The best sellers over the trailing window of `days` days ending
    /// today, grouped by exact name and category, ordered by revenue
    /// descending (ties fall back to the lexicographic group key), at most
    /// `limit` entries.
    pub async fn top_selling_items(&self, days: i64, limit: usize) -> Vec<TopItem> {
        if days <= 0 {
            return Vec::new();
        }
        let end = self.clock.today();
        let start = end - Duration::days(days - 1);

        let mut groups: BTreeMap<(String, String), TopItem> = BTreeMap::new();
        for date in days_inclusive(start, end) {
            for item in self.inventory.items(date).await {
                let key = (item.name.clone(), item.category.clone());
                let group = groups.entry(key).or_insert_with(|| TopItem {
                    name: item.name.clone(),
                    category: item.category.clone(),
                    total_quantity: 0.0,
                    total_revenue: 0.0,
                    sale_count: 0,
                    average_price: 0.0,
                });
                group.total_quantity += item.units_sold;
                group.total_revenue += item.revenue();
                group.sale_count += 1;
            }
        }

        let mut top: Vec<TopItem> = groups.into_values().collect();
        for group in &mut top {
            group.average_price = if group.total_quantity > 0.0 {
                group.total_revenue / group.total_quantity
            } else {
                0.0
            };
        }
        top.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
        top.truncate(limit);
        top
    }
}

/// Compare the mean daily total of the last 7 calendar days against the
/// preceding 7, missing days counting as zero. At or above 1.10x is
/// increasing, at or below 0.90x decreasing. A zero previous week reads as
/// increasing (the threshold comparison applied literally).
fn trend_of(daily_totals: &BTreeMap<NaiveDate, f64>, start: NaiveDate, end: NaiveDate) -> Trend {
    if range_len_days(start, end) < 14 {
        return Trend::Stable;
    }
    let recent = window_mean(daily_totals, end - Duration::days(6), end);
    let previous = window_mean(daily_totals, end - Duration::days(13), end - Duration::days(7));

    if recent >= previous * 1.10 {
        Trend::Increasing
    } else if recent <= previous * 0.90 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn window_mean(daily_totals: &BTreeMap<NaiveDate, f64>, from: NaiveDate, to: NaiveDate) -> f64 {
    let sum: f64 = daily_totals.range(from..=to).map(|(_, total)| total).sum();
    sum / 7.0
}

/// The weekday with the most records; first encountered wins a tie.
fn most_active(weekday_counts: &[(String, usize)]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in weekday_counts {
        match best {
            Some((_, best_count)) if *count <= best_count => {}
            _ => best = Some((name.as_str(), *count)),
        }
    }
    best.map(|(name, _)| name.to_string())
}
