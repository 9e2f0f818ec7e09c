//! Sales statistics over the date-bucketed inventory.
//!
//! Everything here is a pure read-side fold: the aggregator walks the
//! buckets in a date range through [`stockbook_inventory::InventoryStore`]
//! and produces reports. It holds no locks, writes nothing, and treats an
//! unreadable day as an empty one.

pub mod aggregator;
pub mod report;

pub use aggregator::SalesAggregator;
pub use report::{DayTotal, SalesReport, TopItem, Trend};
