//! Inventory item records and their candidate/patch forms.

use serde::{Deserialize, Serialize};

fn default_category() -> String {
    "Other".to_string()
}

fn default_unit_type() -> String {
    "pcs".to_string()
}

/// One sale/stock record inside a date bucket.
///
/// Serialized with camelCase field names to stay byte-compatible with the
/// historical on-disk JSON (`unitsSold`, `totalAmount`, `unitType`,
/// `updatedAt`). `total_amount` is always recomputed from `price` and
/// `units_sold` by every mutation path; it is never trusted from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub units_sold: f64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_unit_type")]
    pub unit_type: String,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub timestamp: String,
    /// RFC 3339 time of the last targeted update, absent until one happens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl InventoryItem {
    /// Recompute `total_amount` from the current price and units.
    pub fn recompute_total(&mut self) {
        self.total_amount = self.price * self.units_sold;
    }

    /// The merge rule for additions: case-insensitive name match plus exact
    /// price equality. Same name at a different price is a separate line.
    pub fn absorbs(&self, candidate: &NewItem) -> bool {
        self.name.to_lowercase() == candidate.name.to_lowercase() && self.price == candidate.price
    }

    /// Revenue for this record, recomputed rather than read from
    /// `total_amount`.
    pub fn revenue(&self) -> f64 {
        self.price * self.units_sold
    }
}

/// Candidate for insertion into a bucket. Ids and timestamps are assigned
/// by the inventory store, not by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub units_sold: f64,
    pub category: String,
    pub unit_type: String,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        units_sold: f64,
        category: impl Into<String>,
        unit_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            units_sold,
            category: category.into(),
            unit_type: unit_type.into(),
        }
    }

    /// Trim the free-form fields. Validation and merge matching operate on
    /// the normalized form.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.unit_type = self.unit_type.trim().to_string();
        self
    }
}

/// Partial update for a single record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub units_sold: Option<f64>,
    pub category: Option<String>,
    pub unit_type: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.units_sold.is_none()
            && self.category.is_none()
            && self.unit_type.is_none()
    }

    /// Apply the patch and recompute the total from the effective
    /// price/units. Setting `updated_at` is the caller's job (it needs a
    /// clock).
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(units) = self.units_sold {
            item.units_sold = units;
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(unit_type) = &self.unit_type {
            item.unit_type = unit_type.clone();
        }
        item.recompute_total();
    }
}
