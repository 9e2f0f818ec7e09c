//! The predefined-item catalog service.
//!
//! One storage key (`predefinedItems`) holds the whole catalog as a JSON
//! array. Identity is the composite key (case-folded name, exact category,
//! exact unit type); every dedup path builds a `HashSet` of composite keys
//! and tests membership. All writes are serialized through one lock.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use stockbook_core::keys::PREDEFINED_ITEMS;
use stockbook_core::{validate_entry, CatalogEntry, CompositeKey, IdSource, NewEntry};
use stockbook_store::{Kv, KvExt};

use crate::error::Result;
use crate::export::{csv_template, entries_to_csv, entries_to_json};
use crate::ingest::{self, SkippedRow};

/// Outcome of [`Catalog::add`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AddEntryOutcome {
    /// The entry was appended with a fresh id.
    Added(CatalogEntry),
    /// An entry with the same composite key already exists; nothing was
    /// written.
    Duplicate,
}

/// Outcome of a batch merge into the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub added: usize,
    pub skipped_duplicates: usize,
}

/// Outcome of [`Catalog::bulk_add_from_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddReport {
    pub added: usize,
    pub skipped_duplicates: usize,
    pub invalid: Vec<SkippedRow>,
}

/// Outcome of [`Catalog::import_csv`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportReport {
    pub added: usize,
    pub skipped_duplicates: usize,
    pub invalid: Vec<SkippedRow>,
}

/// How [`Catalog::filtered`] orders its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSort {
    #[default]
    Name,
    CategoryThenName,
}

/// Search/filter/sort parameters for [`Catalog::filtered`].
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring match on the entry name.
    pub search: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
    pub sort: CatalogSort,
}

/// The predefined-item catalog on top of any [`Kv`].
pub struct Catalog<K> {
    kv: Arc<K>,
    ids: Arc<dyn IdSource>,
    write_lock: tokio::sync::Mutex<()>,
}

impl<K: Kv> Catalog<K> {
    pub fn new(kv: Arc<K>, ids: Arc<dyn IdSource>) -> Self {
        Self {
            kv,
            ids,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// The current catalog, in stored order.
    ///
    /// A catalog that was never written, or one that cannot be read, comes
    /// back empty; the fault is logged, never raised.
    pub async fn entries(&self) -> Vec<CatalogEntry> {
        self.kv.get_json_or_default(PREDEFINED_ITEMS).await
    }

    /// The catalog filtered and sorted for display.
    pub async fn filtered(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        let mut entries = self.entries().await;

        if let Some(search) = &query.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                entries.retain(|entry| entry.name.to_lowercase().contains(&needle));
            }
        }
        if let Some(category) = &query.category {
            entries.retain(|entry| entry.category == *category);
        }

        match query.sort {
            CatalogSort::Name => entries.sort_by_key(|entry| entry.name.to_lowercase()),
            CatalogSort::CategoryThenName => entries
                .sort_by_key(|entry| (entry.category.to_lowercase(), entry.name.to_lowercase())),
        }
        entries
    }

    /// Whether no current entry shares the candidate's composite key.
    ///
    /// Uses the same canonical form as [`Catalog::add`], so a candidate
    /// reported unique here is admitted there (barring a concurrent write).
    pub async fn is_unique(&self, candidate: &NewEntry) -> bool {
        let key = canonical(candidate.clone()).composite_key();
        !key_set(&self.entries().await).contains(&key)
    }

    /// Adds one entry, silently refusing composite-key duplicates.
    pub async fn add(&self, candidate: NewEntry) -> Result<AddEntryOutcome> {
        let candidate = canonical(candidate);
        validate_entry(&candidate)?;

        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await;
        if key_set(&entries).contains(&candidate.composite_key()) {
            return Ok(AddEntryOutcome::Duplicate);
        }

        let entry = self.materialize(candidate);
        entries.push(entry.clone());
        self.kv.set_json(PREDEFINED_ITEMS, &entries).await?;
        Ok(AddEntryOutcome::Added(entry))
    }

    /// Parses a multi-line paste and merges the resulting candidates in.
    ///
    /// See [`ingest::parse_bulk_text`] for the line format. Invalid lines
    /// are reported, never fatal.
    pub async fn bulk_add_from_text(
        &self,
        text: &str,
        default_category: &str,
        default_unit_type: &str,
    ) -> Result<BulkAddReport> {
        let rows = ingest::parse_bulk_text(text, default_category, default_unit_type);
        let (candidates, invalid) = ingest::split_rows(rows);
        for row in &invalid {
            tracing::warn!("Skipping bulk-add line {}: {}", row.line, row.reason);
        }

        let merge = self.merge_in(candidates).await?;
        Ok(BulkAddReport {
            added: merge.added,
            skipped_duplicates: merge.skipped_duplicates,
            invalid,
        })
    }

    /// Parses an uploaded CSV file and merges the resulting candidates in.
    ///
    /// A file without a recognizable name column fails validation and
    /// writes nothing; bad rows are reported, never fatal.
    pub async fn import_csv(&self, text: &str) -> Result<CsvImportReport> {
        let rows = ingest::parse_csv(text)?;
        let (candidates, invalid) = ingest::split_rows(rows);
        for row in &invalid {
            tracing::warn!("Skipping CSV line {}: {}", row.line, row.reason);
        }

        let merge = self.merge_in(candidates).await?;
        Ok(CsvImportReport {
            added: merge.added,
            skipped_duplicates: merge.skipped_duplicates,
            invalid,
        })
    }

    /// Appends every candidate whose composite key is not already in the
    /// catalog, assigning fresh ids, and persists once.
    ///
    /// The dedup set is built once, before the batch: candidates are only
    /// checked against the pre-existing catalog, so duplicates inside one
    /// batch all land. Matches how merges have always behaved.
    pub async fn merge_in(&self, candidates: Vec<NewEntry>) -> Result<MergeReport> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await;
        let existing = key_set(&entries);

        let mut report = MergeReport::default();
        for candidate in candidates {
            let candidate = canonical(candidate);
            if existing.contains(&candidate.composite_key()) {
                report.skipped_duplicates += 1;
                continue;
            }
            entries.push(self.materialize(candidate));
            report.added += 1;
        }

        if report.added > 0 {
            self.kv.set_json(PREDEFINED_ITEMS, &entries).await?;
        }
        tracing::info!(
            "Catalog merge: {} added, {} duplicates skipped",
            report.added,
            report.skipped_duplicates
        );
        Ok(report)
    }

    /// Overwrites the whole catalog. Entries keep their ids; blank ids are
    /// assigned. Returns the new catalog size.
    pub async fn replace_all(&self, entries: Vec<CatalogEntry>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .map(|mut entry| {
                if entry.id.trim().is_empty() {
                    entry.id = self.ids.next_id();
                }
                entry
            })
            .collect();
        self.kv.set_json(PREDEFINED_ITEMS, &entries).await?;
        Ok(entries.len())
    }

    /// Removes the entry with `id`. Returns whether anything was removed;
    /// deleting an absent id is not an error and writes nothing.
    pub async fn delete_one(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.kv.set_json(PREDEFINED_ITEMS, &entries).await?;
        Ok(true)
    }

    /// Resets the catalog to an empty list.
    pub async fn delete_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.kv
            .set_json(PREDEFINED_ITEMS, &Vec::<CatalogEntry>::new())
            .await?;
        Ok(())
    }

    /// The catalog as CSV, every field quoted. See [`entries_to_csv`].
    pub async fn to_csv(&self) -> String {
        entries_to_csv(&self.entries().await)
    }

    /// The catalog as a pretty-printed JSON array.
    pub async fn to_json(&self) -> String {
        entries_to_json(&self.entries().await)
    }

    /// A starter CSV file for the upload format.
    pub fn csv_template(&self) -> &'static str {
        csv_template()
    }

    fn materialize(&self, candidate: NewEntry) -> CatalogEntry {
        CatalogEntry {
            id: self.ids.next_id(),
            name: candidate.name,
            category: candidate.category,
            unit_type: candidate.unit_type,
        }
    }
}

fn key_set(entries: &[CatalogEntry]) -> HashSet<CompositeKey> {
    entries.iter().map(CatalogEntry::composite_key).collect()
}

/// Trim and fill in the default labels. Identity checks and inserts both
/// run on this form.
fn canonical(candidate: NewEntry) -> NewEntry {
    let mut candidate = candidate.normalized();
    if candidate.category.is_empty() {
        candidate.category = "Other".to_string();
    }
    if candidate.unit_type.is_empty() {
        candidate.unit_type = "pcs".to_string();
    }
    candidate
}
