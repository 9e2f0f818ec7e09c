//! Candidate validation.
//!
//! Free functions with one numbered check per rule; callers run these
//! before anything touches storage.

use crate::catalog::NewEntry;
use crate::error::ValidationError;
use crate::item::{ItemPatch, NewItem};

/// Validate a candidate inventory record.
pub fn validate_new_item(candidate: &NewItem) -> Result<(), ValidationError> {
    // 1. Name must survive trimming.
    if candidate.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    // 2. Price must be a usable number.
    if !candidate.price.is_finite() || candidate.price < 0.0 {
        return Err(ValidationError::InvalidPrice(candidate.price.to_string()));
    }

    // 3. Units likewise. Zero is legal: an item can sit on the shelf with
    //    no sales yet.
    if !candidate.units_sold.is_finite() || candidate.units_sold < 0.0 {
        return Err(ValidationError::InvalidUnits(
            candidate.units_sold.to_string(),
        ));
    }

    Ok(())
}

/// Validate a partial update before it is applied.
pub fn validate_item_patch(patch: &ItemPatch) -> Result<(), ValidationError> {
    // 1. An all-absent patch is a caller bug, not a no-op.
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }

    // 2. Fields that are present obey the same rules as on insert.
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
    }
    if let Some(price) = patch.price {
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidPrice(price.to_string()));
        }
    }
    if let Some(units) = patch.units_sold {
        if !units.is_finite() || units < 0.0 {
            return Err(ValidationError::InvalidUnits(units.to_string()));
        }
    }

    Ok(())
}

/// Validate a candidate catalog entry.
pub fn validate_entry(candidate: &NewEntry) -> Result<(), ValidationError> {
    if candidate.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
