//! Edit snapshot for an existing product.
//!
//! A snapshot is loaded once from a [`Product`] and then edited independently
//! of the list's copy. Newer upstream copies never overwrite the operator's
//! edits: they are parked as a pending conflict until the operator either
//! reloads or keeps the edits.

use catalogdesk_core::{DomainError, DomainResult, ProductId};

use crate::color::DEFAULT_MAX_COLORS;
use crate::draft::{parse_count, parse_decimal};
use crate::product::{Product, ProductUpdate, Stock, StockStatus};

/// Editable text form of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFields {
    pub name: String,
    pub description: String,
    pub pricing: String,
    pub category: String,
    pub stock_total: String,
    pub stock_status: StockStatus,
    /// Comma-separated color list.
    pub color: String,
}

impl EditFields {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            pricing: product.pricing.to_string(),
            category: product.category.clone(),
            stock_total: product.stock.total.to_string(),
            stock_status: product.stock.status,
            color: product.color.join(", "),
        }
    }

    /// Parse back into a full update body.
    pub fn to_update(&self, max_colors: usize) -> DomainResult<ProductUpdate> {
        let pricing = parse_decimal("pricing", &self.pricing)?;
        let total = parse_count("stock.total", &self.stock_total)?;
        Ok(ProductUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
            pricing,
            category: self.category.clone(),
            stock: Stock {
                total,
                status: self.stock_status,
            },
            color: parse_color_list(&self.color, max_colors)?,
        })
    }
}

/// Split a comma-separated color list: trimmed, blanks and repeats dropped.
pub fn parse_color_list(raw: &str, max_colors: usize) -> DomainResult<Vec<String>> {
    let mut colors: Vec<String> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !colors.iter().any(|c| c == part) {
            colors.push(part.to_string());
        }
    }
    if colors.len() > max_colors {
        return Err(DomainError::validation(format!(
            "Maximum {max_colors} colors allowed"
        )));
    }
    Ok(colors)
}

/// What an upstream observation did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Same record as the snapshot base (or a different product entirely).
    Unchanged,
    /// The record changed since the snapshot was taken; edits kept, conflict raised.
    Diverged,
}

/// Point-in-time copy of a product plus the operator's edits.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    base: Product,
    fields: EditFields,
    upstream: Option<Product>,
    max_colors: usize,
}

impl EditSnapshot {
    pub fn load(product: &Product) -> Self {
        Self::load_with_limit(product, DEFAULT_MAX_COLORS)
    }

    pub fn load_with_limit(product: &Product, max_colors: usize) -> Self {
        Self {
            base: product.clone(),
            fields: EditFields::from_product(product),
            upstream: None,
            max_colors,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.base.id
    }

    pub fn base(&self) -> &Product {
        &self.base
    }

    pub fn fields(&self) -> &EditFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut EditFields {
        &mut self.fields
    }

    pub fn is_dirty(&self) -> bool {
        self.fields != EditFields::from_product(&self.base)
    }

    pub fn has_conflict(&self) -> bool {
        self.upstream.is_some()
    }

    pub fn pending_upstream(&self) -> Option<&Product> {
        self.upstream.as_ref()
    }

    /// Record a newer copy of the record seen elsewhere.
    pub fn observe_upstream(&mut self, latest: &Product) -> Upstream {
        if latest.id != self.base.id {
            return Upstream::Unchanged;
        }
        if *latest == self.base {
            self.upstream = None;
            return Upstream::Unchanged;
        }
        self.upstream = Some(latest.clone());
        Upstream::Diverged
    }

    /// Accept the pending upstream copy, discarding edits.
    pub fn reload(&mut self) {
        if let Some(latest) = self.upstream.take() {
            self.fields = EditFields::from_product(&latest);
            self.base = latest;
        }
    }

    /// Keep the edits; the next save overwrites the upstream copy.
    pub fn keep_edits(&mut self) {
        if let Some(latest) = self.upstream.take() {
            self.base = latest;
        }
    }

    /// Build the update body, refusing while a conflict is pending.
    pub fn to_update(&self) -> DomainResult<ProductUpdate> {
        if self.has_conflict() {
            return Err(DomainError::conflict(format!(
                "product {} changed since it was opened",
                self.base.id
            )));
        }
        self.fields.to_update(self.max_colors)
    }
}
