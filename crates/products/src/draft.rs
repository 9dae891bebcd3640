//! Product creation draft: raw operator input and its normalization.
//!
//! Every field holds exactly what the operator typed. Nothing is parsed until
//! [`ProductDraft::normalize`], which either yields a complete [`NewProduct`]
//! or a [`DraftIssue`] describing what blocks submission.

use catalogdesk_core::DomainError;

use crate::color::ColorToken;
use crate::product::{Dimensions, NewProduct, ProductMetadata, Stock, StockStatus};

/// Upper bound on images per product.
pub const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDraft {
    pub total: String,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionsDraft {
    pub width: String,
    pub height: String,
    pub length: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDraft {
    pub brand: String,
    pub weight: String,
    pub dimensions: DimensionsDraft,
}

/// The scalar and nested fields of a product being created.
///
/// Images and colors are owned by their own components and handed in at
/// normalization time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub pricing: String,
    pub category: String,
    pub stock: StockDraft,
    pub metadata: MetadataDraft,
}

/// What prevents a draft from becoming a creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftIssue {
    /// Required fields left blank, in form order.
    MissingFields(Vec<&'static str>),
    NoImages,
    TooManyImages(usize),
    /// A numeric field that does not parse as a non-negative number.
    Malformed { field: &'static str, value: String },
}

impl DraftIssue {
    /// Operator-facing notice text.
    pub fn notice(&self) -> String {
        match self {
            DraftIssue::MissingFields(_) => "Please complete all required fields.".to_string(),
            DraftIssue::NoImages => "Please upload at least one image.".to_string(),
            DraftIssue::TooManyImages(_) => format!("Maximum {MAX_IMAGES} images allowed"),
            DraftIssue::Malformed { field, value } => {
                format!("{field} must be a non-negative number (got \"{value}\")")
            }
        }
    }
}

impl core::fmt::Display for DraftIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DraftIssue::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            other => f.write_str(&other.notice()),
        }
    }
}

impl From<DraftIssue> for DomainError {
    fn from(value: DraftIssue) -> Self {
        DomainError::validation(value.to_string())
    }
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every field holds its initial value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Blank required fields, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("pricing", &self.pricing),
            ("category", &self.category),
            ("stock.total", &self.stock.total),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Presence checks only: required fields and an image count within `1..=MAX_IMAGES`.
    pub fn check_required(&self, image_count: usize) -> Result<(), DraftIssue> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DraftIssue::MissingFields(missing));
        }
        if image_count == 0 {
            return Err(DraftIssue::NoImages);
        }
        if image_count > MAX_IMAGES {
            return Err(DraftIssue::TooManyImages(image_count));
        }
        Ok(())
    }

    /// Build the creation payload.
    ///
    /// Blank optional metadata numbers become `None`; malformed numbers are
    /// rejected rather than sent.
    pub fn normalize(
        &self,
        colors: &[ColorToken],
        images: &[String],
    ) -> Result<NewProduct, DraftIssue> {
        self.check_required(images.len())?;

        let pricing = parse_decimal("pricing", &self.pricing)?;
        let total = parse_count("stock.total", &self.stock.total)?;
        let weight = parse_optional_decimal("metadata.weight", &self.metadata.weight)?;
        let dims = &self.metadata.dimensions;

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            pricing,
            category: self.category.trim().to_string(),
            stock: Stock {
                total,
                status: self.stock.status,
            },
            color: colors.iter().map(|c| c.as_str().to_string()).collect(),
            metadata: ProductMetadata {
                brand: self.metadata.brand.trim().to_string(),
                weight,
                dimensions: Dimensions {
                    width: parse_optional_decimal("metadata.dimensions.width", &dims.width)?,
                    height: parse_optional_decimal("metadata.dimensions.height", &dims.height)?,
                    length: parse_optional_decimal("metadata.dimensions.length", &dims.length)?,
                },
            },
            images: images.to_vec(),
        })
    }

    /// `stock.total` of zero while flagged in stock. Allowed, but worth telling
    /// the operator.
    pub fn stock_looks_inconsistent(&self) -> bool {
        self.stock.status == StockStatus::InStock
            && matches!(self.stock.total.trim().parse::<u64>(), Ok(0))
    }
}

/// Parse a required non-negative decimal.
pub(crate) fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, DraftIssue> {
    let malformed = || DraftIssue::Malformed {
        field,
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| malformed())?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }
    Ok(value)
}

/// Parse an optional non-negative decimal; blank means absent.
pub(crate) fn parse_optional_decimal(
    field: &'static str,
    raw: &str,
) -> Result<Option<f64>, DraftIssue> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_decimal(field, raw).map(Some)
}

/// Parse a required non-negative integer.
pub(crate) fn parse_count(field: &'static str, raw: &str) -> Result<u64, DraftIssue> {
    raw.trim().parse().map_err(|_| DraftIssue::Malformed {
        field,
        value: raw.to_string(),
    })
}
