use serde::{Deserialize, Serialize};

use catalogdesk_core::{Entity, ProductId};

/// Categories offered by the creation form. The backend accepts free text.
pub const CATEGORY_PRESETS: [&str; 4] = ["Electronics", "Clothing", "Furniture", "Toys"];

/// Stock availability flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    LowStock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [Self::InStock, Self::OutOfStock, Self::LowStock];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::LowStock => "low_stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for StockStatus {
    type Err = catalogdesk_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| catalogdesk_core::DomainError::validation(format!("unknown stock status: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub total: u64,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Dimensions,
}

/// A persisted catalog product, as returned by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pricing: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: Stock,
    #[serde(default)]
    pub color: Vec<String>,
    #[serde(default)]
    pub metadata: ProductMetadata,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// The image shown in list rows.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Body of `POST /api/products`.
///
/// Blank optional numbers serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub pricing: f64,
    pub category: String,
    pub stock: Stock,
    pub color: Vec<String>,
    pub metadata: ProductMetadata,
    pub images: Vec<String>,
}

/// Body of `PUT /api/products/:id`: every editable field, always sent in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub pricing: f64,
    pub category: String,
    pub stock: Stock,
    pub color: Vec<String>,
}

impl From<&Product> for ProductUpdate {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            pricing: product.pricing,
            category: product.category.clone(),
            stock: product.stock,
            color: product.color.clone(),
        }
    }
}
