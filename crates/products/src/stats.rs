//! Catalog-wide stock statistics for the dashboard view.

use serde::Serialize;

use crate::product::{Product, StockStatus};

/// Product counts by stock status.
///
/// `low_stock` products count towards `total` only, matching the dashboard
/// which reports in-stock and out-of-stock separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
}

impl CatalogStats {
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut stats, product| {
            stats.total += 1;
            match product.stock.status {
                StockStatus::InStock => stats.in_stock += 1,
                StockStatus::OutOfStock => stats.out_of_stock += 1,
                StockStatus::LowStock => {}
            }
            stats
        })
    }

    pub fn low_stock(&self) -> usize {
        self.total - self.in_stock - self.out_of_stock
    }
}

impl core::fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Total Products: {}\nIn Stock: {}\nOut of Stock: {}",
            self.total, self.in_stock, self.out_of_stock
        )
    }
}
