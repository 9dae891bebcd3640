//! Products domain module.
//!
//! This crate contains the catalog's product model and the editing rules around
//! it (creation draft, color selection, edit snapshot, catalog statistics), implemented purely as
//! deterministic logic (no IO, no HTTP, no storage).

pub mod color;
pub mod draft;
pub mod edit;
pub mod product;
pub mod stats;

pub use color::{
    ColorRejection, ColorSet, ColorToken, DEFAULT_CUSTOM_COLOR, DEFAULT_MAX_COLORS, NAMED_COLORS,
    PALETTE, Toggled,
};
pub use draft::{DimensionsDraft, DraftIssue, MAX_IMAGES, MetadataDraft, ProductDraft, StockDraft};
pub use edit::{EditFields, EditSnapshot, Upstream, parse_color_list};
pub use product::{
    CATEGORY_PRESETS, Dimensions, NewProduct, Product, ProductMetadata, ProductUpdate, Stock,
    StockStatus,
};
pub use stats::CatalogStats;
