//! `catalogdesk-client`
//!
//! **Responsibility:** Admin client for the catalog backend.
//!
//! This crate provides:
//! - The REST client (`CatalogApi`) and the image host upload pipeline
//! - The product form, product list, edit popup and order board controllers
//! - Configuration and operator notices
//!
//! The backend remains the authority: lists are only ever replaced by a refetch.

pub mod api;
pub mod app;
pub mod cancel;
pub mod colors;
pub mod config;
pub mod error;
pub mod form;
pub mod list;
pub mod notify;
pub mod orders;
pub mod popup;
pub mod upload;

pub use api::{CatalogApi, HttpCatalogApi};
pub use app::AdminApp;
pub use cancel::CancelToken;
pub use colors::{ColorPicker, PickerMode};
pub use config::{ClientConfig, ImageHostConfig};
pub use error::{ClientError, ClientResult};
pub use form::{FormPhase, ProductForm};
pub use list::ProductListController;
pub use notify::{Notice, NoticeKind, Notifier, RecordingNotifier, TracingNotifier};
pub use orders::OrderBoardController;
pub use popup::{PopupHost, PopupPhase, UpdatePopupController};
pub use upload::{
    CloudinaryHost, ImageFile, ImageHost, ImageUploadPipeline, MAX_IMAGE_BYTES, MAX_IMAGES,
    UnconfiguredHost, UploadSlot,
};
