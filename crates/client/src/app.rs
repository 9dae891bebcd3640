//! Application wiring: one API client and image host shared by every controller.

use std::sync::Arc;

use crate::api::{CatalogApi, HttpCatalogApi};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::form::ProductForm;
use crate::list::ProductListController;
use crate::notify::Notifier;
use crate::orders::OrderBoardController;
use crate::upload::{CloudinaryHost, ImageHost, UnconfiguredHost};

/// State shared across the admin screens.
#[derive(Clone)]
pub struct AdminApp {
    config: ClientConfig,
    api: Arc<dyn CatalogApi>,
    image_host: Arc<dyn ImageHost>,
    notifier: Arc<dyn Notifier>,
}

impl AdminApp {
    /// Build the HTTP-backed app from configuration.
    ///
    /// A missing image host configuration is not an error here; uploads fail
    /// with a configuration error instead.
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let api: Arc<dyn CatalogApi> = match &config.auth_token {
            Some(token) => {
                tracing::info!("initializing API client with authentication token");
                Arc::new(HttpCatalogApi::with_token(
                    config.api_url.clone(),
                    token.clone(),
                    config.request_timeout,
                )?)
            }
            None => {
                tracing::info!("initializing API client without authentication token");
                Arc::new(HttpCatalogApi::new(
                    config.api_url.clone(),
                    config.request_timeout,
                )?)
            }
        };

        let image_host: Arc<dyn ImageHost> =
            match CloudinaryHost::new(&config.image_host, config.request_timeout) {
                Ok(host) => {
                    tracing::debug!(endpoint = host.endpoint(), "image host configured");
                    Arc::new(host)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "image uploads disabled");
                    Arc::new(UnconfiguredHost::new(err.to_string()))
                }
            };

        Ok(Self::with_parts(config, api, image_host, notifier))
    }

    /// Assemble from explicit collaborators.
    pub fn with_parts(
        config: ClientConfig,
        api: Arc<dyn CatalogApi>,
        image_host: Arc<dyn ImageHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            api,
            image_host,
            notifier,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<dyn CatalogApi> {
        self.api.clone()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    /// A fresh, empty creation form.
    pub fn product_form(&self) -> ProductForm {
        ProductForm::new(
            self.api.clone(),
            self.image_host.clone(),
            self.notifier.clone(),
            self.config.max_colors,
            self.config.request_timeout,
        )
    }

    pub fn product_list(&self) -> ProductListController {
        ProductListController::new(
            self.api.clone(),
            self.notifier.clone(),
            self.config.max_colors,
            self.config.search_debounce,
            self.config.request_timeout,
        )
    }

    pub fn order_board(&self) -> OrderBoardController {
        OrderBoardController::new(
            self.api.clone(),
            self.notifier.clone(),
            self.config.request_timeout,
        )
    }
}
