//! Product list: search-filtered catalog, delete, and the edit popup.
//!
//! The list is only ever replaced wholesale by a refetch. Search term changes
//! are debounced; a newer term cancels the pending fetch and any in-flight
//! fetch issued for an older term has its result dropped.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

use catalogdesk_core::{ProductId, position_by_id};
use catalogdesk_products::{CatalogStats, Product};

use crate::api::CatalogApi;
use crate::cancel::{CancelToken, guarded};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;
use crate::popup::{PopupHost, UpdatePopupController};

#[derive(Default)]
struct ListState {
    search_term: String,
    /// Backend order; reversed for display.
    products: Vec<Product>,
    /// Bumped for every fetch issued and every term change.
    generation: u64,
    popup: Option<Arc<UpdatePopupController>>,
    /// Cancels fetches issued for the current term.
    search_token: CancelToken,
}

struct ListInner {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState>,
    teardown: CancelToken,
    max_colors: usize,
    timeout: Duration,
}

impl ListInner {
    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch with the active term and replace the list.
    ///
    /// Returns `Ok(false)` when the result was superseded and dropped.
    async fn fetch(&self) -> ClientResult<bool> {
        let (term, generation, token) = {
            let mut state = self.lock();
            state.generation += 1;
            (
                state.search_term.clone(),
                state.generation,
                state.search_token.clone(),
            )
        };
        if self.teardown.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let result = guarded(&token, self.timeout, self.api.list_products(&term)).await;
        match result {
            Ok(products) => {
                let popup = {
                    let mut state = self.lock();
                    if state.generation != generation {
                        tracing::debug!(search = %term, "dropping superseded product fetch");
                        return Ok(false);
                    }
                    tracing::debug!(search = %term, count = products.len(), "product list replaced");
                    state.products = products;
                    state.popup.clone().and_then(|popup| {
                        let id = popup.product_id();
                        position_by_id(&state.products, &id)
                            .map(|idx| (popup, state.products[idx].clone()))
                    })
                };
                if let Some((popup, latest)) = popup {
                    popup.observe_upstream(&latest);
                }
                Ok(true)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                if self.lock().generation == generation {
                    tracing::warn!(error = %err, search = %term, "product fetch failed");
                    self.notifier.error(&format!("Failed to load products: {err}"));
                }
                Err(err)
            }
        }
    }

    /// Take the shown popup when `pred` accepts it.
    fn take_popup_if(
        &self,
        pred: impl FnOnce(&Arc<UpdatePopupController>) -> bool,
    ) -> Option<Arc<UpdatePopupController>> {
        let mut state = self.lock();
        if state.popup.as_ref().is_some_and(pred) {
            state.popup.take()
        } else {
            None
        }
    }
}

#[async_trait::async_trait]
impl PopupHost for ListInner {
    async fn refresh_list(&self) {
        // Failures were already reported to the operator.
        let _ = self.fetch().await;
    }

    fn close_popup(&self, popup: &UpdatePopupController) {
        // A reopened popup for the same product must survive its predecessor.
        self.take_popup_if(|shown| std::ptr::eq(Arc::as_ptr(shown), popup));
    }
}

pub struct ProductListController {
    inner: Arc<ListInner>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    debounce_delay: Duration,
}

impl ProductListController {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        notifier: Arc<dyn Notifier>,
        max_colors: usize,
        debounce_delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ListInner {
                api,
                notifier,
                state: Mutex::new(ListState::default()),
                teardown: CancelToken::new(),
                max_colors,
                timeout,
            }),
            debounce: Mutex::new(None),
            debounce_delay,
        }
    }

    /// Initial fetch with the empty term.
    pub async fn mount(&self) -> ClientResult<()> {
        self.inner.fetch().await.map(|_| ())
    }

    /// Refetch with the active term.
    pub async fn refresh(&self) -> ClientResult<()> {
        self.inner.fetch().await.map(|_| ())
    }

    pub fn search_term(&self) -> String {
        self.inner.lock().search_term.clone()
    }

    /// Change the term and schedule a debounced fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let token = {
            let mut state = self.inner.lock();
            state.search_token.cancel();
            state.search_token = CancelToken::new();
            state.search_term = term;
            state.generation += 1;
            state.search_token.clone()
        };
        if self.inner.teardown.is_cancelled() {
            return;
        }

        let inner = self.inner.clone();
        let delay = self.debounce_delay;
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = inner.fetch().await;
                }
            }
        });
        if let Some(previous) = self.debounce_slot().replace(task) {
            previous.abort();
        }
    }

    /// Wait for the scheduled search fetch, if any, to finish.
    pub async fn settle(&self) {
        let task = self.debounce_slot().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    /// Most recent first.
    pub fn products(&self) -> Vec<Product> {
        self.inner.lock().products.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete, then refetch with the active term. The list is untouched until
    /// the backend confirms.
    pub async fn remove(&self, id: &ProductId) -> ClientResult<String> {
        let result = guarded(
            &self.inner.teardown,
            self.inner.timeout,
            self.inner.api.delete_product(id),
        )
        .await;
        match result {
            Ok(message) => {
                tracing::info!(product = %id, "product deleted");
                self.inner.notifier.success(&message);
                if let Some(popup) = self.inner.take_popup_if(|shown| shown.product_id() == *id) {
                    popup.close();
                }
                let _ = self.inner.fetch().await;
                Ok(message)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, product = %id, "product delete failed");
                self.inner.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Stock counts over the loaded products. After `mount` with an empty term
    /// this covers the whole catalog.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_products(&self.inner.lock().products)
    }

    /// Open a fresh edit popup for `product`, replacing any open one.
    pub fn open_edit(&self, product: &Product) -> Arc<UpdatePopupController> {
        let host: Arc<dyn PopupHost> = self.inner.clone();
        let host: Weak<dyn PopupHost> = Arc::downgrade(&host);
        let popup = Arc::new(UpdatePopupController::open(
            self.inner.api.clone(),
            self.inner.notifier.clone(),
            product,
            self.inner.max_colors,
            self.inner.timeout,
            Some(host),
        ));
        let previous = self.inner.lock().popup.replace(popup.clone());
        if let Some(previous) = previous {
            previous.close();
        }
        popup
    }

    /// Drop the popup entirely; reopening starts from a fresh snapshot.
    pub fn close_edit(&self) {
        if let Some(popup) = self.inner.take_popup_if(|_| true) {
            popup.close();
        }
    }

    pub fn popup(&self) -> Option<Arc<UpdatePopupController>> {
        self.inner.lock().popup.clone()
    }

    /// Cancel every outstanding operation of this list.
    pub fn shutdown(&self) {
        self.inner.teardown.cancel();
        self.inner.lock().search_token.cancel();
        if let Some(task) = self.debounce_slot().take() {
            task.abort();
        }
        self.close_edit();
    }

    fn debounce_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.debounce
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ProductListController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
