//! Edit popup for one product.
//!
//! The snapshot is taken once, when the popup opens. Newer copies of the same
//! record seen by the list afterwards raise a conflict instead of overwriting
//! the operator's edits.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use catalogdesk_core::ProductId;
use catalogdesk_products::{EditFields, EditSnapshot, Product, Upstream};

use crate::api::CatalogApi;
use crate::cancel::{CancelToken, guarded};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;

/// What the popup needs from whoever opened it.
#[async_trait::async_trait]
pub trait PopupHost: Send + Sync {
    /// Refetch the list after a successful save.
    async fn refresh_list(&self);

    /// Forget `popup` if it is still the one being shown.
    fn close_popup(&self, popup: &UpdatePopupController);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    Open,
    Updating,
    Closed,
}

#[derive(Debug)]
struct PopupState {
    snapshot: EditSnapshot,
    phase: PopupPhase,
}

fn lock(state: &Mutex<PopupState>) -> MutexGuard<'_, PopupState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drops back to `Open` if the update did not close the popup.
struct UpdatingPhase<'a> {
    state: &'a Mutex<PopupState>,
}

impl Drop for UpdatingPhase<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.phase == PopupPhase::Updating {
            state.phase = PopupPhase::Open;
        }
    }
}

pub struct UpdatePopupController {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    host: Option<Weak<dyn PopupHost>>,
    state: Mutex<PopupState>,
    cancel: CancelToken,
    timeout: Duration,
}

impl UpdatePopupController {
    pub fn open(
        api: Arc<dyn CatalogApi>,
        notifier: Arc<dyn Notifier>,
        product: &Product,
        max_colors: usize,
        timeout: Duration,
        host: Option<Weak<dyn PopupHost>>,
    ) -> Self {
        tracing::debug!(product = %product.id, "edit popup opened");
        Self {
            api,
            notifier,
            host,
            state: Mutex::new(PopupState {
                snapshot: EditSnapshot::load_with_limit(product, max_colors),
                phase: PopupPhase::Open,
            }),
            cancel: CancelToken::new(),
            timeout,
        }
    }

    pub fn product_id(&self) -> ProductId {
        lock(&self.state).snapshot.product_id().clone()
    }

    pub fn phase(&self) -> PopupPhase {
        lock(&self.state).phase
    }

    pub fn is_open(&self) -> bool {
        self.phase() != PopupPhase::Closed
    }

    pub fn snapshot(&self) -> EditSnapshot {
        lock(&self.state).snapshot.clone()
    }

    pub fn fields(&self) -> EditFields {
        lock(&self.state).snapshot.fields().clone()
    }

    /// Mutate the edit fields.
    pub fn edit<R>(&self, f: impl FnOnce(&mut EditFields) -> R) -> R {
        f(lock(&self.state).snapshot.fields_mut())
    }

    pub fn has_conflict(&self) -> bool {
        lock(&self.state).snapshot.has_conflict()
    }

    /// Offer a freshly fetched copy of the record.
    pub fn observe_upstream(&self, latest: &Product) -> Upstream {
        let (outcome, newly) = {
            let mut state = lock(&self.state);
            let had_conflict = state.snapshot.has_conflict();
            let outcome = state.snapshot.observe_upstream(latest);
            (outcome, outcome == Upstream::Diverged && !had_conflict)
        };
        if newly {
            tracing::info!(product = %latest.id, "edited product changed upstream");
            self.notifier
                .warning("This product was changed elsewhere. Reload it or keep your edits.");
        }
        outcome
    }

    /// Take the upstream copy and discard the edits.
    pub fn reload_snapshot(&self) {
        lock(&self.state).snapshot.reload();
    }

    /// Keep the edits; the next save overwrites the upstream copy.
    pub fn keep_edits(&self) {
        lock(&self.state).snapshot.keep_edits();
    }

    /// Send the full-field update.
    ///
    /// On success the popup closes and the host list is refreshed. On failure
    /// the popup stays open with the edits intact.
    pub async fn handle_update(&self) -> ClientResult<String> {
        let (id, update) = {
            let mut state = lock(&self.state);
            match state.phase {
                PopupPhase::Updating => return Err(ClientError::Busy("update in progress")),
                PopupPhase::Closed => return Err(ClientError::Cancelled),
                PopupPhase::Open => {}
            }
            match state.snapshot.to_update() {
                Ok(update) => {
                    state.phase = PopupPhase::Updating;
                    (state.snapshot.product_id().clone(), update)
                }
                Err(err) => {
                    drop(state);
                    let err = ClientError::from(err);
                    let message = match &err {
                        ClientError::Validation(msg) | ClientError::Conflict(msg) => msg.clone(),
                        other => other.to_string(),
                    };
                    self.notifier.error(&message);
                    return Err(err);
                }
            }
        };
        let phase = UpdatingPhase { state: &self.state };

        let result = guarded(&self.cancel, self.timeout, self.api.update_product(&id, &update)).await;
        match result {
            Ok(message) => {
                lock(&self.state).phase = PopupPhase::Closed;
                drop(phase);
                tracing::info!(product = %id, "product updated");
                self.notifier.success(&message);
                if let Some(host) = self.host() {
                    host.close_popup(self);
                    host.refresh_list().await;
                }
                Ok(message)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, product = %id, "product update failed");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Close without saving; an in-flight update is cancelled.
    pub fn close(&self) {
        {
            let mut state = lock(&self.state);
            if state.phase == PopupPhase::Closed {
                return;
            }
            state.phase = PopupPhase::Closed;
        }
        self.cancel.cancel();
        if let Some(host) = self.host() {
            host.close_popup(self);
        }
    }

    fn host(&self) -> Option<Arc<dyn PopupHost>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }
}
