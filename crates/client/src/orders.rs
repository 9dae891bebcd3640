//! Order board: all orders, most recent first, with status changes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use catalogdesk_core::{OrderId, position_by_id};
use catalogdesk_orders::{Order, OrderStatus};

use crate::api::CatalogApi;
use crate::cancel::{CancelToken, guarded};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;

pub struct OrderBoardController {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    orders: Mutex<Vec<Order>>,
    cancel: CancelToken,
    timeout: Duration,
}

impl OrderBoardController {
    pub fn new(api: Arc<dyn CatalogApi>, notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            api,
            notifier,
            orders: Mutex::new(Vec::new()),
            cancel: CancelToken::new(),
            timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Order>> {
        self.orders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Most recent first.
    pub fn orders(&self) -> Vec<Order> {
        self.lock().clone()
    }

    pub fn find(&self, id: &OrderId) -> Option<Order> {
        let orders = self.lock();
        position_by_id(orders.as_slice(), id).map(|idx| orders[idx].clone())
    }

    /// Refetch every order. Skipped (returns `Ok(0)`) without a credential.
    pub async fn refresh(&self) -> ClientResult<usize> {
        if !self.api.has_credential() {
            tracing::debug!("no credential configured; skipping order fetch");
            return Ok(0);
        }
        let result = guarded(&self.cancel, self.timeout, self.api.list_orders()).await;
        match result {
            Ok(mut orders) => {
                orders.reverse();
                let count = orders.len();
                *self.lock() = orders;
                Ok(count)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, "order fetch failed");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Change one order's status, then refetch the board.
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()> {
        let result = guarded(
            &self.cancel,
            self.timeout,
            self.api.update_order_status(id, status),
        )
        .await;
        match result {
            Ok(()) => {
                tracing::info!(order = %id, %status, "order status updated");
                self.notifier.success("Order status updated!");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, order = %id, "order status update failed");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for OrderBoardController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
