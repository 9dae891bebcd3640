//! Product creation form.
//!
//! Owns the draft, the color picker and the image uploads of one product being
//! created, and drives the `Editing -> Submitting -> Editing` lifecycle.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;

use catalogdesk_products::{ColorToken, ProductDraft};

use crate::api::CatalogApi;
use crate::cancel::{CancelToken, guarded};
use crate::colors::ColorPicker;
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;
use crate::upload::{ImageFile, ImageHost, ImageUploadPipeline, MAX_IMAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
}

#[derive(Debug)]
struct FormState {
    draft: ProductDraft,
    picker: ColorPicker,
    phase: FormPhase,
}

/// Puts the form back into `Editing` when the submission ends, however it ends.
struct SubmitPhase<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for SubmitPhase<'_> {
    fn drop(&mut self) {
        lock(self.state).phase = FormPhase::Editing;
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ProductForm {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    uploads: ImageUploadPipeline,
    state: Mutex<FormState>,
    colors: watch::Receiver<Vec<ColorToken>>,
    cancel: CancelToken,
    timeout: Duration,
}

impl ProductForm {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        host: Arc<dyn ImageHost>,
        notifier: Arc<dyn Notifier>,
        max_colors: usize,
        timeout: Duration,
    ) -> Self {
        let picker = ColorPicker::new(max_colors, notifier.clone());
        let colors = picker.subscribe();
        Self {
            api,
            uploads: ImageUploadPipeline::new(host, notifier.clone(), timeout),
            notifier,
            state: Mutex::new(FormState {
                draft: ProductDraft::new(),
                picker,
                phase: FormPhase::Editing,
            }),
            colors,
            cancel: CancelToken::new(),
            timeout,
        }
    }

    /// Mutate draft fields.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ProductDraft) -> R) -> R {
        f(&mut lock(&self.state).draft)
    }

    pub fn draft(&self) -> ProductDraft {
        lock(&self.state).draft.clone()
    }

    /// Work with the color picker.
    pub fn with_colors<R>(&self, f: impl FnOnce(&mut ColorPicker) -> R) -> R {
        f(&mut lock(&self.state).picker)
    }

    /// Last selection pushed by the picker.
    pub fn selected_colors(&self) -> Vec<ColorToken> {
        self.colors.borrow().clone()
    }

    pub fn phase(&self) -> FormPhase {
        lock(&self.state).phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == FormPhase::Submitting
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_uploading()
    }

    pub fn can_upload(&self) -> bool {
        self.uploads.can_upload()
    }

    /// Mirrors the submit control: disabled while submitting or uploading.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.is_uploading()
    }

    pub fn images(&self) -> Vec<String> {
        self.uploads.images()
    }

    pub fn remove_image(&self, index: usize) -> Option<String> {
        self.uploads.remove(index)
    }

    /// Upload one picked file. `None` (nothing picked) does nothing. Refused
    /// with a warning once held plus running uploads reach [`MAX_IMAGES`].
    pub async fn upload_image(&self, file: Option<ImageFile>) -> ClientResult<Option<String>> {
        let Some(file) = file else {
            return Ok(None);
        };
        let Some(slot) = self.uploads.reserve() else {
            let message = format!("Maximum {MAX_IMAGES} images allowed");
            self.notifier.warning(&message);
            return Err(ClientError::Validation(message));
        };
        self.uploads.upload_reserved(slot, file).await.map(Some)
    }

    /// Validate, normalize and create the product.
    ///
    /// Returns the backend message on success. The draft is reset only on
    /// success.
    pub async fn submit(&self) -> ClientResult<String> {
        if self.uploads.is_uploading() {
            self.notifier.warning("Please wait for image uploads to finish.");
            return Err(ClientError::Busy("image upload in progress"));
        }

        let (payload, stock_notice) = {
            let mut state = lock(&self.state);
            if state.phase == FormPhase::Submitting {
                return Err(ClientError::Busy("submission in progress"));
            }
            let colors = self.colors.borrow().clone();
            let images = self.uploads.images();
            match state.draft.normalize(&colors, &images) {
                Ok(payload) => {
                    state.phase = FormPhase::Submitting;
                    (payload, state.draft.stock_looks_inconsistent())
                }
                Err(issue) => {
                    drop(state);
                    tracing::debug!(%issue, "draft rejected");
                    self.notifier.error(&issue.notice());
                    return Err(ClientError::Validation(issue.to_string()));
                }
            }
        };
        let _phase = SubmitPhase { state: &self.state };

        if stock_notice {
            self.notifier
                .info("Stock total is 0 but status is in_stock; submitting anyway.");
        }

        let result = guarded(&self.cancel, self.timeout, self.api.create_product(&payload)).await;
        match result {
            Ok(message) => {
                {
                    let mut state = lock(&self.state);
                    state.draft.reset();
                    state.picker.clear();
                }
                self.uploads.clear();
                tracing::info!(name = %payload.name, images = payload.images.len(), "product created");
                self.notifier.success("Product added successfully!");
                Ok(message)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, name = %payload.name, "product creation failed");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Cancel the in-flight submission and uploads.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.uploads.shutdown();
    }
}

impl Drop for ProductForm {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, RecordingNotifier};
    use catalogdesk_core::{OrderId, ProductId};
    use catalogdesk_orders::{Order, OrderStatus};
    use catalogdesk_products::{NewProduct, Product, ProductUpdate, StockStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubApi {
        created: Mutex<Vec<NewProduct>>,
        reject: bool,
        delay_ms: u64,
    }

    #[async_trait::async_trait]
    impl CatalogApi for StubApi {
        fn has_credential(&self) -> bool {
            true
        }
        async fn list_products(&self, _search: &str) -> ClientResult<Vec<Product>> {
            Ok(Vec::new())
        }
        async fn create_product(&self, product: &NewProduct) -> ClientResult<String> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            if self.reject {
                return Err(ClientError::Rejected("duplicate name".to_string()));
            }
            self.created.lock().unwrap().push(product.clone());
            Ok("Product created".to_string())
        }
        async fn update_product(&self, _id: &ProductId, _u: &ProductUpdate) -> ClientResult<String> {
            unreachable!()
        }
        async fn delete_product(&self, _id: &ProductId) -> ClientResult<String> {
            unreachable!()
        }
        async fn list_orders(&self) -> ClientResult<Vec<Order>> {
            unreachable!()
        }
        async fn update_order_status(&self, _id: &OrderId, _s: OrderStatus) -> ClientResult<()> {
            unreachable!()
        }
    }

    struct CountingHost {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ImageHost for CountingHost {
        async fn upload(&self, file: &ImageFile) -> ClientResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://img.example/{}", file.file_name))
        }
    }

    struct Fixture {
        form: ProductForm,
        api: Arc<StubApi>,
        host: Arc<CountingHost>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(api: StubApi) -> Fixture {
        let api = Arc::new(api);
        let host = Arc::new(CountingHost {
            calls: AtomicUsize::new(0),
        });
        let notifier = Arc::new(RecordingNotifier::new());
        let form = ProductForm::new(
            api.clone(),
            host.clone(),
            notifier.clone(),
            5,
            Duration::from_secs(5),
        );
        Fixture {
            form,
            api,
            host,
            notifier,
        }
    }

    fn png(name: &str) -> Option<ImageFile> {
        Some(ImageFile::new(name, "image/png", vec![1, 2, 3]))
    }

    fn fill_chair(form: &ProductForm) {
        form.edit(|d| {
            d.name = "Chair A".to_string();
            d.description = "Oak chair".to_string();
            d.pricing = "49.99".to_string();
            d.category = "chair".to_string();
            d.stock.total = "10".to_string();
            d.stock.status = StockStatus::InStock;
        });
    }

    #[tokio::test]
    async fn submit_sends_normalized_payload_and_resets() {
        let fx = fixture(StubApi::default());
        fill_chair(&fx.form);
        fx.form.with_colors(|p| p.add("Black")).unwrap();
        fx.form.upload_image(png("chair.png")).await.unwrap();

        assert_eq!(fx.form.submit().await.unwrap(), "Product created");

        let created = fx.api.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].pricing, 49.99);
        assert_eq!(created[0].stock.total, 10);
        assert_eq!(created[0].color, vec!["Black".to_string()]);
        assert_eq!(created[0].images, vec!["https://img.example/chair.png".to_string()]);

        assert!(fx.form.draft().is_empty());
        assert!(fx.form.images().is_empty());
        assert!(fx.form.selected_colors().is_empty());
        assert_eq!(fx.form.phase(), FormPhase::Editing);
        assert_eq!(
            fx.notifier.last().map(|n| n.message),
            Some("Product added successfully!".to_string())
        );
    }

    #[tokio::test]
    async fn missing_fields_block_without_request() {
        let fx = fixture(StubApi::default());
        fx.form.edit(|d| d.name = "Chair A".to_string());
        fx.form.upload_image(png("a.png")).await.unwrap();

        assert!(fx.form.submit().await.unwrap_err().is_validation());
        assert!(fx.api.created.lock().unwrap().is_empty());
        assert_eq!(fx.form.draft().name, "Chair A");
        assert_eq!(
            fx.notifier.messages(NoticeKind::Error),
            vec!["Please complete all required fields.".to_string()]
        );
    }

    #[tokio::test]
    async fn no_images_blocks_submit() {
        let fx = fixture(StubApi::default());
        fill_chair(&fx.form);
        assert!(fx.form.submit().await.unwrap_err().is_validation());
        assert_eq!(
            fx.notifier.last().map(|n| n.message),
            Some("Please upload at least one image.".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_submission_keeps_draft() {
        let fx = fixture(StubApi {
            reject: true,
            ..StubApi::default()
        });
        fill_chair(&fx.form);
        fx.form.upload_image(png("a.png")).await.unwrap();

        let err = fx.form.submit().await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(fx.form.draft().pricing, "49.99");
        assert_eq!(fx.form.images().len(), 1);
        assert_eq!(fx.form.phase(), FormPhase::Editing);
        assert_eq!(fx.notifier.last().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn fifth_upload_is_refused_without_host_call() {
        let fx = fixture(StubApi::default());
        for i in 0..4 {
            fx.form.upload_image(png(&format!("{i}.png"))).await.unwrap();
        }
        assert!(!fx.form.can_upload());

        let err = fx.form.upload_image(png("4.png")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fx.host.calls.load(Ordering::SeqCst), 4);
        assert_eq!(fx.form.images().len(), 4);
    }

    #[tokio::test]
    async fn empty_pick_is_a_noop() {
        let fx = fixture(StubApi::default());
        assert_eq!(fx.form.upload_image(None).await.unwrap(), None);
        assert_eq!(fx.host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_submit_while_submitting_is_busy() {
        let fx = fixture(StubApi {
            delay_ms: 50,
            ..StubApi::default()
        });
        fill_chair(&fx.form);
        fx.form.upload_image(png("a.png")).await.unwrap();

        let (first, second) = tokio::join!(fx.form.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(!fx.form.can_submit());
            fx.form.submit().await
        });
        first.unwrap();
        assert!(matches!(second, Err(ClientError::Busy(_))));
        assert_eq!(fx.api.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_stock_in_stock_is_only_informational() {
        let fx = fixture(StubApi::default());
        fill_chair(&fx.form);
        fx.form.edit(|d| d.stock.total = "0".to_string());
        fx.form.upload_image(png("a.png")).await.unwrap();

        fx.form.submit().await.unwrap();
        assert_eq!(fx.notifier.messages(NoticeKind::Info).len(), 1);
        assert_eq!(fx.api.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_price_is_rejected_locally() {
        let fx = fixture(StubApi::default());
        fill_chair(&fx.form);
        fx.form.edit(|d| d.pricing = "49,99".to_string());
        fx.form.upload_image(png("a.png")).await.unwrap();

        assert!(fx.form.submit().await.unwrap_err().is_validation());
        assert!(fx.api.created.lock().unwrap().is_empty());
        assert_eq!(fx.form.phase(), FormPhase::Editing);
    }
}
