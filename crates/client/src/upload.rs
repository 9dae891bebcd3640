//! Image upload pipeline.
//!
//! Files are checked locally (size, MIME type) before anything touches the
//! network, then posted to an unsigned-upload image host. Returned URLs are
//! collected in completion order; the first one is the primary image.
//!
//! The pipeline does not cap plain [`ImageUploadPipeline::upload`] calls. A
//! caller enforcing [`MAX_IMAGES`] takes an [`UploadSlot`] first; a slot counts
//! against the cap from reservation until its URL is stored or the upload
//! fails.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Deserialize;

use crate::cancel::{CancelToken, guarded};
use crate::config::ImageHostConfig;
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;

pub use catalogdesk_products::MAX_IMAGES;

/// 1 MiB.
pub const MAX_IMAGE_BYTES: usize = 1_048_576;
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// A file picked by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_from_extension(path).to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Local admission checks; no network.
pub fn validate_image(file: &ImageFile) -> ClientResult<()> {
    if file.size() > MAX_IMAGE_BYTES {
        return Err(ClientError::Validation(
            "File size must be less than 1MB".to_string(),
        ));
    }
    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ClientError::Validation(
            "Only JPEG or PNG files are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Somewhere that turns image bytes into a durable URL.
#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> ClientResult<String>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Cloudinary-style host: `POST {base}/{cloud}/image/upload` with `file` and
/// `upload_preset` multipart fields.
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    http: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

impl CloudinaryHost {
    pub fn new(config: &ImageHostConfig, timeout: Duration) -> ClientResult<Self> {
        let cloud_name = config
            .cloud_name
            .as_deref()
            .ok_or_else(|| ClientError::Config("image host cloud name is not set".to_string()))?;
        let upload_preset = config
            .upload_preset
            .clone()
            .ok_or_else(|| ClientError::Config("image host upload preset is not set".to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/{}/image/upload",
                config.base_url.trim_end_matches('/'),
                cloud_name
            ),
            upload_preset,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, file: &ImageFile) -> ClientResult<String> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let resp = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api(status.as_u16(), body));
        }
        let body: UploadResponse = resp.json().await?;
        Ok(body.secure_url)
    }
}

/// Stands in when the image host is not configured; every upload fails with
/// [`ClientError::Config`].
#[derive(Debug, Clone)]
pub struct UnconfiguredHost {
    reason: String,
}

impl UnconfiguredHost {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ImageHost for UnconfiguredHost {
    async fn upload(&self, _file: &ImageFile) -> ClientResult<String> {
        Err(ClientError::Config(self.reason.clone()))
    }
}

#[derive(Debug, Default)]
struct UploadState {
    urls: Vec<String>,
    in_flight: usize,
}

impl UploadState {
    fn slots_taken(&self) -> usize {
        self.urls.len() + self.in_flight
    }
}

/// One image position held for an upload. Counts as in flight until dropped.
#[must_use]
pub struct UploadSlot {
    state: Arc<Mutex<UploadState>>,
}

impl UploadSlot {
    fn unbounded(state: &Arc<Mutex<UploadState>>) -> Self {
        lock(state).in_flight += 1;
        Self {
            state: state.clone(),
        }
    }

    fn within(state: &Arc<Mutex<UploadState>>, cap: usize) -> Option<Self> {
        let mut guard = lock(state);
        if guard.slots_taken() >= cap {
            return None;
        }
        guard.in_flight += 1;
        Some(Self {
            state: state.clone(),
        })
    }

    /// Store the URL while the slot is still held.
    fn complete(self, url: String) {
        lock(&self.state).urls.push(url);
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

fn lock(state: &Mutex<UploadState>) -> MutexGuard<'_, UploadState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Ordered, capped list of uploaded image URLs plus the upload-in-progress flag.
///
/// Cheap to clone; clones share the same list, so several uploads may run
/// concurrently.
#[derive(Clone)]
pub struct ImageUploadPipeline {
    host: Arc<dyn ImageHost>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<UploadState>>,
    cancel: CancelToken,
    timeout: Duration,
}

impl ImageUploadPipeline {
    pub fn new(host: Arc<dyn ImageHost>, notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            host,
            notifier,
            state: Arc::new(Mutex::new(UploadState::default())),
            cancel: CancelToken::new(),
            timeout,
        }
    }

    /// URLs in completion order.
    pub fn images(&self) -> Vec<String> {
        lock(&self.state).urls.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// False once held URLs plus running uploads reach [`MAX_IMAGES`] (the
    /// upload control is disabled).
    pub fn can_upload(&self) -> bool {
        lock(&self.state).slots_taken() < MAX_IMAGES
    }

    pub fn is_uploading(&self) -> bool {
        lock(&self.state).in_flight > 0
    }

    /// Hold one of the [`MAX_IMAGES`] positions; `None` when held URLs plus
    /// running uploads already fill them.
    pub fn reserve(&self) -> Option<UploadSlot> {
        UploadSlot::within(&self.state, MAX_IMAGES)
    }

    /// Validate then upload one file, appending the URL on success.
    ///
    /// Does not enforce [`MAX_IMAGES`]; see [`reserve`](Self::reserve).
    pub async fn upload(&self, file: ImageFile) -> ClientResult<String> {
        if let Err(err) = validate_image(&file) {
            self.notifier.error(&err_message(&err));
            return Err(err);
        }
        self.send(UploadSlot::unbounded(&self.state), file).await
    }

    /// Like [`upload`](Self::upload), filling a slot taken with
    /// [`reserve`](Self::reserve). The slot is released if validation fails.
    pub async fn upload_reserved(&self, slot: UploadSlot, file: ImageFile) -> ClientResult<String> {
        if let Err(err) = validate_image(&file) {
            self.notifier.error(&err_message(&err));
            return Err(err);
        }
        self.send(slot, file).await
    }

    async fn send(&self, slot: UploadSlot, file: ImageFile) -> ClientResult<String> {
        tracing::debug!(file = %file.file_name, bytes = file.size(), "uploading image");
        let result = guarded(&self.cancel, self.timeout, self.host.upload(&file)).await;

        match result {
            Ok(url) => {
                slot.complete(url.clone());
                tracing::info!(%url, "image uploaded");
                self.notifier.success("Image uploaded successfully!");
                Ok(url)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                tracing::warn!(error = %err, file = %file.file_name, "image upload failed");
                self.notifier.error("Image upload failed. Try again.");
                Err(err)
            }
        }
    }

    /// Drop one uploaded URL (no call to the host).
    pub fn remove(&self, index: usize) -> Option<String> {
        let mut state = lock(&self.state);
        (index < state.urls.len()).then(|| state.urls.remove(index))
    }

    pub fn clear(&self) {
        lock(&self.state).urls.clear();
    }

    /// Cancel every outstanding upload of this pipeline.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

fn err_message(err: &ClientError) -> String {
    match err {
        ClientError::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
