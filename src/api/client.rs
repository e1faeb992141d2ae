//! API client for the stashbook REST backend.
//!
//! Every call goes through one dispatch path: attach the bearer token when a
//! session exists, enforce the per-request timeout, retry transient failures
//! with exponential backoff, and tear the session down on 401. Domain
//! methods (owned items, wishlist, works, item types, stats, image upload)
//! are thin wrappers over that path.

use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{ActivitySignal, SessionManager};
use crate::config::{Config, RetryConfig};
use crate::events::{AuthRejectedKind, SessionEvent, SessionEvents};
use crate::models::{
    DeleteResponse, InventoryQuery, ItemType, ItemTypePayload, ItemTypesPage,
    MonthlyExpenseResponse, OwnedItem, OwnedItemPayload, OwnedItemsPage, PageQuery, WishItem,
    WishItemPayload, WishItemsPage, WishlistQuery, Work, WorkPayload, WorksPage,
};

use super::ApiError;

/// Maximum accepted image upload size.
/// 5 MB covers phone photos without letting uploads crawl.
const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Content types the backend stores.
const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageUploadResponse {
    image_url: String,
}

/// Client-side image validation, mirroring what the backend enforces so the
/// user gets an immediate answer instead of a round trip.
pub fn validate_image(content_type: &str, size_bytes: u64) -> Result<(), ApiError> {
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(ApiError::InvalidImage(format!(
            "file is {} bytes, maximum is {} bytes",
            size_bytes, MAX_IMAGE_BYTES
        )));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ApiError::InvalidImage(format!(
            "unsupported content type {}, expected one of JPEG/PNG/GIF/WebP",
            content_type
        )));
    }
    Ok(())
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session manager is a shared handle.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
    session: SessionManager,
    events: SessionEvents,
    activity: Option<ActivitySignal>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        session: SessionManager,
        events: SessionEvents,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
            session,
            events,
            activity: None,
        })
    }

    /// Wire up the watchdog's activity signal. Only meaningful with the
    /// `ApiActivity` trigger; completed authenticated calls then count as
    /// activity.
    pub fn with_activity_signal(mut self, signal: ActivitySignal) -> Self {
        self.activity = Some(signal);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One logical request: retry loop around send + status check. Returns
    /// the successful response; the final attempt's failure is propagated
    /// unmodified.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let mut attempt: u32 = 0;
        let mut backoff = self.retry.initial_backoff();

        loop {
            let request = builder.try_clone().ok_or_else(|| {
                ApiError::InvalidResponse("request body cannot be replayed".into())
            })?;

            // Token is re-read on every attempt; a refresh may have landed
            // between backoff waits
            let token = self.session.token();
            let request = match &token {
                Some(t) => request.bearer_auth(t),
                None => request,
            };

            let error = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    if token.is_some() {
                        if let Some(signal) = &self.activity {
                            signal.pulse();
                        }
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    ApiError::from_status(status, &body)
                }
                Err(e) => ApiError::Network(e),
            };

            if attempt < self.retry.max_retries && error.is_retryable(&self.retry) {
                attempt += 1;
                warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %error,
                    "request failed, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.retry.max_backoff());
                continue;
            }

            if matches!(error, ApiError::Unauthorized { .. }) {
                return Err(self.handle_unauthorized(error).await);
            }
            return Err(error);
        }
    }

    /// Session teardown on 401. Runs exactly once per failed logical
    /// request: logout, then one `AuthRejected` event for the UI to notify
    /// and redirect on.
    async fn handle_unauthorized(&self, error: ApiError) -> ApiError {
        warn!("unauthorized response, tearing down session");
        self.session.logout().await;

        let kind = if error.is_session_timeout() {
            AuthRejectedKind::SessionTimeout
        } else {
            AuthRejectedKind::Unauthorized
        };
        let message = match &error {
            ApiError::Unauthorized { message, .. } => message.clone(),
            _ => None,
        };
        self.events.emit(SessionEvent::AuthRejected { kind, message });
        error
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(builder).await?;
        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: Option<&Q>,
    ) -> Result<T, ApiError> {
        let mut builder = self.client.get(self.url(path));
        if let Some(q) = query {
            builder = builder.query(q);
        }
        self.execute(builder).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.put(self.url(path)).json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.client.delete(self.url(path))).await
    }

    // ===== Owned items =====

    pub async fn list_owned_items(&self, query: &InventoryQuery) -> Result<OwnedItemsPage, ApiError> {
        self.get("/api/v1/owned-items", Some(query)).await
    }

    pub async fn get_owned_item(&self, id: i64) -> Result<OwnedItem, ApiError> {
        self.get::<_, ()>(&format!("/api/v1/owned-items/{}", id), None)
            .await
    }

    pub async fn create_owned_item(&self, payload: &OwnedItemPayload) -> Result<OwnedItem, ApiError> {
        self.post("/api/v1/owned-items", payload).await
    }

    pub async fn update_owned_item(
        &self,
        id: i64,
        payload: &OwnedItemPayload,
    ) -> Result<OwnedItem, ApiError> {
        self.put(&format!("/api/v1/owned-items/{}", id), payload).await
    }

    pub async fn delete_owned_item(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        self.delete(&format!("/api/v1/owned-items/{}", id)).await
    }

    // ===== Wishlist =====

    pub async fn list_wish_items(&self, query: &WishlistQuery) -> Result<WishItemsPage, ApiError> {
        self.get("/api/v1/wish-items", Some(query)).await
    }

    pub async fn get_wish_item(&self, id: i64) -> Result<WishItem, ApiError> {
        self.get::<_, ()>(&format!("/api/v1/wish-items/{}", id), None)
            .await
    }

    pub async fn create_wish_item(&self, payload: &WishItemPayload) -> Result<WishItem, ApiError> {
        self.post("/api/v1/wish-items", payload).await
    }

    pub async fn update_wish_item(
        &self,
        id: i64,
        payload: &WishItemPayload,
    ) -> Result<WishItem, ApiError> {
        self.put(&format!("/api/v1/wish-items/{}", id), payload).await
    }

    pub async fn delete_wish_item(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        self.delete(&format!("/api/v1/wish-items/{}", id)).await
    }

    // ===== Works =====

    pub async fn list_works(&self, query: &PageQuery) -> Result<WorksPage, ApiError> {
        self.get("/api/v1/works", Some(query)).await
    }

    pub async fn create_work(&self, payload: &WorkPayload) -> Result<Work, ApiError> {
        self.post("/api/v1/works", payload).await
    }

    pub async fn update_work(&self, id: i64, payload: &WorkPayload) -> Result<Work, ApiError> {
        self.put(&format!("/api/v1/works/{}", id), payload).await
    }

    pub async fn delete_work(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        self.delete(&format!("/api/v1/works/{}", id)).await
    }

    // ===== Item types =====

    pub async fn list_item_types(&self, query: &PageQuery) -> Result<ItemTypesPage, ApiError> {
        self.get("/api/v1/item-types", Some(query)).await
    }

    pub async fn create_item_type(&self, payload: &ItemTypePayload) -> Result<ItemType, ApiError> {
        self.post("/api/v1/item-types", payload).await
    }

    pub async fn update_item_type(
        &self,
        id: i64,
        payload: &ItemTypePayload,
    ) -> Result<ItemType, ApiError> {
        self.put(&format!("/api/v1/item-types/{}", id), payload).await
    }

    pub async fn delete_item_type(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        self.delete(&format!("/api/v1/item-types/{}", id)).await
    }

    // ===== Stats =====

    /// Spending summary for one `YYYY-MM` month.
    pub async fn monthly_summary(&self, month: &str) -> Result<MonthlyExpenseResponse, ApiError> {
        self.get("/api/v1/data/monthly-summary", Some(&[("month", month)]))
            .await
    }

    // ===== Image upload =====

    /// Upload an image, returning the relative URL to store on items.
    /// Multipart bodies cannot be replayed, so this path does not retry.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        validate_image(content_type, bytes.len() as u64)?;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidImage(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let token = self.session.token();
        let mut request = self
            .client
            .request(Method::POST, self.url("/api/v1/upload/image"))
            .multipart(form);
        if let Some(ref t) = token {
            request = request.bearer_auth(t);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status, &body);
            if matches!(error, ApiError::Unauthorized { .. }) {
                return Err(self.handle_unauthorized(error).await);
            }
            return Err(error);
        }

        if token.is_some() {
            if let Some(signal) = &self.activity {
                signal.pulse();
            }
        }

        let parsed: ImageUploadResponse = response.json().await?;
        debug!(url = %parsed.image_url, "image uploaded");
        Ok(parsed.image_url)
    }

    pub async fn delete_image(&self, image_url: &str) -> Result<DeleteResponse, ApiError> {
        self.execute(
            self.client
                .delete(self.url("/api/v1/upload/image"))
                .query(&[("imageUrl", image_url)]),
        )
        .await
    }

    /// Resolve a stored relative image path against the API base.
    pub fn resolve_image_url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}
