use crate::error::SourceError;
use crate::models::{Booking, BookingId, CarListing, ListingId, NewBooking, PropertyListing};
use crate::sources::traits::ListingSource;
use crate::sources::types::{ApiSettings, AuthSession, Credentials, TOKEN_KEY};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// HTTP client for the booking backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_store: Option<Arc<dyn KeyValueStore>>,
}

impl ApiClient {
    /// Create a client for the default local backend
    pub fn new() -> Result<Self, SourceError> {
        Self::with_settings(&ApiSettings::default())
    }

    /// Create a client with custom connection parameters
    pub fn with_settings(settings: &ApiSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("stays-ledger/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: None,
            token_store: None,
        })
    }

    /// Attach `token` as a bearer credential to every request, ahead of any
    /// stored token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Look up the token a login left in `store` each time a request is built
    pub fn with_token_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    /// `GET /bookings`
    pub async fn bookings(&self) -> Result<Vec<Booking>, SourceError> {
        self.fetch(self.request(Method::GET, "bookings")).await
    }

    /// `POST /bookings`
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, SourceError> {
        let booking: Booking = self
            .fetch(self.request(Method::POST, "bookings").json(booking))
            .await?;
        info!("✅ Backend stored booking {}", booking.id);
        Ok(booking)
    }

    /// `DELETE /bookings/{id}`
    pub async fn delete_booking(&self, id: &BookingId) -> Result<(), SourceError> {
        let path = format!("bookings/{}", id);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    /// `DELETE /bookings?itemId=`
    pub async fn delete_bookings_for_item(&self, item_id: &ListingId) -> Result<(), SourceError> {
        let request = self
            .request(Method::DELETE, "bookings")
            .query(&[("itemId", item_id.to_string())]);
        self.execute(request).await
    }

    /// `POST /auth/signup`
    pub async fn signup(&self, credentials: &Credentials) -> Result<serde_json::Value, SourceError> {
        self.fetch(self.request(Method::POST, "auth/signup").json(credentials))
            .await
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, SourceError> {
        let session: AuthSession = self
            .fetch(self.request(Method::POST, "auth/login").json(credentials))
            .await?;
        info!("🔑 Logged in as {}", credentials.email);
        Ok(session)
    }

    /// `GET /protected`; only useful with a token attached
    pub async fn protected(&self) -> Result<serde_json::Value, SourceError> {
        self.fetch(self.request(Method::GET, "protected")).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn current_token(&self) -> Option<String> {
        if let Some(token) = &self.token {
            return Some(token.clone());
        }
        let store = self.token_store.as_ref()?;
        match store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.trim().is_empty()),
            Err(err) => {
                warn!("Failed to read stored token: {}", err);
                None
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SourceError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(), SourceError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, SourceError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!("API error {} from {}: {}", status, url, body);
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url));
        }
        Err(SourceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ListingSource for ApiClient {
    async fn properties(&self) -> Result<Vec<PropertyListing>, SourceError> {
        self.fetch(self.request(Method::GET, "properties")).await
    }

    async fn property(&self, id: &ListingId) -> Result<PropertyListing, SourceError> {
        let path = format!("properties/{}", id);
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn cars(&self) -> Result<Vec<CarListing>, SourceError> {
        self.fetch(self.request(Method::GET, "cars")).await
    }

    async fn car(&self, id: &ListingId) -> Result<CarListing, SourceError> {
        let path = format!("cars/{}", id);
        self.fetch(self.request(Method::GET, &path)).await
    }

    fn source_name(&self) -> &'static str {
        "Backend"
    }
}
