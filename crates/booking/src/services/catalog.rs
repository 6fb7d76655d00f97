//! Scheduling-backend catalog client.
//!
//! Fetches the services and stylists reference lists. Both are idempotent
//! GETs consumed once at wizard mount and treated as immutable for the
//! session, so responses are cached with a short TTL using `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use marigold_core::{ServiceId, StylistId};

use crate::config::SchedulingConfig;

/// Cache TTL for reference data.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No service with the requested id.
    #[error("Unknown service: {0}")]
    UnknownService(ServiceId),
}

/// A bookable service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// A staff member who can be booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stylist {
    pub id: StylistId,
    pub name: String,
    #[serde(default)]
    pub specializations: Vec<String>,
}

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Services(Arc<Vec<Service>>),
    Stylists(Arc<Vec<Stylist>>),
}

/// Client for the scheduling backend's read endpoints.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: url::Url,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SchedulingConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| CatalogError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// All bookable services.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn services(&self) -> Result<Arc<Vec<Service>>, CatalogError> {
        if let Some(CacheValue::Services(services)) = self.inner.cache.get("services").await {
            debug!("Cache hit for services");
            return Ok(services);
        }

        let services: Arc<Vec<Service>> = Arc::new(self.fetch("services").await?);
        self.inner
            .cache
            .insert(
                "services".to_string(),
                CacheValue::Services(Arc::clone(&services)),
            )
            .await;
        Ok(services)
    }

    /// All bookable stylists. An empty list is a valid answer - a business
    /// may have no staff roster at all.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stylists(&self) -> Result<Arc<Vec<Stylist>>, CatalogError> {
        if let Some(CacheValue::Stylists(stylists)) = self.inner.cache.get("stylists").await {
            debug!("Cache hit for stylists");
            return Ok(stylists);
        }

        let stylists: Arc<Vec<Stylist>> = Arc::new(self.fetch("stylists").await?);
        self.inner
            .cache
            .insert(
                "stylists".to_string(),
                CacheValue::Stylists(Arc::clone(&stylists)),
            )
            .await;
        Ok(stylists)
    }

    /// Look up a single service by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownService`] if no service matches.
    pub async fn find_service(&self, id: &ServiceId) -> Result<Service, CatalogError> {
        self.services()
            .await?
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownService(id.clone()))
    }

    /// Whether the scheduling backend answers at all (readiness probe).
    pub async fn is_reachable(&self) -> bool {
        self.services().await.is_ok()
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| CatalogError::Parse(format!("Invalid catalog URL: {e}")))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_deserializes_from_api_shape() {
        let service: Service = serde_json::from_str(
            r#"{"id":"svc1","name":"Haircut","price":"45.00","duration_minutes":45}"#,
        )
        .unwrap();
        assert_eq!(service.id, ServiceId::new("svc1"));
        assert_eq!(service.price, Decimal::new(4500, 2));
        assert!(service.description.is_none());
    }

    #[test]
    fn test_stylist_specializations_default_empty() {
        let stylist: Stylist = serde_json::from_str(r#"{"id":"sty1","name":"Robin"}"#).unwrap();
        assert!(stylist.specializations.is_empty());
    }
}
