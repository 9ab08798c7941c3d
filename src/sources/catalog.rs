use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::SourceError;
use crate::models::{CarListing, ListingId, PropertyListing};
use crate::sources::mock::MockListings;
use crate::sources::traits::ListingSource;

/// Listings from the backend when it answers in time, local mock data otherwise
pub struct ListingCatalog {
    remote: Option<Arc<dyn ListingSource>>,
    local: MockListings,
    timeout: Duration,
}

impl ListingCatalog {
    pub fn new(remote: Arc<dyn ListingSource>, timeout: Duration) -> Self {
        Self {
            remote: Some(remote),
            local: MockListings::new(),
            timeout,
        }
    }

    /// Catalog that never touches the network
    pub fn offline() -> Self {
        Self {
            remote: None,
            local: MockListings::new(),
            timeout: Duration::ZERO,
        }
    }

    pub async fn properties(&self) -> Vec<PropertyListing> {
        if let Some(remote) = &self.remote {
            if let Some(listings) = self.attempt("properties", remote.properties()).await {
                info!("🏠 Loaded {} properties from {}", listings.len(), remote.source_name());
                return listings;
            }
        }
        self.local.property_list()
    }

    pub async fn property(&self, id: &ListingId) -> Option<PropertyListing> {
        if let Some(remote) = &self.remote {
            if let Some(listing) = self.attempt("property", remote.property(id)).await {
                return Some(listing);
            }
        }
        self.local.find_property(id)
    }

    pub async fn cars(&self) -> Vec<CarListing> {
        if let Some(remote) = &self.remote {
            if let Some(listings) = self.attempt("cars", remote.cars()).await {
                info!("🚗 Loaded {} cars from {}", listings.len(), remote.source_name());
                return listings;
            }
        }
        self.local.car_list()
    }

    pub async fn car(&self, id: &ListingId) -> Option<CarListing> {
        if let Some(remote) = &self.remote {
            if let Some(listing) = self.attempt("car", remote.car(id)).await {
                return Some(listing);
            }
        }
        self.local.find_car(id)
    }

    async fn attempt<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Option<T> {
        let err = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => err,
            Err(_) => SourceError::Timeout(self.timeout),
        };
        warn!("Backend failed fetching {}, using mock data: {}", what, err);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ListingSource for Unreachable {
        async fn properties(&self) -> Result<Vec<PropertyListing>, SourceError> {
            Err(SourceError::Status {
                status: 503,
                body: "down".into(),
            })
        }

        async fn property(&self, id: &ListingId) -> Result<PropertyListing, SourceError> {
            Err(SourceError::NotFound(id.to_string()))
        }

        async fn cars(&self) -> Result<Vec<CarListing>, SourceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn car(&self, _id: &ListingId) -> Result<CarListing, SourceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(SourceError::NotFound("never".into()))
        }

        fn source_name(&self) -> &'static str {
            "Unreachable"
        }
    }

    fn catalog() -> ListingCatalog {
        ListingCatalog::new(Arc::new(Unreachable), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn failed_backend_falls_back_to_mock_properties() {
        let properties = catalog().properties().await;
        assert_eq!(properties, MockListings::new().property_list());
    }

    #[tokio::test]
    async fn slow_backend_times_out_to_mock_cars() {
        let cars = catalog().cars().await;
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0].name, "Toyota Corolla");
    }

    #[tokio::test]
    async fn single_lookup_falls_back_to_local_match() {
        let loft = catalog().property(&ListingId::from("2")).await;
        assert_eq!(loft.map(|listing| listing.title), Some("Cozy Loft".to_string()));
        assert!(catalog().car(&ListingId::Number(42)).await.is_none());
    }

    #[tokio::test]
    async fn offline_catalog_serves_mock_data() {
        let catalog = ListingCatalog::offline();
        assert_eq!(catalog.properties().await.len(), 2);
        assert_eq!(catalog.cars().await.len(), 2);
    }
}
