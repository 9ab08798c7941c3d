use crate::error::SourceError;
use crate::models::{CarListing, ListingId, PropertyListing};
use async_trait::async_trait;

/// Common trait for everything that can hand out bookable listings
/// This lets the catalog swap the backend for local data without callers noticing
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// All bookable homes
    async fn properties(&self) -> Result<Vec<PropertyListing>, SourceError>;

    /// A single home by id
    async fn property(&self, id: &ListingId) -> Result<PropertyListing, SourceError>;

    /// All rentable cars
    async fn cars(&self) -> Result<Vec<CarListing>, SourceError>;

    /// A single car by id
    async fn car(&self, id: &ListingId) -> Result<CarListing, SourceError>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
