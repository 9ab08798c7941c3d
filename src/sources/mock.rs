use crate::error::SourceError;
use crate::models::{CarListing, ListingId, PropertyListing};
use crate::sources::traits::ListingSource;
use async_trait::async_trait;

fn images(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| path.to_string()).collect()
}

/// Built-in listings used whenever the backend cannot be reached
#[derive(Debug, Clone)]
pub struct MockListings {
    properties: Vec<PropertyListing>,
    cars: Vec<CarListing>,
}

impl MockListings {
    pub fn new() -> Self {
        Self {
            properties: mock_properties(),
            cars: mock_cars(),
        }
    }

    pub fn property_list(&self) -> Vec<PropertyListing> {
        self.properties.clone()
    }

    pub fn find_property(&self, id: &ListingId) -> Option<PropertyListing> {
        self.properties
            .iter()
            .find(|listing| listing.id.matches(id))
            .cloned()
    }

    pub fn car_list(&self) -> Vec<CarListing> {
        self.cars.clone()
    }

    pub fn find_car(&self, id: &ListingId) -> Option<CarListing> {
        self.cars.iter().find(|listing| listing.id.matches(id)).cloned()
    }
}

impl Default for MockListings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for MockListings {
    async fn properties(&self) -> Result<Vec<PropertyListing>, SourceError> {
        Ok(self.property_list())
    }

    async fn property(&self, id: &ListingId) -> Result<PropertyListing, SourceError> {
        self.find_property(id)
            .ok_or_else(|| SourceError::NotFound(format!("property {}", id)))
    }

    async fn cars(&self) -> Result<Vec<CarListing>, SourceError> {
        Ok(self.car_list())
    }

    async fn car(&self, id: &ListingId) -> Result<CarListing, SourceError> {
        self.find_car(id)
            .ok_or_else(|| SourceError::NotFound(format!("car {}", id)))
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

fn mock_properties() -> Vec<PropertyListing> {
    vec![
        PropertyListing {
            id: ListingId::Number(1),
            title: "Luxury Apartment".to_string(),
            location: "New York, USA".to_string(),
            images: images(&[
                "/images/apartment1.jpg",
                "/images/apartment2.jpg",
                "/images/apartment3.jpg",
            ]),
            beds: 3,
            baths: 2,
            guests: 6,
            price: 150,
            rating: Some(4.8),
        },
        PropertyListing {
            id: ListingId::Number(2),
            title: "Cozy Loft".to_string(),
            location: "San Francisco, USA".to_string(),
            images: images(&["/images/loft1.jpg", "/images/loft2.jpg"]),
            beds: 2,
            baths: 1,
            guests: 4,
            price: 120,
            rating: Some(4.5),
        },
    ]
}

fn mock_cars() -> Vec<CarListing> {
    vec![
        CarListing {
            id: ListingId::Number(1),
            name: "Toyota Corolla".to_string(),
            body_type: "Sedan".to_string(),
            seats: 5,
            fuel: "Petrol".to_string(),
            price: 50,
            images: images(&["/images/car1.jpg", "/images/car2.jpg"]),
            rating: Some(4.7),
        },
        CarListing {
            id: ListingId::Number(2),
            name: "Ford Mustang".to_string(),
            body_type: "Coupe".to_string(),
            seats: 4,
            fuel: "Petrol".to_string(),
            price: 120,
            images: images(&["/images/car3.jpg", "/images/car4.jpg"]),
            rating: Some(4.9),
        },
    ]
}
