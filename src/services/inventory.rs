use crate::models::VehicleListing;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading candidate listings
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse inventory file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only source of candidate listings
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn listings(&self) -> Result<Vec<VehicleListing>, InventoryError>;
}

/// Fixed in-memory inventory
#[derive(Debug, Clone)]
pub struct StaticInventory {
    listings: Vec<VehicleListing>,
}

impl StaticInventory {
    pub fn new(listings: Vec<VehicleListing>) -> Self {
        Self { listings }
    }

    /// Load listings from a JSON array on disk
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InventoryError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let listings: Vec<VehicleListing> = serde_json::from_str(&raw)?;
        Ok(Self::new(listings))
    }

    /// Built-in sample listings
    pub fn sample() -> Self {
        let listing = |id: &str,
                       make: &str,
                       model: &str,
                       year: i32,
                       price: f64,
                       mileage: f64,
                       fuel_type: &str,
                       body_type: &str,
                       color: &str,
                       image: &str,
                       location: &str| VehicleListing {
            id: id.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            year,
            price,
            mileage,
            fuel_type: fuel_type.to_string(),
            body_type: body_type.to_string(),
            color: color.to_string(),
            location: location.to_string(),
            image: format!("https://images.unsplash.com/{}?w=600&h=400&fit=crop", image),
        };

        Self::new(vec![
            listing("1", "Toyota", "RAV4", 2023, 32500.0, 15000.0, "Hybrid", "SUV", "Silver",
                "photo-1621007947382-bb3c3994e3fb", "Los Angeles, CA"),
            listing("2", "Honda", "Accord", 2022, 28900.0, 22000.0, "Gasoline", "Sedan", "Black",
                "photo-1606611013016-969c19ba27bb", "San Francisco, CA"),
            listing("3", "Tesla", "Model Y", 2023, 45000.0, 8000.0, "Electric", "SUV", "White",
                "photo-1560958089-b8a1929cea89", "Seattle, WA"),
            listing("4", "Ford", "F-150", 2022, 38500.0, 30000.0, "Gasoline", "Truck", "Blue",
                "photo-1558618666-fcd25c85cd64", "Austin, TX"),
            listing("5", "BMW", "3 Series", 2023, 42000.0, 12000.0, "Gasoline", "Sedan", "Gray",
                "photo-1555215695-3004980ad54e", "Miami, FL"),
            listing("6", "Hyundai", "Tucson", 2023, 29500.0, 18000.0, "Hybrid", "SUV", "Red",
                "photo-1503376780353-7e6692767b70", "Denver, CO"),
        ])
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn listings(&self) -> Result<Vec<VehicleListing>, InventoryError> {
        Ok(self.listings.clone())
    }
}
