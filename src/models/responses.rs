use serde::{Deserialize, Serialize};
use crate::models::domain::{VehicleListing, VehicleQuery};

/// Response for the search and results endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: VehicleQuery,
    pub matches: Vec<VehicleListing>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "resultsPath")]
    pub results_path: String,
}

/// Response of the query validation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateQueryResponse {
    #[serde(rename = "isCarRelated")]
    pub is_car_related: bool,
}

/// Error envelope of the query validation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
