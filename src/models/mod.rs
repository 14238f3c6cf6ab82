// Model exports
pub mod bounds;
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{VehicleListing, FilterSet, VehicleQuery, ClassificationResult, Verdict, HistoryRecord};
pub use requests::{clamp_text, SearchRequest, ResultsParams, ValidateQueryRequest, MAX_QUERY_CHARS};
pub use responses::{SearchResponse, ValidateQueryResponse, ErrorEnvelope, HealthResponse, ErrorResponse};
