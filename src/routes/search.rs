use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use crate::core::{GateOutcome, QueryOrchestrator, SearchOutcome};
use crate::models::{
    clamp_text, ErrorEnvelope, ErrorResponse, HealthResponse, ResultsParams, SearchRequest, SearchResponse,
    ValidateQueryRequest, ValidateQueryResponse,
};
use crate::services::ClassifierError;

/// Header carrying the signed-in user's id
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: QueryOrchestrator,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search))
        .route("/results", web::get().to(results))
        .route("/validate-query", web::post().to(validate_query));
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            total_results: outcome.matches.len(),
            query: outcome.query,
            matches: outcome.matches,
            total_candidates: outcome.total_candidates,
            results_path: outcome.results_path,
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let history_healthy = match state.orchestrator.history() {
        Some(history) => history.health_check().await,
        None => true,
    };

    let status = if history_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "text": "reliable SUV under $35000",
///   "filters": { "bodyTypes": ["SUV"], "maxPrice": 35000 }
/// }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let actor = http_req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let query = req.into_inner().into_query();

    tracing::info!("Search submitted (signed in: {}): {:?}", actor.is_some(), query.text);

    match state.orchestrator.submit(query, actor).await {
        Ok(outcome) => {
            tracing::info!(
                "Returning {} matches (from {} candidates)",
                outcome.matches.len(),
                outcome.total_candidates
            );
            HttpResponse::Ok().json(SearchResponse::from(outcome))
        }
        Err(e) => {
            let status = match e {
                crate::core::SubmissionError::EmptySubmission => StatusCode::BAD_REQUEST,
                crate::core::SubmissionError::OutOfDomain => StatusCode::UNPROCESSABLE_ENTITY,
            };
            HttpResponse::build(status).json(ErrorResponse {
                error: e.code().to_string(),
                message: e.to_string(),
                status_code: status.as_u16(),
            })
        }
    }
}

/// Results page endpoint, filtering only
///
/// GET /api/v1/results?q=suv&bodyTypes=SUV,Truck&maxPrice=40000
async fn results(
    state: web::Data<AppState>,
    params: web::Query<ResultsParams>,
) -> impl Responder {
    let query = params.into_inner().into_query();
    let outcome = state.orchestrator.browse(query).await;

    HttpResponse::Ok().json(SearchResponse::from(outcome))
}

/// Query validation endpoint
///
/// POST /api/v1/validate-query
///
/// Request body: `{ "query": "string" }`, response: `{ "isCarRelated": bool }`
async fn validate_query(
    state: web::Data<AppState>,
    req: web::Json<ValidateQueryRequest>,
) -> impl Responder {
    let text = clamp_text(req.query.as_deref().unwrap_or_default());
    let outcome = state.orchestrator.gate().inspect(text).await;

    match outcome {
        GateOutcome::Failed(ClassifierError::RateLimited(_)) => {
            HttpResponse::TooManyRequests().json(ErrorEnvelope {
                error: "Rate limit exceeded, please try again later.".to_string(),
            })
        }
        GateOutcome::Failed(ClassifierError::PaymentRequired(_)) => {
            HttpResponse::PaymentRequired().json(ErrorEnvelope {
                error: "Payment required".to_string(),
            })
        }
        other => HttpResponse::Ok().json(ValidateQueryResponse {
            is_car_related: other.result().is_in_domain,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSet, VehicleQuery};

    #[test]
    fn test_search_response_from_outcome() {
        let outcome = SearchOutcome {
            query: VehicleQuery::new("suv", FilterSet::default()),
            matches: vec![],
            total_candidates: 6,
            results_path: "/results?q=suv".to_string(),
        };

        let response = SearchResponse::from(outcome);
        assert_eq!(response.total_results, 0);
        assert_eq!(response.total_candidates, 6);
        assert_eq!(response.results_path, "/results?q=suv");
    }
}
