use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use carquery::config::{ClassifierBackend, InventoryKind, Settings};
use carquery::core::{ClassifierGate, QueryOrchestrator};
use carquery::routes::{self, search::AppState};
use carquery::services::{
    AppwriteInventory, ChatCompletionsClassifier, HistoryStore, InventorySource, PostgresHistory,
    QueryClassifier, StaticInventory, ValidationServiceClient,
};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn build_classifier(settings: &Settings) -> Arc<dyn QueryClassifier> {
    let cfg = &settings.classifier;
    let timeout = cfg.timeout_secs.unwrap_or(10);

    if cfg.api_key.is_none() && cfg.backend == ClassifierBackend::Gateway {
        warn!("No classifier API key configured, every query will be allowed");
    }

    match cfg.backend {
        ClassifierBackend::Gateway => Arc::new(ChatCompletionsClassifier::new(
            cfg.endpoint.clone(),
            cfg.api_key.clone(),
            cfg.model.clone(),
            timeout,
        )),
        ClassifierBackend::Remote => Arc::new(ValidationServiceClient::new(
            cfg.endpoint.clone(),
            cfg.api_key.clone(),
            timeout,
        )),
    }
}

async fn build_history(settings: &Settings) -> Option<Arc<dyn HistoryStore>> {
    let Some(db) = &settings.database else {
        warn!("No database configured, search history disabled");
        return None;
    };

    match PostgresHistory::from_settings(
        &db.url,
        db.max_connections,
        db.min_connections,
        db.acquire_timeout_secs,
        db.idle_timeout_secs,
    )
    .await
    {
        Ok(history) => {
            info!("PostgreSQL history store initialized");
            Some(Arc::new(history) as Arc<dyn HistoryStore>)
        }
        Err(e) => {
            error!("Failed to connect to PostgreSQL ({}), search history disabled", e);
            None
        }
    }
}

async fn build_inventory(settings: &Settings) -> std::io::Result<Arc<dyn InventorySource>> {
    match settings.inventory.source {
        InventoryKind::Static => {
            let inventory = match &settings.inventory.path {
                Some(path) => StaticInventory::from_file(path).await.map_err(|e| {
                    error!("Failed to load inventory from {}: {}", path, e);
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?,
                None => StaticInventory::sample(),
            };
            info!("Static inventory loaded ({} listings)", inventory.len());
            Ok(Arc::new(inventory) as Arc<dyn InventorySource>)
        }
        InventoryKind::Appwrite => {
            let aw = settings.appwrite.clone().ok_or_else(|| {
                error!("Inventory source is appwrite but no [appwrite] section is configured");
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing appwrite settings")
            })?;
            info!("Appwrite inventory initialized (collection: {})", aw.listings_collection);
            let inventory = AppwriteInventory::new(
                aw.endpoint,
                aw.api_key,
                aw.project_id,
                aw.database_id,
                aw.listings_collection,
                settings.inventory.page_limit.unwrap_or(500),
            );
            Ok(Arc::new(inventory) as Arc<dyn InventorySource>)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);

    info!("Starting car query service...");

    let gate = ClassifierGate::new(build_classifier(&settings));
    let history = build_history(&settings).await;
    let inventory = build_inventory(&settings).await?;

    let app_state = AppState {
        orchestrator: QueryOrchestrator::new(gate, history, inventory),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
