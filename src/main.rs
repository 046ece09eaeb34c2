use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tourbook::domain::clock::{Clock, SystemClock};
use tourbook::infra::config::Config;
use tourbook::storage::seed;
use tourbook::transport;
use tourbook::{
    AuthService, BookingService, DocumentBackend, JsonFileBackend, LendingService, RecordStore,
    TourCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();

    let backend: Arc<dyn DocumentBackend> = Arc::new(JsonFileBackend::new(&config.data_dir));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = RecordStore::new(backend, clock.clone());

    info!("initializing collections under {}", config.data_dir);
    seed::initialize_data(&store).await?;

    let tours = TourCatalog::new(store.clone());
    let state = transport::http::AppState {
        store: store.clone(),
        auth: AuthService::new(store.clone(), clock.clone(), config.session_days),
        lending: LendingService::new(store.clone(), clock.clone()),
        bookings: BookingService::new(store.clone(), tours.clone()),
        tours,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi.json",
            transport::http::ApiDoc::openapi(),
        ))
        .layer(cors);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API server listening on http://{address}");
    info!("Swagger UI available at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping");
        }
    }

    Ok(())
}
