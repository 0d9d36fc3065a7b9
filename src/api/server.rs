//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::FeedbackPipeline;
use crate::Result;

/// Build the application router with middleware
pub fn build_app(pipeline: Arc<FeedbackPipeline>, enable_cors: bool) -> Router {
    let state = AppState { pipeline };

    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting sqlfeedback API server...");

    // Index and clients are loaded once and shared by all requests
    let pipeline = Arc::new(FeedbackPipeline::from_config(config)?);
    info!(
        "📦 Loaded {} examples (dimension {})",
        pipeline.retriever().store().len(),
        pipeline.retriever().store().dimension()
    );

    let app = build_app(pipeline, enable_cors);

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health    - Health check");
    info!("  POST /api/feedback  - Classify a query and generate feedback");
    info!("  POST /api/search    - Nearest labeled examples");

    axum::serve(listener, app).await?;

    Ok(())
}
