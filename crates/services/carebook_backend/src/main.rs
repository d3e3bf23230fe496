// File: services/carebook_backend/src/main.rs
use axum::{routing::get, Router};
use carebook_booking::routes as booking_routes;
use carebook_common::{is_booking_enabled, log_result, logging, Context};
use carebook_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let config = Arc::new(load_config().context("Failed to load configuration")?);

    let mut router = Router::new().route("/", get(|| async { "Welcome to Carebook API!" }));

    if is_booking_enabled(&config) {
        let booking_router = log_result(
            booking_routes(config.clone()),
            "Booking endpoints enabled",
            "Failed to set up booking endpoints",
        )?;
        router = router.merge(booking_router);
    } else {
        warn!("Booking is disabled; set use_booking and a [booking] section to enable it");
    }

    #[allow(unused_mut)] // mutated when features are on
    let mut app = Router::new().nest("/api", router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use carebook_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Carebook API",
                version = "0.1.0",
                description = "Carebook appointment booking API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Carebook", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
