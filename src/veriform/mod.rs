pub mod auth;
pub mod handlers;

use crate::veriform::auth::AuthBindings;
use anyhow::Result;
use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::verify_email::verify_email
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "verify", description = "Email verification")
    )
)]
struct ApiDoc;

pub async fn new(port: u16, bindings: Arc<AuthBindings>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/verify-email", get(handlers::verify_email))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(bindings)),
        );

    info!("listening on [::]:{port}");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
