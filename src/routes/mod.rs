pub mod chat_routes;

use std::path::Path;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::service::chat_service::ChatService;

use self::chat_routes::chat_handler;

/// `/chat` plus the built widget; unknown paths get the widget's `index.html`.
pub fn router(svc: ChatService, static_dir: &Path, cors_permissive: bool) -> Router {
    let widget = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    let app = Router::new()
        .route("/chat", post(chat_handler))
        .fallback_service(widget)
        .layer(TraceLayer::new_for_http())
        .with_state(svc);

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
