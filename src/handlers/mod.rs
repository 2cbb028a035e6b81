pub mod rest;

use axum::{
    Router,
    http::{HeaderValue, request::Parts},
    routing::get,
};
use regex::Regex;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::service::NoteService;

/// Allows the listed origins and, when given, any origin fully matching
/// `origin_regex`. Methods and headers are mirrored for allowed origins.
pub fn cors_layer(origins: &[String], origin_regex: Option<&str>) -> Result<CorsLayer, regex::Error> {
    let pattern = origin_regex
        .map(|re| Regex::new(&format!("^(?:{re})$")))
        .transpose()?;

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
        origins.contains(origin)
            || pattern.as_ref().is_some_and(|pattern| {
                origin
                    .to_str()
                    .is_ok_and(|origin| pattern.is_match(origin))
            })
    });

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn router(service: Arc<NoteService>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/hello", get(rest::hello))
        .route("/notes", get(rest::list_notes).post(rest::create_note))
        .route(
            "/notes/{id}",
            get(rest::get_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .with_state(service);

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", rest::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
