use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{DeleteResponse, ErrorResponse, HelloResponse, NoteCreate, NoteRead, NoteUpdate},
    service::{NoteService, ServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(hello, list_notes, get_note, create_note, update_note, delete_note),
    components(schemas(
        NoteRead,
        NoteCreate,
        NoteUpdate,
        HelloResponse,
        DeleteResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

fn detail(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => detail(StatusCode::NOT_FOUND, self.to_string()),
            Self::Invalid(invalid) => detail(StatusCode::BAD_REQUEST, invalid.to_string()),
            Self::Storage(e) => {
                tracing::error!("storage fault while handling request: {}", e);
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/hello",
    responses(
        (status = 200, description = "Service is up", body = HelloResponse)
    ),
    tag = "notes"
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "hello".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, newest first", body = Vec<NoteRead>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn list_notes(
    State(service): State<Arc<NoteService>>,
) -> Result<Json<Vec<NoteRead>>, ServiceError> {
    service.list_notes().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteRead),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Result<Json<NoteRead>, ServiceError> {
    service.get_note(id).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteCreate,
    responses(
        (status = 200, description = "Note created", body = NoteRead),
        (status = 400, description = "Title or content is blank", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<NoteCreate>,
) -> Result<Json<NoteRead>, ServiceError> {
    service.create_note(payload).await.map(Json)
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Note updated", body = NoteRead),
        (status = 400, description = "Title or content is blank", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
    Json(payload): Json<NoteUpdate>,
) -> Result<Json<NoteRead>, ServiceError> {
    service.update_note(id, payload).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = DeleteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ServiceError> {
    service.delete_note(id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}
