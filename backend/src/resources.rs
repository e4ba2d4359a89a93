//! Lesson, user and vocabulary handlers. Each one performs exactly one store
//! operation and returns its result as is.

use axum::{
    extract::{Path, State},
    Json,
};
use jlearn_common::{
    DeleteResult, DocumentPatch, InsertResult, Lesson, RoleUpdate, UpdateResult, UserDto,
    Vocabulary,
};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::store::{Collection, DocumentId};
use crate::web_server::AppState;

fn actor_id(actor: &Option<AuthUser>) -> &str {
    actor.as_ref().map_or("anonymous", |user| user.id.as_str())
}

async fn delete_document(
    state: &AppState,
    collection: Collection,
    raw_id: &str,
) -> Result<Json<DeleteResult>, AppError> {
    let id = DocumentId::parse(raw_id)?;
    Ok(Json(state.store.delete_by_id(collection, &id).await?))
}

// --- Lessons ---

#[utoipa::path(
    get,
    path = "/lessons",
    tag = "lessons",
    responses((status = 200, description = "Every lesson in insertion order"))
)]
pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<Lesson>>, AppError> {
    tracing::info!("Fetching all lessons");
    Ok(Json(state.store.find_all(Collection::Lessons).await?))
}

#[utoipa::path(
    post,
    path = "/lesson",
    tag = "lessons",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Lesson inserted", body = InsertResult))
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Json(lesson): Json<Lesson>,
) -> Result<Json<InsertResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Creating lesson");
    Ok(Json(state.store.insert_one(Collection::Lessons, &lesson).await?))
}

#[utoipa::path(
    delete,
    path = "/lesson-del/{id}",
    tag = "lessons",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResult),
        (status = 400, description = "Malformed id"),
    )
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Deleting lesson with id: {}", id);
    delete_document(&state, Collection::Lessons, &id).await
}

/// Merges the body into the lesson, creating it under `id` when it does not exist.
#[utoipa::path(
    patch,
    path = "/lesson-update/{id}",
    tag = "lessons",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Update result", body = UpdateResult),
        (status = 500, description = "Failed to update lesson"),
    )
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<UpdateResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Updating lesson with id: {}", id);

    let result = async {
        let id = DocumentId::parse(&id)?;
        state
            .store
            .update_by_id(Collection::Lessons, &id, &patch, true)
            .await
    }
    .await
    .map_err(|e| AppError::OperationFailed {
        message: "Failed to update lesson".to_string(),
        detail: e.to_string(),
    })?;

    Ok(Json(result))
}

// --- Users ---

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "Every user, without password hashes", body = [UserDto]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, AppError> {
    tracing::info!("Fetching all users");
    Ok(Json(state.store.find_all(Collection::Users).await?))
}

#[utoipa::path(
    delete,
    path = "/user-del/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResult),
        (status = 400, description = "Malformed id"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Deleting user with id: {}", id);
    delete_document(&state, Collection::Users, &id).await
}

#[utoipa::path(
    patch,
    path = "/user-role/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = RoleUpdate,
    responses(
        (status = 200, description = "Update result, zero matched when the user does not exist", body = UpdateResult),
        (status = 400, description = "Malformed id"),
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
    Json(update): Json<RoleUpdate>,
) -> Result<Json<UpdateResult>, AppError> {
    tracing::info!(
        actor = actor_id(&actor),
        "Setting role of user {} to {}",
        id,
        update.role.as_str()
    );
    let id = DocumentId::parse(&id)?;

    let mut fields = Map::new();
    fields.insert("role".to_string(), Value::String(update.role.as_str().to_string()));

    let result = state
        .store
        .update_by_id(Collection::Users, &id, &DocumentPatch(fields), false)
        .await?;
    Ok(Json(result))
}

// --- Vocabularies ---

#[utoipa::path(
    get,
    path = "/vocabularies",
    tag = "vocabularies",
    responses((status = 200, description = "Every vocabulary entry in insertion order"))
)]
pub async fn list_vocabularies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Vocabulary>>, AppError> {
    tracing::info!("Fetching all vocabularies");
    Ok(Json(state.store.find_all(Collection::Vocabularies).await?))
}

#[utoipa::path(
    post,
    path = "/vocabulary",
    tag = "vocabularies",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Vocabulary inserted", body = InsertResult))
)]
pub async fn create_vocabulary(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Json(vocabulary): Json<Vocabulary>,
) -> Result<Json<InsertResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Creating vocabulary");
    Ok(Json(
        state
            .store
            .insert_one(Collection::Vocabularies, &vocabulary)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/vocabulary-del/{id}",
    tag = "vocabularies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vocabulary id")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResult),
        (status = 400, description = "Malformed id"),
    )
)]
pub async fn delete_vocabulary(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Deleting vocabulary with id: {}", id);
    delete_document(&state, Collection::Vocabularies, &id).await
}

#[utoipa::path(
    patch,
    path = "/vocabulary-update/{id}",
    tag = "vocabularies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vocabulary id")),
    responses(
        (status = 200, description = "Update result, zero matched when the entry does not exist", body = UpdateResult),
        (status = 400, description = "Malformed id"),
    )
)]
pub async fn update_vocabulary(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<UpdateResult>, AppError> {
    tracing::info!(actor = actor_id(&actor), "Updating vocabulary with id: {}", id);
    let id = DocumentId::parse(&id)?;
    let result = state
        .store
        .update_by_id(Collection::Vocabularies, &id, &patch, false)
        .await?;
    Ok(Json(result))
}
