//! Incidents, posts and articles: records created from a multipart form that
//! carries exactly one media file.
//!
//! The file is written before the record and discarded again when the
//! record write fails. A replaced or deleted record's file is removed once
//! the database change has gone through.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use safecampus_shared::models::{Article, Incident, Post};
use safecampus_shared::protocol::{
    MessageResponse, ARTICLE_IMAGE_FIELD, INCIDENT_IMAGE_FIELD, POST_MEDIA_FIELD,
};
use safecampus_shared::types::PrincipalKind;
use safecampus_shared::validation::parse_date;
use safecampus_store::{
    ArticlePatch, Database, IncidentPatch, NewArticle, NewIncident, NewPost, PostPatch,
};
use tracing::info;

use super::{parse_id, AppState};
use crate::auth::{require_admin, require_kind, require_owner_or_admin, Authenticated};
use crate::error::{not_found, ServerError};
use crate::extract::ApiMultipart;
use crate::identity;
use crate::multipart::{UploadForm, UploadedFile};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/incidents", post(create_incident).get(list_incidents))
        .route("/api/incidents/reporter/:id", get(list_incidents_by_reporter))
        .route(
            "/api/incidents/:id",
            get(get_incident).put(update_incident).delete(delete_incident),
        )
        .route("/api/posts", post(create_post).get(list_posts))
        .route("/api/posts/author/:id", get(list_posts_by_author))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/articles", post(create_article).get(list_articles))
        .route("/api/articles/author/:id", get(list_articles_by_poster))
        .route(
            "/api/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
}

const INCIDENT_NOT_FOUND: &str = "Incident not found";
const POST_NOT_FOUND: &str = "Post not found";
const ARTICLE_NOT_FOUND: &str = "Article not found";

// ─── Media plumbing ───

/// Store `file`, then create the record that references it.
async fn create_with_media<T, F>(state: &AppState, file: UploadedFile, op: F) -> Result<T, ServerError>
where
    F: FnOnce(&Database, String) -> Result<T, ServerError> + Send + 'static,
    T: Send + 'static,
{
    let path = state.media.store(&file.file_name, &file.data).await?;
    let stored = path.clone();
    match state.with_db(move |db| op(db, stored)).await {
        Ok(record) => Ok(record),
        Err(e) => {
            state.media.discard(&path).await;
            Err(e)
        }
    }
}

/// Store an optional replacement file and apply `op` with its path. Exactly
/// one of the two files survives: the old one when the update fails or no
/// file was sent, the new one otherwise.
async fn update_with_media<T, F>(
    state: &AppState,
    old_path: String,
    file: Option<UploadedFile>,
    op: F,
) -> Result<T, ServerError>
where
    F: FnOnce(&Database, Option<String>) -> Result<T, ServerError> + Send + 'static,
    T: Send + 'static,
{
    let new_path = match file {
        Some(file) => Some(state.media.store(&file.file_name, &file.data).await?),
        None => None,
    };

    let for_db = new_path.clone();
    match state.with_db(move |db| op(db, for_db)).await {
        Ok(record) => {
            if new_path.is_some() {
                state.media.discard(&old_path).await;
            }
            Ok(record)
        }
        Err(e) => {
            if let Some(path) = &new_path {
                state.media.discard(path).await;
            }
            Err(e)
        }
    }
}

fn required_file(form: &mut UploadForm, label: &str) -> Result<UploadedFile, ServerError> {
    form.take_file()
        .ok_or_else(|| ServerError::BadRequest(format!("{label} is required")))
}

// ─── Incidents ───

async fn load_incident(state: &AppState, raw_id: &str) -> Result<Incident, ServerError> {
    let id = parse_id(raw_id, "Incident")?;
    state
        .with_db(move |db| Ok(db.get_incident(id)?))
        .await
        .map_err(not_found(INCIDENT_NOT_FOUND))
}

async fn create_incident(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<(StatusCode, Json<Incident>), ServerError> {
    require_kind(&principal, PrincipalKind::Student)?;
    let mut form = UploadForm::read(multipart, INCIDENT_IMAGE_FIELD).await?;

    let description = form.required("description", "Incident description")?;
    let location = form.required("location", "Incident location")?;
    let incident_date = parse_date(&form.required("incidentDate", "Incident date")?)?;
    let file = required_file(&mut form, "Incident image")?;

    let reported_by = principal.owner_id();
    let incident = create_with_media(&state, file, move |db, image_path| {
        Ok(db.insert_incident(NewIncident {
            description,
            location,
            reported_by,
            incident_date,
            image_path,
        })?)
    })
    .await?;

    info!(id = %incident.id, reporter = %incident.reported_by, "incident reported");
    Ok((StatusCode::CREATED, Json(incident)))
}

async fn list_incidents(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<Incident>>, ServerError> {
    require_admin(&principal)?;
    Ok(Json(state.with_db(|db| Ok(db.list_incidents()?)).await?))
}

async fn list_incidents_by_reporter(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(reporter): Path<String>,
) -> Result<Json<Vec<Incident>>, ServerError> {
    require_owner_or_admin(&principal, &reporter)?;
    let incidents = state
        .with_db(move |db| Ok(db.list_incidents_by_reporter(&reporter)?))
        .await?;
    Ok(Json(incidents))
}

async fn get_incident(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Incident>, ServerError> {
    let incident = load_incident(&state, &id).await?;
    require_owner_or_admin(&principal, &incident.reported_by)?;
    Ok(Json(incident))
}

async fn update_incident(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<Incident>, ServerError> {
    let existing = load_incident(&state, &id).await?;
    require_owner_or_admin(&principal, &existing.reported_by)?;

    let mut form = UploadForm::read(multipart, INCIDENT_IMAGE_FIELD).await?;
    let incident_date = form
        .text("incidentDate")
        .map(|raw| parse_date(&raw))
        .transpose()?;
    let mut patch = IncidentPatch {
        description: form.text("description"),
        location: form.text("location"),
        incident_date,
        image_path: None,
    };

    let id = existing.id;
    let incident = update_with_media(&state, existing.image_path, form.take_file(), move |db, image_path| {
        patch.image_path = image_path;
        Ok(db.update_incident(id, patch)?)
    })
    .await
    .map_err(not_found(INCIDENT_NOT_FOUND))?;

    Ok(Json(incident))
}

async fn delete_incident(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let existing = load_incident(&state, &id).await?;
    require_owner_or_admin(&principal, &existing.reported_by)?;

    let id = existing.id;
    let removed = state
        .with_db(move |db| Ok(db.delete_incident(id)?))
        .await
        .map_err(not_found(INCIDENT_NOT_FOUND))?;
    state.media.discard(&removed.image_path).await;

    info!(id = %id, "incident deleted");
    Ok(Json(MessageResponse::new("Incident deleted")))
}

// ─── Posts ───

async fn load_post(state: &AppState, raw_id: &str) -> Result<Post, ServerError> {
    let id = parse_id(raw_id, "Post")?;
    state
        .with_db(move |db| Ok(db.get_post(id)?))
        .await
        .map_err(not_found(POST_NOT_FOUND))
}

async fn create_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<(StatusCode, Json<Post>), ServerError> {
    require_kind(&principal, PrincipalKind::Student)?;
    let mut form = UploadForm::read(multipart, POST_MEDIA_FIELD).await?;

    let description = form.required("description", "Description")?;
    let file = required_file(&mut form, "Media")?;

    let post = create_with_media(&state, file, move |db, media_path| {
        // The author's display name is copied onto the post as it is now.
        let author = identity::get_account(db, principal.kind, principal.id)?;
        Ok(db.insert_post(NewPost {
            description,
            media_path,
            author_id: principal.owner_id(),
            author_name: author.name,
        })?)
    })
    .await?;

    info!(id = %post.id, author = %post.author_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn list_posts(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
) -> Result<Json<Vec<Post>>, ServerError> {
    Ok(Json(state.with_db(|db| Ok(db.list_posts()?)).await?))
}

async fn list_posts_by_author(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
    Path(author): Path<String>,
) -> Result<Json<Vec<Post>>, ServerError> {
    let posts = state
        .with_db(move |db| Ok(db.list_posts_by_author(&author)?))
        .await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Post>, ServerError> {
    Ok(Json(load_post(&state, &id).await?))
}

async fn update_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<Post>, ServerError> {
    let existing = load_post(&state, &id).await?;
    require_owner_or_admin(&principal, &existing.author_id)?;

    let mut form = UploadForm::read(multipart, POST_MEDIA_FIELD).await?;
    let mut patch = PostPatch {
        description: form.text("description"),
        media_path: None,
    };

    let id = existing.id;
    let post = update_with_media(&state, existing.media_path, form.take_file(), move |db, media_path| {
        patch.media_path = media_path;
        Ok(db.update_post(id, patch)?)
    })
    .await
    .map_err(not_found(POST_NOT_FOUND))?;

    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let existing = load_post(&state, &id).await?;
    require_owner_or_admin(&principal, &existing.author_id)?;

    let id = existing.id;
    let removed = state
        .with_db(move |db| Ok(db.delete_post(id)?))
        .await
        .map_err(not_found(POST_NOT_FOUND))?;
    state.media.discard(&removed.media_path).await;

    info!(id = %id, "post deleted");
    Ok(Json(MessageResponse::new("Post deleted")))
}

// ─── Articles ───

async fn load_article(state: &AppState, raw_id: &str) -> Result<Article, ServerError> {
    let id = parse_id(raw_id, "Article")?;
    state
        .with_db(move |db| Ok(db.get_article(id)?))
        .await
        .map_err(not_found(ARTICLE_NOT_FOUND))
}

async fn create_article(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<(StatusCode, Json<Article>), ServerError> {
    require_admin(&principal)?;
    let mut form = UploadForm::read(multipart, ARTICLE_IMAGE_FIELD).await?;

    let title = form.required("title", "Title")?;
    let description = form.required("description", "Description")?;
    let file = required_file(&mut form, "Image")?;

    let posted_by = principal.owner_id();
    let article = create_with_media(&state, file, move |db, image_path| {
        Ok(db.insert_article(NewArticle {
            title,
            description,
            image_path,
            posted_by,
        })?)
    })
    .await?;

    info!(id = %article.id, "article published");
    Ok((StatusCode::CREATED, Json(article)))
}

async fn list_articles(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
) -> Result<Json<Vec<Article>>, ServerError> {
    Ok(Json(state.with_db(|db| Ok(db.list_articles()?)).await?))
}

async fn list_articles_by_poster(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
    Path(poster): Path<String>,
) -> Result<Json<Vec<Article>>, ServerError> {
    let articles = state
        .with_db(move |db| Ok(db.list_articles_by_poster(&poster)?))
        .await?;
    Ok(Json(articles))
}

async fn get_article(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Article>, ServerError> {
    Ok(Json(load_article(&state, &id).await?))
}

async fn update_article(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<Article>, ServerError> {
    require_admin(&principal)?;
    let existing = load_article(&state, &id).await?;

    let mut form = UploadForm::read(multipart, ARTICLE_IMAGE_FIELD).await?;
    let mut patch = ArticlePatch {
        title: form.text("title"),
        description: form.text("description"),
        image_path: None,
    };

    let id = existing.id;
    let article = update_with_media(&state, existing.image_path, form.take_file(), move |db, image_path| {
        patch.image_path = image_path;
        Ok(db.update_article(id, patch)?)
    })
    .await
    .map_err(not_found(ARTICLE_NOT_FOUND))?;

    Ok(Json(article))
}

async fn delete_article(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    require_admin(&principal)?;
    let existing = load_article(&state, &id).await?;

    let id = existing.id;
    let removed = state
        .with_db(move |db| Ok(db.delete_article(id)?))
        .await
        .map_err(not_found(ARTICLE_NOT_FOUND))?;
    state.media.discard(&removed.image_path).await;

    info!(id = %id, "article deleted");
    Ok(Json(MessageResponse::new("Article deleted")))
}
