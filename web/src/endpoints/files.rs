/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use core::input::load_secret;
use core::policy::{ProjectAction, project_allows};
use core::storage::BlobStore;
use core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

use super::tasks::get_scope;

fn blob_store(state: &Arc<ServerState>) -> WebResult<BlobStore> {
    let Some(endpoint) = state.cli.blob_endpoint.as_deref() else {
        return Err(WebError::InternalServerError(
            "Blob storage is not configured".to_string(),
        ));
    };

    let token = state
        .cli
        .blob_token_file
        .as_deref()
        .map(load_secret)
        .unwrap_or_default();

    Ok(BlobStore::new(endpoint, &token))
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<Vec<MFile>>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    let files = EFile::find()
        .filter(CFile::Project.eq(scope.project.id))
        .order_by_asc(CFile::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(files))
}

pub async fn post(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    mut multipart: Multipart,
) -> WebResult<(StatusCode, Json<MFile>)> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageFiles) {
        return Err(WebError::forbidden("upload files"));
    }

    let store = blob_store(&state)?;

    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| WebError::BadRequest("Invalid multipart body".to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|_| WebError::BadRequest("Failed to read upload".to_string()))?;

        upload = Some((file_name, content_type, data.to_vec()));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(WebError::BadRequest("No file in upload".to_string()));
    };

    let size = data.len() as i64;
    let blob_key = format!("{}/{}-{}", scope.project.id, Uuid::new_v4(), file_name);

    let blob = store.put(&blob_key, &content_type, data).await.map_err(|e| {
        tracing::error!("Blob upload failed: {}", e);
        WebError::InternalServerError("Upload failed".to_string())
    })?;

    let file = AFile {
        id: Set(Uuid::new_v4()),
        project: Set(scope.project.id),
        uploaded_by: Set(Some(user.id)),
        name: Set(file_name),
        url: Set(blob.url),
        blob_key: Set(blob.key),
        size: Set(size),
        content_type: Set(content_type),
        is_archived: Set(false),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

pub async fn post_archive(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, file)): Path<(String, String, Uuid)>,
) -> WebResult<Json<MFile>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageFiles) {
        return Err(WebError::forbidden("archive files"));
    }

    let file = EFile::find()
        .filter(
            Condition::all()
                .add(CFile::Id.eq(file))
                .add(CFile::Project.eq(scope.project.id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("File"))?;

    let mut afile: AFile = file.into();
    afile.is_archived = Set(true);

    let file = afile.update(&state.db).await?;

    Ok(Json(file))
}

pub async fn delete_file(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project, file)): Path<(String, String, Uuid)>,
) -> WebResult<Json<SuccessResponse>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageFiles) {
        return Err(WebError::forbidden("delete files"));
    }

    let file = EFile::find()
        .filter(
            Condition::all()
                .add(CFile::Id.eq(file))
                .add(CFile::Project.eq(scope.project.id)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("File"))?;

    let blob_key = file.blob_key.clone();
    file.delete(&state.db).await?;

    // The record is gone either way; a stale blob only costs storage.
    if let Ok(store) = blob_store(&state) {
        if let Err(e) = store.delete(&blob_key).await {
            tracing::warn!("Failed to delete blob {}: {}", blob_key, e);
        }
    }

    Ok(Json(SuccessResponse::ok()))
}
