/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use core::consts::{GITHUB_API_BASE, PROVIDER_GITHUB};
use core::input::load_secret;
use core::policy::{ProjectAction, project_allows};
use core::types::*;
use git_url_parse::normalize_url;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::tasks::get_scope;

#[derive(Serialize, Deserialize, Debug)]
pub struct PutProviderRequest {
    pub repository: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
    pub url: String,
}

async fn find_provider(
    state: &Arc<ServerState>,
    project_id: Uuid,
) -> WebResult<Option<MProvider>> {
    let provider = EProvider::find()
        .filter(
            Condition::all()
                .add(CProvider::Project.eq(project_id))
                .add(CProvider::Name.eq(PROVIDER_GITHUB)),
        )
        .one(&state.db)
        .await?;

    Ok(provider)
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<MProvider>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    let provider = find_provider(&state, scope.project.id)
        .await?
        .ok_or_else(|| WebError::not_found("Provider"))?;

    Ok(Json(provider))
}

pub async fn put(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
    Json(body): Json<PutProviderRequest>,
) -> WebResult<Json<MProvider>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    if !project_allows(scope.effective_role(), ProjectAction::ManageProject) {
        return Err(WebError::forbidden("configure providers"));
    }

    let repository_url = normalize_url(body.repository.as_str())
        .map_err(|_| WebError::BadRequest("Invalid repository URL".to_string()))?;

    let segments: Vec<&str> = repository_url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let (Some(owner), Some(repo)) = (segments.first(), segments.get(1)) else {
        return Err(WebError::BadRequest(
            "Repository URL must include owner and name".to_string(),
        ));
    };

    let url = format!(
        "{}/repos/{}/{}/commits",
        GITHUB_API_BASE,
        owner,
        repo.trim_end_matches(".git")
    );

    let provider = match find_provider(&state, scope.project.id).await? {
        Some(provider) => {
            let mut aprovider: AProvider = provider.into();
            aprovider.url = Set(url);
            aprovider.update(&state.db).await?
        }
        None => {
            AProvider {
                id: Set(Uuid::new_v4()),
                project: Set(scope.project.id),
                name: Set(PROVIDER_GITHUB.to_string()),
                url: Set(url),
            }
            .insert(&state.db)
            .await?
        }
    };

    Ok(Json(provider))
}

pub async fn get_commits(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path((org, project)): Path<(String, String)>,
) -> WebResult<Json<Vec<CommitInfo>>> {
    let scope = get_scope(&state, &user, &org, &project).await?;

    let provider = find_provider(&state, scope.project.id)
        .await?
        .ok_or_else(|| WebError::not_found("Provider"))?;

    let token = state
        .cli
        .github_token_file
        .as_deref()
        .map(load_secret)
        .unwrap_or_default();

    let client = reqwest::Client::new();
    let mut request = client
        .get(&provider.url)
        .header(reqwest::header::USER_AGENT, "trellis-server");

    if !token.is_empty() {
        request = request.bearer_auth(&token);
    }

    let response = request.send().await.map_err(|e| {
        tracing::error!("Commit provider request failed: {}", e);
        WebError::InternalServerError("Failed to reach commit provider".to_string())
    })?;

    if !response.status().is_success() {
        return Err(WebError::InternalServerError(format!(
            "Commit provider returned {}",
            response.status()
        )));
    }

    let commits: Vec<serde_json::Value> = response.json().await.map_err(|e| {
        tracing::error!("Commit provider response invalid: {}", e);
        WebError::InternalServerError("Invalid commit provider response".to_string())
    })?;

    let commits: Vec<CommitInfo> = commits
        .iter()
        .map(|c| CommitInfo {
            sha: c["sha"].as_str().unwrap_or_default().to_string(),
            message: c["commit"]["message"].as_str().unwrap_or_default().to_string(),
            author: c["commit"]["author"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            date: c["commit"]["author"]["date"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            url: c["html_url"].as_str().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(Json(commits))
}
