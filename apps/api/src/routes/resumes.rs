use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{render, render_page, VisualTree};
use crate::models::resume::{
    is_color_token, CreatedResume, LayoutId, ResumeDocument, ResumeMeta, ResumePatch,
    ResumeSummary,
};
use crate::routes::identity::Identity;
use crate::sections::write::section_patch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
}

/// Presentation and metadata fields settable outside the section flow.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub theme_color: Option<String>,
    pub layout: Option<String>,
    pub enable_hr_lines: Option<bool>,
}

impl UpdateResumeRequest {
    fn into_patch(self) -> Result<ResumePatch, AppError> {
        let title = match self.title {
            Some(title) if title.trim().is_empty() => {
                return Err(AppError::Validation("title must not be empty".into()))
            }
            other => other.map(|t| t.trim().to_string()),
        };
        let theme_color = match self.theme_color {
            Some(color) if !is_color_token(color.trim()) => {
                return Err(AppError::Validation(format!(
                    "'{color}' is not a #RRGGBB color"
                )))
            }
            other => other.map(|c| c.trim().to_string()),
        };
        let layout = match self.layout {
            Some(layout) => {
                let resolved = LayoutId::resolve(&layout);
                if resolved.as_str() != layout.trim() {
                    return Err(AppError::Validation(format!("Unknown layout '{layout}'")));
                }
                Some(resolved.as_str().to_string())
            }
            None => None,
        };
        let patch = ResumePatch {
            title,
            theme_color,
            layout,
            enable_hr_lines: self.enable_hr_lines,
            ..ResumePatch::default()
        };
        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".into()));
        }
        Ok(patch)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub document_id: Uuid,
    pub share_url: String,
    pub tree: VisualTree,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Only the creator may change a resume; anyone else gets NotFound.
async fn ensure_owner(state: &AppState, id: Uuid, identity: &Identity) -> Result<(), AppError> {
    let owner = state.store.owner_of(id).await?;
    if !owner.eq_ignore_ascii_case(identity.email.trim()) {
        warn!(document_id = %id, user = %identity.email, "Refused write to another user's resume");
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(())
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<CreatedResume>), AppError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }
    let created = state
        .store
        .create(ResumeMeta {
            title: title.to_string(),
            user_email: identity.email.clone(),
            user_name: identity.full_name,
        })
        .await?;
    info!(document_id = %created.document_id, user = %identity.email, "Resume created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(state.store.list_by_owner(&identity.email).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.store.get_by_id(id).await?))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    ensure_owner(&state, id, &identity).await?;
    let patch = body.into_patch()?;
    state.store.update_fields(id, &patch).await?;
    Ok(Json(state.store.get_by_id(id).await?))
}

/// PUT /api/v1/resumes/:id/sections/:section
/// Writes one section: entries are date-normalized, validated and encoded
/// before the store sees them.
pub async fn handle_write_section(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, section)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> Result<Json<ResumeDocument>, AppError> {
    ensure_owner(&state, id, &identity).await?;
    let patch = section_patch(&section, &body)?;
    state.store.update_fields(id, &patch).await?;
    info!(document_id = %id, section = %section, "Section written");
    Ok(Json(state.store.get_by_id(id).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_owner(&state, id, &identity).await?;
    state.store.delete_by_id(id).await?;
    info!(document_id = %id, user = %identity.email, "Resume deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let document = state.store.get_by_id(id).await?;
    Ok(Json(PreviewResponse {
        document_id: id,
        share_url: state.config.share_url(id),
        tree: render(&document),
    }))
}

/// GET /my-resume/:id/view
/// The read-only share/print page.
pub async fn handle_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let document = state.store.get_by_id(id).await?;
    let name = document.full_name();
    let title = if name.is_empty() { &document.title } else { &name };
    Ok(Html(render_page(&render(&document), title)))
}
