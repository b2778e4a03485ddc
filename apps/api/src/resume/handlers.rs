//! Axum route handlers for the Resume API.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::{
    Certification, Education, Experience, PersonalInfo, Project, ResumeData, SkillsByCategory,
    SocialLink,
};
use crate::resume::document::{
    cached_pdf, content_disposition, render_pdf, resume_filename, sanitize_filename,
};
use crate::state::AppState;
use crate::store::{load_resume, skills_by_category};

/// GET /api/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Result<Json<ResumeData>, AppError> {
    load_resume(state.store.as_ref())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Resume data not found".to_string()))
}

/// GET /api/resume/personal-info
pub async fn handle_personal_info(
    State(state): State<AppState>,
) -> Result<Json<PersonalInfo>, AppError> {
    state
        .store
        .personal_info()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Personal info not found".to_string()))
}

/// GET /api/resume/social-links
pub async fn handle_social_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLink>>, AppError> {
    Ok(Json(state.store.social_links().await?))
}

/// GET /api/resume/experience
pub async fn handle_experience(
    State(state): State<AppState>,
) -> Result<Json<Vec<Experience>>, AppError> {
    Ok(Json(state.store.experience().await?))
}

/// GET /api/resume/education
pub async fn handle_education(
    State(state): State<AppState>,
) -> Result<Json<Vec<Education>>, AppError> {
    Ok(Json(state.store.education().await?))
}

/// GET /api/resume/certifications
pub async fn handle_certifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Certification>>, AppError> {
    Ok(Json(state.store.certifications().await?))
}

/// GET /api/resume/skills
pub async fn handle_skills(
    State(state): State<AppState>,
) -> Result<Json<SkillsByCategory>, AppError> {
    Ok(Json(skills_by_category(state.store.as_ref()).await?))
}

/// GET /api/resume/projects
pub async fn handle_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.store.projects().await?))
}

/// Name and title for the document, from the store or the bundled dataset.
async fn document_owner(state: &AppState) -> Result<(String, String), AppError> {
    Ok(match state.store.personal_info().await? {
        Some(info) => (info.name, info.title),
        None => (
            state.fallback.personal_info.name.clone(),
            state.fallback.personal_info.title.clone(),
        ),
    })
}

fn pdf_response(filename: &str, body: bytes::Bytes) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        body,
    )
}

/// GET /api/resume/pdf
pub async fn handle_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (name, title) = document_owner(&state).await?;
    let filename = resume_filename(&name);

    let body = cached_pdf(&state.config.pdf_dir, &filename, &format!("{name} - {title}")).await?;

    Ok(pdf_response(&filename, body))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

/// GET /api/resume/download?filename=
///
/// Same document, rendered in memory, under the caller's file name when it is
/// usable.
pub async fn handle_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (name, title) = document_owner(&state).await?;
    let filename = query
        .filename
        .as_deref()
        .and_then(sanitize_filename)
        .unwrap_or_else(|| resume_filename(&name));

    Ok(pdf_response(&filename, render_pdf(&format!("{name} - {title}"))))
}
