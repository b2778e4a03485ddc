pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::contact::handlers::handle_contact;
use crate::page::handle_page;
use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/resume", get(handlers::handle_get_resume))
        .route(
            "/api/resume/personal-info",
            get(handlers::handle_personal_info),
        )
        .route(
            "/api/resume/social-links",
            get(handlers::handle_social_links),
        )
        .route("/api/resume/experience", get(handlers::handle_experience))
        .route("/api/resume/education", get(handlers::handle_education))
        .route(
            "/api/resume/certifications",
            get(handlers::handle_certifications),
        )
        .route("/api/resume/skills", get(handlers::handle_skills))
        .route("/api/resume/projects", get(handlers::handle_projects))
        .route("/api/resume/pdf", get(handlers::handle_pdf))
        .route("/api/resume/download", get(handlers::handle_download))
        // Contact API
        .route("/api/contact", post(handle_contact))
        .with_state(state)
}
