//! The single-page résumé, rendered server-side from whatever the provider
//! resolved.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, response::Html};
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{
    Certification, Education, Experience, PersonalInfo, Project, ResumeData, Skill,
    SkillCategory, SocialLink,
};
use crate::provider::{Resolution, ResolveStatus, ResumeProvider};
use crate::state::AppState;

const PAGE_TEMPLATE: &str = include_str!("../../templates/page.hbs");
const PAGE: &str = "page";

#[derive(Debug, Serialize)]
struct PageContext<'a> {
    status: &'static str,
    title: &'a str,
    loading: bool,
    resume: Option<ResumeView<'a>>,
}

#[derive(Debug, Serialize)]
struct ResumeView<'a> {
    info: &'a PersonalInfo,
    bio: Vec<&'a str>,
    social_links: &'a [SocialLink],
    experience: &'a [Experience],
    education: &'a [Education],
    certifications: &'a [Certification],
    skill_groups: Vec<SkillGroup<'a>>,
    projects: &'a [Project],
}

#[derive(Debug, Serialize)]
struct SkillGroup<'a> {
    key: &'static str,
    label: &'static str,
    skills: &'a [Skill],
}

impl<'a> ResumeView<'a> {
    fn new(data: &'a ResumeData) -> Self {
        Self {
            info: &data.personal_info,
            bio: data.personal_info.bio_paragraphs().collect(),
            social_links: &data.social_links,
            experience: &data.experience,
            education: &data.education,
            certifications: &data.certifications,
            skill_groups: data
                .skills
                .iter()
                .map(|(category, skills)| SkillGroup {
                    key: category.as_str(),
                    label: category_label(category),
                    skills,
                })
                .collect(),
            projects: &data.projects,
        }
    }
}

fn category_label(category: SkillCategory) -> &'static str {
    match category {
        SkillCategory::ProgrammingLanguages => "Programming Languages",
        SkillCategory::Databases => "Databases",
        SkillCategory::CloudDevOps => "Cloud & DevOps",
        SkillCategory::Architecture => "Architecture",
    }
}

fn status_attr(status: ResolveStatus) -> &'static str {
    match status {
        ResolveStatus::Loading => "loading",
        ResolveStatus::Ready => "ready",
        ResolveStatus::Fallback => "fallback",
        ResolveStatus::Error => "error",
    }
}

/// Handlebars with the page template registered. Output is HTML-escaped.
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_template_string(PAGE, PAGE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, resolution: &Resolution) -> Result<String, RenderError> {
        let data = resolution.data.as_deref();
        let context = PageContext {
            status: status_attr(resolution.status),
            title: data.map_or("Résumé", |d| d.personal_info.name.as_str()),
            loading: resolution.status == ResolveStatus::Loading,
            resume: data.map(ResumeView::new),
        };
        self.handlebars.render(PAGE, &context)
    }
}

async fn trace_status(mut updates: watch::Receiver<Resolution>) {
    while updates.changed().await.is_ok() {
        debug!(status = ?updates.borrow_and_update().status, "Page data status");
    }
}

/// GET /
///
/// One provider per render, so each page view issues exactly one fetch.
pub async fn handle_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let provider = ResumeProvider::new(Arc::clone(&state.source), Some(Arc::clone(&state.fallback)));
    tokio::spawn(trace_status(provider.subscribe()));

    let resolution = provider.resolve().await;
    let html = state
        .pages
        .render(&resolution)
        .context("Failed to render page")?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::resume_dataset;

    fn render(resolution: Resolution) -> String {
        PageRenderer::new().unwrap().render(&resolution).unwrap()
    }

    fn resolved(data: ResumeData, status: ResolveStatus) -> Resolution {
        Resolution {
            data: Some(Arc::new(data)),
            status,
        }
    }

    #[test]
    fn test_loading_renders_placeholder_not_sections() {
        let html = render(Resolution::loading());
        assert!(html.contains("data-status=\"loading\""));
        assert!(html.contains("Loading"));
        assert!(!html.contains("id=\"experience\""));
    }

    #[test]
    fn test_fallback_render_includes_every_section() {
        let html = render(resolved(resume_dataset(), ResolveStatus::Error));
        assert!(html.contains("data-status=\"error\""));
        assert!(html.contains("<h1>Alex Chen</h1>"));
        for id in ["experience", "education", "skills", "projects", "contact"] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(html.contains("data-category=\"cloudDevOps\""));
        assert!(html.contains("Cloud &amp; DevOps"));
    }

    #[test]
    fn test_lists_are_comma_joined() {
        let mut data = resume_dataset();
        data.projects.truncate(1);
        data.projects[0].technologies = vec!["Rust".to_string(), "Postgres".to_string()];
        let html = render(resolved(data, ResolveStatus::Ready));
        assert!(html.contains("<p class=\"tech\">Rust, Postgres</p>"));
    }

    #[test]
    fn test_empty_section_renders_with_no_items() {
        let mut data = resume_dataset();
        data.projects.clear();
        let html = render(resolved(data, ResolveStatus::Ready));
        let projects = html.split("id=\"projects\"").nth(1).unwrap();
        let projects = projects.split("</section>").next().unwrap();
        assert!(!projects.contains("<article>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut data = resume_dataset();
        data.personal_info.name = "<script>x</script>".to_string();
        let html = render(resolved(data, ResolveStatus::Ready));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_no_data_renders_unavailable_notice() {
        let html = render(Resolution {
            data: None,
            status: ResolveStatus::Error,
        });
        assert!(html.contains("unavailable"));
        assert!(!html.contains("Loading"));
    }
}
