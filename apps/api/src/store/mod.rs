//! Persistence for résumé rows.
//!
//! `AppState` carries an `Arc<dyn ResumeStore>`: `PgResumeStore` in
//! production, `MemoryResumeStore` for tests and `STORE=memory`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::resume::{
    Certification, Education, Experience, PersonalInfo, Project, ResumeData, Skill,
    SkillsByCategory, SocialLink,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryResumeStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Row counts written by one seed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub personal_info: usize,
    pub social_links: usize,
    pub experience: usize,
    pub education: usize,
    pub certifications: usize,
    pub skills: usize,
    pub projects: usize,
}

impl SeedCounts {
    pub fn of(data: &ResumeData) -> Self {
        SeedCounts {
            personal_info: 1,
            social_links: data.social_links.len(),
            experience: data.experience.len(),
            education: data.education.len(),
            certifications: data.certifications.len(),
            skills: data.skills.len(),
            projects: data.projects.len(),
        }
    }
}

/// Read access to each résumé section plus the one-shot seed write.
///
/// Ordered sections come back ascending by `order`; social links come back in
/// insertion order.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, StoreError>;
    async fn social_links(&self) -> Result<Vec<SocialLink>, StoreError>;
    async fn experience(&self) -> Result<Vec<Experience>, StoreError>;
    async fn education(&self) -> Result<Vec<Education>, StoreError>;
    async fn certifications(&self) -> Result<Vec<Certification>, StoreError>;
    async fn skills(&self) -> Result<Vec<Skill>, StoreError>;
    async fn projects(&self) -> Result<Vec<Project>, StoreError>;

    /// Writes every section of `data` in display order: personal info, social
    /// links, experience, education, certifications, skills, projects. All or
    /// nothing.
    async fn insert_seed(&self, data: &ResumeData) -> Result<SeedCounts, StoreError>;
}

pub async fn skills_by_category(store: &dyn ResumeStore) -> Result<SkillsByCategory, StoreError> {
    Ok(SkillsByCategory::group(store.skills().await?))
}

/// Assembles the full aggregate. `None` when no personal info row exists yet.
pub async fn load_resume(store: &dyn ResumeStore) -> Result<Option<ResumeData>, StoreError> {
    let Some(personal_info) = store.personal_info().await? else {
        return Ok(None);
    };

    Ok(Some(ResumeData {
        personal_info,
        social_links: store.social_links().await?,
        experience: store.experience().await?,
        education: store.education().await?,
        certifications: store.certifications().await?,
        skills: skills_by_category(store).await?,
        projects: store.projects().await?,
    }))
}
