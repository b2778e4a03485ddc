//! One-time population of the résumé store at boot.

use thiserror::Error;
use tracing::info;

use crate::models::resume::{DataError, ResumeData};
use crate::store::{ResumeStore, SeedCounts, StoreError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Seed dataset is invalid: {0}")]
    InvalidDataset(#[from] DataError),

    #[error("Failed to write seed data: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded(SeedCounts),
}

/// Writes `dataset` into an empty store. A present personal info row means the
/// store is already seeded and nothing is written.
pub async fn seed(store: &dyn ResumeStore, dataset: &ResumeData) -> Result<SeedOutcome, SeedError> {
    if store.personal_info().await?.is_some() {
        info!("Resume data already exists, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    dataset.validate()?;
    let counts = store.insert_seed(dataset).await?;

    info!(
        social_links = counts.social_links,
        experience = counts.experience,
        education = counts.education,
        certifications = counts.certifications,
        skills = counts.skills,
        projects = counts.projects,
        "Seeded resume data"
    );
    Ok(SeedOutcome::Seeded(counts))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::dataset::resume_dataset;
    use crate::models::resume::{
        Certification, Education, Experience, PersonalInfo, Project, Skill, SocialLink,
    };
    use crate::store::{load_resume, MemoryResumeStore};

    #[tokio::test]
    async fn test_seed_populates_empty_store() {
        let store = MemoryResumeStore::new();
        let dataset = resume_dataset();

        let outcome = seed(&store, &dataset).await.unwrap();
        assert_eq!(outcome, SeedOutcome::Seeded(SeedCounts::of(&dataset)));

        let loaded = load_resume(&store).await.unwrap().unwrap();
        assert_eq!(loaded.personal_info.name, dataset.personal_info.name);
        assert_eq!(loaded.projects.len(), dataset.projects.len());
    }

    #[tokio::test]
    async fn test_seed_twice_does_not_duplicate() {
        let store = MemoryResumeStore::new();
        let dataset = resume_dataset();

        seed(&store, &dataset).await.unwrap();
        let second = seed(&store, &dataset).await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadySeeded);

        let loaded = load_resume(&store).await.unwrap().unwrap();
        assert_eq!(loaded.personal_info.id, 1);
        assert_eq!(loaded.social_links.len(), dataset.social_links.len());
        assert_eq!(loaded.experience.len(), dataset.experience.len());
        assert_eq!(loaded.education.len(), dataset.education.len());
        assert_eq!(loaded.certifications.len(), dataset.certifications.len());
        assert_eq!(loaded.skills.len(), dataset.skills.len());
        assert_eq!(loaded.projects.len(), dataset.projects.len());
    }

    #[tokio::test]
    async fn test_invalid_dataset_writes_nothing() {
        let store = MemoryResumeStore::new();
        let mut dataset = resume_dataset();
        dataset.projects[1].order = dataset.projects[0].order;

        let err = seed(&store, &dataset).await.unwrap_err();
        assert!(matches!(err, SeedError::InvalidDataset(_)));
        assert!(store.personal_info().await.unwrap().is_none());
    }

    /// Empty store whose writes always fail.
    struct ReadOnlyStore;

    #[async_trait]
    impl ResumeStore for ReadOnlyStore {
        async fn personal_info(&self) -> Result<Option<PersonalInfo>, StoreError> {
            Ok(None)
        }
        async fn social_links(&self) -> Result<Vec<SocialLink>, StoreError> {
            Ok(vec![])
        }
        async fn experience(&self) -> Result<Vec<Experience>, StoreError> {
            Ok(vec![])
        }
        async fn education(&self) -> Result<Vec<Education>, StoreError> {
            Ok(vec![])
        }
        async fn certifications(&self) -> Result<Vec<Certification>, StoreError> {
            Ok(vec![])
        }
        async fn skills(&self) -> Result<Vec<Skill>, StoreError> {
            Ok(vec![])
        }
        async fn projects(&self) -> Result<Vec<Project>, StoreError> {
            Ok(vec![])
        }
        async fn insert_seed(&self, _data: &ResumeData) -> Result<SeedCounts, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates_to_caller() {
        let err = seed(&ReadOnlyStore, &resume_dataset()).await.unwrap_err();
        assert!(matches!(err, SeedError::Store(StoreError::Database(_))));
    }
}
