use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::resume::{
    sort_by_order, Certification, Education, Experience, Ordered, PersonalInfo, Project,
    ResumeData, Skill, SocialLink,
};
use crate::store::{ResumeStore, SeedCounts, StoreError};

#[derive(Default)]
struct Tables {
    personal_info: Vec<PersonalInfo>,
    social_links: Vec<SocialLink>,
    experience: Vec<Experience>,
    education: Vec<Education>,
    certifications: Vec<Certification>,
    skills: Vec<Skill>,
    projects: Vec<Project>,
}

/// Per-table serial ids, starting at 1 like Postgres `SERIAL`.
fn next_id<T>(rows: &[T]) -> i32 {
    rows.len() as i32 + 1
}

/// In-process store with the same ordering rules as `PgResumeStore`.
#[derive(Default)]
pub struct MemoryResumeStore {
    tables: RwLock<Tables>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables))
    }

    fn ordered<T: Clone + Ordered>(rows: &[T]) -> Vec<T> {
        let mut rows = rows.to_vec();
        sort_by_order(&mut rows);
        rows
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, StoreError> {
        self.read(|t| t.personal_info.first().cloned())
    }

    async fn social_links(&self) -> Result<Vec<SocialLink>, StoreError> {
        self.read(|t| t.social_links.clone())
    }

    async fn experience(&self) -> Result<Vec<Experience>, StoreError> {
        self.read(|t| Self::ordered(&t.experience))
    }

    async fn education(&self) -> Result<Vec<Education>, StoreError> {
        self.read(|t| Self::ordered(&t.education))
    }

    async fn certifications(&self) -> Result<Vec<Certification>, StoreError> {
        self.read(|t| Self::ordered(&t.certifications))
    }

    async fn skills(&self) -> Result<Vec<Skill>, StoreError> {
        self.read(|t| Self::ordered(&t.skills))
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        self.read(|t| Self::ordered(&t.projects))
    }

    async fn insert_seed(&self, data: &ResumeData) -> Result<SeedCounts, StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let now = Utc::now();

        let id = next_id(&tables.personal_info);
        tables.personal_info.push(PersonalInfo {
            id,
            created_at: now,
            ..data.personal_info.clone()
        });

        for link in &data.social_links {
            let id = next_id(&tables.social_links);
            tables.social_links.push(SocialLink {
                id,
                created_at: now,
                ..link.clone()
            });
        }
        for exp in &data.experience {
            let id = next_id(&tables.experience);
            tables.experience.push(Experience {
                id,
                created_at: now,
                ..exp.clone()
            });
        }
        for edu in &data.education {
            let id = next_id(&tables.education);
            tables.education.push(Education {
                id,
                created_at: now,
                ..edu.clone()
            });
        }
        for cert in &data.certifications {
            let id = next_id(&tables.certifications);
            tables.certifications.push(Certification {
                id,
                created_at: now,
                ..cert.clone()
            });
        }
        for (_, skills) in data.skills.iter() {
            for skill in skills {
                let id = next_id(&tables.skills);
                tables.skills.push(Skill {
                    id,
                    created_at: now,
                    ..skill.clone()
                });
            }
        }
        for project in &data.projects {
            let id = next_id(&tables.projects);
            tables.projects.push(Project {
                id,
                created_at: now,
                ..project.clone()
            });
        }

        Ok(SeedCounts::of(data))
    }
}
