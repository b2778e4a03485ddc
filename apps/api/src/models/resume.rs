use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Violations of the aggregate's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("duplicate order {order} in {section}")]
    DuplicateOrder { section: String, order: i32 },

    #[error("skill '{name}' has percentage {percentage}, expected 0..=100")]
    PercentageOutOfRange { name: String, percentage: i32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown skill category '{0}'")]
pub struct UnknownCategory(pub String);

/// The four fixed skill groupings. Stored as their camelCase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    ProgrammingLanguages,
    Databases,
    CloudDevOps,
    Architecture,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Databases,
        SkillCategory::CloudDevOps,
        SkillCategory::Architecture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "programmingLanguages",
            SkillCategory::Databases => "databases",
            SkillCategory::CloudDevOps => "cloudDevOps",
            SkillCategory::Architecture => "architecture",
        }
    }
}

impl TryFrom<String> for SkillCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or(UnknownCategory(value))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PersonalInfo {
    pub id: i32,
    pub name: String,
    pub title: String,
    /// Free text; blank lines separate paragraphs.
    pub bio: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub expertise: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PersonalInfo {
    pub fn bio_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.bio
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SocialLink {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub period: String,
    pub description: String,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: i32,
    pub institution: String,
    pub degree: String,
    pub period: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Certification {
    pub id: i32,
    pub name: String,
    pub issuer: String,
    pub year: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: i32,
    #[sqlx(try_from = "String")]
    pub category: SkillCategory,
    pub name: String,
    pub level: String,
    pub percentage: i32,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Rows that carry an explicit display position.
pub trait Ordered {
    fn order(&self) -> i32;
}

macro_rules! impl_ordered {
    ($($ty:ty),*) => {
        $(impl Ordered for $ty {
            fn order(&self) -> i32 {
                self.order
            }
        })*
    };
}

impl_ordered!(Experience, Education, Certification, Skill, Project);

/// Stable ascending sort on `order`.
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order());
}

fn check_unique_order<T: Ordered>(section: &str, items: &[T]) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.order()) {
            return Err(DataError::DuplicateOrder {
                section: section.to_string(),
                order: item.order(),
            });
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

/// Skills split by category. Every key is always present, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsByCategory {
    #[serde(default)]
    pub programming_languages: Vec<Skill>,
    #[serde(default)]
    pub databases: Vec<Skill>,
    #[serde(default)]
    pub cloud_dev_ops: Vec<Skill>,
    #[serde(default)]
    pub architecture: Vec<Skill>,
}

impl SkillsByCategory {
    /// Buckets skills by their own category, keeping the input sequence.
    pub fn group(skills: Vec<Skill>) -> Self {
        let mut grouped = SkillsByCategory::default();
        for skill in skills {
            grouped.get_mut(skill.category).push(skill);
        }
        grouped
    }

    pub fn get(&self, category: SkillCategory) -> &[Skill] {
        match category {
            SkillCategory::ProgrammingLanguages => &self.programming_languages,
            SkillCategory::Databases => &self.databases,
            SkillCategory::CloudDevOps => &self.cloud_dev_ops,
            SkillCategory::Architecture => &self.architecture,
        }
    }

    fn get_mut(&mut self, category: SkillCategory) -> &mut Vec<Skill> {
        match category {
            SkillCategory::ProgrammingLanguages => &mut self.programming_languages,
            SkillCategory::Databases => &mut self.databases,
            SkillCategory::CloudDevOps => &mut self.cloud_dev_ops,
            SkillCategory::Architecture => &mut self.architecture,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, &[Skill])> {
        SkillCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, skills)| skills.len()).sum()
    }
}

/// Personal info, links, experience, education, certifications, skills and
/// projects served as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    // An absent section decodes as empty rather than failing the aggregate.
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub skills: SkillsByCategory,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ResumeData {
    /// Returns the aggregate with every ordered list in display sequence.
    pub fn sorted(mut self) -> Self {
        sort_by_order(&mut self.experience);
        sort_by_order(&mut self.education);
        sort_by_order(&mut self.certifications);
        for category in SkillCategory::ALL {
            sort_by_order(self.skills.get_mut(category));
        }
        sort_by_order(&mut self.projects);
        self
    }

    pub fn validate(&self) -> Result<(), DataError> {
        check_unique_order("experience", &self.experience)?;
        check_unique_order("education", &self.education)?;
        check_unique_order("certifications", &self.certifications)?;
        check_unique_order("projects", &self.projects)?;
        for (category, skills) in self.skills.iter() {
            check_unique_order(category.as_str(), skills)?;
            if let Some(bad) = skills.iter().find(|s| !(0..=100).contains(&s.percentage)) {
                return Err(DataError::PercentageOutOfRange {
                    name: bad.name.clone(),
                    percentage: bad.percentage,
                });
            }
        }
        Ok(())
    }
}
