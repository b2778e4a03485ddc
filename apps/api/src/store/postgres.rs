use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::resume::{
    Certification, Education, Experience, PersonalInfo, Project, ResumeData, Skill, SocialLink,
};
use crate::store::{ResumeStore, SeedCounts, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS personal_info (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        title TEXT NOT NULL,
        bio TEXT NOT NULL,
        location TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        linkedin TEXT NOT NULL,
        expertise TEXT[] NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS social_links (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        url TEXT NOT NULL,
        icon TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS experience (
        id SERIAL PRIMARY KEY,
        company TEXT NOT NULL,
        title TEXT NOT NULL,
        period TEXT NOT NULL,
        description TEXT NOT NULL,
        achievements TEXT[] NOT NULL,
        technologies TEXT[] NOT NULL,
        "order" INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS education (
        id SERIAL PRIMARY KEY,
        institution TEXT NOT NULL,
        degree TEXT NOT NULL,
        period TEXT NOT NULL,
        description TEXT NOT NULL,
        subjects TEXT[] NOT NULL,
        "order" INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS certifications (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        issuer TEXT NOT NULL,
        year TEXT NOT NULL,
        "order" INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS skills (
        id SERIAL PRIMARY KEY,
        category TEXT NOT NULL
            CHECK (category IN ('programmingLanguages', 'databases', 'cloudDevOps', 'architecture')),
        name TEXT NOT NULL,
        level TEXT NOT NULL,
        percentage INTEGER NOT NULL CHECK (percentage BETWEEN 0 AND 100),
        "order" INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        technologies TEXT[] NOT NULL,
        url TEXT NOT NULL,
        "order" INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }

    /// Creates the résumé tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        info!("Resume schema ready");
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, StoreError> {
        Ok(
            sqlx::query_as::<_, PersonalInfo>("SELECT * FROM personal_info ORDER BY id LIMIT 1")
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn social_links(&self) -> Result<Vec<SocialLink>, StoreError> {
        Ok(
            sqlx::query_as::<_, SocialLink>("SELECT * FROM social_links ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn experience(&self) -> Result<Vec<Experience>, StoreError> {
        Ok(
            sqlx::query_as::<_, Experience>(r#"SELECT * FROM experience ORDER BY "order", id"#)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn education(&self) -> Result<Vec<Education>, StoreError> {
        Ok(
            sqlx::query_as::<_, Education>(r#"SELECT * FROM education ORDER BY "order", id"#)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn certifications(&self) -> Result<Vec<Certification>, StoreError> {
        Ok(sqlx::query_as::<_, Certification>(
            r#"SELECT * FROM certifications ORDER BY "order", id"#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn skills(&self) -> Result<Vec<Skill>, StoreError> {
        Ok(
            sqlx::query_as::<_, Skill>(r#"SELECT * FROM skills ORDER BY "order", id"#)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(
            sqlx::query_as::<_, Project>(r#"SELECT * FROM projects ORDER BY "order", id"#)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn insert_seed(&self, data: &ResumeData) -> Result<SeedCounts, StoreError> {
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let info = &data.personal_info;
        sqlx::query(
            r#"
            INSERT INTO personal_info
                (name, title, bio, location, email, phone, linkedin, expertise)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&info.name)
        .bind(&info.title)
        .bind(&info.bio)
        .bind(&info.location)
        .bind(&info.email)
        .bind(&info.phone)
        .bind(&info.linkedin)
        .bind(&info.expertise)
        .execute(&mut *tx)
        .await?;

        for link in &data.social_links {
            sqlx::query("INSERT INTO social_links (name, url, icon) VALUES ($1, $2, $3)")
                .bind(&link.name)
                .bind(&link.url)
                .bind(&link.icon)
                .execute(&mut *tx)
                .await?;
        }

        for exp in &data.experience {
            sqlx::query(
                r#"
                INSERT INTO experience
                    (company, title, period, description, achievements, technologies, "order")
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&exp.company)
            .bind(&exp.title)
            .bind(&exp.period)
            .bind(&exp.description)
            .bind(&exp.achievements)
            .bind(&exp.technologies)
            .bind(exp.order)
            .execute(&mut *tx)
            .await?;
        }

        for edu in &data.education {
            sqlx::query(
                r#"
                INSERT INTO education
                    (institution, degree, period, description, subjects, "order")
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&edu.institution)
            .bind(&edu.degree)
            .bind(&edu.period)
            .bind(&edu.description)
            .bind(&edu.subjects)
            .bind(edu.order)
            .execute(&mut *tx)
            .await?;
        }

        for cert in &data.certifications {
            sqlx::query(
                r#"INSERT INTO certifications (name, issuer, year, "order") VALUES ($1, $2, $3, $4)"#,
            )
            .bind(&cert.name)
            .bind(&cert.issuer)
            .bind(&cert.year)
            .bind(cert.order)
            .execute(&mut *tx)
            .await?;
        }

        for (category, skills) in data.skills.iter() {
            for skill in skills {
                sqlx::query(
                    r#"
                    INSERT INTO skills (category, name, level, percentage, "order")
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(category.as_str())
                .bind(&skill.name)
                .bind(&skill.level)
                .bind(skill.percentage)
                .bind(skill.order)
                .execute(&mut *tx)
                .await?;
            }
        }

        for project in &data.projects {
            sqlx::query(
                r#"
                INSERT INTO projects (name, description, technologies, url, "order")
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.technologies)
            .bind(&project.url)
            .bind(project.order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(SeedCounts::of(data))
    }
}

/// These run against a live Postgres: `DATABASE_URL=... cargo test -- --ignored`.
/// Each test works in its own schema so they can run in parallel.
#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sqlx::postgres::PgConnectOptions;

    use super::*;
    use crate::dataset::resume_dataset;
    use crate::models::resume::SkillCategory;
    use crate::seed::{seed, SeedOutcome};

    static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

    async fn isolated_store() -> PgResumeStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let schema = format!(
            "folio_test_{}_{}",
            std::process::id(),
            SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgResumeStore::connect(&url).await.unwrap();
        sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
            .execute(&admin.pool)
            .await
            .unwrap();
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin.pool)
            .await
            .unwrap();

        let options = PgConnectOptions::from_str(&url)
            .unwrap()
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .unwrap();

        let store = PgResumeStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_seeded_sections_read_back_in_order() {
        let store = isolated_store().await;
        let mut data = resume_dataset();
        data.experience.reverse();
        data.projects.swap(0, 3);

        store.insert_seed(&data).await.unwrap();

        let exp: Vec<i32> = store.experience().await.unwrap().iter().map(|e| e.order).collect();
        assert_eq!(exp, vec![1, 2, 3]);
        let projects: Vec<i32> = store.projects().await.unwrap().iter().map(|p| p.order).collect();
        assert_eq!(projects, vec![1, 2, 3, 4]);

        let links = store.social_links().await.unwrap();
        let ids: Vec<i32> = links.iter().map(|l| l.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(links.len(), data.social_links.len());

        let info = store.personal_info().await.unwrap().unwrap();
        assert_eq!(info.name, data.personal_info.name);
        assert_eq!(info.expertise, data.personal_info.expertise);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_skill_categories_decode_from_stored_text() {
        let store = isolated_store().await;
        store.insert_seed(&resume_dataset()).await.unwrap();

        let grouped = crate::store::skills_by_category(&store).await.unwrap();
        let expected = resume_dataset().skills;
        for category in SkillCategory::ALL {
            let names: Vec<&str> = grouped.get(category).iter().map(|s| s.name.as_str()).collect();
            let want: Vec<&str> = expected.get(category).iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, want, "{}", category.as_str());
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_seeding_twice_writes_once() {
        let store = isolated_store().await;
        let data = resume_dataset();

        assert!(matches!(
            seed(&store, &data).await.unwrap(),
            SeedOutcome::Seeded(_)
        ));
        assert!(matches!(
            seed(&store, &data).await.unwrap(),
            SeedOutcome::AlreadySeeded
        ));

        let (personal_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM personal_info")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(personal_rows, 1);
        assert_eq!(store.projects().await.unwrap().len(), data.projects.len());
        assert_eq!(store.skills().await.unwrap().len(), data.skills.len());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_failed_insert_rolls_back_whole_seed() {
        let store = isolated_store().await;
        let mut data = resume_dataset();
        // Rejected by the skills CHECK constraint, after earlier sections were written.
        data.skills.architecture[0].percentage = 101;

        assert!(matches!(
            store.insert_seed(&data).await,
            Err(StoreError::Database(_))
        ));
        assert!(store.personal_info().await.unwrap().is_none());
        assert!(store.experience().await.unwrap().is_empty());
        assert!(store.certifications().await.unwrap().is_empty());
    }
}
