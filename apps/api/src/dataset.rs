//! The bundled résumé. Seeds an empty store at boot and serves as the page's
//! fallback when the live aggregate cannot be fetched.

use chrono::{DateTime, Utc};

use crate::models::resume::{
    Certification, Education, Experience, PersonalInfo, Project, ResumeData, Skill,
    SkillCategory, SkillsByCategory, SocialLink,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Bundled rows carry a fixed timestamp so two copies always compare equal.
fn bundled_at() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn link(id: i32, name: &str, url: &str, icon: &str) -> SocialLink {
    SocialLink {
        id,
        name: name.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
        created_at: bundled_at(),
    }
}

fn skill(
    id: i32,
    category: SkillCategory,
    name: &str,
    level: &str,
    percentage: i32,
    order: i32,
) -> Skill {
    Skill {
        id,
        category,
        name: name.to_string(),
        level: level.to_string(),
        percentage,
        order,
        created_at: bundled_at(),
    }
}

fn certification(id: i32, name: &str, issuer: &str, year: &str) -> Certification {
    Certification {
        id,
        name: name.to_string(),
        issuer: issuer.to_string(),
        year: year.to_string(),
        order: id,
        created_at: bundled_at(),
    }
}

fn project(id: i32, name: &str, description: &str, technologies: &[&str]) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: description.to_string(),
        technologies: strings(technologies),
        url: "#".to_string(),
        order: id,
        created_at: bundled_at(),
    }
}

/// Builds the bundled dataset. Callers own the returned value; nothing here is
/// shared or mutable.
pub fn resume_dataset() -> ResumeData {
    use SkillCategory::*;

    let personal_info = PersonalInfo {
        id: 1,
        name: "Alex Chen".to_string(),
        title: "Senior Software Architect".to_string(),
        bio: "A passionate software architect with 12+ years of experience building complex, \
              scalable systems. Specialized in cloud architecture, microservices, and leading \
              engineering teams to deliver high-performance solutions."
            .to_string(),
        location: "San Francisco, CA".to_string(),
        email: "alex.chen@devarchitect.com".to_string(),
        phone: "(415) 555-7890".to_string(),
        linkedin: "https://linkedin.com/in/alexchen".to_string(),
        expertise: strings(&[
            "Cloud Architecture",
            "Distributed Systems",
            "API Design",
            "System Optimization",
            "Tech Leadership",
        ]),
        created_at: bundled_at(),
    };

    let social_links = vec![
        link(1, "GitHub", "https://github.com/alexchen", "github"),
        link(2, "LinkedIn", "https://linkedin.com/in/alexchen", "linkedin"),
        link(3, "Twitter", "https://twitter.com/alexchen", "twitter"),
        link(
            4,
            "Stack Overflow",
            "https://stackoverflow.com/users/alexchen",
            "stack-overflow",
        ),
    ];

    let experience = vec![
        Experience {
            id: 1,
            company: "TechScale Solutions".to_string(),
            title: "Principal Software Architect".to_string(),
            period: "2019 - Present".to_string(),
            description: "Leading architecture initiatives for cloud-native applications \
                          serving millions of users. Driving technical vision across multiple \
                          product teams."
                .to_string(),
            achievements: strings(&[
                "Redesigned the core platform using microservices, increasing scalability by 500%",
                "Implemented a CI/CD pipeline that reduced deployment time from days to minutes",
                "Led migration to Kubernetes with zero downtime, saving $1.2M in operational costs",
            ]),
            technologies: strings(&["Kubernetes", "Go", "gRPC", "AWS", "Terraform"]),
            order: 1,
            created_at: bundled_at(),
        },
        Experience {
            id: 2,
            company: "DataSphere Inc.".to_string(),
            title: "Lead Backend Engineer".to_string(),
            period: "2016 - 2019".to_string(),
            description: "Architected high-throughput data processing systems handling \
                          petabytes of data for financial services clients."
                .to_string(),
            achievements: strings(&[
                "Built real-time data processing pipeline handling 50,000 events/second",
                "Implemented distributed tracing reducing MTTR from hours to minutes",
                "Developed automated failover system achieving 99.999% uptime",
            ]),
            technologies: strings(&["Rust", "Kafka", "ClickHouse", "Redis", "Docker"]),
            order: 2,
            created_at: bundled_at(),
        },
        Experience {
            id: 3,
            company: "CodeVerse".to_string(),
            title: "Senior Software Engineer".to_string(),
            period: "2013 - 2016".to_string(),
            description: "Developed distributed systems for mission-critical healthcare \
                          applications with strict compliance requirements."
                .to_string(),
            achievements: strings(&[
                "Created HIPAA-compliant data storage system for patient records",
                "Built fault-tolerant message broker for inter-service communication",
                "Implemented performance optimizations reducing API response time by 70%",
            ]),
            technologies: strings(&["Scala", "Akka", "PostgreSQL", "RabbitMQ", "ElasticSearch"]),
            order: 3,
            created_at: bundled_at(),
        },
    ];

    let education = vec![
        Education {
            id: 1,
            institution: "Stanford University".to_string(),
            degree: "M.S. Computer Science".to_string(),
            period: "2010 - 2012".to_string(),
            description: "Specialized in Distributed Systems and Machine Learning with research \
                          focus on consensus algorithms."
                .to_string(),
            subjects: strings(&[
                "Distributed Systems",
                "Machine Learning",
                "Advanced Algorithms",
            ]),
            order: 1,
            created_at: bundled_at(),
        },
        Education {
            id: 2,
            institution: "UC Berkeley".to_string(),
            degree: "B.S. Computer Science".to_string(),
            period: "2006 - 2010".to_string(),
            description: "Graduated summa cum laude with focus on systems programming and \
                          parallel computing."
                .to_string(),
            subjects: strings(&[
                "Systems Programming",
                "Operating Systems",
                "Parallel Computing",
            ]),
            order: 2,
            created_at: bundled_at(),
        },
    ];

    let certifications = vec![
        certification(1, "AWS Solutions Architect Professional", "Amazon Web Services", "2022"),
        certification(
            2,
            "Certified Kubernetes Administrator (CKA)",
            "Cloud Native Computing Foundation",
            "2021",
        ),
        certification(3, "Google Professional Cloud Architect", "Google Cloud", "2020"),
        certification(4, "Hashicorp Terraform Certified", "HashiCorp", "2019"),
    ];

    let skills = SkillsByCategory::group(vec![
        skill(1, ProgrammingLanguages, "Rust", "Expert", 95, 1),
        skill(2, ProgrammingLanguages, "Go", "Expert", 90, 2),
        skill(3, ProgrammingLanguages, "Scala", "Advanced", 85, 3),
        skill(4, ProgrammingLanguages, "TypeScript", "Advanced", 80, 4),
        skill(5, ProgrammingLanguages, "Python", "Advanced", 80, 5),
        skill(6, Databases, "PostgreSQL", "Expert", 90, 1),
        skill(7, Databases, "ClickHouse", "Expert", 90, 2),
        skill(8, Databases, "MongoDB", "Advanced", 85, 3),
        skill(9, Databases, "Redis", "Expert", 90, 4),
        skill(10, CloudDevOps, "Kubernetes", "Expert", 95, 1),
        skill(11, CloudDevOps, "AWS", "Expert", 90, 2),
        skill(12, CloudDevOps, "Terraform", "Expert", 90, 3),
        skill(13, CloudDevOps, "CI/CD", "Advanced", 85, 4),
        skill(14, CloudDevOps, "Prometheus/Grafana", "Advanced", 85, 5),
        skill(15, Architecture, "Microservices", "Expert", 95, 1),
        skill(16, Architecture, "Event-Driven Architecture", "Expert", 90, 2),
        skill(17, Architecture, "Distributed Systems", "Expert", 95, 3),
        skill(18, Architecture, "API Design", "Advanced", 85, 4),
    ]);

    let projects = vec![
        project(
            1,
            "Distributed Streaming Platform",
            "Architected a high-throughput streaming data processing platform handling 100K+ \
             events/second with sub-100ms latency. Implemented fault tolerance and automatic \
             recovery mechanisms.",
            &["Rust", "Kafka", "ClickHouse", "Kubernetes"],
        ),
        project(
            2,
            "Multi-Region Kubernetes Platform",
            "Designed multi-region Kubernetes infrastructure with automated failover \
             capabilities. Implemented service mesh for advanced traffic routing and circuit \
             breaking.",
            &["Kubernetes", "Istio", "Terraform", "Go"],
        ),
        project(
            3,
            "Financial Data Analytics Engine",
            "Built real-time analytics engine for financial data processing with complex \
             aggregations and compliance requirements. Optimized query performance achieving \
             50x improvement.",
            &["Scala", "Spark", "Cassandra", "Grafana"],
        ),
        project(
            4,
            "Secure Healthcare API Gateway",
            "Developed HIPAA-compliant API gateway with advanced authentication, authorization, \
             and audit logging capabilities. Implemented zero-trust architecture with mutual TLS.",
            &["Go", "Envoy", "OAuth2", "PostgreSQL"],
        ),
    ];

    ResumeData {
        personal_info,
        social_links,
        experience,
        education,
        certifications,
        skills,
        projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_dataset_is_valid() {
        assert!(resume_dataset().validate().is_ok());
    }

    #[test]
    fn test_bundled_dataset_counts() {
        let data = resume_dataset();
        assert_eq!(data.social_links.len(), 4);
        assert_eq!(data.experience.len(), 3);
        assert_eq!(data.education.len(), 2);
        assert_eq!(data.certifications.len(), 4);
        assert_eq!(data.skills.len(), 18);
        assert_eq!(data.projects.len(), 4);
    }

    #[test]
    fn test_two_copies_compare_equal() {
        assert_eq!(resume_dataset(), resume_dataset());
    }

    #[test]
    fn test_every_category_has_skills() {
        let data = resume_dataset();
        for (category, skills) in data.skills.iter() {
            assert!(!skills.is_empty(), "{} is empty", category.as_str());
        }
    }
}
