//! Bundled content used by the mock backend and for seeding a store.
//! Records are listed newest first.

use crate::models::{BlogPost, Project, ProjectLinks};

fn post(
    id: &str,
    title: &str,
    excerpt: &str,
    category: &str,
    date: &str,
    author: &str,
    tags: &[&str],
) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: format!("{excerpt}\n\nRead on for the full story behind \"{title}\"."),
        image: Some(format!("/images/blog/{id}.jpg")),
        category: Some(category.to_string()),
        date: Some(date.to_string()),
        author: Some(author.to_string()),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

pub fn blog_posts() -> Vec<BlogPost> {
    vec![
        post(
            "scaling-design-systems",
            "Scaling a design system across five product teams",
            "What we learned keeping components consistent while teams shipped independently.",
            "Design",
            "2024-05-28",
            "Maya Okafor",
            &["design-systems", "process"],
        ),
        post(
            "edge-caching-in-practice",
            "Edge caching in practice",
            "A field report on moving a content-heavy site to the edge.",
            "Engineering",
            "2024-05-14",
            "Jonas Lindqvist",
            &["performance", "infrastructure"],
        ),
        post(
            "accessible-forms",
            "Accessible forms without the guesswork",
            "Patterns for labels, errors and focus management that hold up in audits.",
            "Design",
            "2024-04-30",
            "Priya Raman",
            &["accessibility", "forms"],
        ),
        post(
            "hiring-our-first-sre",
            "Hiring our first site reliability engineer",
            "Why we waited, what we looked for, and how the role has evolved.",
            "Company",
            "2024-04-12",
            "Sam Ortega",
            &["hiring", "culture"],
        ),
        post(
            "data-contracts",
            "Data contracts between product and analytics",
            "Treating event schemas as an API stopped our dashboards from drifting.",
            "Engineering",
            "2024-03-27",
            "Jonas Lindqvist",
            &["data", "analytics"],
        ),
        post(
            "client-onboarding-playbook",
            "Our client onboarding playbook",
            "The first two weeks of every engagement, step by step.",
            "Company",
            "2024-03-08",
            "Elena Petrova",
            &["consulting", "process"],
        ),
        post(
            "localization-lessons",
            "Localization lessons from shipping in nine languages",
            "Plurals, dates and right-to-left layouts all broke in surprising ways.",
            "Engineering",
            "2024-02-19",
            "Priya Raman",
            &["i18n"],
        ),
        post(
            "sustainable-web",
            "Building a lighter, more sustainable web",
            "Measuring page weight and the carbon cost of what we ship.",
            "Insights",
            "2024-02-02",
            "Maya Okafor",
            &["performance", "sustainability"],
        ),
        post(
            "year-in-review-2023",
            "2023 in review",
            "Twelve launches, three new offices and one very patient coffee machine.",
            "Company",
            "2024-01-10",
            "Sam Ortega",
            &["company"],
        ),
        post(
            "prototyping-with-real-data",
            "Prototyping with real data",
            "Why lorem ipsum hides the problems your users will find first.",
            "Design",
            "2023-12-05",
            "Elena Petrova",
            &["prototyping", "research"],
        ),
        post(
            "incident-reviews",
            "Blameless incident reviews that actually change things",
            "A template and the habits that make follow-ups stick.",
            "Engineering",
            "2023-11-16",
            "Jonas Lindqvist",
            &["reliability", "culture"],
        ),
        post(
            "welcome",
            "Welcome to our new blog",
            "Notes from the studio on design, engineering and running a small company.",
            "Company",
            "2023-10-02",
            "Sam Ortega",
            &["company"],
        ),
    ]
}

fn project(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    technologies: &[&str],
    live: Option<&str>,
) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        content: None,
        image: Some(format!("/images/projects/{id}.png")),
        category: Some(category.to_string()),
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
        links: ProjectLinks {
            live: live.map(str::to_string),
            repository: None,
        },
    }
}

pub fn projects() -> Vec<Project> {
    vec![
        project(
            "harbor-logistics-portal",
            "Harbor logistics portal",
            "Shipment tracking and customs paperwork for a regional freight operator.",
            "Web Platform",
            &["TypeScript", "PostgreSQL", "Kubernetes"],
            Some("https://portal.harbor-logistics.example"),
        ),
        project(
            "greenleaf-booking",
            "Greenleaf booking app",
            "Mobile booking for a chain of urban garden centres.",
            "Mobile",
            &["Kotlin", "Swift", "GraphQL"],
            None,
        ),
        project(
            "civic-data-dashboard",
            "Civic data dashboard",
            "Open budget data for a city council, published weekly.",
            "Data",
            &["Rust", "DuckDB", "D3"],
            Some("https://budget.civic.example"),
        ),
        project(
            "museum-audio-guide",
            "Museum audio guide",
            "Offline-first audio tours in six languages.",
            "Mobile",
            &["Flutter", "SQLite"],
            None,
        ),
        project(
            "clinic-scheduling",
            "Clinic scheduling system",
            "Appointment scheduling and reminders for a network of clinics.",
            "Web Platform",
            &["Go", "PostgreSQL", "Twilio"],
            None,
        ),
        project(
            "studio-website",
            "Studio website",
            "The site you are reading, content served from three interchangeable sources.",
            "Web Platform",
            &["Rust", "SQLite"],
            Some("https://folio.example"),
        ),
    ]
}
