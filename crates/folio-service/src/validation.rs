use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{BlogPost, ContentRecord, Project};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Record does not match {schema} shape: {source}")]
    Decode {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Field `{0}` cannot be empty")]
    EmptyField(&'static str),
    #[error("Invalid date in `{field}`: {value}")]
    InvalidDate { field: &'static str, value: String },
    #[error("Malformed URL in `{field}`: {value}")]
    MalformedUrl { field: &'static str, value: String },
    #[error("Unsupported URL scheme in `{field}`: {scheme}")]
    UnsupportedScheme { field: &'static str, scheme: String },
}

/// Declarative description of one resource's records.
///
/// `decode` is the structural step and `check` the semantic one. Callers that
/// tolerate imperfect content run them separately and keep records that
/// decode but fail `check`.
pub trait Schema: Send + Sync + 'static {
    type Record: ContentRecord;

    fn name(&self) -> &'static str;

    fn check(&self, record: &Self::Record) -> Result<(), ValidationError>;

    fn decode(&self, raw: Value) -> Result<Self::Record, ValidationError> {
        serde_json::from_value(raw).map_err(|source| ValidationError::Decode {
            schema: self.name(),
            source,
        })
    }

    fn parse(&self, raw: Value) -> Result<Self::Record, ValidationError> {
        let record = self.decode(raw)?;
        self.check(&record)?;
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlogPostSchema;

impl Schema for BlogPostSchema {
    type Record = BlogPost;

    fn name(&self) -> &'static str {
        "blog post"
    }

    fn check(&self, post: &BlogPost) -> Result<(), ValidationError> {
        require("id", &post.id)?;
        require("title", &post.title)?;
        if let Some(date) = &post.date {
            validate_date("date", date)?;
        }
        if let Some(image) = &post.image {
            validate_image("image", image)?;
        }
        for tag in &post.tags {
            require("tags", tag)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectSchema;

impl Schema for ProjectSchema {
    type Record = Project;

    fn name(&self) -> &'static str {
        "project"
    }

    fn check(&self, project: &Project) -> Result<(), ValidationError> {
        require("id", &project.id)?;
        require("title", &project.title)?;
        if let Some(image) = &project.image {
            validate_image("image", image)?;
        }
        for technology in &project.technologies {
            require("technologies", technology)?;
        }
        if let Some(live) = &project.links.live {
            validate_link("links.live", live)?;
        }
        if let Some(repository) = &project.links.repository {
            validate_link("links.repository", repository)?;
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn validate_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })?;
    Ok(())
}

/// Absolute http(s) links with a host.
pub fn validate_link(field: &'static str, value: &str) -> Result<Url, ValidationError> {
    let malformed = || ValidationError::MalformedUrl {
        field,
        value: value.to_string(),
    };

    let url = Url::parse(value).map_err(|_| malformed())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ValidationError::UnsupportedScheme {
                field,
                scheme: scheme.to_string(),
            });
        }
    }

    if url.host_str().is_some_and(|host| !host.is_empty()) {
        Ok(url)
    } else {
        Err(malformed())
    }
}

/// Images may also be site-relative asset paths such as `/images/team.jpg`.
fn validate_image(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') && !value.starts_with("//") {
        return Ok(());
    }
    validate_link(field, value).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectLinks;
    use serde_json::json;

    fn post() -> BlogPost {
        BlogPost {
            id: "launch".to_string(),
            title: "We launched".to_string(),
            excerpt: "Short".to_string(),
            content: "Long".to_string(),
            image: Some("/images/blog/launch.jpg".to_string()),
            category: None,
            date: Some("2024-03-15".to_string()),
            author: Some("Dana".to_string()),
            tags: vec!["news".to_string()],
        }
    }

    fn project() -> Project {
        Project {
            id: "atlas".to_string(),
            title: "Atlas".to_string(),
            description: "Mapping".to_string(),
            content: None,
            image: Some("https://cdn.example.com/atlas.png".to_string()),
            category: None,
            technologies: vec!["Rust".to_string()],
            links: ProjectLinks {
                live: Some("https://atlas.example.com".to_string()),
                repository: None,
            },
        }
    }

    #[test]
    fn test_valid_blog_post_passes() {
        assert!(BlogPostSchema.check(&post()).is_ok());
    }

    #[test]
    fn test_blank_title_returns_empty_field_error() {
        let mut post = post();
        post.title = "   ".to_string();
        assert!(matches!(
            BlogPostSchema.check(&post),
            Err(ValidationError::EmptyField("title"))
        ));
    }

    #[test]
    fn test_bad_date_returns_invalid_date_error() {
        let mut post = post();
        post.date = Some("15/03/2024".to_string());
        assert!(matches!(
            BlogPostSchema.check(&post),
            Err(ValidationError::InvalidDate { field: "date", .. })
        ));
    }

    #[test]
    fn test_protocol_relative_image_is_not_site_relative() {
        let mut post = post();
        post.image = Some("//evil.example.com/x.png".to_string());
        assert!(matches!(
            BlogPostSchema.check(&post),
            Err(ValidationError::MalformedUrl { field: "image", .. })
        ));
    }

    #[test]
    fn test_valid_project_passes() {
        assert!(ProjectSchema.check(&project()).is_ok());
    }

    #[test]
    fn test_javascript_link_returns_unsupported_scheme_error() {
        let mut project = project();
        project.links.repository = Some("javascript:alert('xss')".to_string());
        assert!(matches!(
            ProjectSchema.check(&project),
            Err(ValidationError::UnsupportedScheme {
                field: "links.repository",
                ..
            })
        ));
    }

    #[test]
    fn test_link_without_host_is_malformed() {
        assert!(matches!(
            validate_link("links.live", "https://"),
            Err(ValidationError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_decode_reports_schema_name() {
        let err = ProjectSchema.decode(json!({"title": "No id"})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Decode {
                schema: "project",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_text_fields_decode_and_fail_check() {
        let post = BlogPostSchema
            .decode(json!({"id": "bare", "content": "Body"}))
            .unwrap();
        assert!(post.excerpt.is_empty());
        assert!(matches!(
            BlogPostSchema.check(&post),
            Err(ValidationError::EmptyField("title"))
        ));
    }

    #[test]
    fn test_non_string_id_does_not_decode() {
        assert!(matches!(
            BlogPostSchema.decode(json!({"id": 7, "title": "T"})),
            Err(ValidationError::Decode { .. })
        ));
    }

    #[test]
    fn test_parse_runs_both_steps() {
        let raw = json!({
            "id": "x",
            "title": "",
            "description": "D"
        });
        assert!(matches!(
            ProjectSchema.parse(raw),
            Err(ValidationError::EmptyField("title"))
        ));
    }
}
