//! URL-safe slug checks.
//!
//! Slugs become directory names under the site's base path, so they are held
//! to a strict form: ASCII letters, digits and single interior dashes.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugProblem {
    Empty,
    InvalidChar(char),
    EdgeDash,
    DoubleDash,
}

impl fmt::Display for SlugProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugProblem::Empty => write!(f, "slug is empty"),
            SlugProblem::InvalidChar(c) => write!(f, "slug contains {c:?}"),
            SlugProblem::EdgeDash => write!(f, "slug starts or ends with '-'"),
            SlugProblem::DoubleDash => write!(f, "slug contains '--'"),
        }
    }
}

/// Check one slug, reporting the first problem found.
pub fn check_slug(slug: &str) -> Result<(), SlugProblem> {
    if slug.is_empty() {
        return Err(SlugProblem::Empty);
    }
    if let Some(c) = slug.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(SlugProblem::InvalidChar(c));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugProblem::EdgeDash);
    }
    if slug.contains("--") {
        return Err(SlugProblem::DoubleDash);
    }
    Ok(())
}

/// A problem with one slug in a set of projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugIssue {
    Invalid { slug: String, problem: SlugProblem },
    /// The slug is used by more than one project (ids in source order).
    Duplicate { slug: String, ids: Vec<String> },
}

impl fmt::Display for SlugIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugIssue::Invalid { slug, problem } => write!(f, "{slug:?}: {problem}"),
            SlugIssue::Duplicate { slug, ids } => {
                write!(f, "{slug:?}: used by {}", ids.join(", "))
            }
        }
    }
}

/// Validate a set of `(id, slug)` pairs: every slug well-formed and unique.
///
/// Issues come back in first-appearance order.
pub fn validate_slugs<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<SlugIssue> {
    let mut issues = Vec::new();
    let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (id, slug) in entries {
        if let Err(problem) = check_slug(slug) {
            issues.push(SlugIssue::Invalid {
                slug: slug.to_string(),
                problem,
            });
        }
        let ids = owners.entry(slug).or_default();
        if ids.is_empty() {
            order.push(slug);
        }
        ids.push(id);
    }

    for slug in order {
        let ids = &owners[slug];
        if ids.len() > 1 {
            issues.push(SlugIssue::Duplicate {
                slug: slug.to_string(),
                ids: ids.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    issues
}
