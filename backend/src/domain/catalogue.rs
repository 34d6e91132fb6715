//! Catalog filtering.
//!
//! Every supplied predicate must hold (conjunction); absent predicates do not
//! constrain. Results keep the input order and are never re-sorted.

use serde::{Deserialize, Serialize};

use super::{ContentDomain, Price, Project, ProjectStatus};

/// Optional catalog predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    /// Exact tag that must appear in the project's tag list.
    pub tag: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
    /// Exact content domain.
    pub domain: Option<ContentDomain>,
    /// Exact listing status.
    pub status: Option<ProjectStatus>,
    /// Case-insensitive text matched against title, description and tags.
    pub search: Option<String>,
}

impl ProjectFilter {
    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `project` satisfies every supplied predicate.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::catalogue::ProjectFilter;
    ///
    /// let filter = ProjectFilter {
    ///     tag: Some("React".into()),
    ///     ..ProjectFilter::default()
    /// };
    /// assert!(!filter.is_empty());
    /// ```
    pub fn matches(&self, project: &Project) -> bool {
        let tag_ok = self
            .tag
            .as_ref()
            .is_none_or(|tag| project.tags.iter().any(|candidate| candidate == tag));
        let min_ok = self.min_price.is_none_or(|min| project.price >= min);
        let max_ok = self.max_price.is_none_or(|max| project.price <= max);
        let domain_ok = self.domain.is_none_or(|domain| project.domain == domain);
        let status_ok = self.status.is_none_or(|status| project.status == status);
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .is_none_or(|needle| matches_search(project, needle));

        tag_ok && min_ok && max_ok && domain_ok && status_ok && search_ok
    }
}

fn matches_search(project: &Project, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    project.title.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
        || project
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keep the projects that satisfy `filter`, preserving order.
pub fn filter_projects(projects: Vec<Project>, filter: &ProjectFilter) -> Vec<Project> {
    if filter.is_empty() {
        return projects;
    }
    projects
        .into_iter()
        .filter(|project| filter.matches(project))
        .collect()
}

/// Distinct tags across `projects` in first-seen order.
pub fn available_tags<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in projects.into_iter().flat_map(|project| project.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests;
