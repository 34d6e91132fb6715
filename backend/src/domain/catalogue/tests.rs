//! Catalog filter coverage.

use super::*;
use crate::domain::UserId;
use chrono::Utc;
use rstest::{fixture, rstest};
use uuid::Uuid;

fn project(title: &str, tags: &[&str], price: f64, domain: ContentDomain) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        description: format!("{title} description"),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        link: None,
        image: "https://img.example/x.png".to_owned(),
        price: Price::new(price).expect("valid price"),
        status: ProjectStatus::Approved,
        owner_id: UserId::random(),
        domain,
        files: vec!["x.zip".to_owned()],
        feedback: None,
        approved_by: None,
        approved_at: None,
        created_at: Utc::now(),
        revision: 1,
    }
}

#[fixture]
fn catalog() -> Vec<Project> {
    vec![
        project("E-commerce Platform", &["React", "Node.js"], 99.0, ContentDomain::Project),
        project("Task Management App", &["Vue.js"], 0.0, ContentDomain::Project),
        project("Portfolio Template", &["HTML"], 19.0, ContentDomain::Portfolio),
        project("Survey Toolkit", &["R", "Statistics"], 49.0, ContentDomain::Phd),
    ]
}

fn titles(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|project| project.title.as_str()).collect()
}

fn price(amount: f64) -> Option<Price> {
    Some(Price::new(amount).expect("valid price"))
}

#[rstest]
fn no_filter_returns_full_catalog_in_order(catalog: Vec<Project>) {
    let expected: Vec<String> = catalog.iter().map(|p| p.title.clone()).collect();
    let result = filter_projects(catalog, &ProjectFilter::default());
    assert_eq!(titles(&result), expected);
}

#[rstest]
fn tag_filter_matches_exact_membership(catalog: Vec<Project>) {
    let filter = ProjectFilter {
        tag: Some("React".into()),
        ..ProjectFilter::default()
    };
    let result = filter_projects(catalog, &filter);
    assert_eq!(titles(&result), ["E-commerce Platform"]);
}

#[rstest]
#[case("react")]
#[case("Reac")]
fn tag_filter_is_not_fuzzy(catalog: Vec<Project>, #[case] tag: &str) {
    let filter = ProjectFilter {
        tag: Some(tag.into()),
        ..ProjectFilter::default()
    };
    assert!(filter_projects(catalog, &filter).is_empty());
}

#[rstest]
#[case(price(0.0), price(19.0), &["Task Management App", "Portfolio Template"][..])]
#[case(price(49.0), None, &["E-commerce Platform", "Survey Toolkit"][..])]
#[case(None, price(0.0), &["Task Management App"][..])]
#[case(price(50.0), price(40.0), &[][..])]
fn price_bounds_are_inclusive(
    catalog: Vec<Project>,
    #[case] min_price: Option<Price>,
    #[case] max_price: Option<Price>,
    #[case] expected: &[&str],
) {
    let filter = ProjectFilter {
        min_price,
        max_price,
        ..ProjectFilter::default()
    };
    assert_eq!(titles(&filter_projects(catalog, &filter)), expected);
}

#[rstest]
fn domain_filter_is_exact(catalog: Vec<Project>) {
    let filter = ProjectFilter {
        domain: Some(ContentDomain::Phd),
        ..ProjectFilter::default()
    };
    assert_eq!(titles(&filter_projects(catalog, &filter)), ["Survey Toolkit"]);
}

#[rstest]
fn predicates_combine_conjunctively(catalog: Vec<Project>) {
    let filter = ProjectFilter {
        tag: Some("React".into()),
        max_price: price(50.0),
        ..ProjectFilter::default()
    };
    assert!(filter_projects(catalog.clone(), &filter).is_empty());

    let filter = ProjectFilter {
        domain: Some(ContentDomain::Project),
        max_price: price(50.0),
        ..ProjectFilter::default()
    };
    assert_eq!(titles(&filter_projects(catalog, &filter)), ["Task Management App"]);
}

#[rstest]
fn every_result_satisfies_every_predicate(catalog: Vec<Project>) {
    let filters = [
        ProjectFilter {
            min_price: price(10.0),
            ..ProjectFilter::default()
        },
        ProjectFilter {
            tag: Some("HTML".into()),
            domain: Some(ContentDomain::Portfolio),
            ..ProjectFilter::default()
        },
        ProjectFilter {
            search: Some("app".into()),
            max_price: price(10.0),
            ..ProjectFilter::default()
        },
    ];
    for filter in filters {
        let result = filter_projects(catalog.clone(), &filter);
        assert!(result.iter().all(|project| filter.matches(project)));
        let excluded = catalog
            .iter()
            .filter(|project| !result.iter().any(|kept| kept.id == project.id));
        assert!(excluded.into_iter().all(|project| !filter.matches(project)));
    }
}

#[rstest]
#[case("PORTFOLIO", &["Portfolio Template"][..])]
#[case("node", &["E-commerce Platform"][..])]
#[case("description", &["E-commerce Platform", "Task Management App", "Portfolio Template", "Survey Toolkit"][..])]
#[case("   ", &["E-commerce Platform", "Task Management App", "Portfolio Template", "Survey Toolkit"][..])]
fn search_is_case_insensitive_over_text_fields(
    catalog: Vec<Project>,
    #[case] search: &str,
    #[case] expected: &[&str],
) {
    let filter = ProjectFilter {
        search: Some(search.into()),
        ..ProjectFilter::default()
    };
    assert_eq!(titles(&filter_projects(catalog, &filter)), expected);
}

#[rstest]
fn status_filter_selects_pending(mut catalog: Vec<Project>) {
    if let Some(first) = catalog.first_mut() {
        first.status = ProjectStatus::Pending;
    }
    let filter = ProjectFilter {
        status: Some(ProjectStatus::Pending),
        ..ProjectFilter::default()
    };
    assert_eq!(titles(&filter_projects(catalog, &filter)), ["E-commerce Platform"]);
}

#[rstest]
fn available_tags_are_unique_in_first_seen_order(catalog: Vec<Project>) {
    let mut extended = catalog;
    extended.push(project("Another", &["HTML", "React", "CSS"], 5.0, ContentDomain::Project));
    assert_eq!(
        available_tags(&extended),
        ["React", "Node.js", "Vue.js", "HTML", "R", "Statistics", "CSS"]
    );
}
