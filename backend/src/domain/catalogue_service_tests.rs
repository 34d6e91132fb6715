//! Tests for the catalog service.

use std::sync::Arc;

use rstest::rstest;
use uuid::Uuid;

use super::CatalogueService;
use crate::domain::ports::{
    CatalogueQuery, MockProjectRepository, MockUserRepository, ProjectRepositoryError,
};
use crate::domain::{ErrorCode, ProjectFilter, ProjectStatus, Role};
use crate::test_support::{project_owned_by, user_with_role};

fn make_service(
    projects: MockProjectRepository,
    users: MockUserRepository,
) -> CatalogueService<MockProjectRepository, MockUserRepository> {
    CatalogueService::new(Arc::new(projects), Arc::new(users))
}

#[rstest]
#[tokio::test]
async fn tag_filter_returns_only_matching_listing() {
    let seller = user_with_role(Role::Seller);
    let react = project_owned_by(&seller.id, ProjectStatus::Approved);
    let mut vue = project_owned_by(&seller.id, ProjectStatus::Approved);
    vue.tags = vec!["Vue.js".to_owned()];
    let mut html = project_owned_by(&seller.id, ProjectStatus::Approved);
    html.tags = vec!["HTML".to_owned()];
    let expected_id = react.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_list()
        .times(1)
        .return_once(move || Ok(vec![react, vue, html]));

    let service = make_service(projects, MockUserRepository::new());
    let filter = ProjectFilter {
        tag: Some("React".to_owned()),
        ..ProjectFilter::default()
    };
    let result = service.list_projects(filter).await.expect("list succeeds");

    assert_eq!(result.len(), 1);
    assert_eq!(result.first().map(|project| project.id), Some(expected_id));
}

#[rstest]
#[tokio::test]
async fn unavailable_repository_maps_to_service_unavailable() {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_list()
        .return_once(|| Err(ProjectRepositoryError::connection("pool exhausted")));

    let service = make_service(projects, MockUserRepository::new());
    let error = service
        .list_projects(ProjectFilter::default())
        .await
        .expect_err("list fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn get_project_attaches_owner_profile() {
    let seller = user_with_role(Role::Seller);
    let project = project_owned_by(&seller.id, ProjectStatus::Approved);
    let project_id = project.id;
    let owner = seller.clone();

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_by_id()
        .withf(move |id| *id == project_id)
        .return_once(move |_| Ok(Some(project)));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(owner)));

    let detail = make_service(projects, users)
        .get_project(project_id)
        .await
        .expect("detail loads");

    assert_eq!(detail.project.id, project_id);
    assert_eq!(detail.owner, Some(seller.profile()));
}

#[rstest]
#[tokio::test]
async fn get_project_tolerates_missing_owner() {
    let project = project_owned_by(&user_with_role(Role::Seller).id, ProjectStatus::Pending);
    let project_id = project.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(project)));
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let detail = make_service(projects, users)
        .get_project(project_id)
        .await
        .expect("detail loads");

    assert!(detail.owner.is_none());
}

#[rstest]
#[tokio::test]
async fn unknown_project_is_not_found() {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(projects, MockUserRepository::new())
        .get_project(Uuid::new_v4())
        .await
        .expect_err("missing project");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn tags_are_deduplicated() {
    let seller = user_with_role(Role::Seller);
    let first = project_owned_by(&seller.id, ProjectStatus::Approved);
    let second = project_owned_by(&seller.id, ProjectStatus::Sold);

    let mut projects = MockProjectRepository::new();
    projects
        .expect_list()
        .return_once(move || Ok(vec![first, second]));

    let tags = make_service(projects, MockUserRepository::new())
        .available_tags()
        .await
        .expect("tags load");

    assert_eq!(tags, ["React", "Node.js"]);
}
