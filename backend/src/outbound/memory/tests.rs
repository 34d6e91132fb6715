//! Tests for the in-memory repositories.

use std::time::Duration;

use chrono::TimeDelta;
use rstest::{fixture, rstest};
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    CustomProjectRepository, CustomProjectRepositoryError, IdempotencyRepository,
    IdempotencyRepositoryError, ProjectRepository, ProjectRepositoryError, PurchaseRepository,
    PurchaseRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Email, IdempotencyKey, IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord,
    MutationType, ProjectStatus, Purchase, Role, UserId, canonicalize_and_hash,
};
use crate::test_support::{
    custom_project_for, fixture_clock, fixture_timestamp, project_owned_by, user_with_role,
};

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new(fixture_clock())
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(store: MemoryStore) {
    let first = user_with_role(Role::Buyer);
    let mut second = user_with_role(Role::Buyer);
    second.id = UserId::random();
    store.users.insert(&first).await.expect("first insert");

    let error = store
        .users
        .insert(&second)
        .await
        .expect_err("duplicate email");
    assert!(matches!(error, UserRepositoryError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn user_save_is_compare_and_swap(store: MemoryStore) {
    let user = user_with_role(Role::Seller);
    store.users.insert(&user).await.expect("insert");

    let mut updated = user.clone();
    updated.project_uploads = 1;
    updated.revision = 2;
    store.users.save(&updated, 1).await.expect("first writer wins");

    let error = store
        .users
        .save(&updated, 1)
        .await
        .expect_err("stale writer loses");
    assert_eq!(error, UserRepositoryError::revision_mismatch(1_u32, 2_u32));

    let email = Email::new("seller@example.com").expect("valid email");
    let stored = store
        .users
        .find_by_email(&email)
        .await
        .expect("lookup")
        .expect("user present");
    assert_eq!(stored.project_uploads, 1);
}

#[rstest]
#[tokio::test]
async fn sellers_are_listed_by_role(store: MemoryStore) {
    store.seed_demo_data().await.expect("seed");
    let sellers = store.users.list_by_role(Role::Seller).await.expect("list");
    assert_eq!(sellers.len(), 1);
    assert_eq!(sellers.first().map(|user| user.id.to_string()), Some(DEMO_SELLER_ID.to_string()));
}

#[rstest]
#[tokio::test]
async fn projects_keep_insertion_order(store: MemoryStore) {
    let owner = user_with_role(Role::Seller).id;
    let ids: Vec<Uuid> = (0..3)
        .map(|_| project_owned_by(&owner, ProjectStatus::Approved))
        .map(|project| project.id)
        .collect();
    for id in &ids {
        let mut project = project_owned_by(&owner, ProjectStatus::Approved);
        project.id = *id;
        store.projects.save(&project, None).await.expect("insert");
    }

    let listed: Vec<Uuid> = store
        .projects
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|project| project.id)
        .collect();
    assert_eq!(listed, ids);
}

#[rstest]
#[tokio::test]
async fn project_insert_twice_is_a_revision_conflict(store: MemoryStore) {
    let project = project_owned_by(&UserId::random(), ProjectStatus::Pending);
    store.projects.save(&project, None).await.expect("insert");

    let error = store
        .projects
        .save(&project, None)
        .await
        .expect_err("already present");
    assert_eq!(error, ProjectRepositoryError::revision_mismatch(0_u32, 1_u32));
}

#[rstest]
#[tokio::test]
async fn project_delete_checks_revision(store: MemoryStore) {
    let project = project_owned_by(&UserId::random(), ProjectStatus::Approved);
    store.projects.save(&project, None).await.expect("insert");

    let stale = store.projects.delete(&project.id, 7).await;
    assert_eq!(stale, Err(ProjectRepositoryError::revision_mismatch(7_u32, 1_u32)));

    store.projects.delete(&project.id, 1).await.expect("delete");
    let missing = store.projects.delete(&project.id, 1).await;
    assert_eq!(missing, Err(ProjectRepositoryError::not_found(project.id)));
}

#[rstest]
#[tokio::test]
async fn custom_project_update_requires_existing_row(store: MemoryStore) {
    let custom_project = custom_project_for(&UserId::random());
    let error = store
        .custom_projects
        .save(&custom_project, Some(1))
        .await
        .expect_err("not stored yet");
    assert_eq!(
        error,
        CustomProjectRepositoryError::not_found(custom_project.id)
    );
}

#[rstest]
#[tokio::test]
async fn a_listing_is_purchased_once(store: MemoryStore) {
    let project_id = Uuid::new_v4();
    let first = Purchase::new(Uuid::new_v4(), UserId::random(), project_id, fixture_timestamp());
    let second = Purchase::new(Uuid::new_v4(), UserId::random(), project_id, fixture_timestamp());
    store.purchases.insert(&first).await.expect("first purchase");

    let error = store
        .purchases
        .insert(&second)
        .await
        .expect_err("second purchase");
    assert_eq!(error, PurchaseRepositoryError::already_purchased(project_id));

    let found = store
        .purchases
        .find(&first.buyer_id, &project_id)
        .await
        .expect("lookup");
    assert_eq!(found, Some(first));
}

fn record(key: &IdempotencyKey, user_id: &UserId, payload: serde_json::Value) -> IdempotencyRecord {
    IdempotencyRecord {
        key: key.clone(),
        mutation_type: MutationType::CreateProject,
        payload_hash: canonicalize_and_hash(&payload),
        response_snapshot: json!({"ok": true}),
        user_id: user_id.clone(),
        created_at: fixture_timestamp(),
    }
}

#[rstest]
#[tokio::test]
async fn idempotency_lookup_distinguishes_payloads_and_scopes(store: MemoryStore) {
    let key = IdempotencyKey::random();
    let user_id = UserId::random();
    let stored = record(&key, &user_id, json!({"title": "a"}));
    store.idempotency.store_in_progress(&stored).await.expect("store");

    let lookup = |user: &UserId, mutation_type, payload: serde_json::Value| {
        IdempotencyLookupQuery::new(
            key.clone(),
            user.clone(),
            mutation_type,
            canonicalize_and_hash(&payload),
        )
    };

    let matching = store
        .idempotency
        .lookup(&lookup(&user_id, MutationType::CreateProject, json!({"title": "a"})))
        .await
        .expect("lookup");
    assert_eq!(matching, IdempotencyLookupResult::MatchingPayload(stored.clone()));

    let conflicting = store
        .idempotency
        .lookup(&lookup(&user_id, MutationType::CreateProject, json!({"title": "b"})))
        .await
        .expect("lookup");
    assert!(matches!(conflicting, IdempotencyLookupResult::ConflictingPayload(_)));

    let other_user = store
        .idempotency
        .lookup(&lookup(&UserId::random(), MutationType::CreateProject, json!({"title": "a"})))
        .await
        .expect("lookup");
    assert_eq!(other_user, IdempotencyLookupResult::NotFound);

    let other_mutation = store
        .idempotency
        .lookup(&lookup(&user_id, MutationType::PurchaseProject, json!({"title": "a"})))
        .await
        .expect("lookup");
    assert_eq!(other_mutation, IdempotencyLookupResult::NotFound);

    let duplicate = store.idempotency.store_in_progress(&stored).await;
    assert!(matches!(
        duplicate,
        Err(IdempotencyRepositoryError::DuplicateKey { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn claimed_key_is_completed_or_released(store: MemoryStore) {
    let key = IdempotencyKey::random();
    let user_id = UserId::random();
    let mut claim = record(&key, &user_id, json!({"title": "a"}));
    claim.response_snapshot = json!({"__idempotency_state": "in_progress"});
    store
        .idempotency
        .store_in_progress(&claim)
        .await
        .expect("claim");
    let query = IdempotencyLookupQuery::new(
        key.clone(),
        user_id.clone(),
        MutationType::CreateProject,
        claim.payload_hash.clone(),
    );

    store
        .idempotency
        .update_response_snapshot(&query, &json!({"replayed": false}))
        .await
        .expect("update");
    let IdempotencyLookupResult::MatchingPayload(completed) =
        store.idempotency.lookup(&query).await.expect("lookup")
    else {
        panic!("claim should still be stored");
    };
    assert_eq!(completed.response_snapshot, json!({"replayed": false}));

    store.idempotency.release(&query).await.expect("release");
    assert_eq!(
        store.idempotency.lookup(&query).await.expect("lookup"),
        IdempotencyLookupResult::NotFound
    );
    let missing = store
        .idempotency
        .update_response_snapshot(&query, &json!({}))
        .await;
    assert!(matches!(missing, Err(IdempotencyRepositoryError::Query { .. })));
}

#[rstest]
#[tokio::test]
async fn cleanup_removes_only_expired_records(store: MemoryStore) {
    let user_id = UserId::random();
    let fresh = record(&IdempotencyKey::random(), &user_id, json!({}));
    let mut stale = record(&IdempotencyKey::random(), &user_id, json!({}));
    stale.created_at = fixture_timestamp() - TimeDelta::hours(25);
    store.idempotency.store_in_progress(&fresh).await.expect("store fresh");
    store.idempotency.store_in_progress(&stale).await.expect("store stale");

    let removed = store
        .idempotency
        .cleanup_expired(Duration::from_secs(24 * 3600))
        .await
        .expect("cleanup");
    assert_eq!(removed, 1);
}

#[rstest]
#[tokio::test]
async fn demo_seed_loads_catalog_and_purchase(store: MemoryStore) {
    store.seed_demo_data().await.expect("seed");

    let projects = store.projects.list().await.expect("list");
    let titles: Vec<&str> = projects.iter().map(|project| project.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "E-commerce Platform",
            "Social Media Dashboard",
            "Task Management App",
            "Portfolio Template"
        ]
    );
    let sold: Vec<&str> = projects
        .iter()
        .filter(|project| project.status == ProjectStatus::Sold)
        .map(|project| project.title.as_str())
        .collect();
    assert_eq!(sold, ["Task Management App"]);

    let jane = UserId::from_uuid(DEMO_BUYER_ID);
    let purchases = store.purchases.list_by_buyer(&jane).await.expect("list");
    assert_eq!(purchases.len(), 1);

    let reseed = store.seed_demo_data().await;
    assert!(reseed.is_err());
}
