//! Behaviour tests for quota, catalog, moderation and custom project rules.
//!
//! Scenarios run against the real domain services wired to the in-memory
//! repositories.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use marketplace::domain::ports::{
    ApproveCustomProjectRequest, ApproveProjectRequest, AssignCustomProjectRequest,
    CatalogueQuery, CreateProjectRequest, CustomProjectCommand, LibraryQuery, ModerationCommand,
    ProjectCommand, PurchaseProjectRequest, RejectProjectRequest, SubmitCustomProjectRequest,
    UserRepository,
};
use marketplace::domain::{
    CatalogueService, CustomProject, CustomProjectInput, CustomProjectService,
    CustomProjectStatus, DisplayName, Email, Error, Project, ProjectDraft, ProjectDraftInput,
    ProjectFilter, ProjectService, ProjectStatus, Role, User, UserId,
};
use marketplace::outbound::memory::MemoryStore;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

struct Services {
    catalogue: Arc<dyn CatalogueQuery>,
    projects: Arc<dyn ProjectCommand>,
    library: Arc<dyn LibraryQuery>,
    moderation: Arc<dyn ModerationCommand>,
    custom_projects: Arc<dyn CustomProjectCommand>,
}

struct MarketplaceWorld {
    store: MemoryStore,
    services: Services,
    seller: RefCell<Option<User>>,
    buyer: RefCell<Option<User>>,
    admin: RefCell<Option<User>>,
    project: RefCell<Option<Project>>,
    custom_project: RefCell<Option<CustomProject>>,
    listed: RefCell<Vec<Project>>,
    last_error: RefCell<Option<Error>>,
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

impl MarketplaceWorld {
    fn new() -> Self {
        let store = MemoryStore::new(Arc::new(DefaultClock));
        let projects = Arc::new(ProjectService::new(
            store.projects.clone(),
            store.users.clone(),
            store.purchases.clone(),
            store.idempotency.clone(),
            store.clock(),
        ));
        let services = Services {
            catalogue: Arc::new(CatalogueService::new(
                store.projects.clone(),
                store.users.clone(),
            )),
            projects: projects.clone(),
            library: projects.clone(),
            moderation: projects,
            custom_projects: Arc::new(CustomProjectService::new(
                store.custom_projects.clone(),
                store.users.clone(),
                store.clock(),
            )),
        };
        Self {
            store,
            services,
            seller: RefCell::new(None),
            buyer: RefCell::new(None),
            admin: RefCell::new(None),
            project: RefCell::new(None),
            custom_project: RefCell::new(None),
            listed: RefCell::new(Vec::new()),
            last_error: RefCell::new(None),
        }
    }

    fn add_user(&self, name: &str, role: Role, adjust: impl FnOnce(&mut User)) -> User {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let mut user = User::new(
            UserId::random(),
            DisplayName::new(name).expect("display name"),
            Email::new(email).expect("email"),
            role,
        );
        adjust(&mut user);
        run_async(self.store.users.insert(&user)).expect("insert user");
        user
    }

    fn seller_id(&self) -> UserId {
        self.seller.borrow().as_ref().expect("seller").id.clone()
    }

    fn admin_id(&self) -> UserId {
        self.admin.borrow().as_ref().expect("admin").id.clone()
    }

    fn project_id(&self) -> uuid::Uuid {
        self.project.borrow().as_ref().expect("project").id
    }

    fn custom_project_id(&self) -> uuid::Uuid {
        self.custom_project.borrow().as_ref().expect("custom project").id
    }

    fn record<T>(&self, result: Result<T, Error>, store: impl FnOnce(T)) {
        match result {
            Ok(value) => {
                store(value);
                *self.last_error.borrow_mut() = None;
            }
            Err(error) => *self.last_error.borrow_mut() = Some(error),
        }
    }

    fn record_project(&self, result: Result<Project, Error>) {
        self.record(result, |project| *self.project.borrow_mut() = Some(project));
    }

    fn record_custom_project(&self, result: Result<CustomProject, Error>) {
        self.record(result, |custom| *self.custom_project.borrow_mut() = Some(custom));
    }

    fn create_listing(&self) -> Result<Project, Error> {
        let draft = ProjectDraft::try_from_input(ProjectDraftInput {
            title: "Booking Widget".to_owned(),
            description: "Embeddable booking calendar".to_owned(),
            tags: vec!["Svelte".to_owned()],
            link: None,
            image: "https://img.example/booking.png".to_owned(),
            price: 25.0,
            domain: None,
            files: Vec::new(),
        })
        .expect("valid draft");
        run_async(self.services.projects.create_project(CreateProjectRequest {
            owner_id: self.seller_id(),
            draft,
            idempotency_key: None,
        }))
        .map(|response| response.project)
    }

    fn catalog(&self) -> Vec<Project> {
        run_async(self.services.catalogue.list_projects(ProjectFilter::default()))
            .expect("catalog")
    }
}

#[fixture]
fn world() -> MarketplaceWorld {
    MarketplaceWorld::new()
}

#[given("a free-tier seller who has uploaded {count} projects")]
fn a_free_tier_seller(world: &MarketplaceWorld, count: u32) {
    let seller = world.add_user("Sam Seller", Role::Seller, |user| {
        user.project_uploads = count;
    });
    *world.seller.borrow_mut() = Some(seller);
}

#[given("a premium seller who has uploaded {count} projects")]
fn a_premium_seller(world: &MarketplaceWorld, count: u32) {
    let seller = world.add_user("Pat Premium", Role::Seller, |user| {
        user.project_uploads = count;
        user.is_premium = true;
    });
    *world.seller.borrow_mut() = Some(seller);
}

#[given("a catalog seeded with the demo projects")]
fn a_catalog_seeded_with_demo_projects(world: &MarketplaceWorld) {
    run_async(world.store.seed_demo_data()).expect("seed");
}

#[given("a pending custom project request")]
fn a_pending_custom_project_request(world: &MarketplaceWorld) {
    let buyer = world.add_user("Bea Buyer", Role::Buyer, |_| {});
    let seller = world.add_user("S1 Seller", Role::Seller, |_| {});
    let admin = world.add_user("Ada Admin", Role::Admin, |_| {});
    let request = run_async(world.services.custom_projects.request_custom_project(
        &buyer.id,
        CustomProjectInput {
            title: "Salon booking site".to_owned(),
            description: "Online booking with reminders".to_owned(),
            budget: 500.0,
            ..CustomProjectInput::default()
        },
    ))
    .expect("request accepted");
    assert_eq!(request.status, CustomProjectStatus::Pending);
    *world.buyer.borrow_mut() = Some(buyer);
    *world.seller.borrow_mut() = Some(seller);
    *world.admin.borrow_mut() = Some(admin);
    *world.custom_project.borrow_mut() = Some(request);
}

#[given("a pending project awaiting moderation")]
fn a_pending_project_awaiting_moderation(world: &MarketplaceWorld) {
    let seller = world.add_user("Sam Seller", Role::Seller, |_| {});
    let admin = world.add_user("Ada Admin", Role::Admin, |_| {});
    *world.seller.borrow_mut() = Some(seller);
    *world.admin.borrow_mut() = Some(admin);
    let project = world.create_listing().expect("listing created");
    *world.project.borrow_mut() = Some(project);
}

#[given("an approved project and a buyer")]
fn an_approved_project_and_a_buyer(world: &MarketplaceWorld) {
    a_pending_project_awaiting_moderation(world);
    let buyer = world.add_user("Bea Buyer", Role::Buyer, |_| {});
    *world.buyer.borrow_mut() = Some(buyer);
    let approved = run_async(world.services.moderation.approve_project(ApproveProjectRequest {
        project_id: world.project_id(),
        admin_id: world.admin_id(),
    }))
    .expect("approved");
    *world.project.borrow_mut() = Some(approved);
}

#[when("the seller uploads another project")]
fn the_seller_uploads_another_project(world: &MarketplaceWorld) {
    world.record_project(world.create_listing());
}

#[when("the catalog is filtered by tag {tag}")]
fn the_catalog_is_filtered_by_tag(world: &MarketplaceWorld, tag: String) {
    let filter = ProjectFilter {
        tag: Some(tag),
        ..ProjectFilter::default()
    };
    let listed = run_async(world.services.catalogue.list_projects(filter)).expect("catalog");
    *world.listed.borrow_mut() = listed;
}

#[when("an admin assigns it to the seller")]
fn an_admin_assigns_it_to_the_seller(world: &MarketplaceWorld) {
    let result = run_async(world.services.custom_projects.assign_custom_project(
        AssignCustomProjectRequest {
            custom_project_id: world.custom_project_id(),
            admin_id: world.admin_id(),
            seller_id: world.seller_id(),
        },
    ));
    world.record_custom_project(result);
}

#[when("the seller submits the file {file}")]
fn the_seller_submits_the_file(world: &MarketplaceWorld, file: String) {
    let result = run_async(world.services.custom_projects.submit_custom_project(
        SubmitCustomProjectRequest {
            custom_project_id: world.custom_project_id(),
            seller_id: world.seller_id(),
            files: vec![file],
        },
    ));
    world.record_custom_project(result);
}

#[when("the admin approves delivery at {url}")]
fn the_admin_approves_delivery(world: &MarketplaceWorld, url: String) {
    let result = run_async(world.services.custom_projects.approve_custom_project(
        ApproveCustomProjectRequest {
            custom_project_id: world.custom_project_id(),
            admin_id: world.admin_id(),
            download_url: url,
        },
    ));
    world.record_custom_project(result);
}

#[when("the admin approves the project")]
fn the_admin_approves_the_project(world: &MarketplaceWorld) {
    let result = run_async(world.services.moderation.approve_project(ApproveProjectRequest {
        project_id: world.project_id(),
        admin_id: world.admin_id(),
    }));
    world.record_project(result);
}

#[when("the admin rejects the project with feedback {feedback}")]
fn the_admin_rejects_the_project(world: &MarketplaceWorld, feedback: String) {
    let result = run_async(world.services.moderation.reject_project(RejectProjectRequest {
        project_id: world.project_id(),
        admin_id: world.admin_id(),
        feedback,
    }));
    world.record_project(result);
}

#[when("the buyer purchases the project")]
fn the_buyer_purchases_the_project(world: &MarketplaceWorld) {
    let buyer_id = world.buyer.borrow().as_ref().expect("buyer").id.clone();
    let result = run_async(world.services.projects.purchase_project(PurchaseProjectRequest {
        buyer_id,
        project_id: world.project_id(),
        idempotency_key: None,
    }));
    world.record(result, |_| {});
}

#[when("a second buyer purchases the project")]
fn a_second_buyer_purchases_the_project(world: &MarketplaceWorld) {
    let second = world.add_user("Ben Buyer", Role::Buyer, |_| {});
    *world.buyer.borrow_mut() = Some(second);
    the_buyer_purchases_the_project(world);
}

#[then("the request fails with code {code}")]
fn the_request_fails_with_code(world: &MarketplaceWorld, code: String) {
    let error = world.last_error.borrow();
    let error = error.as_ref().expect("request should fail");
    assert_eq!(
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(Value::as_str),
        Some(code.as_str())
    );
}

#[then("the catalog holds {count} projects")]
fn the_catalog_holds(world: &MarketplaceWorld, count: usize) {
    assert_eq!(world.catalog().len(), count);
}

#[then("the project is pending review")]
fn the_project_is_pending_review(world: &MarketplaceWorld) {
    assert!(world.last_error.borrow().is_none());
    let project = world.project.borrow();
    assert_eq!(project.as_ref().expect("project").status, ProjectStatus::Pending);
}

#[then("exactly {count} project is returned titled {title}")]
fn exactly_one_project_is_returned(world: &MarketplaceWorld, count: usize, title: String) {
    let listed = world.listed.borrow();
    assert_eq!(listed.len(), count);
    assert!(listed.iter().all(|project| project.title == title));
}

fn with_custom_project(world: &MarketplaceWorld, check: impl FnOnce(&CustomProject)) {
    assert!(world.last_error.borrow().is_none(), "unexpected error");
    let custom = world.custom_project.borrow();
    check(custom.as_ref().expect("custom project"));
}

fn custom_status(raw: &str) -> CustomProjectStatus {
    serde_json::from_value(Value::String(raw.to_owned())).expect("known status")
}

#[then("the custom project is {status} to the seller")]
fn the_custom_project_is_assigned(world: &MarketplaceWorld, status: String) {
    let seller_id = world.seller_id();
    with_custom_project(world, |custom| {
        assert_eq!(custom.status, custom_status(&status));
        assert_eq!(custom.seller_id.as_ref(), Some(&seller_id));
    });
}

#[then("the custom project is {status} with files {file}")]
fn the_custom_project_has_files(world: &MarketplaceWorld, status: String, file: String) {
    with_custom_project(world, |custom| {
        assert_eq!(custom.status, custom_status(&status));
        assert_eq!(custom.submission_files, vec![file]);
        assert!(custom.submitted_at.is_some());
    });
}

#[then("the custom project is {status} with its download link")]
fn the_custom_project_is_delivered(world: &MarketplaceWorld, status: String) {
    with_custom_project(world, |custom| {
        assert_eq!(custom.status, custom_status(&status));
        assert_eq!(
            custom.download_url.as_deref(),
            Some("https://files.example/a.zip")
        );
        assert!(custom.delivered_at.is_some());
    });
}

#[then("the project is approved by the admin")]
fn the_project_is_approved_by_the_admin(world: &MarketplaceWorld) {
    let admin_id = world.admin_id();
    let project = world.project.borrow();
    let project = project.as_ref().expect("project");
    assert_eq!(project.status, ProjectStatus::Approved);
    assert_eq!(project.approved_by.as_ref(), Some(&admin_id));
}

#[then("the project is sold with {count} purchase recorded")]
fn the_project_is_sold(world: &MarketplaceWorld, count: usize) {
    assert!(world.last_error.borrow().is_none());
    let buyer_id = world.buyer.borrow().as_ref().expect("buyer").id.clone();
    let purchases = run_async(world.services.library.user_purchases(&buyer_id)).expect("library");
    assert_eq!(purchases.len(), count);
    let project = purchases
        .first()
        .and_then(|entry| entry.project.as_ref())
        .expect("purchased project attached");
    assert_eq!(project.status, ProjectStatus::Sold);
}

#[then("the second buyer owns no purchases")]
fn the_second_buyer_owns_no_purchases(world: &MarketplaceWorld) {
    let buyer_id = world.buyer.borrow().as_ref().expect("buyer").id.clone();
    let purchases = run_async(world.services.library.user_purchases(&buyer_id)).expect("library");
    assert!(purchases.is_empty());
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "A free-tier seller cannot upload a fourth project"
)]
fn free_tier_seller_cannot_upload_a_fourth_project(world: MarketplaceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "A premium seller is never limited"
)]
fn premium_seller_is_never_limited(world: MarketplaceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "Filtering the catalog by tag"
)]
fn filtering_the_catalog_by_tag(world: MarketplaceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "Custom project moves from request to delivery"
)]
fn custom_project_moves_from_request_to_delivery(world: MarketplaceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "Moderation decisions are final"
)]
fn moderation_decisions_are_final(world: MarketplaceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/marketplace.feature",
    name = "A sold project cannot be bought twice"
)]
fn sold_project_cannot_be_bought_twice(world: MarketplaceWorld) {
    drop(world);
}
