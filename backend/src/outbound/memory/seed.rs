//! Demo catalog loaded when `seed_demo_data` is enabled.
//!
//! Identifiers are fixed so links into the demo stay stable across restarts.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::MemoryStore;
use crate::domain::ports::{ProjectRepository, PurchaseRepository, UserRepository};
use crate::domain::{
    ContentDomain, DisplayName, Email, Error, Price, Project, ProjectStatus, Purchase, Role, User,
    UserId,
};

pub const DEMO_SELLER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_000000000001);
pub const DEMO_BUYER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_000000000002);

struct DemoProject {
    id: u128,
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    link: &'static str,
    image: &'static str,
    price: f64,
    file: &'static str,
}

const DEMO_PROJECTS: [DemoProject; 4] = [
    DemoProject {
        id: 0x0000_0000_0000_4000_8000_000000000101,
        title: "E-commerce Platform",
        description: "A fully functional e-commerce platform built with React and Node.js.",
        tags: &["React", "Node.js", "MongoDB"],
        link: "https://github.com/example/ecommerce",
        image: "https://images.pexels.com/photos/230544/pexels-photo-230544.jpeg",
        price: 99.0,
        file: "project-files.zip",
    },
    DemoProject {
        id: 0x0000_0000_0000_4000_8000_000000000102,
        title: "Social Media Dashboard",
        description: "Monitor your social media presence with this beautiful dashboard.",
        tags: &["React", "Firebase", "Chart.js"],
        link: "https://github.com/example/social-dashboard",
        image: "https://images.pexels.com/photos/844124/pexels-photo-844124.jpeg",
        price: 49.0,
        file: "dashboard-source.zip",
    },
    DemoProject {
        id: 0x0000_0000_0000_4000_8000_000000000103,
        title: "Task Management App",
        description: "Keep track of your tasks with this beautiful Kanban-style application.",
        tags: &["Vue.js", "Express", "PostgreSQL"],
        link: "https://github.com/example/task-app",
        image: "https://images.pexels.com/photos/7376/startup-photos.jpg",
        price: 0.0,
        file: "task-app.zip",
    },
    DemoProject {
        id: 0x0000_0000_0000_4000_8000_000000000104,
        title: "Portfolio Template",
        description: "A beautiful, customizable portfolio template for developers.",
        tags: &["HTML", "CSS", "JavaScript"],
        link: "https://github.com/example/portfolio",
        image: "https://images.pexels.com/photos/196644/pexels-photo-196644.jpeg",
        price: 19.0,
        file: "portfolio-template.zip",
    },
];

/// The demo purchase: Jane bought the task app.
const SOLD_PROJECT_ID: u128 = 0x0000_0000_0000_4000_8000_000000000103;
const DEMO_PURCHASE_ID: u128 = 0x0000_0000_0000_4000_8000_000000000201;

fn demo_user(id: Uuid, name: &str, email: &str, role: Role) -> Result<User, Error> {
    let display_name = DisplayName::new(name)
        .map_err(|err| Error::internal(format!("invalid demo user name: {err}")))?;
    let email =
        Email::new(email).map_err(|err| Error::internal(format!("invalid demo email: {err}")))?;
    Ok(User::new(UserId::from_uuid(id), display_name, email, role))
}

fn demo_project(spec: &DemoProject, owner: &UserId, now: DateTime<Utc>) -> Result<Project, Error> {
    let price = Price::new(spec.price)
        .map_err(|err| Error::internal(format!("invalid demo price: {err}")))?;
    let status = if spec.id == SOLD_PROJECT_ID {
        ProjectStatus::Sold
    } else {
        ProjectStatus::Approved
    };
    Ok(Project {
        id: Uuid::from_u128(spec.id),
        title: spec.title.to_owned(),
        description: spec.description.to_owned(),
        tags: spec.tags.iter().map(|tag| (*tag).to_owned()).collect(),
        link: Some(spec.link.to_owned()),
        image: spec.image.to_owned(),
        price,
        status,
        owner_id: owner.clone(),
        domain: ContentDomain::Project,
        files: vec![spec.file.to_owned()],
        feedback: None,
        approved_by: None,
        approved_at: None,
        created_at: now,
        revision: 1,
    })
}

impl MemoryStore {
    /// Load two users, four listings and one purchase.
    ///
    /// # Errors
    /// Fails when any demo row already exists.
    pub async fn seed_demo_data(&self) -> Result<(), Error> {
        let now = self.clock.utc();
        let seller = demo_user(DEMO_SELLER_ID, "John Seller", "john@example.com", Role::Seller)?;
        let buyer = demo_user(DEMO_BUYER_ID, "Jane Buyer", "jane@example.com", Role::Buyer)?;

        for user in [&seller, &buyer] {
            self.users
                .insert(user)
                .await
                .map_err(|err| Error::internal(format!("failed to seed user: {err}")))?;
        }
        for spec in &DEMO_PROJECTS {
            let project = demo_project(spec, &seller.id, now)?;
            self.projects
                .save(&project, None)
                .await
                .map_err(|err| Error::internal(format!("failed to seed project: {err}")))?;
        }
        let purchase = Purchase::new(
            Uuid::from_u128(DEMO_PURCHASE_ID),
            buyer.id.clone(),
            Uuid::from_u128(SOLD_PROJECT_ID),
            now,
        );
        self.purchases
            .insert(&purchase)
            .await
            .map_err(|err| Error::internal(format!("failed to seed purchase: {err}")))?;

        info!(
            users = 2,
            projects = DEMO_PROJECTS.len(),
            purchases = 1,
            "demo data seeded"
        );
        Ok(())
    }
}
