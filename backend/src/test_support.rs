//! Shared fixtures for unit tests. Only compiled for `cfg(test)`.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::{
    ContentDomain, CustomProject, CustomProjectInput, DisplayName, Email, Price, Project,
    ProjectStatus, Role, User, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user_with_role(role: Role) -> User {
    let name = format!("{role} User");
    let email = format!("{}@example.com", role.as_str().to_lowercase());
    User::new(
        UserId::random(),
        DisplayName::new(name).expect("valid display name"),
        Email::new(email).expect("valid email"),
        role,
    )
}

pub(crate) fn project_owned_by(owner: &UserId, status: ProjectStatus) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: "E-commerce Platform".to_owned(),
        description: "Full-stack shop".to_owned(),
        tags: vec!["React".to_owned(), "Node.js".to_owned()],
        link: None,
        image: "https://img.example/shop.png".to_owned(),
        price: Price::new(99.0).expect("valid price"),
        status,
        owner_id: owner.clone(),
        domain: ContentDomain::Project,
        files: vec!["shop.zip".to_owned()],
        feedback: None,
        approved_by: None,
        approved_at: None,
        created_at: fixture_timestamp(),
        revision: 1,
    }
}

pub(crate) fn custom_project_for(buyer: &UserId) -> CustomProject {
    CustomProject::request(
        Uuid::new_v4(),
        buyer.clone(),
        CustomProjectInput {
            title: "Booking site".to_owned(),
            description: "Salon booking with reminders".to_owned(),
            budget: 500.0,
            due_date: None,
            domain: None,
            attachments: Vec::new(),
        },
        fixture_timestamp(),
    )
    .expect("valid custom project")
}
