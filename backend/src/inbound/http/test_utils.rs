//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::UserId;
use crate::domain::ports::{
    MockCatalogueQuery, MockCustomProjectCommand, MockIdentityCommand, MockLibraryQuery,
    MockModerationCommand, MockProjectCommand,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Route that signs the caller in as the user id in the path.
pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock driving ports. Set expectations, then call [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub catalogue: MockCatalogueQuery,
    pub projects: MockProjectCommand,
    pub library: MockLibraryQuery,
    pub moderation: MockModerationCommand,
    pub custom_projects: MockCustomProjectCommand,
    pub identity: MockIdentityCommand,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            catalogue: Arc::new(self.catalogue),
            projects: Arc::new(self.projects),
            library: Arc::new(self.library),
            moderation: Arc::new(self.moderation),
            custom_projects: Arc::new(self.custom_projects),
            identity: Arc::new(self.identity),
        })
    }
}

async fn sign_in(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the sign-in helper route.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(&format!("{SIGN_IN_PATH}/{{id}}"), web::post().to(sign_in));
}

/// The `session` cookie set on `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

/// Sign in through [`sign_in_route`] and return the session cookie.
pub async fn sign_in_as<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    session_cookie(&res).expect("sign-in sets a session cookie")
}
