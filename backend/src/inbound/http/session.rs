//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers only see the login gate: persist an
//! admin at login, require one on gated routes, and purge at logout.

use actix_session::{Session, SessionGetError};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AdminIdentity, Error, SessionId};

pub(crate) const ADMIN_EMAIL_KEY: &str = "admin_email";
pub(crate) const SESSION_ID_KEY: &str = "session_id";

/// The authenticated admin attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    email: String,
    session_id: SessionId,
}

impl AdminSession {
    /// Email the admin logged in with.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Identifier minted for this login.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh admin session, replacing anything already stored.
    pub fn persist_admin(&self, identity: &AdminIdentity) -> Result<AdminSession, Error> {
        let session_id = SessionId::random();
        self.0.renew();
        self.0
            .insert(ADMIN_EMAIL_KEY, identity.email())
            .and_then(|()| self.0.insert(SESSION_ID_KEY, session_id.to_string()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        Ok(AdminSession {
            email: identity.email().to_owned(),
            session_id,
        })
    }

    /// Fetch the logged-in admin, if any.
    ///
    /// A cookie missing either value, or holding an unparsable session id,
    /// counts as logged out.
    pub fn admin(&self) -> Result<Option<AdminSession>, Error> {
        let read_error =
            |error: SessionGetError| Error::internal(format!("failed to read session: {error}"));
        let email = self.0.get::<String>(ADMIN_EMAIL_KEY).map_err(read_error)?;
        let raw_id = self.0.get::<String>(SESSION_ID_KEY).map_err(read_error)?;
        let (Some(email), Some(raw_id)) = (email, raw_id) else {
            return Ok(None);
        };
        match raw_id.parse::<SessionId>() {
            Ok(session_id) => Ok(Some(AdminSession { email, session_id })),
            Err(error) => {
                tracing::warn!("invalid session id in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require a logged-in admin or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<AdminSession, Error> {
        self.admin()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
