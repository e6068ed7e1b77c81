//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session cookie carries only the selected user id. Requests without a
//! selection, or with an id the registry no longer knows, act as the readonly
//! guest.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Caller, Error, UserId, UserRegistry};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the selected user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the selected user id, if present and well formed.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!(%error, "invalid user id in session cookie");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Resolve the caller for this request, falling back to the guest.
    pub fn caller(&self, registry: &UserRegistry) -> Result<Caller, Error> {
        let user = self
            .user_id()?
            .and_then(|id| registry.find(&id))
            .unwrap_or_else(|| registry.default_user());
        Ok(Caller::new(user))
    }

    /// Resolve the caller for a mutation; readonly identities are rejected
    /// before the request body is interpreted.
    pub fn writer(&self, registry: &UserRegistry) -> Result<Caller, Error> {
        let caller = self.caller(registry)?;
        caller.require_write()?;
        Ok(caller)
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
