use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::{ok, Ready};
use log::debug;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::services::auth::{TokenService, ACCESS_TOKEN_COOKIE};

/// Resolves the caller identity from the session cookie.
///
/// A valid `access_token` cookie puts an
/// [`AuthenticatedUser`](crate::models::authenticated_user::AuthenticatedUser)
/// into the request extensions. Missing, expired or tampered tokens leave the request anonymous;
/// the authorization policy in each handler decides what anonymous callers may do.
#[derive(Clone)]
pub struct SessionAuthentication {
    tokens: TokenService,
}

impl SessionAuthentication {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionAuthenticationMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        })
    }
}

pub struct SessionAuthenticationMiddleware<S> {
    service: Rc<S>,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for SessionAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req.cookie(ACCESS_TOKEN_COOKIE).map(|cookie| cookie.value().to_string());

        match token {
            Some(token) if !token.is_empty() => match self.tokens.verify(&token) {
                Ok(identity) => {
                    debug!(
                        "Session resolved for account {} ({}) on {}",
                        identity.user_id,
                        identity.role,
                        req.path()
                    );
                    req.extensions_mut().insert(identity);
                }
                Err(e) => debug!("Ignoring invalid session cookie on {}: {}", req.path(), e),
            },
            _ => debug!("No session cookie on {} {}", req.method(), req.path()),
        }

        self.service.call(req)
    }
}

