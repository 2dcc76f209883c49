//! Sign-in and sessions.
//!
//! Identities come from an [`IdentityProvider`]; a verified identity whose
//! email belongs to the allowed domain is kept in an encrypted session cookie.
//! The cookie is re-checked on every request.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use chrono::{Days, NaiveDateTime, Utc};
use hypertext::Rendered;
use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig, landing::render_landing, rules::RuleSet,
    validation::has_domain_suffix,
};

pub mod login;
pub mod provider;

pub use provider::{IdentityProvider, ProviderError, StaticIdentities};

pub const SESSION_COOKIE: &str = "ideathon_session";

/// Who the identity provider says the user is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: Option<String>,
}

/// An identity the static provider will vouch for, keyed by sign-in token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticIdentity {
    pub token: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Sessions are only granted to emails ending with this suffix.
    pub allowed_domain: String,
    /// Where `/auth/sign-in` sends the browser.
    pub sign_in_url: String,
    pub session_days: u64,
    pub identities: Vec<StaticIdentity>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: "@adypu.edu.in".to_string(),
            sign_in_url: "/auth/callback".to_string(),
            session_days: 7,
            identities: vec![],
        }
    }
}

impl AuthConfig {
    pub fn admit(&self, email: &str) -> bool {
        has_domain_suffix(email, &self.allowed_domain)
    }

    pub fn denial_message(&self) -> String {
        format!(
            "Access denied. Please sign in with your {} email address.",
            self.allowed_domain
        )
    }
}

#[derive(Serialize, Deserialize)]
struct SessionCookie {
    email: String,
    name: Option<String>,
    expiry: NaiveDateTime,
}

/// A signed-in user. Using this as an extractor makes a handler reachable
/// only with a valid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    email: String,
    name: Option<String>,
}

impl Session {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The outcome of reading the session cookie.
#[derive(Debug)]
pub enum SessionCheck {
    Anonymous,
    Active(Session),
    Expired,
    /// The session's email is (no longer) in the allowed domain.
    Denied,
}

impl SessionCheck {
    pub fn read(jar: &PrivateCookieJar, auth: &AuthConfig) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return SessionCheck::Anonymous;
        };

        let session: SessionCookie = match serde_json::from_str(cookie.value()) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable session cookie");
                return SessionCheck::Expired;
            }
        };

        if Utc::now().naive_utc() >= session.expiry {
            SessionCheck::Expired
        } else if !auth.admit(&session.email) {
            SessionCheck::Denied
        } else {
            SessionCheck::Active(Session {
                email: session.email,
                name: session.name,
            })
        }
    }
}

pub enum AuthError {
    SignedOut,
    Expired(PrivateCookieJar),
    Denied {
        jar: PrivateCookieJar,
        page: Rendered<String>,
    },
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::SignedOut => Redirect::to("/").into_response(),
            AuthError::Expired(jar) => {
                (remove_session_cookie(jar), Redirect::to("/")).into_response()
            }
            AuthError::Denied { jar, page } => (
                StatusCode::FORBIDDEN,
                remove_session_cookie(jar),
                Html(page.into_inner()),
            )
                .into_response(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<AppConfig>: FromRef<S>,
    Arc<RuleSet>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        let config = Arc::<AppConfig>::from_ref(state);

        match SessionCheck::read(&jar, &config.auth) {
            SessionCheck::Active(session) => Ok(session),
            SessionCheck::Anonymous => Err(AuthError::SignedOut),
            SessionCheck::Expired => Err(AuthError::Expired(jar)),
            SessionCheck::Denied => {
                let rules = Arc::<RuleSet>::from_ref(state);
                let message = config.auth.denial_message();
                Err(AuthError::Denied {
                    jar,
                    page: render_landing(
                        None,
                        Some(&message),
                        &rules,
                        &config.auth,
                    ),
                })
            }
        }
    }
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn set_session_cookie(
    identity: Identity,
    auth: &AuthConfig,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, serde_json::Error> {
    let expiry = Utc::now()
        .naive_utc()
        .checked_add_days(Days::new(auth.session_days))
        .unwrap_or(NaiveDateTime::MAX);
    let value = serde_json::to_string(&SessionCookie {
        email: identity.email,
        name: identity.name,
        expiry,
    })?;
    Ok(jar.add(session_cookie(value)))
}

pub fn remove_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};

    use super::*;

    fn jar() -> PrivateCookieJar {
        PrivateCookieJar::from_headers(
            &HeaderMap::new(),
            Key::from(&[7u8; 64][..]),
        )
    }

    fn identity(email: &str) -> Identity {
        Identity {
            email: email.to_string(),
            name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn session_round_trips_through_cookie() {
        let auth = AuthConfig::default();
        let jar = set_session_cookie(identity("ada@adypu.edu.in"), &auth, jar())
            .unwrap();
        match SessionCheck::read(&jar, &auth) {
            SessionCheck::Active(session) => {
                assert_eq!(session.email(), "ada@adypu.edu.in");
                assert_eq!(session.name(), Some("Ada"));
            }
            other => panic!("expected an active session, got {other:?}"),
        }
    }

    #[test]
    fn expired_and_foreign_sessions_are_rejected() {
        let auth = AuthConfig {
            session_days: 0,
            ..Default::default()
        };
        let jar = set_session_cookie(identity("ada@adypu.edu.in"), &auth, jar())
            .unwrap();
        assert!(matches!(
            SessionCheck::read(&jar, &auth),
            SessionCheck::Expired
        ));

        let auth = AuthConfig::default();
        let jar =
            set_session_cookie(identity("eve@gmail.com"), &auth, jar.clone())
                .unwrap();
        assert!(matches!(
            SessionCheck::read(&jar, &auth),
            SessionCheck::Denied
        ));
    }

    #[test]
    fn domain_check_ignores_case() {
        let auth = AuthConfig::default();
        assert!(auth.admit("Ada@ADYPU.edu.in"));
        assert!(!auth.admit("ada@adypu.edu.in.evil.com"));
        assert_eq!(
            auth.denial_message(),
            "Access denied. Please sign in with your @adypu.edu.in email address."
        );
    }
}
