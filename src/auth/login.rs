use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    auth::{IdentityProvider, remove_session_cookie, set_session_cookie},
    config::AppConfig,
    landing::render_landing,
    rules::RuleSet,
    util_resp::{
        StandardResponse, forbidden, see_other_ok, server_error, unauthorized,
    },
};

pub async fn sign_in(State(config): State<Arc<AppConfig>>) -> Redirect {
    Redirect::to(&config.auth.sign_in_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    token: String,
}

pub async fn auth_callback(
    State(provider): State<Arc<dyn IdentityProvider>>,
    State(config): State<Arc<AppConfig>>,
    State(rules): State<Arc<RuleSet>>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> (PrivateCookieJar, StandardResponse) {
    let auth = &config.auth;

    let identity = match provider.verify(&params.token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(error = %e, "sign-in failed");
            return (
                remove_session_cookie(jar),
                unauthorized(render_landing(
                    None,
                    Some("Sign-in failed. Please try again."),
                    &rules,
                    auth,
                )),
            );
        }
    };

    if !auth.admit(&identity.email) {
        tracing::warn!(email = %identity.email, "sign-in from outside the allowed domain");
        return (
            remove_session_cookie(jar),
            forbidden(render_landing(
                None,
                Some(&auth.denial_message()),
                &rules,
                auth,
            )),
        );
    }

    let email = identity.email.clone();
    match set_session_cookie(identity, auth, jar.clone()) {
        Ok(jar) => {
            tracing::info!(%email, "signed in");
            (jar, see_other_ok(Redirect::to("/register")))
        }
        Err(e) => {
            tracing::error!(error = %e, "could not encode session cookie");
            (
                jar,
                server_error(render_landing(
                    None,
                    Some("Sign-in failed. Please try again."),
                    &rules,
                    auth,
                )),
            )
        }
    }
}

pub async fn sign_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (remove_session_cookie(jar), Redirect::to("/"))
}
