//! The public landing page.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html};
use axum_extra::extract::PrivateCookieJar;
use hypertext::{Rendered, prelude::*};

use crate::{
    auth::{AuthConfig, Session, SessionCheck, remove_session_cookie},
    config::AppConfig,
    rules::RuleSet,
    template::Page,
    widgets::alert::ErrorAlert,
};

const FEATURES: [(&str, &str); 3] = [
    (
        "24 hours of coding",
        "Push your limits in an uninterrupted weekend of rapid prototyping alongside the best talent.",
    ),
    (
        "Expert mentorship",
        "Get guidance from industry veterans and professors on the architecture of your product.",
    ),
    (
        "Prize pool",
        "Cash prizes, tech gear and seed-funding opportunities for the most innovative solutions.",
    ),
];

const TIMELINE: [(&str, &str, &str); 3] = [
    (
        "Registration opens",
        "Form your team and lock in your details. Registration requires university credentials.",
        "Feb 25, 2026",
    ),
    (
        "Hackathon kickoff",
        "Opening ceremony, problem statement reveal and the start of the 24-hour sprint.",
        "Feb 28, 2026",
    ),
    (
        "Final pitches and judging",
        "Submit your repositories. Top teams pitch their prototypes live to the judges.",
        "Mar 1, 2026",
    ),
];

/// `GET /`. A session that is no longer valid is cleared here rather than
/// redirecting, since this is where the redirect would lead anyway.
pub async fn landing_page(
    State(config): State<Arc<AppConfig>>,
    State(rules): State<Arc<RuleSet>>,
    jar: PrivateCookieJar,
) -> (StatusCode, PrivateCookieJar, Html<String>) {
    let auth = &config.auth;
    match SessionCheck::read(&jar, auth) {
        SessionCheck::Active(session) => (
            StatusCode::OK,
            jar,
            Html(render_landing(Some(&session), None, &rules, auth).into_inner()),
        ),
        SessionCheck::Anonymous => (
            StatusCode::OK,
            jar,
            Html(render_landing(None, None, &rules, auth).into_inner()),
        ),
        SessionCheck::Expired => (
            StatusCode::OK,
            remove_session_cookie(jar),
            Html(render_landing(None, None, &rules, auth).into_inner()),
        ),
        SessionCheck::Denied => (
            StatusCode::FORBIDDEN,
            remove_session_cookie(jar),
            Html(
                render_landing(
                    None,
                    Some(&auth.denial_message()),
                    &rules,
                    auth,
                )
                .into_inner(),
            ),
        ),
    }
}

pub fn render_landing(
    session: Option<&Session>,
    error: Option<&str>,
    rules: &RuleSet,
    auth: &AuthConfig,
) -> Rendered<String> {
    let team_size = if rules.min_team_size == rules.max_team_size {
        format!("Teams of exactly {} members.", rules.min_team_size)
    } else {
        format!(
            "Teams of {} to {} members, leader included.",
            rules.min_team_size, rules.max_team_size
        )
    };

    Page::new()
        .title(rules.event_name.clone())
        .session_opt(session.cloned())
        .body(maud! {
            div class="container py-5" {
                @if let Some(error) = error {
                    ErrorAlert msg=(error);
                }
                section class="text-center py-5" {
                    span class="badge text-bg-success mb-3" { "Registration is live" }
                    h1 class="display-4 fw-bold" { (rules.event_name) }
                    p class="lead col-lg-8 mx-auto" {
                        (format!(
                            "{}'s hackathon for builders. Solve real problems and create the future over 24 hours of coding.",
                            rules.default_college
                        ))
                    }
                    @if session.is_some() {
                        a class="btn btn-primary btn-lg" href="/register" {
                            "Continue to registration"
                        }
                    } @else {
                        a class="btn btn-primary btn-lg" href="/auth/sign-in" {
                            "Sign in with Google"
                        }
                    }
                }
                section id="about" class="py-5" {
                    h2 class="fw-bold mb-4" { "What to Expect" }
                    div class="row g-4" {
                        @for (title, text) in FEATURES {
                            div class="col-md-4" {
                                div class="card h-100" {
                                    div class="card-body" {
                                        h3 class="h5 card-title" { (title) }
                                        p class="card-text" { (text) }
                                    }
                                }
                            }
                        }
                    }
                }
                section id="timeline" class="py-5" {
                    h2 class="fw-bold mb-4" { "Event Timeline" }
                    ol class="list-group list-group-numbered" {
                        @for (title, text, date) in TIMELINE {
                            li class="list-group-item d-flex justify-content-between align-items-start" {
                                div class="ms-2 me-auto" {
                                    div class="fw-bold" { (title) }
                                    (text)
                                }
                                span class="badge text-bg-secondary" { (date) }
                            }
                        }
                    }
                }
                section class="text-center py-5" {
                    h2 class="fw-bold" { "Ready to register?" }
                    p {
                        (team_size)
                        " "
                        (format!(
                            "Signing in requires your university email ({}).",
                            auth.allowed_domain
                        ))
                    }
                    @if session.is_some() {
                        a class="btn btn-outline-primary" href="/register" {
                            "Register your team"
                        }
                    } @else {
                        a class="btn btn-outline-primary" href="/auth/sign-in" {
                            "Sign in to register"
                        }
                    }
                }
            }
        })
        .render()
}
