//! Read-only views of the submissions for the organisers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use hypertext::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    auth::Session,
    config::AppConfig,
    rules::{RuleSet, field_label},
    submissions::{Submission, store::Store},
    template::Page,
    util_resp::{StandardResponse, forbidden, server_error, success},
    widgets::{actions::ActionBar, alert::ErrorAlert},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Sessions with one of these emails may read the submissions.
    pub emails: Vec<String>,
    /// Accepted as `Authorization: Bearer <token>`.
    pub token: Option<String>,
}

impl AdminConfig {
    /// With nothing configured, the listing is open to anyone.
    pub fn is_open(&self) -> bool {
        self.emails.is_empty() && self.token.is_none()
    }
}

pub fn is_admin(
    config: &AdminConfig,
    session: Option<&Session>,
    headers: &HeaderMap,
) -> bool {
    if config.is_open() {
        return true;
    }

    let by_session = session.is_some_and(|session| {
        config
            .emails
            .iter()
            .any(|email| email.trim().eq_ignore_ascii_case(session.email()))
    });
    let by_token = match (&config.token, headers.get(AUTHORIZATION)) {
        (Some(token), Some(header)) => header
            .to_str()
            .ok()
            .and_then(|header| header.strip_prefix("Bearer "))
            .is_some_and(|given| given.trim() == token),
        _ => false,
    };

    by_session || by_token
}

/// The column names of the flat export: the fields of the widest team
/// present, or of a full team under the current rules if that is wider.
fn columns(submissions: &[Submission], rules: &RuleSet) -> Vec<String> {
    let members = submissions
        .iter()
        .map(|s| s.members.len())
        .max()
        .unwrap_or(0)
        .max(rules.member_slots());
    let widest = Submission {
        id: String::new(),
        team_name: String::new(),
        leader: Default::default(),
        members: vec![Default::default(); members],
        team_size: 0,
        college: String::new(),
        created_at: Default::default(),
    };

    let mut columns = vec!["id".to_string(), "team_name".to_string()];
    columns.extend(widest.person_fields().into_iter().map(|(key, _)| key));
    columns.extend(
        ["team_size", "college", "created_at"].map(String::from),
    );
    columns
}

fn row(submission: &Submission, columns: &[String]) -> Vec<String> {
    let people = submission.person_fields();
    columns
        .iter()
        .map(|column| match column.as_str() {
            "id" => submission.id.clone(),
            "team_name" => submission.team_name.clone(),
            "team_size" => submission.team_size.to_string(),
            "college" => submission.college.clone(),
            "created_at" => submission.created_at.to_string(),
            key => people
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, value)| *value)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

pub fn to_csv(
    submissions: &[Submission],
    rules: &RuleSet,
) -> Result<String, csv::Error> {
    let columns = columns(submissions, rules);
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(&columns)?;
    for submission in submissions {
        writer.write_record(row(submission, &columns))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn denied(rules: &RuleSet, session: Option<Session>) -> StandardResponse {
    forbidden(
        Page::new()
            .title(rules.event_name.clone())
            .session_opt(session)
            .body(maud! {
                div class="container py-5" {
                    ErrorAlert msg="You do not have permission to view the submissions.";
                }
            })
            .render(),
    )
}

/// `GET /admin/submissions`.
pub async fn submissions_page(
    State(store): State<Store>,
    State(config): State<Arc<AppConfig>>,
    State(rules): State<Arc<RuleSet>>,
    session: Option<Session>,
    headers: HeaderMap,
) -> StandardResponse {
    if !is_admin(&config.admin, session.as_ref(), &headers) {
        return denied(&rules, session);
    }

    let submissions = match store.list().await {
        Ok(submissions) => submissions,
        Err(e) => {
            tracing::error!(error = %e, "could not list submissions");
            return server_error(
                Page::new()
                    .title(rules.event_name.clone())
                    .session_opt(session)
                    .body(maud! {
                        div class="container py-5" {
                            ErrorAlert msg="Could not load the submissions.";
                        }
                    })
                    .render(),
            );
        }
    };
    let columns = columns(&submissions, &rules);

    success(
        Page::new()
            .title(rules.event_name.clone())
            .session_opt(session)
            .body(maud! {
                div class="container-fluid py-4" {
                    h1 class="h3" {
                        (format!("Submissions ({})", submissions.len()))
                    }
                    ActionBar options=(&[("/admin/submissions.csv", "Download CSV")]);
                    @if submissions.is_empty() {
                        p class="text-muted" { "No teams have registered yet." }
                    } @else {
                        div class="table-responsive" {
                            table class="table table-sm table-striped" {
                                thead {
                                    tr {
                                        @for column in &columns {
                                            th scope="col" { (field_label(column)) }
                                        }
                                    }
                                }
                                tbody {
                                    @for submission in &submissions {
                                        tr {
                                            @for cell in row(submission, &columns) {
                                                td { (cell) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            })
            .render(),
    )
}

/// `GET /admin/submissions.csv`.
pub async fn submissions_csv(
    State(store): State<Store>,
    State(config): State<Arc<AppConfig>>,
    State(rules): State<Arc<RuleSet>>,
    session: Option<Session>,
    headers: HeaderMap,
) -> Response {
    if !is_admin(&config.admin, session.as_ref(), &headers) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let csv = match store.list().await {
        Ok(submissions) => to_csv(&submissions, &rules),
        Err(e) => {
            tracing::error!(error = %e, "could not list submissions");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
                .into_response();
        }
    };

    match csv {
        Ok(csv) => (
            [
                (CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
                (
                    CONTENT_DISPOSITION,
                    HeaderValue::from_static(
                        "attachment; filename=\"submissions.csv\"",
                    ),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "could not write csv export");
            (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response()
        }
    }
}
