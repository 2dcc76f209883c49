//! The multi-step registration form.
//!
//! A signed-in leader first acknowledges the rules checklist (if the rule set
//! has one), then fills in the team's details. Acknowledgements travel as
//! hidden fields, so the final submit carries everything and is re-checked.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use hypertext::prelude::*;
use thiserror::Error;

use crate::{
    auth::Session,
    form_state::FormState,
    rules::{MemberField, Person, RuleSet, ValidationError},
    submissions::{
        Submission,
        store::{Store, StoreError},
    },
    template::Page,
    util_resp::{StandardResponse, bad_request, server_error, success},
};

pub mod view;

use view::{AlreadyRegistered, Checklist, Completed, RegistrationForm};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("You or this team has already registered!")]
    AlreadyRegistered,
    #[error("Something went wrong while saving your registration. Please try again.")]
    Store(StoreError),
}

impl From<StoreError> for SubmitError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => SubmitError::AlreadyRegistered,
            e => SubmitError::Store(e),
        }
    }
}

impl SubmitError {
    /// The banner shown above the form.
    pub fn message(&self) -> String {
        match self {
            SubmitError::Invalid(e) => e.detail(),
            other => other.to_string(),
        }
    }
}

/// Checks the acknowledgements and the details, then stores the submission.
pub async fn submit(
    store: &Store,
    rules: &RuleSet,
    state: &FormState,
) -> Result<Submission, SubmitError> {
    rules.check_acknowledged(state)?;
    let submission = rules.validate(state)?;
    Ok(store.insert(submission).await?)
}

/// Fills in what the session already tells us about the leader.
fn apply_session(state: &mut FormState, session: &Session) {
    state.set(&Person::Leader.key(MemberField::Email), session.email());
    if let Some(name) = session.name() {
        state.set(&Person::Leader.key(MemberField::Name), name);
    }
}

/// Whether this leader has a submission already. A failed lookup is treated
/// as "no", since the insert's uniqueness check still stands behind it.
async fn already_registered(store: &Store, session: &Session) -> bool {
    match store.exists_for_leader(session.email()).await {
        Ok(exists) => exists,
        Err(e) => {
            tracing::warn!(error = %e, "duplicate check failed, continuing");
            false
        }
    }
}

fn page(
    rules: &RuleSet,
    session: &Session,
    body: impl Renderable,
) -> hypertext::Rendered<String> {
    Page::new()
        .title(rules.event_name.clone())
        .session(session.clone())
        .body(body)
        .render()
}

/// `GET /register`. Shows the checklist until every rule is ticked, then the
/// details form.
pub async fn registration_page(
    session: Session,
    State(store): State<Store>,
    State(rules): State<Arc<RuleSet>>,
    Query(query): Query<Vec<(String, String)>>,
) -> StandardResponse {
    if already_registered(&store, &session).await {
        return success(page(
            &rules,
            &session,
            AlreadyRegistered {
                event_name: &rules.event_name,
            },
        ));
    }

    let mut state = FormState::from_form_pairs(query);
    let from_checklist = state.get("step") == "rules";

    if !rules.acknowledged(&state) {
        let checklist = |error: Option<String>| Checklist {
            rules: &rules,
            state: &state,
            error,
        };
        return if from_checklist {
            bad_request(page(
                &rules,
                &session,
                checklist(Some(
                    "Please check all rules before continuing.".to_string(),
                )),
            ))
        } else {
            success(page(&rules, &session, checklist(None)))
        };
    }

    apply_session(&mut state, &session);
    success(page(
        &rules,
        &session,
        RegistrationForm {
            rules: &rules,
            state: &state,
            session: &session,
            error: None,
        },
    ))
}

/// `POST /register`.
pub async fn do_register(
    session: Session,
    State(store): State<Store>,
    State(rules): State<Arc<RuleSet>>,
    Form(form): Form<Vec<(String, String)>>,
) -> StandardResponse {
    let mut state = FormState::from_form_pairs(form);
    apply_session(&mut state, &session);

    match submit(&store, &rules, &state).await {
        Ok(submission) => success(page(
            &rules,
            &session,
            Completed {
                team_name: &submission.team_name,
                event_name: &rules.event_name,
            },
        )),
        Err(SubmitError::Invalid(ValidationError::RulesNotAcknowledged)) => {
            bad_request(page(
                &rules,
                &session,
                Checklist {
                    rules: &rules,
                    state: &state,
                    error: Some(
                        ValidationError::RulesNotAcknowledged.to_string(),
                    ),
                },
            ))
        }
        Err(e) => {
            let form = RegistrationForm {
                rules: &rules,
                state: &state,
                session: &session,
                error: Some(e.message()),
            };
            match e {
                SubmitError::Store(ref e) => {
                    tracing::error!(error = %e, "failed to store registration");
                    server_error(page(&rules, &session, form))
                }
                SubmitError::Invalid(ref e) => {
                    tracing::debug!(error = %e, "registration rejected");
                    bad_request(page(&rules, &session, form))
                }
                SubmitError::AlreadyRegistered => {
                    bad_request(page(&rules, &session, form))
                }
            }
        }
    }
}
