use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Map, Value};

use crate::{
    admin::is_admin,
    auth::Session,
    config::AppConfig,
    error::ApiError,
    form_state::FormState,
    rules::RuleSet,
    submissions::{Submission, store::Store},
};

/// `GET /api/submissions`, newest first.
pub async fn list_submissions(
    State(store): State<Store>,
    State(config): State<Arc<AppConfig>>,
    session: Option<Session>,
    headers: HeaderMap,
) -> Result<Json<Vec<Submission>>, ApiError> {
    if !is_admin(&config.admin, session.as_ref(), &headers) {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(store.list().await?))
}

/// `POST /api/submissions`. Validates the same way the form does, except that
/// the rules checklist is not part of the payload.
pub async fn create_submission(
    State(store): State<Store>,
    State(rules): State<Arc<RuleSet>>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejected submission payload");
        ApiError::MalformedPayload
    })?;
    let state = FormState::from_json(&payload).map_err(|key| {
        tracing::debug!(%key, "nested value in submission payload");
        ApiError::MalformedPayload
    })?;

    let submission = rules.validate(&state).inspect_err(|e| {
        tracing::debug!(error = %e, "submission failed validation");
    })?;
    let stored = store.insert(submission).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}
