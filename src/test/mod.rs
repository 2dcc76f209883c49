//! End-to-end tests which drive the real router against an in-memory
//! database.

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use diesel::prelude::*;
use serde_json::{Value, json};

use crate::{
    auth::{SESSION_COOKIE, StaticIdentity},
    config::{AppConfig, create_app},
    schema::{submission_members, submissions},
    state::{DbPool, open_pool},
};

mod auth;

pub const LEADER_TOKEN: &str = "leader-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";
pub const ORGANISER_TOKEN: &str = "organiser-token";

pub fn test_config() -> AppConfig {
    let identity = |token: &str, email: &str, name: Option<&str>| StaticIdentity {
        token: token.to_string(),
        email: email.to_string(),
        name: name.map(String::from),
    };

    let mut config = AppConfig {
        secret_key: Some("0".repeat(64)),
        ..Default::default()
    };
    config.auth.identities = vec![
        identity(LEADER_TOKEN, "ada@adypu.edu.in", Some("Ada Leader")),
        identity(OUTSIDER_TOKEN, "eve@gmail.com", Some("Eve")),
        identity(ORGANISER_TOKEN, "organiser@adypu.edu.in", None),
    ];
    config
}

pub fn test_server(config: AppConfig) -> (TestServer, DbPool) {
    let pool = open_pool(":memory:").unwrap();
    let app = create_app(pool.clone(), config).unwrap();
    (TestServer::new(app).unwrap(), pool)
}

/// Signs in through the callback and returns the session cookie.
pub async fn sign_in(server: &TestServer, token: &str) -> Cookie<'static> {
    let response = server
        .get("/auth/callback")
        .add_query_param("token", token)
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    response.cookie(SESSION_COOKIE)
}

/// `(submissions, members)` currently stored.
pub fn count_rows(pool: &DbPool) -> (i64, i64) {
    let mut conn = pool.get().unwrap();
    let teams = submissions::table
        .count()
        .get_result::<i64>(&mut *conn)
        .unwrap();
    let members = submission_members::table
        .count()
        .get_result::<i64>(&mut *conn)
        .unwrap();
    (teams, members)
}

fn person(prefix: &str, name: &str) -> Vec<(String, Value)> {
    let lower = name.to_lowercase();
    vec![
        (format!("{prefix}_name"), json!(name)),
        (format!("{prefix}_email"), json!(format!("{lower}@adypu.edu.in"))),
        (format!("{prefix}_urn"), json!(format!("E25B{}", name.len()))),
        (format!("{prefix}_phone"), json!("9876543210")),
        (format!("{prefix}_batch"), json!("2025-2029")),
        (
            format!("{prefix}_github"),
            json!(format!("https://github.com/{lower}")),
        ),
    ]
}

/// A complete team under the default rules.
pub fn valid_payload() -> serde_json::Map<String, Value> {
    let mut payload = serde_json::Map::new();
    payload.insert("team_name".to_string(), json!("404_Not_Found"));
    for (key, value) in person("leader", "Ada")
        .into_iter()
        .chain(person("member1", "Grace"))
        .chain(person("member2", "Alan"))
    {
        payload.insert(key, value);
    }
    payload.insert("team_size".to_string(), json!(3));
    payload
}

/// The same team as form fields, rules acknowledged.
pub fn valid_form() -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = valid_payload()
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect();
    for rule in crate::rules::RuleSet::ideathon().checklist {
        form.push((rule.field_name(), "on".to_string()));
    }
    form
}
