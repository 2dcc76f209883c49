//! Configuration and application assembly.
//!
//! Settings come from an optional TOML file, then environment variables
//! (`HOST`, `PORT`, `DATABASE_URL`, `SECRET_KEY`) override it.

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::{
    admin::{AdminConfig, submissions_csv, submissions_page},
    auth::{
        AuthConfig, IdentityProvider, StaticIdentities,
        login::{auth_callback, sign_in, sign_out},
    },
    landing::landing_page,
    registration::{do_register, registration_page},
    rules::{Preset, RuleSet},
    state::{AppState, DbPool},
    submissions::{
        api::{create_submission, list_submissions},
        store::Store,
    },
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("SECRET_KEY must be at least 64 bytes long")]
    SecretTooShort,
    #[error("invalid rule set: {0}")]
    InvalidRules(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Key material for the session cookie. Without one, a fresh key is
    /// generated at start-up and sessions do not survive a restart.
    pub secret_key: Option<String>,
    pub preset: Preset,
    /// A complete rule set, used instead of the preset when given.
    pub rules: Option<RuleSet>,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: ":memory:".to_string(),
            secret_key: None,
            preset: Preset::default(),
            rules: None,
            auth: AuthConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(secret) = var("SECRET_KEY") {
            self.secret_key = Some(secret);
        }
        Ok(())
    }

    /// The rule set in force, checked for consistency.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let rules = match &self.rules {
            Some(rules) => rules.clone(),
            None => self.preset.rule_set(),
        };

        if rules.min_team_size == 0 {
            return Err(ConfigError::InvalidRules(
                "min_team_size must be at least 1".to_string(),
            ));
        }
        if rules.min_team_size > rules.max_team_size {
            return Err(ConfigError::InvalidRules(format!(
                "min_team_size ({}) is larger than max_team_size ({})",
                rules.min_team_size, rules.max_team_size
            )));
        }
        if let Some(batch) = rules.default_batch.as_ref().filter(|batch| {
            !rules.batch_options.is_empty()
                && !rules.batch_options.contains(*batch)
        }) {
            return Err(ConfigError::InvalidRules(format!(
                "default batch {batch:?} is not one of the batch options"
            )));
        }
        Ok(rules)
    }

    pub fn cookie_key(&self) -> Result<Key, ConfigError> {
        match &self.secret_key {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|_| ConfigError::SecretTooShort),
            None => {
                tracing::warn!(
                    "no SECRET_KEY set, generating one; sessions will not survive a restart"
                );
                Ok(Key::generate())
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn create_app(pool: DbPool, config: AppConfig) -> Result<Router, ConfigError> {
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(StaticIdentities::new(&config.auth.identities));
    create_app_with_provider(pool, config, identity)
}

/// Like [`create_app`], with sign-in tokens verified by `identity`.
pub fn create_app_with_provider(
    pool: DbPool,
    config: AppConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<Router, ConfigError> {
    let rules = Arc::new(config.rule_set()?);
    let key = config.cookie_key()?;
    tracing::info!(
        event = %rules.event_name,
        min_team_size = rules.min_team_size,
        max_team_size = rules.max_team_size,
        "registration rules loaded"
    );

    let state = AppState {
        store: Store::new(pool),
        config: Arc::new(config),
        rules,
        key,
        identity,
    };

    Ok(Router::new()
        .route("/", get(landing_page))
        .route("/auth/sign-in", get(sign_in))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/sign-out", post(sign_out))
        .route("/register", get(registration_page).post(do_register))
        .route(
            "/api/submissions",
            get(list_submissions).post(create_submission),
        )
        .route("/admin/submissions", get(submissions_page))
        .route("/admin/submissions.csv", get(submissions_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::rules::MemberField;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.database_url, ":memory:");
        assert_eq!(config.rule_set().unwrap(), RuleSet::ideathon());
        assert_eq!(config.auth.allowed_domain, "@adypu.edu.in");
        assert!(config.admin.is_open());
    }

    #[test]
    fn parses_toml() {
        let config = AppConfig::from_toml(
            r#"
            port = 8080
            preset = "open"

            [auth]
            session_days = 1

            [[auth.identities]]
            token = "dev"
            email = "ada@adypu.edu.in"
            name = "Ada"

            [admin]
            emails = ["organiser@adypu.edu.in"]
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.rule_set().unwrap(), RuleSet::open());
        assert_eq!(config.auth.session_days, 1);
        assert_eq!(config.auth.allowed_domain, "@adypu.edu.in");
        assert_eq!(config.auth.identities[0].name.as_deref(), Some("Ada"));
        assert!(!config.admin.is_open());
    }

    #[test]
    fn custom_rules_override_preset() {
        let config = AppConfig::from_toml(
            r#"
            [rules]
            event_name = "Winter Hack"
            min_team_size = 2
            max_team_size = 4
            same_batch = false
            member_fields = ["name", "email", "phone"]
            required_fields = ["name", "email"]
            checklist = []
            "#,
        )
        .unwrap();

        let rules = config.rule_set().unwrap();
        assert_eq!(rules.event_name, "Winter Hack");
        assert_eq!(rules.member_slots(), 3);
        assert_eq!(rules.mandatory_slots(), 1);
        assert!(!rules.is_required(MemberField::Phone));
        // unspecified fields keep the defaults
        assert_eq!(rules.default_college, "NST-Pune");
    }

    #[test]
    fn inconsistent_rules_are_rejected() {
        let mut config = AppConfig::default();
        let mut rules = RuleSet::ideathon();
        rules.min_team_size = 4;
        config.rules = Some(rules);
        assert!(matches!(
            config.rule_set(),
            Err(ConfigError::InvalidRules(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("DATABASE_URL", "ideathon.db"),
            ("SECRET_KEY", "k"),
        ]
        .into();
        let mut config = AppConfig::default();
        config
            .apply_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "ideathon.db");
        assert!(matches!(config.cookie_key(), Err(ConfigError::SecretTooShort)));

        let bad: HashMap<&str, &str> = [("PORT", "http")].into();
        assert!(matches!(
            config.apply_env(|name| bad.get(name).map(|v| v.to_string())),
            Err(ConfigError::InvalidPort(_))
        ));
    }
}
