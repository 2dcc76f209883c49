use std::collections::HashMap;

use axum::async_trait;
use thiserror::Error;

use crate::auth::{Identity, StaticIdentity};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no sign-in token was supplied")]
    MissingToken,
    #[error("the sign-in token was not recognised")]
    UnknownToken,
}

/// Turns the token handed back by the sign-in flow into a verified identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, ProviderError>;
}

/// A fixed table of tokens, read from the configuration. Used for local
/// development and in tests.
#[derive(Debug, Default)]
pub struct StaticIdentities {
    by_token: HashMap<String, Identity>,
}

impl StaticIdentities {
    pub fn new(identities: &[StaticIdentity]) -> Self {
        Self {
            by_token: identities
                .iter()
                .map(|identity| {
                    (
                        identity.token.clone(),
                        Identity {
                            email: identity.email.trim().to_string(),
                            name: identity.name.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentities {
    async fn verify(&self, token: &str) -> Result<Identity, ProviderError> {
        if token.is_empty() {
            return Err(ProviderError::MissingToken);
        }
        self.by_token
            .get(token)
            .cloned()
            .ok_or(ProviderError::UnknownToken)
    }
}
