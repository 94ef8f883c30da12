use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use common::prelude::{CredentialStore, DocumentStore};

use crate::config::Config;

/// Capability check for the single privileged identity.
///
/// Handlers never compare usernames themselves; they ask the policy whether
/// the session's identity may manage documents.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    admin_user: String,
}

impl AccessPolicy {
    pub fn new(admin_user: impl Into<String>) -> Self {
        Self {
            admin_user: admin_user.into(),
        }
    }

    /// Whether `username` may create, edit, duplicate, or delete documents.
    pub fn can_manage_documents(&self, username: Option<&str>) -> bool {
        username == Some(self.admin_user.as_str())
    }
}

/// Main service state - stores, access policy, and the cookie signing key.
#[derive(Clone)]
pub struct AppState {
    documents: DocumentStore,
    credentials: CredentialStore,
    policy: AccessPolicy,
    key: Key,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, AppStateError> {
        std::fs::create_dir_all(&config.data_dir)?;

        let key = match &config.session_secret {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => Key::generate(),
        };

        Ok(Self {
            documents: DocumentStore::new(&config.data_dir),
            credentials: CredentialStore::new(&config.credentials_path),
            policy: AccessPolicy::new(config.admin_user.clone()),
            key,
        })
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

// SignedCookieJar finds its signing key through `FromRef`.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("failed to prepare storage directories: {0}")]
    Io(#[from] std::io::Error),
}
