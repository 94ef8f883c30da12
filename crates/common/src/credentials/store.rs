use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Credential storage over a single TOML file of `username = "hash"` pairs.
///
/// Passwords are hashed with bcrypt; the plaintext is never persisted or
/// logged, and verification uses the scheme's own salted comparison.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("A username is required.")]
    UsernameRequired,
    #[error("A password is required.")]
    PasswordRequired,
    #[error("That username is already taken.")]
    UsernameTaken,
    #[error("credential file parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("credential file serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full username to hash mapping. An absent or empty file is an
    /// empty mapping.
    pub fn load_all(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(toml::from_str(&raw)?)
    }

    /// Whether `password` matches the stored hash for `username`. Unknown
    /// usernames and malformed stored hashes verify false.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let credentials = self.load_all()?;
        match credentials.get(username) {
            Some(hash) => Ok(bcrypt::verify(password, hash).unwrap_or(false)),
            None => Ok(false),
        }
    }

    /// Hash a plaintext password with a fresh salt.
    pub fn hash(password: &str) -> Result<String, CredentialError> {
        Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
    }

    /// Register a new user and persist the full mapping back to disk.
    ///
    /// A persisted structure that does not parse as a username to hash table
    /// starts over as an empty mapping. Registering an already-present
    /// username fails and leaves the stored hash unchanged.
    pub fn register(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::UsernameRequired);
        }
        if password.is_empty() {
            return Err(CredentialError::PasswordRequired);
        }

        let mut credentials = match self.load_all() {
            Ok(credentials) => credentials,
            Err(CredentialError::TomlDe(e)) => {
                tracing::warn!("credential file is not a table, starting over: {}", e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        if credentials.contains_key(username) {
            return Err(CredentialError::UsernameTaken);
        }

        credentials.insert(username.to_string(), Self::hash(password)?);
        self.persist(&credentials)
    }

    /// Write the full mapping back through a temporary file and an atomic
    /// rename.
    fn persist(&self, credentials: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        let serialized = toml::to_string_pretty(credentials)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| CredentialError::Io(e.error))?;
        Ok(())
    }
}
