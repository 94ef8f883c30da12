/**
 * Credential storage.
 *  A single TOML file mapping usernames to bcrypt
 *  password hashes. Plaintext passwords are hashed
 *  on the way in and never persisted or logged.
 */
pub mod credentials;
/**
 * Document storage.
 *  Flat-file documents in one directory, gated by
 *  file extension, plus content-type-aware rendering
 *  (markdown to HTML, everything else verbatim).
 */
pub mod documents;
/**
 * Helper for reporting build version information
 *  stamped at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::credentials::{CredentialError, CredentialStore};
    pub use crate::documents::{render, DocumentError, DocumentStore, RenderedDocument};
    pub use crate::version::build_info;
}
