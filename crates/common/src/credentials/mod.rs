mod store;

pub use store::{CredentialError, CredentialStore};
