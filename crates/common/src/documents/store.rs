use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extensions a document may be created or edited with. Files with other
/// extensions already present in the storage directory are still listable.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Placeholder content written by [`DocumentStore::create`].
pub const DEFAULT_CONTENT: &[u8] = b"default";

/// Flat-file document storage over a single directory.
///
/// Document names are bare file names; anything containing a path separator
/// or dot-directory component is rejected before it ever touches a path join,
/// so a request cannot escape the storage directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{0} does not exist")]
    NotFound(String),
    #[error("A name is required.")]
    NameRequired,
    #[error("Please use a valid extension (.txt or .md).")]
    UnsupportedExtension(String),
    #[error("invalid document name: {0}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the files currently in the storage directory, sorted.
    /// Subdirectories and non-UTF-8 names are skipped.
    pub fn list(&self) -> Result<Vec<String>, DocumentError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Whether `name` is present in the current listing.
    pub fn exists(&self, name: &str) -> bool {
        match self.checked_path(name) {
            Ok(path) => path.is_file(),
            Err(_) => false,
        }
    }

    /// Raw content bytes of `name`.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
        let path = self.checked_path(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create or overwrite `name` with `content`.
    ///
    /// The bytes go to a temporary file in the storage directory first and
    /// are renamed into place, so a concurrent reader never observes a torn
    /// file.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        let path = self.checked_path(name)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content)?;
        tmp.persist(&path).map_err(|e| DocumentError::Io(e.error))?;
        Ok(())
    }

    /// Create `name` with the default placeholder content.
    ///
    /// Fails when the name is empty or its extension is not in
    /// [`ALLOWED_EXTENSIONS`]. There is no existence check: creating a name
    /// that already exists resets it to the placeholder.
    pub fn create(&self, name: &str) -> Result<(), DocumentError> {
        if name.is_empty() {
            return Err(DocumentError::NameRequired);
        }
        if !Self::extension_allowed(name) {
            return Err(DocumentError::UnsupportedExtension(name.to_string()));
        }
        self.write(name, DEFAULT_CONTENT)
    }

    /// Copy `name` to a new document named `"copy " + name` and return the
    /// derived name. Overwrites silently if the derived name already exists.
    pub fn duplicate(&self, name: &str) -> Result<String, DocumentError> {
        let copy_name = format!("copy {name}");
        let content = self.read(name)?;
        self.write(&copy_name, &content)?;
        Ok(copy_name)
    }

    /// Remove `name` from the storage directory.
    pub fn delete(&self, name: &str) -> Result<(), DocumentError> {
        let path = self.checked_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `name` carries an extension documents may be created or
    /// edited with.
    pub fn extension_allowed(name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Joins `name` onto the storage root, rejecting anything that is not a
    /// bare file name.
    fn checked_path(&self, name: &str) -> Result<PathBuf, DocumentError> {
        if name.is_empty() {
            return Err(DocumentError::NameRequired);
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DocumentError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}
