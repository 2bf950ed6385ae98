//! # Media Library
//!
//! A filesystem stand-in for the device photo library: finished exports are
//! imported by copy, gated by a runtime authorization check. Import only
//! proceeds once authorization is granted; a not-yet-determined status is
//! resolved by requesting authorization at import time.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::LibraryError;

/// Runtime authorization status for library access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    NotDetermined,
    Granted,
    Denied,
}

/// Destination for finished exports.
pub struct MediaLibrary {
    root: PathBuf,
    authorization: Authorization,
}

impl MediaLibrary {
    pub fn new<P: Into<PathBuf>>(root: P, authorization: Authorization) -> Self {
        Self {
            root: root.into(),
            authorization,
        }
    }

    /// Current authorization status.
    pub fn authorization(&self) -> Authorization {
        self.authorization
    }

    /// Resolve a not-yet-determined status. The filesystem stand-in always
    /// grants; a denied status stays denied.
    pub fn request_authorization(&mut self) -> Authorization {
        if self.authorization == Authorization::NotDetermined {
            debug!("library authorization requested, granting");
            self.authorization = Authorization::Granted;
        }
        self.authorization
    }

    /// Copy a finished export into the library, returning the new path.
    pub fn import(&mut self, file: &Path) -> Result<PathBuf, LibraryError> {
        if self.authorization == Authorization::NotDetermined {
            self.request_authorization();
        }
        if self.authorization != Authorization::Granted {
            return Err(LibraryError::NotAuthorized);
        }

        let file_name = file.file_name().ok_or_else(|| LibraryError::ImportFailed {
            path: file.display().to_string(),
            reason: "not a file".to_string(),
        })?;

        std::fs::create_dir_all(&self.root).map_err(|e| LibraryError::ImportFailed {
            path: self.root.display().to_string(),
            reason: e.to_string(),
        })?;

        let destination = self.root.join(file_name);
        std::fs::copy(file, &destination).map_err(|e| LibraryError::ImportFailed {
            path: file.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Imported {:?} into library", destination);
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exported_file(dir: &Path) -> PathBuf {
        let file = dir.join("mergedVideo-test.mov");
        std::fs::write(&file, b"movie bytes").unwrap();
        file
    }

    #[test]
    fn test_import_when_granted() {
        let dir = tempdir().unwrap();
        let file = exported_file(dir.path());

        let mut library =
            MediaLibrary::new(dir.path().join("library"), Authorization::Granted);
        let imported = library.import(&file).unwrap();

        assert!(imported.exists());
        assert_eq!(std::fs::read(&imported).unwrap(), b"movie bytes");
    }

    #[test]
    fn test_import_requests_authorization() {
        let dir = tempdir().unwrap();
        let file = exported_file(dir.path());

        let mut library =
            MediaLibrary::new(dir.path().join("library"), Authorization::NotDetermined);
        assert!(library.import(&file).is_ok());
        assert_eq!(library.authorization(), Authorization::Granted);
    }

    #[test]
    fn test_import_denied() {
        let dir = tempdir().unwrap();
        let file = exported_file(dir.path());

        let mut library = MediaLibrary::new(dir.path().join("library"), Authorization::Denied);
        let err = library.import(&file).unwrap_err();
        assert!(matches!(err, LibraryError::NotAuthorized));

        // Nothing was written
        assert!(!dir.path().join("library").exists());
    }
}
