use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    /// Target is locked by another program or the directory is not writable.
    #[error("permission denied while saving '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to save '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("saved file does not match the template: {0}")]
    Verification(String),
}

impl TemplateError {
    /// Classifies an I/O failure that happened while writing `path`.
    pub(crate) fn from_save(path: PathBuf, e: std::io::Error) -> TemplateError {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => TemplateError::PermissionDenied { path },
            _ => TemplateError::Save { path, source: e },
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, TemplateError::PermissionDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_are_classified() {
        let e = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err = TemplateError::from_save(PathBuf::from("out.xlsx"), e);
        assert!(err.is_permission_denied());
        assert_eq!(err.to_string(), "permission denied while saving 'out.xlsx'");
    }

    #[test]
    fn other_errors_keep_their_source() {
        let e = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = TemplateError::from_save(PathBuf::from("out.xlsx"), e);
        assert!(!err.is_permission_denied());
        assert_eq!(err.to_string(), "failed to save 'out.xlsx': disk full");
    }
}
