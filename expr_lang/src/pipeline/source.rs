//! Loading expression source from files

use crate::config::compile_time::source::MAX_SOURCE_SIZE;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Source loading errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {MAX_SOURCE_SIZE})")]
    FileTooLarge { size: u64 },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading {path}: {message}")]
    IoError { path: String, message: String },
}

impl SourceError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::FileNotFound { .. } => codes::source::FILE_NOT_FOUND,
            SourceError::FileTooLarge { .. } => codes::source::SOURCE_TOO_LARGE,
            SourceError::InvalidEncoding { .. } => codes::source::INVALID_ENCODING,
            SourceError::IoError { .. } => codes::source::IO_ERROR,
        }
    }

    fn from_io(path: &str, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => SourceError::FileNotFound {
                path: path.to_string(),
            },
            ErrorKind::InvalidData => SourceError::InvalidEncoding {
                path: path.to_string(),
            },
            _ => SourceError::IoError {
                path: path.to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Read a UTF-8 expression file, refusing anything over the size limit
pub fn load_source(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    log_debug!("Loading source", "file" => display);

    let result = fs::metadata(path)
        .map_err(|e| SourceError::from_io(&display, e))
        .and_then(|metadata| {
            if metadata.len() > MAX_SOURCE_SIZE {
                return Err(SourceError::FileTooLarge {
                    size: metadata.len(),
                });
            }
            fs::read_to_string(path).map_err(|e| SourceError::from_io(&display, e))
        });

    match &result {
        Ok(source) => log_success!(
            codes::success::SOURCE_LOADED,
            "Source loaded",
            "file" => display,
            "bytes" => source.len()
        ),
        Err(error) => log_error!(error.error_code(), &error.to_string(), "file" => display),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "4 |> add(2)").unwrap();
        assert_eq!(load_source(file.path()).unwrap(), "4 |> add(2)");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_source(dir.path().join("absent.expr")).unwrap_err();
        assert_matches!(error, SourceError::FileNotFound { .. });
        assert_eq!(error.error_code(), codes::source::FILE_NOT_FOUND);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x31, 0xff, 0xfe]).unwrap();
        assert_matches!(
            load_source(file.path()),
            Err(SourceError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_oversized_file() {
        let mut file = NamedTempFile::new().unwrap();
        let chunk = vec![b' '; 64 * 1024];
        let mut written = 0u64;
        while written <= MAX_SOURCE_SIZE {
            file.write_all(&chunk).unwrap();
            written += chunk.len() as u64;
        }
        file.flush().unwrap();
        assert_matches!(
            load_source(file.path()),
            Err(SourceError::FileTooLarge { size }) if size == written
        );
    }
}
