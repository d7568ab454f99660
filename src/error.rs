use std::fmt;

use thiserror::Error;

// Machine-readable error category, rendered the way the error reports print it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadValue,
    BadFormat,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadValue => "BAD_VALUE",
            ErrorCode::BadFormat => "BAD_FORMAT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured failure from decoding or classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid value for header {name}: expected {expected} got {actual}")]
    HeaderValue {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("header {name} needs 4 bytes at offset {offset}; stream has only {len} bytes")]
    TruncatedHeader {
        name: String,
        offset: usize,
        len: usize,
    },

    #[error("header {0} is required but not part of the header spec")]
    MissingHeader(&'static str),

    #[error(
        "expected {expected} ({n_rows} x {n_cols} x {n_images}) of image data; got {actual} bytes instead"
    )]
    ImageDataLength {
        expected: u64,
        n_rows: u32,
        n_cols: u32,
        n_images: u32,
        actual: usize,
    },

    #[error("expected {expected} labels; got {actual} bytes instead")]
    LabelDataLength { expected: u32, actual: usize },

    #[error("# of images {n_images} does not match # of labels {n_labels}")]
    CountMismatch { n_images: u32, n_labels: u32 },

    #[error(
        "training features at index {index} has different # of points {actual} than test features having {expected} points"
    )]
    FeatureLength {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("k must be at least 1")]
    InvalidK,

    #[error("training set is empty")]
    EmptyTrainingSet,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::HeaderValue { .. } | AppError::InvalidK => ErrorCode::BadValue,
            AppError::TruncatedHeader { .. }
            | AppError::MissingHeader(_)
            | AppError::ImageDataLength { .. }
            | AppError::LabelDataLength { .. }
            | AppError::CountMismatch { .. }
            | AppError::FeatureLength { .. }
            | AppError::EmptyTrainingSet => ErrorCode::BadFormat,
        }
    }
}

/// The failure side of [`Result`]: always holds at least one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Errors {
    errors: Vec<AppError>,
}

impl Errors {
    // Append another error to an existing failure
    pub fn add_error(mut self, error: AppError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn first(&self) -> &AppError {
        // Constructed only through From<AppError>, so never empty
        &self.errors[0]
    }

    pub fn code(&self) -> ErrorCode {
        self.first().code()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<AppError> for Errors {
    fn from(error: AppError) -> Self {
        Errors {
            errors: vec![error],
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", error.code(), error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

pub type Result<T> = std::result::Result<T, Errors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let e = AppError::HeaderValue {
            name: "magic".into(),
            expected: 0x803,
            actual: 0,
        };
        assert_eq!(e.code(), ErrorCode::BadValue);
        assert_eq!(
            AppError::CountMismatch {
                n_images: 4,
                n_labels: 5
            }
            .code(),
            ErrorCode::BadFormat
        );
    }

    #[test]
    fn test_display_prefixes_code() {
        let errors = Errors::from(AppError::LabelDataLength {
            expected: 4,
            actual: 5,
        });
        assert_eq!(
            errors.to_string(),
            "BAD_FORMAT: expected 4 labels; got 5 bytes instead"
        );
    }

    #[test]
    fn test_add_error_keeps_first() {
        let errors = Errors::from(AppError::InvalidK).add_error(AppError::EmptyTrainingSet);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first(), &AppError::InvalidK);
        assert_eq!(errors.code(), ErrorCode::BadValue);
    }

    #[test]
    fn test_chain_short_circuits() {
        let mut called = false;
        let failed: Result<u32> = Err(AppError::InvalidK.into());
        let chained = failed.and_then(|x| {
            called = true;
            Ok(x + 1)
        });
        assert!(chained.is_err());
        assert!(!called);
    }
}
