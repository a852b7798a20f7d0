//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of the fields every school must carry is missing or empty
    MissingRequired,

    /// Path id is not a positive integer
    InvalidId,

    /// Partial update carried no recognised field
    NoChanges,

    /// Uploaded file is not an image
    NotAnImage,

    /// Uploaded file exceeds the size limit
    FileTooLarge { max_bytes: usize },

    /// Upload endpoint called without a file
    MissingFile,

    /// Request body could not be read (bad JSON, broken multipart)
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => {
                write!(f, "School name, address, city, and state are required")
            }
            Self::InvalidId => write!(f, "Valid school ID is required"),
            Self::NoChanges => write!(f, "At least one field must be provided for update"),
            Self::NotAnImage => write!(f, "Only image files are allowed!"),
            Self::FileTooLarge { max_bytes } => write!(
                f,
                "File too large. Maximum size is {}MB.",
                max_bytes / (1024 * 1024)
            ),
            Self::MissingFile => write!(f, "No image file provided"),
            Self::Malformed { reason } => write!(f, "Invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
