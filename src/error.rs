use std::fmt;

use thiserror::Error;

/// Every way an `/emote` invocation can end without an uploaded emoji.
#[derive(Debug, Error)]
pub enum EmoteError {
    #[error("no URL was provided")]
    MissingInput,
    #[error("`{0}` is not a valid size")]
    InvalidSize(String),
    #[error("the URL does not belong to a supported platform")]
    UnsupportedPlatform,
    #[error("failed to fetch emote data: {0:#}")]
    AdapterFetchFailure(anyhow::Error),
    #[error("the emote was not found")]
    EmoteNotFound,
    #[error("the command was not used in a server")]
    NotInServerContext,
    #[error("failed to upload the emote: {0}")]
    UploadFailure(#[from] UploadRejection),
}

/// Failures that end an invocation before anything is uploaded.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no URL was provided")]
    MissingInput,
    #[error("`{0}` is not a valid size")]
    InvalidSize(String),
    #[error("the URL does not belong to a supported platform")]
    UnsupportedPlatform,
    #[error("failed to fetch emote data: {0:#}")]
    AdapterFetchFailure(anyhow::Error),
    #[error("the emote was not found")]
    EmoteNotFound,
}

impl From<ResolveError> for EmoteError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MissingInput => EmoteError::MissingInput,
            ResolveError::InvalidSize(size) => EmoteError::InvalidSize(size),
            ResolveError::UnsupportedPlatform => EmoteError::UnsupportedPlatform,
            ResolveError::AdapterFetchFailure(err) => EmoteError::AdapterFetchFailure(err),
            ResolveError::EmoteNotFound => EmoteError::EmoteNotFound,
        }
    }
}

/// Why Discord (or getting the image to it) refused an emoji upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRejection {
    pub message: String,
}
impl UploadRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message to show the user for this rejection.
    pub fn friendly_message(&self) -> &str {
        friendly_message(&self.message)
    }
}
impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
impl std::error::Error for UploadRejection {}

impl From<serenity::Error> for UploadRejection {
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;

        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            let errors: Vec<_> = response
                .error
                .errors
                .iter()
                .map(|e| format!("{}[{}]: {}", e.path, e.code, e.message))
                .collect();
            if !errors.is_empty() {
                return Self::new(errors.join("\n"));
            }
            return Self::new(response.error.message.clone());
        }

        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for UploadRejection {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("failed to download the emote image: {err}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailureKind {
    TooBig,
    InvalidName,
}
impl UploadFailureKind {
    pub fn message(self) -> &'static str {
        match self {
            UploadFailureKind::TooBig => {
                "Emote is too big. You can try to change it's size by using the \"size\" parameter."
            }
            UploadFailureKind::InvalidName => {
                "Emote name is invalid. You can change the name with the \"name\" parameter."
            }
        }
    }
}

/// Substrings of Discord's rejection messages and what they mean.
const UPLOAD_FAILURE_PATTERNS: &[(&str, UploadFailureKind)] = &[
    ("Asset exceeds maximum size:", UploadFailureKind::TooBig),
    (
        "Failed to resize asset below the maximum size:",
        UploadFailureKind::TooBig,
    ),
    ("name[STRING_TYPE_REGEX]", UploadFailureKind::InvalidName),
];

pub fn classify_upload_failure(message: &str) -> Option<UploadFailureKind> {
    UPLOAD_FAILURE_PATTERNS
        .iter()
        .find(|(pattern, _)| message.contains(pattern))
        .map(|(_, kind)| *kind)
}

/// Maps a rejection message to a hint the user can act on, or passes it through.
pub fn friendly_message(message: &str) -> &str {
    classify_upload_failure(message).map_or(message, |kind| kind.message())
}
