use std::fmt;

/// Failures that stop the dashboard pipeline.
///
/// Every variant is terminal for the current page load. [`EmbedError::user_message`] yields the
/// text written into the `ga-not-authenticated` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    ConfigurationMissing { message: Option<String> },
    AuthenticationFailed { message: String },
    TokenRequestFailed { message: String },
    InvalidResponse { message: String },
    NoAccountsFound,
    NoViewsFound,
    RequestFailed { message: Option<String> },
    LibraryUnavailable { message: String },
    Internal(String),
}

pub type EmbedResult<T> = Result<T, EmbedError>;

impl EmbedError {
    pub fn code(&self) -> &'static str {
        match self {
            EmbedError::ConfigurationMissing { .. } => "ga-embed/configuration-missing",
            EmbedError::AuthenticationFailed { .. } => "ga-embed/authentication-failed",
            EmbedError::TokenRequestFailed { .. } => "ga-embed/token-request-failed",
            EmbedError::InvalidResponse { .. } => "ga-embed/invalid-response",
            EmbedError::NoAccountsFound => "ga-embed/no-accounts-found",
            EmbedError::NoViewsFound => "ga-embed/no-views-found",
            EmbedError::RequestFailed { .. } => "ga-embed/request-failed",
            EmbedError::LibraryUnavailable { .. } => "ga-embed/library-unavailable",
            EmbedError::Internal(_) => "ga-embed/internal",
        }
    }

    /// Returns `true` for failures raised before the analytics library accepted a token.
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            EmbedError::ConfigurationMissing { .. }
                | EmbedError::AuthenticationFailed { .. }
                | EmbedError::TokenRequestFailed { .. }
        )
    }

    /// Text shown to the user in the not-authenticated container.
    pub fn user_message(&self) -> String {
        match self {
            EmbedError::ConfigurationMissing { message: None } => "Authentication failed".to_string(),
            EmbedError::ConfigurationMissing { message: Some(message) }
            | EmbedError::AuthenticationFailed { message }
            | EmbedError::TokenRequestFailed { message } => {
                if message.is_empty() {
                    "Authentication failed".to_string()
                } else {
                    format!("Authentication failed: {message}")
                }
            }
            EmbedError::NoAccountsFound => "Error: No accounts found for the user.".to_string(),
            EmbedError::NoViewsFound => "Error: No views (profiles) found for the user.".to_string(),
            EmbedError::RequestFailed { message: Some(message) } => format!("Error: {message}"),
            EmbedError::RequestFailed { message: None } => "Error: Request failed".to_string(),
            EmbedError::InvalidResponse { message }
            | EmbedError::LibraryUnavailable { message }
            | EmbedError::Internal(message) => format!("Error: {message}"),
        }
    }
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedError::ConfigurationMissing { message } => match message {
                Some(message) => write!(f, "Embed configuration incomplete: {message}"),
                None => write!(f, "Embed configuration incomplete: service URL not set"),
            },
            EmbedError::AuthenticationFailed { message } => {
                write!(f, "Token service rejected the request: {message}")
            }
            EmbedError::TokenRequestFailed { message } => {
                write!(f, "Failed to reach the token service: {message}")
            }
            EmbedError::InvalidResponse { message } => {
                write!(f, "Failed to parse response: {message}")
            }
            EmbedError::NoAccountsFound => write!(f, "No accounts found for the user."),
            EmbedError::NoViewsFound => write!(f, "No views (profiles) found for the user."),
            EmbedError::RequestFailed { message } => match message {
                Some(message) => write!(f, "Analytics request failed: {message}"),
                None => write!(f, "Analytics request failed"),
            },
            EmbedError::LibraryUnavailable { message } => {
                write!(f, "Analytics library unavailable: {message}")
            }
            EmbedError::Internal(message) => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for EmbedError {}

pub fn configuration_missing(message: Option<&str>) -> EmbedError {
    EmbedError::ConfigurationMissing {
        message: message.map(str::to_string),
    }
}

pub fn request_failed(message: impl Into<String>) -> EmbedError {
    EmbedError::RequestFailed {
        message: Some(message.into()),
    }
}

pub fn invalid_response(message: impl Into<String>) -> EmbedError {
    EmbedError::InvalidResponse {
        message: message.into(),
    }
}

pub fn internal_error(message: impl Into<String>) -> EmbedError {
    EmbedError::Internal(message.into())
}
