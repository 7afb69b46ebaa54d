// Error vocabulary and error types for the Sabre client
use serde::Serialize;
use thiserror::Error;

// Named error keys and their HTTP-like status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "missing_required_field")]
    MissingRequiredField,
    #[serde(rename = "invalid_access")]
    InvalidAccess,
    #[serde(rename = "invalid_parameter")]
    InvalidParameter,
    #[serde(rename = "invalid_region")]
    InvalidRegion,
    #[serde(rename = "rate_limit_exceeded")]
    RateLimitExceeded,
    #[serde(rename = "missing_api_key")]
    MissingApiKey,
    #[serde(rename = "invalid_api_Key")]
    InvalidApiKey,
    #[serde(rename = "invalid_from_address")]
    InvalidFromAddress,
    #[serde(rename = "validation_error")]
    ValidationError,
    #[serde(rename = "not_found")]
    NotFound,
    #[serde(rename = "method_not_allowed")]
    MethodNotAllowed,
    #[serde(rename = "error_in_response")]
    ErrorInResponse,
    #[serde(rename = "fault_error")]
    FaultError,
    #[serde(rename = "application_error")]
    ApplicationError,
    #[serde(rename = "internal_server_error")]
    InternalServerError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::MissingRequiredField,
        ErrorCode::InvalidAccess,
        ErrorCode::InvalidParameter,
        ErrorCode::InvalidRegion,
        ErrorCode::RateLimitExceeded,
        ErrorCode::MissingApiKey,
        ErrorCode::InvalidApiKey,
        ErrorCode::InvalidFromAddress,
        ErrorCode::ValidationError,
        ErrorCode::NotFound,
        ErrorCode::MethodNotAllowed,
        ErrorCode::ErrorInResponse,
        ErrorCode::FaultError,
        ErrorCode::ApplicationError,
        ErrorCode::InternalServerError,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ErrorCode::MissingRequiredField => "missing_required_field",
            ErrorCode::InvalidAccess => "invalid_access",
            ErrorCode::InvalidParameter => "invalid_parameter",
            ErrorCode::InvalidRegion => "invalid_region",
            ErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            ErrorCode::MissingApiKey => "missing_api_key",
            ErrorCode::InvalidApiKey => "invalid_api_Key",
            ErrorCode::InvalidFromAddress => "invalid_from_address",
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::NotFound => "not_found",
            ErrorCode::MethodNotAllowed => "method_not_allowed",
            ErrorCode::ErrorInResponse => "error_in_response",
            ErrorCode::FaultError => "fault_error",
            ErrorCode::ApplicationError => "application_error",
            ErrorCode::InternalServerError => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::MissingRequiredField
            | ErrorCode::InvalidAccess
            | ErrorCode::InvalidParameter
            | ErrorCode::InvalidRegion => 422,
            ErrorCode::RateLimitExceeded => 429,
            ErrorCode::MissingApiKey => 401,
            ErrorCode::InvalidApiKey
            | ErrorCode::InvalidFromAddress
            | ErrorCode::ValidationError => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotAllowed | ErrorCode::ErrorInResponse => 405,
            ErrorCode::FaultError
            | ErrorCode::ApplicationError
            | ErrorCode::InternalServerError => 500,
        }
    }

    // Exact, case-sensitive key lookup
    pub fn from_key(key: &str) -> Option<ErrorCode> {
        ErrorCode::ALL.iter().copied().find(|code| code.key() == key)
    }
}

// Missing inputs detected before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing Sabre credentials: {}. Pass them in SabreOptions or set SABRE_USERNAME, SABRE_PASSWORD and SABRE_ORGANIZATION", missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Missing authorization. Open a session before calling protected actions")]
    MissingAuthorization,

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

#[derive(Error, Debug)]
pub enum SabreError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Non-2xx outcome or a SOAP <faultstring>
    #[error("Fault error: {message}")]
    Fault {
        message: String,
        status: Option<u16>,
    },

    // 2xx outcome carrying an <stl:Error> block
    #[error("Error in response: {message}")]
    Application { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SabreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SabreError::Config(ConfigError::MissingCredentials { .. }) => ErrorCode::MissingApiKey,
            SabreError::Config(ConfigError::MissingAuthorization) => ErrorCode::InvalidAccess,
            SabreError::Config(ConfigError::MissingParameter(_)) => {
                ErrorCode::MissingRequiredField
            }
            SabreError::Fault { .. } => ErrorCode::FaultError,
            SabreError::Application { .. } => ErrorCode::ErrorInResponse,
            SabreError::Parse(_) => ErrorCode::ApplicationError,
            SabreError::Transport(_) | SabreError::Other(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }

    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            SabreError::Fault { message, .. } | SabreError::Application { message } => {
                message.clone()
            }
            other => other.to_string(),
        };
        ErrorResponse {
            name: self.code(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub name: ErrorCode,
    pub message: String,
}

pub type Result<T, E = SabreError> = std::result::Result<T, E>;
