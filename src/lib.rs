// Stateful client for the legacy Sabre SOAP/XML reservation API

// Dispatch core
pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod headers;
pub mod session;
pub mod transport;

// Request envelopes and response contracts
pub mod response;
pub mod soap;

// Domain operations
pub mod authentication;
pub mod currency;
pub mod daily_sales;
pub mod queue;

// Re-export key types for convenience
pub use actions::Action;
pub use client::{PostOptions, SabreClient};
pub use config::{ClientConfig, Credentials, SabreOptions};
pub use error::{ConfigError, ErrorCode, ErrorResponse, SabreError};
pub use extract::sub_string;
pub use session::{AuthPayload, SessionContext, SessionState, Transition};
pub use transport::{FetchRequestOptions, HttpTransport, Transport, TransportResponse};
