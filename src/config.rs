// Client configuration and credential resolution
use std::fmt;

use crate::error::ConfigError;

pub const ENV_USERNAME: &str = "SABRE_USERNAME";
pub const ENV_PASSWORD: &str = "SABRE_PASSWORD";
pub const ENV_ORGANIZATION: &str = "SABRE_ORGANIZATION";
pub const ENV_BASE_URL: &str = "SABRE_BASE_URL";
pub const ENV_DOMAIN: &str = "SABRE_DOMAIN";

pub const DEFAULT_BASE_URL: &str = "https://webservices.platform.sabre.com";
pub const DEFAULT_DOMAIN: &str = "DEFAULT";
pub const DEFAULT_USER_AGENT: &str = concat!("legacy-sabre/", env!("CARGO_PKG_VERSION"));

// Constructor options; anything left out is looked up in the environment
#[derive(Debug, Clone, Default)]
pub struct SabreOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub organization: Option<String>,
}

impl SabreOptions {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            organization: Some(organization.into()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    // PCC
    pub organization: String,
    pub domain: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("organization", &self.organization)
            .field("domain", &self.domain)
            .finish()
    }
}

impl Credentials {
    /// Builds credentials from explicit options, falling back to `lookup` for any
    /// field that is missing or empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` naming every field that is still
    /// absent after the fallback.
    pub fn resolve<F>(options: &SabreOptions, domain: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = or_lookup(options.username.as_deref(), ENV_USERNAME, &lookup);
        let password = or_lookup(options.password.as_deref(), ENV_PASSWORD, &lookup);
        let organization = or_lookup(options.organization.as_deref(), ENV_ORGANIZATION, &lookup);

        match (username, password, organization) {
            (Some(username), Some(password), Some(organization)) => Ok(Self {
                username,
                password,
                organization,
                domain: domain.to_string(),
            }),
            (username, password, organization) => {
                let missing = [
                    ("username", username.is_none()),
                    ("password", password.is_none()),
                    ("organization", organization.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ConfigError::MissingCredentials { missing })
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.organization.is_empty()
    }
}

// Transport-level settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub domain: String,
    pub user_agent: String,
    // Opaque and stable for the lifetime of one client
    pub conversation_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            conversation_id: generate_conversation_id(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(domain) = lookup(ENV_DOMAIN).filter(|v| !v.is_empty()) {
            config.domain = domain;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub fn generate_conversation_id() -> String {
    format!("{:016x}@legacy-sabre", rand::random::<u64>())
}

pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolves the pseudo city code for an operation. An empty explicit value is
/// treated like an omitted one and falls back to `SABRE_ORGANIZATION`.
pub fn resolve_pcc<F>(explicit: Option<&str>, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    or_lookup(explicit, ENV_ORGANIZATION, &lookup).ok_or(ConfigError::MissingParameter("pcc"))
}

fn or_lookup<F>(explicit: Option<&str>, key: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match explicit {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => lookup(key).filter(|value| !value.is_empty()),
    }
}
