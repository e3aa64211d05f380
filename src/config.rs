//! Environment-based configuration types for the alldone server runtime settings.

use anyhow::Result;

use crate::errors::ConfigError;

/// Route the handler is always mounted on in addition to the configured one.
pub const ROOT_ROUTE: &str = "/";

/// HTTP server port configuration
#[derive(Clone, Debug)]
pub struct HttpPort(u16);

/// Additional route serving the redirect handler
#[derive(Clone, Debug)]
pub struct RedirectRoute(String);

/// Main application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub http_templates_path: String,
    pub redirect_route: RedirectRoute,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        // Container platforms hand the port over as PORT.
        let http_port: HttpPort = optional_env("PORT")
            .or_else(|| optional_env("HTTP_PORT"))
            .unwrap_or_else(|| "8080".to_string())
            .try_into()?;
        let http_templates_path = optional_env("HTTP_TEMPLATES_PATH")
            .unwrap_or_else(|| format!("{}/templates", env!("CARGO_MANIFEST_DIR")));
        let redirect_route: RedirectRoute = default_env("REDIRECT_ROUTE", "/alldone").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            http_templates_path,
            redirect_route,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn default_env(name: &str, default_value: &str) -> String {
    optional_env(name).unwrap_or_else(|| default_value.to_string())
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for RedirectRoute {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim().to_string();
        if !value.starts_with('/') {
            return Err(ConfigError::InvalidRoute(value).into());
        }
        // Stored without a trailing slash.
        let trimmed = value.trim_end_matches('/');
        if trimmed.is_empty() {
            Ok(Self(ROOT_ROUTE.to_string()))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for RedirectRoute {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl RedirectRoute {
    /// Whether this route is the root route the handler is always mounted on
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ROUTE
    }
}
