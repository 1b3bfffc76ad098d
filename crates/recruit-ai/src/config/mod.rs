use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::recruitment::ShortlistPolicy;

const DEFAULT_SHORTLIST_MIN_SCORE: u32 = 20;
const DEFAULT_LOGIN_DOMAIN: &str = "staff.local";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub recruitment: RecruitmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            recruitment: RecruitmentConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Recruitment policy dials and onboarding settings.
#[derive(Debug, Clone, Default)]
pub struct RecruitmentConfig {
    pub shortlist: ShortlistPolicy,
    pub onboarding: OnboardingConfig,
}

impl RecruitmentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let minimum_score = match env::var("APP_SHORTLIST_MIN_SCORE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidShortlistScore { value: raw })?,
            Err(_) => DEFAULT_SHORTLIST_MIN_SCORE,
        };

        let initial_password = env::var("APP_EMPLOYEE_INITIAL_PASSWORD")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let login_domain = env::var("APP_EMPLOYEE_LOGIN_DOMAIN")
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_DOMAIN.to_string());

        Ok(Self {
            shortlist: ShortlistPolicy::new(minimum_score),
            onboarding: OnboardingConfig {
                initial_password,
                login_domain,
            },
        })
    }
}

/// Credentials handed to freshly provisioned employee logins.
///
/// There is no built-in default password: when `initial_password` is unset, accounts are
/// created with a mandatory reset instead.
#[derive(Clone)]
pub struct OnboardingConfig {
    pub initial_password: Option<String>,
    pub login_domain: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            initial_password: None,
            login_domain: DEFAULT_LOGIN_DOMAIN.to_string(),
        }
    }
}

impl fmt::Debug for OnboardingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnboardingConfig")
            .field(
                "initial_password",
                &self.initial_password.as_ref().map(|_| "<redacted>"),
            )
            .field("login_domain", &self.login_domain)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidShortlistScore { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidShortlistScore { value } => write!(
                f,
                "APP_SHORTLIST_MIN_SCORE must be a non-negative integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidShortlistScore { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
