use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::workflows::loan::policy::{PolicyError, UnderwritingPolicy};
use crate::workflows::loan::verifier::DeterministicVerifier;

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
    pub policy: UnderwritingPolicy,
    pub verifier: VerifierConfig,
    pub artifacts: ArtifactConfig,
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

        let policy = load_policy()?;
        let verifier = VerifierConfig {
            credit_score: parse_var(
                "VERIFIER_CREDIT_SCORE",
                DeterministicVerifier::DEFAULT_CREDIT_SCORE,
            )?,
        };
        let artifacts = ArtifactConfig {
            output_dir: env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static/letters")),
            url_prefix: env::var("ARTIFACT_URL_PREFIX").unwrap_or_else(|_| "/letters".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            policy,
            verifier,
            artifacts,
        })
    }
}

fn load_policy() -> Result<UnderwritingPolicy, ConfigError> {
    let defaults = UnderwritingPolicy::default();
    let policy = UnderwritingPolicy {
        minimum_loan_amount: parse_var("LOAN_MIN_AMOUNT", defaults.minimum_loan_amount)?,
        minimum_tenure_months: parse_var("LOAN_MIN_TENURE_MONTHS", defaults.minimum_tenure_months)?,
        maximum_tenure_months: parse_var("LOAN_MAX_TENURE_MONTHS", defaults.maximum_tenure_months)?,
        eligibility_income_multiple: parse_var(
            "LOAN_ELIGIBILITY_INCOME_MULTIPLE",
            defaults.eligibility_income_multiple,
        )?,
        minimum_credit_score: parse_var("LOAN_MIN_CREDIT_SCORE", defaults.minimum_credit_score)?,
        annual_interest_rate_percent: parse_var(
            "LOAN_ANNUAL_INTEREST_RATE",
            defaults.annual_interest_rate_percent,
        )?,
        maximum_emi_to_income: parse_var("LOAN_MAX_EMI_TO_INCOME", defaults.maximum_emi_to_income)?,
        credit_income_multiple: parse_var(
            "LOAN_CREDIT_INCOME_MULTIPLE",
            defaults.credit_income_multiple,
        )?,
    };

    policy.validate().map_err(ConfigError::Policy)?;
    Ok(policy)
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
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

/// Behavior of the offline identity and credit verifier.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub credit_score: u16,
}

/// Where sanction letters are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub output_dir: PathBuf,
    pub url_prefix: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unparseable value '{value}'")
            }
            ConfigError::Policy(err) => write!(f, "inconsistent underwriting policy: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Policy(err) => Some(err),
        }
    }
}
