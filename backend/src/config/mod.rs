//! Application configuration parsed once at process start.
//!
//! This module centralises the environment-variable schema so every
//! setting is validated consistently and the rest of the codebase reads
//! from one immutable [`AppConfig`] instead of the process environment.
//! Debug builds tolerate missing variables with warnings; release builds
//! fail fast.

mod parsing;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

use parsing::{debug_warn_or_error, parse_bool_env, parse_same_site_value};

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const SESSION_SECRET_ENV: &str = "SESSION_SECRET";
const APP_MODE_ENV: &str = "APP_MODE";
const APP_URL_ENV: &str = "APP_URL";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";

/// Minimum accepted length for the session secret, in bytes.
pub const SESSION_SECRET_MIN_LEN: usize = 64;

const APP_MODE_EXPECTED: &str = "development|test|production";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing values.
    Debug,
    /// Release builds require explicit, valid configuration.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Runtime mode declared by the deployment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppMode {
    /// Local development against fixtures or a scratch database.
    Development,
    /// Automated test runs.
    Test,
    /// Serving real traffic.
    Production,
}

impl std::str::FromStr for AppMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions, derived from the session secret.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// OAuth client credentials for one provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthProvider {
    /// Public client identifier issued by the provider.
    pub client_id: String,
    /// Confidential client secret issued by the provider.
    pub client_secret: String,
}

/// Optional OAuth providers configured per deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthProviders {
    /// GitHub OAuth application, if configured.
    pub github: Option<OAuthProvider>,
    /// Google OAuth application, if configured.
    pub google: Option<OAuthProvider>,
}

/// Immutable application configuration built once at startup.
pub struct AppConfig {
    /// Declared runtime mode.
    pub mode: AppMode,
    /// PostgreSQL connection string; absent in fixture-backed dev runs.
    pub database_url: Option<String>,
    /// Cookie-session settings.
    pub session: SessionSettings,
    /// Client-visible absolute base URL, when one is configured.
    pub app_url: Option<Url>,
    /// Optional OAuth providers.
    pub oauth: OAuthProviders,
}

/// Errors raised while validating application configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Human-readable description of accepted values.
        expected: &'static str,
    },
    /// The session secret is shorter than the minimum.
    #[error("session secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        /// Observed length in bytes.
        length: usize,
        /// Minimum accepted length.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Exactly one half of an OAuth id/secret pair was provided.
    #[error("{provider} OAuth configuration requires both client id and client secret")]
    IncompleteOAuthPair {
        /// Provider name (e.g. `GITHUB`).
        provider: &'static str,
    },
}

impl AppConfig {
    /// Build the configuration from environment variables and build mode.
    ///
    /// # Errors
    /// In release builds, any missing or invalid variable is an error. In
    /// debug builds most problems degrade to warnings and defaults; an
    /// incomplete OAuth pair still warns and disables the provider.
    ///
    /// # Examples
    /// ```
    /// use backend::config::{AppConfig, AppMode, BuildMode};
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|_| None);
    ///
    /// let config = AppConfig::from_env(&env, BuildMode::Debug).expect("debug defaults");
    /// assert_eq!(config.mode, AppMode::Development);
    /// assert!(config.database_url.is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let app_mode = app_mode_from_env(env, mode)?;
        let database_url = database_url_from_env(env, mode)?;
        let session = session_settings_from_env(env, mode)?;
        let app_url = app_url_from_env(env, mode)?;
        let oauth = OAuthProviders {
            github: oauth_pair_from_env(
                env,
                mode,
                "GITHUB",
                "GITHUB_CLIENT_ID",
                "GITHUB_CLIENT_SECRET",
            )?,
            google: oauth_pair_from_env(
                env,
                mode,
                "GOOGLE",
                "GOOGLE_CLIENT_ID",
                "GOOGLE_CLIENT_SECRET",
            )?,
        };

        Ok(Self {
            mode: app_mode,
            database_url,
            session,
            app_url,
            oauth,
        })
    }
}

fn app_mode_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppMode, ConfigError> {
    match env.string(APP_MODE_ENV) {
        Some(value) => match value.parse::<AppMode>() {
            Ok(app_mode) => Ok(app_mode),
            Err(()) => debug_warn_or_error(
                mode,
                AppMode::Development,
                ConfigError::InvalidEnv {
                    name: APP_MODE_ENV,
                    value: value.clone(),
                    expected: APP_MODE_EXPECTED,
                },
                || warn!(value = %value, "invalid APP_MODE; defaulting to development"),
            ),
        },
        None => debug_warn_or_error(
            mode,
            AppMode::Development,
            ConfigError::MissingEnv {
                name: APP_MODE_ENV,
            },
            || warn!("APP_MODE not set; defaulting to development"),
        ),
    }
}

fn database_url_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<String>, ConfigError> {
    match env.string(DATABASE_URL_ENV) {
        Some(value) => Ok(Some(value)),
        None => debug_warn_or_error(
            mode,
            None,
            ConfigError::MissingEnv {
                name: DATABASE_URL_ENV,
            },
            || warn!("DATABASE_URL not set; serving from in-memory stores"),
        ),
    }
}

/// Build session settings from environment variables and build mode.
///
/// The raw secret is zeroised once the signing key has been derived.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, ConfigError> {
    let cookie_secure = parse_bool_env(
        COOKIE_SECURE_ENV,
        env.string(COOKIE_SECURE_ENV),
        mode,
        true,
    )?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let key = session_key_from_env(env, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, ConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    match env.string(SAMESITE_ENV) {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            ConfigError::MissingEnv {
                name: SAMESITE_ENV,
            },
            || warn!("SESSION_SAMESITE not set; using default"),
        ),
    }
}

fn session_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Key, ConfigError> {
    match env.string(SESSION_SECRET_ENV) {
        Some(mut secret) => {
            let length = secret.len();
            if length < SESSION_SECRET_MIN_LEN {
                secret.zeroize();
                return debug_warn_or_error(
                    mode,
                    Key::generate(),
                    ConfigError::SecretTooShort {
                        length,
                        min_len: SESSION_SECRET_MIN_LEN,
                    },
                    || {
                        warn!(
                            length,
                            "SESSION_SECRET too short; using an ephemeral key (dev only)"
                        );
                    },
                );
            }
            let key = Key::derive_from(secret.as_bytes());
            secret.zeroize();
            Ok(key)
        }
        None => debug_warn_or_error(
            mode,
            Key::generate(),
            ConfigError::MissingEnv {
                name: SESSION_SECRET_ENV,
            },
            || warn!("SESSION_SECRET not set; using an ephemeral key (dev only)"),
        ),
    }
}

fn app_url_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Option<Url>, ConfigError> {
    match env.string(APP_URL_ENV) {
        Some(value) => match Url::parse(&value) {
            Ok(url) if !url.cannot_be_a_base() => Ok(Some(url)),
            _ => debug_warn_or_error(
                mode,
                None,
                ConfigError::InvalidEnv {
                    name: APP_URL_ENV,
                    value: value.clone(),
                    expected: "an absolute URL",
                },
                || warn!(value = %value, "invalid APP_URL; ignoring"),
            ),
        },
        None => Ok(None),
    }
}

fn oauth_pair_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    provider: &'static str,
    id_name: &'static str,
    secret_name: &'static str,
) -> Result<Option<OAuthProvider>, ConfigError> {
    match (env.string(id_name), env.string(secret_name)) {
        (Some(client_id), Some(client_secret)) => Ok(Some(OAuthProvider {
            client_id,
            client_secret,
        })),
        (None, None) => Ok(None),
        _ => debug_warn_or_error(
            mode,
            None,
            ConfigError::IncompleteOAuthPair { provider },
            || warn!("incomplete {provider} OAuth pair; provider disabled"),
        ),
    }
}

#[cfg(test)]
mod tests;
