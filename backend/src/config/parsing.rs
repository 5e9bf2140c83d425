//! Environment parsing helpers for application configuration.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, ConfigError, SAMESITE_ENV};

pub(super) const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// In debug builds, warn and fall back; in release builds, fail.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: ConfigError,
    warn_fn: F,
) -> Result<T, ConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub(super) fn parse_bool_env(
    name: &'static str,
    value: Option<String>,
    mode: BuildMode,
    default_value: bool,
) -> Result<bool, ConfigError> {
    let default_label = if default_value { "enabled" } else { "disabled" };
    match value {
        Some(raw) => match parse_bool(&raw) {
            Some(flag) => Ok(flag),
            None => debug_warn_or_error(
                mode,
                default_value,
                ConfigError::InvalidEnv {
                    name,
                    value: raw.clone(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %raw, "invalid {name}; defaulting to {default_label}"),
            ),
        },
        None => debug_warn_or_error(
            mode,
            default_value,
            ConfigError::MissingEnv { name },
            || warn!("{name} not set; defaulting to {default_label}"),
        ),
    }
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            validate_same_site_none(mode, cookie_secure)?;
            Ok(SameSite::None)
        }
        _ => debug_warn_or_error(
            mode,
            default_same_site,
            ConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_SAMESITE, using default"),
        ),
    }
}

fn validate_same_site_none(mode: BuildMode, cookie_secure: bool) -> Result<(), ConfigError> {
    if cookie_secure {
        return Ok(());
    }

    debug_warn_or_error(mode, (), ConfigError::InsecureSameSiteNone, || {
        warn!(
            "{}",
            concat!(
                "SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; ",
                "browsers may reject third-party cookies"
            )
        );
    })
}
