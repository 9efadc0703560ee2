//! String-keyed configuration surface
//!
//! Mirrors the host engine's flat option-variable store: every recognized
//! option has a spelled-out key, unknown values fall back to defaults with
//! a logged warning and are never surfaced as errors.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::LogSeverity;

pub const DEFAULT_TEXTURE_WIDTH: u32 = 1024;
pub const DEFAULT_TEXTURE_HEIGHT: u32 = 1024;

/// Tunables for the bridge as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Log severity forwarded to the engine
    pub log_severity: LogSeverity,
    /// Keep DCHECK-style assertions enabled in release engine builds
    pub release_dcheck_enabled: bool,
    /// Engine-side debug toggle
    pub debug: bool,
    /// Default surface width in pixels
    pub texture_width: u32,
    /// Default surface height in pixels
    pub texture_height: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_severity: LogSeverity::Info,
            release_dcheck_enabled: false,
            debug: false,
            texture_width: DEFAULT_TEXTURE_WIDTH,
            texture_height: DEFAULT_TEXTURE_HEIGHT,
        }
    }
}

impl BridgeConfig {
    /// Build a config from the host's option variables.
    ///
    /// Recognized keys: `notify-level`, `webtex-level` (overrides
    /// `notify-level` for this subsystem), `webtex-release-dcheck-enabled`,
    /// `webtex-gdebug`, `webtex-texture-width`, `webtex-texture-height`.
    pub fn from_options(options: &HashMap<String, String>) -> Self {
        let notify = options
            .get("notify-level")
            .map(String::as_str)
            .unwrap_or("info");
        let level = options
            .get("webtex-level")
            .map(String::as_str)
            .unwrap_or(notify);

        Self {
            log_severity: parse_level(level),
            release_dcheck_enabled: parse_bool(options, "webtex-release-dcheck-enabled", false),
            debug: parse_bool(options, "webtex-gdebug", false),
            texture_width: parse_dimension(options, "webtex-texture-width", DEFAULT_TEXTURE_WIDTH),
            texture_height: parse_dimension(
                options,
                "webtex-texture-height",
                DEFAULT_TEXTURE_HEIGHT,
            ),
        }
    }
}

fn parse_level(value: &str) -> LogSeverity {
    match value {
        "info" => LogSeverity::Info,
        "warning" => LogSeverity::Warning,
        "error" => LogSeverity::Error,
        other => {
            warn!("{other} is not a valid log level; defaulting to info");
            LogSeverity::Info
        }
    }
}

fn parse_bool(options: &HashMap<String, String>, key: &str, default: bool) -> bool {
    match options.get(key) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("{key}={raw} is not a valid bool; defaulting to {default}");
                default
            }
        },
    }
}

fn parse_dimension(options: &HashMap<String, String>, key: &str, default: u32) -> u32 {
    match options.get(key) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(v) if v > 0 => v,
            _ => {
                warn!("{key}={raw} is not a valid dimension; defaulting to {default}");
                default
            }
        },
    }
}
