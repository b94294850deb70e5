//! Connection settings: explicit overrides on top of resolved configuration

use std::path::PathBuf;

use ccm_client::{ClientOptions, DEFAULT_BASE_URL, Gateway};

use super::resolver::ResolvedConfig;
use crate::{Error, Result};

pub const DEFAULT_ENVIRONMENT: &str = "master";
pub const DEFAULT_MODELS_PATH: &str = "models";

pub const SPACE_ID_ENV: &str = "CONTENTFUL_SPACE_ID";
pub const ACCESS_TOKEN_ENV: &str = "CONTENTFUL_MANAGEMENT_TOKEN";
pub const ENVIRONMENT_ENV: &str = "CONTENTFUL_ENVIRONMENT";

/// Values given explicitly on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub space_id: Option<String>,
    pub access_token: Option<String>,
    pub environment: Option<String>,
    pub api_url: Option<String>,
}

/// Everything needed to build a client
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub options: ClientOptions,
    pub api_url: String,
}

impl ConnectionSettings {
    /// Combine overrides, configuration and defaults, in that precedence.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] naming the flag and environment variable to
    /// set when the space id or access token is missing.
    pub fn resolve(overrides: &ConnectionOverrides, config: &ResolvedConfig) -> Result<Self> {
        let space_id = pick(&overrides.space_id, &config.space_id)
            .ok_or_else(|| missing("space id", "--space-id", SPACE_ID_ENV))?;
        let access_token = pick(&overrides.access_token, &config.access_token)
            .ok_or_else(|| missing("access token", "--access-token", ACCESS_TOKEN_ENV))?;
        let environment = pick(&overrides.environment, &config.environment)
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let api_url = pick(&overrides.api_url, &config.api_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            options: ClientOptions::new(access_token, space_id, environment),
            api_url,
        })
    }

    pub fn gateway(&self) -> Gateway {
        Gateway::http(&self.api_url)
    }

    pub fn environment(&self) -> &str {
        &self.options.environment_id
    }
}

/// Models directory: explicit path, configured path, then `models`
pub fn resolve_models_path(explicit: Option<PathBuf>, config: &ResolvedConfig) -> PathBuf {
    explicit
        .or_else(|| config.models_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_PATH))
}

/// Sync output directory: explicit path, configured output, configured
/// models directory, then `models`
pub fn resolve_output_path(explicit: Option<PathBuf>, config: &ResolvedConfig) -> PathBuf {
    explicit
        .or_else(|| config.output_path.clone())
        .unwrap_or_else(|| resolve_models_path(None, config))
}

fn pick(explicit: &Option<String>, configured: &Option<String>) -> Option<String> {
    explicit
        .iter()
        .chain(configured.iter())
        .find(|value| !value.trim().is_empty())
        .cloned()
}

fn missing(what: &str, flag: &str, env: &str) -> Error {
    Error::Configuration(format!(
        "Missing {}. Pass {} or set {} (or add it to ccm.local.toml)",
        what, flag, env
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn config() -> ResolvedConfig {
        ResolvedConfig {
            space_id: Some("config-space".to_string()),
            access_token: Some("config-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn overrides_win_over_config() {
        let overrides = ConnectionOverrides {
            space_id: Some("cli-space".to_string()),
            ..Default::default()
        };

        let settings = ConnectionSettings::resolve(&overrides, &config()).unwrap();

        assert_eq!(settings.options.space_id, "cli-space");
        assert_eq!(settings.options.access_token, "config-token");
        assert_eq!(settings.environment(), DEFAULT_ENVIRONMENT);
        assert_eq!(settings.api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn empty_override_falls_through() {
        let overrides = ConnectionOverrides {
            space_id: Some(String::new()),
            ..Default::default()
        };

        let settings = ConnectionSettings::resolve(&overrides, &config()).unwrap();
        assert_eq!(settings.options.space_id, "config-space");
    }

    #[test]
    fn missing_space_id_names_flag_and_env() {
        let err = ConnectionSettings::resolve(
            &ConnectionOverrides::default(),
            &ResolvedConfig::default(),
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("--space-id"));
        assert!(message.contains(SPACE_ID_ENV));
    }

    #[test]
    fn output_path_falls_back_to_models_path() {
        let config = ResolvedConfig {
            models_path: Some(PathBuf::from("content")),
            ..Default::default()
        };

        assert_eq!(resolve_output_path(None, &config), PathBuf::from("content"));
        assert_eq!(
            resolve_output_path(Some(PathBuf::from("out")), &config),
            PathBuf::from("out")
        );
        assert_eq!(
            resolve_models_path(None, &ResolvedConfig::default()),
            PathBuf::from(DEFAULT_MODELS_PATH)
        );
    }

    #[rstest]
    #[case::explicit(Some("cli-env"), Some("config-env"), "cli-env")]
    #[case::configured(None, Some("config-env"), "config-env")]
    #[case::blank_configured(None, Some("  "), DEFAULT_ENVIRONMENT)]
    #[case::default(None, None, DEFAULT_ENVIRONMENT)]
    fn environment_precedence(
        #[case] explicit: Option<&str>,
        #[case] configured: Option<&str>,
        #[case] expected: &str,
    ) {
        let overrides = ConnectionOverrides {
            environment: explicit.map(str::to_string),
            ..Default::default()
        };
        let config = ResolvedConfig {
            environment: configured.map(str::to_string),
            ..config()
        };

        let settings = ConnectionSettings::resolve(&overrides, &config).unwrap();
        assert_eq!(settings.environment(), expected);
    }
}
