//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::cache::CacheConfig;

mod cli;

pub use cli::{
    CliArgs, Command, LoggingOverrides, NotificationInput, PatternsArgs, PlanArgs, PlanOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "venia-cache";
const ENV_PREFIX: &str = "VENIA_CACHE";
const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost/graphql";
const DEFAULT_GRAPHQL_TIMEOUT_SECS: u64 = 10;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub graphql: GraphqlSettings,
    pub content: ContentSettings,
    pub invalidation: InvalidationSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct GraphqlSettings {
    pub endpoint: Url,
    pub store_code: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    /// JSON export of the content tree; lookups resolve to nothing when unset.
    pub tree_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InvalidationSettings {
    pub header_fragment_root: String,
    pub structure_depth_property: String,
    pub escalation_enabled: bool,
    pub extension_types: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse CLI arguments and load settings from them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("invalidation.extension_types"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Plan(args) => raw.apply_plan_overrides(&args.overrides),
        Command::Patterns(args) => raw.apply_logging_overrides(&args.logging),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    graphql: RawGraphqlSettings,
    content: RawContentSettings,
    invalidation: RawInvalidationSettings,
}

impl RawSettings {
    fn apply_plan_overrides(&mut self, overrides: &PlanOverrides) {
        self.apply_logging_overrides(&overrides.logging);

        if let Some(endpoint) = overrides.graphql_endpoint.as_ref() {
            self.graphql.endpoint = Some(endpoint.clone());
        }
        if let Some(code) = overrides.graphql_store_code.as_ref() {
            self.graphql.store_code = Some(code.clone());
        }
        if let Some(seconds) = overrides.graphql_timeout_seconds {
            self.graphql.timeout_seconds = Some(seconds);
        }
        if let Some(path) = overrides.content_file.as_ref() {
            self.content.tree_file = Some(path.clone());
        }
        if let Some(root) = overrides.header_fragment_root.as_ref() {
            self.invalidation.header_fragment_root = Some(root.clone());
        }
        if let Some(enabled) = overrides.escalation_enabled {
            self.invalidation.escalation_enabled = Some(enabled);
        }
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            graphql,
            content,
            invalidation,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            graphql: build_graphql_settings(graphql)?,
            content: build_content_settings(content),
            invalidation: build_invalidation_settings(invalidation)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_graphql_settings(graphql: RawGraphqlSettings) -> Result<GraphqlSettings, LoadError> {
    let raw_endpoint = graphql
        .endpoint
        .unwrap_or_else(|| DEFAULT_GRAPHQL_ENDPOINT.to_string());
    let endpoint = Url::parse(raw_endpoint.trim())
        .map_err(|err| LoadError::invalid("graphql.endpoint", format!("failed to parse: {err}")))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "graphql.endpoint",
            "scheme must be http or https",
        ));
    }

    let store_code = graphql.store_code.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let timeout_secs = graphql
        .timeout_seconds
        .unwrap_or(DEFAULT_GRAPHQL_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "graphql.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(GraphqlSettings {
        endpoint,
        store_code,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_content_settings(content: RawContentSettings) -> ContentSettings {
    ContentSettings {
        tree_file: content
            .tree_file
            .filter(|path| !path.as_os_str().is_empty()),
    }
}

fn build_invalidation_settings(
    invalidation: RawInvalidationSettings,
) -> Result<InvalidationSettings, LoadError> {
    let defaults = CacheConfig::default();

    let header_fragment_root = invalidation
        .header_fragment_root
        .map(|root| root.trim().to_string())
        .unwrap_or(defaults.header_fragment_root);
    if !header_fragment_root.starts_with('/') {
        return Err(LoadError::invalid(
            "invalidation.header_fragment_root",
            "must be an absolute content path",
        ));
    }

    let structure_depth_property = invalidation
        .structure_depth_property
        .unwrap_or(defaults.structure_depth_property);
    if structure_depth_property.trim().is_empty() {
        return Err(LoadError::invalid(
            "invalidation.structure_depth_property",
            "must not be empty",
        ));
    }

    let extension_types = invalidation
        .extension_types
        .unwrap_or_default()
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    Ok(InvalidationSettings {
        header_fragment_root,
        structure_depth_property,
        escalation_enabled: invalidation
            .escalation_enabled
            .unwrap_or(defaults.escalation_enabled),
        extension_types,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawGraphqlSettings {
    endpoint: Option<String>,
    store_code: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    tree_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawInvalidationSettings {
    header_fragment_root: Option<String>,
    structure_depth_property: Option<String>,
    escalation_enabled: Option<bool>,
    extension_types: Option<Vec<String>>,
}
