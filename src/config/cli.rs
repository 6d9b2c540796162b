use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the venia-cache binary.
#[derive(Debug, Parser)]
#[command(
    name = "venia-cache",
    version,
    about = "Venia dispatcher and GraphQL cache invalidation planner"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VENIA_CACHE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Evaluate every registered strategy and print the invalidation plan.
    Plan(PlanArgs),
    /// Print match patterns only, without consulting content or the commerce backend.
    Patterns(PatternsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub overrides: PlanOverrides,

    #[command(flatten)]
    pub input: NotificationInput,
}

#[derive(Debug, Args, Clone)]
pub struct PatternsArgs {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub input: NotificationInput,
}

#[derive(Debug, Args, Clone)]
pub struct NotificationInput {
    /// Change notification JSON file; `-` reads standard input.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub notification: PathBuf,

    /// Pretty-print the emitted report.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pretty: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PlanOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Override the commerce GraphQL endpoint.
    #[arg(long = "graphql-endpoint", value_name = "URL")]
    pub graphql_endpoint: Option<String>,

    /// Override the store view code sent with GraphQL requests.
    #[arg(long = "graphql-store-code", value_name = "CODE")]
    pub graphql_store_code: Option<String>,

    /// Override the GraphQL request timeout.
    #[arg(long = "graphql-timeout-seconds", value_name = "SECONDS")]
    pub graphql_timeout_seconds: Option<u64>,

    /// Override the JSON content tree used for resource lookups.
    #[arg(long = "content-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub content_file: Option<PathBuf>,

    /// Override the header experience fragment root.
    #[arg(long = "header-fragment-root", value_name = "PATH")]
    pub header_fragment_root: Option<String>,

    /// Toggle escalation of category changes to full store invalidation.
    #[arg(
        long = "escalation-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub escalation_enabled: Option<bool>,
}
