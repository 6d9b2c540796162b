use std::{io, path::Path, process};

use tokio::io::AsyncReadExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use venia_cache::{
    application::error::AppError,
    cache::{CacheConfig, InvalidationContext, InvalidationPlan, StrategyRegistry},
    config::{self, Command, NotificationInput},
    infra::{content::JsonResourceTree, error::InfraError, graphql::HttpGraphqlClient, telemetry},
};
use venia_cache_types::{ChangeNotification, InvalidationReport};

/// Reads the notification from standard input instead of a file.
const STDIN_MARKER: &str = "-";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        InfraError::configuration(format!("failed to load configuration: {err}"))
    })?;

    telemetry::init(&settings.logging)?;

    let registry = StrategyRegistry::from_config(&CacheConfig::from(&settings.invalidation));
    info!(
        strategies = registry.len(),
        escalation_enabled = settings.invalidation.escalation_enabled,
        "Strategy registry ready"
    );

    match cli_args.command {
        Command::Plan(args) => run_plan(&settings, &registry, &args.input).await,
        Command::Patterns(args) => run_patterns(&registry, &args.input).await,
    }
}

async fn run_plan(
    settings: &config::Settings,
    registry: &StrategyRegistry,
    input: &NotificationInput,
) -> Result<(), AppError> {
    let notification = read_notification(&input.notification).await?;

    let resources = match settings.content.tree_file.as_deref() {
        Some(path) => JsonResourceTree::load(path).await?,
        None => JsonResourceTree::empty(),
    };
    let graphql = HttpGraphqlClient::new(&settings.graphql)?;
    info!(endpoint = %graphql.endpoint(), "Commerce GraphQL client ready");

    let context = InvalidationContext::new(&notification, &resources, &graphql);
    let plan = InvalidationPlan::evaluate(registry, &context).await;

    emit(&plan.into_report(), input.pretty)
}

async fn run_patterns(
    registry: &StrategyRegistry,
    input: &NotificationInput,
) -> Result<(), AppError> {
    let notification = read_notification(&input.notification).await?;
    let plan = InvalidationPlan::patterns_only(registry, &notification);

    emit(&plan.into_report(), input.pretty)
}

async fn read_notification(path: &Path) -> Result<ChangeNotification, AppError> {
    let bytes = if path.as_os_str() == STDIN_MARKER {
        let mut buffer = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buffer)
            .await
            .map_err(InfraError::from)?;
        buffer
    } else {
        tokio::fs::read(path).await.map_err(InfraError::from)?
    };

    let notification: ChangeNotification = serde_json::from_slice(&bytes)
        .map_err(|err| AppError::notification(path.display().to_string(), err))?;

    if notification.store_path.trim().is_empty() {
        return Err(AppError::validation("notification storePath must not be empty"));
    }

    Ok(notification)
}

fn emit(report: &InvalidationReport, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .map_err(|err| AppError::unexpected(format!("failed to encode report: {err}")))?;

    println!("{rendered}");
    Ok(())
}
