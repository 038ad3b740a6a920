//! CLI entrypoint for LLM Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ModelCatalog, ProgressNotifier, ResolveCouncilUseCase, RunCouncilInput, RunCouncilUseCase,
};
use council_domain::{OutputFormat, Question};
use council_infrastructure::{ConfigLoader, FileConfig, OpenRouterCatalog, OpenRouterGateway};
use council_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    if cli.show_models {
        print!("{}", ConsoleFormatter::format_tiers());
        return Ok(());
    }

    info!("Starting LLM Council");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    check_config(&config)?;

    let format = cli.output_format(config.output.parse_format().0);
    ConsoleFormatter::set_color(config.output.color && std::io::stdout().is_terminal());

    let question = match cli.question.as_deref() {
        Some(q) => Question::new(q)?,
        None => bail!("Question is required. Run with --help for usage."),
    };

    let (params, _) = config.execution.to_params();

    // === Dependency Injection ===
    let provider = config
        .provider
        .to_openrouter_config()
        .context("Set the API key in your environment or a .env file")?;
    let gateway = Arc::new(OpenRouterGateway::new(provider)?);
    let catalog: Arc<dyn ModelCatalog> =
        Arc::new(OpenRouterCatalog::new(Arc::clone(gateway.client())));

    let selection = cli.apply_to(config.council.to_selection());
    let council = ResolveCouncilUseCase::with_catalog(catalog)
        .execute(&selection)
        .await?;

    info!(
        "Council: {} (chairman {})",
        council
            .contributors()
            .iter()
            .map(|m| m.short_name())
            .collect::<Vec<_>>()
            .join(", "),
        council.chairman().short_name()
    );

    let use_case = RunCouncilUseCase::new(gateway, params);
    let input = RunCouncilInput::new(question, council);

    let outcome = if cli.show_progress(format) {
        // Bars need a terminal; plain lines keep redirected logs readable
        let progress: Box<dyn ProgressNotifier> = if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        use_case.execute_with_progress(input, progress.as_ref()).await
    } else {
        use_case.execute(input).await
    };

    match outcome {
        Ok(result) => {
            println!("{}", ConsoleFormatter::render(&result, format));
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            let partial = err.into_partial();
            // JSON consumers still get the partial record
            if format == OutputFormat::Json || !partial.answers.is_empty() {
                println!("{}", ConsoleFormatter::render(&partial, format));
            }
            bail!(message)
        }
    }
}

/// Log warnings and abort on configuration errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
