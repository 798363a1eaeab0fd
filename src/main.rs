use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{LogFormat, Settings};
use std::path::PathBuf;

mod input;
mod render;

/// The main entry point for the Margin application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env file with MARGIN__* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => configuration::load_settings_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => configuration::load_settings().context("failed to load settings")?,
    };
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Summarize(args) => handle_summarize(args),
        Commands::Forecast(args) => handle_forecast(args, &settings),
        Commands::Insights(args) => handle_insights(args),
        Commands::Serve(args) => handle_serve(args, settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Revenue and expense analytics: totals, growth, trend forecasts and insights.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to use instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print totals and half-over-half profit growth.
    Summarize(InputArgs),
    /// Project revenue and expense forward along a linear trend.
    Forecast(ForecastArgs),
    /// Print the dashboard analysis: growth, margin, peak and suggestions.
    Insights(InputArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct InputArgs {
    /// JSON file holding an array of {"date", "revenue", "expense"} records.
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(Parser)]
struct ForecastArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of future periods to predict. Defaults to `forecast.default_horizon`.
    #[arg(long, allow_negative_numbers = true)]
    horizon: Option<i64>,
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_summarize(args: InputArgs) -> anyhow::Result<()> {
    let records = input::load_records(&args.input)?;
    let summary = analytics::AnalyticsEngine::new().summarize(&records);
    println!("{}", render::summary_table(&summary));
    Ok(())
}

fn handle_forecast(args: ForecastArgs, settings: &Settings) -> anyhow::Result<()> {
    let records = input::load_records(&args.input.input)?;
    let horizon = args.horizon.unwrap_or(settings.forecast.default_horizon);
    let forecast = analytics::AnalyticsEngine::new()
        .forecast(&records, horizon)
        .context("forecast failed")?;
    println!("{}", render::forecast_table(&forecast));
    Ok(())
}

fn handle_insights(args: InputArgs) -> anyhow::Result<()> {
    let records = input::load_records(&args.input)?;
    let insights = analytics::AnalyticsEngine::new()
        .insights(&records)
        .context("insights failed")?;
    println!("{}", render::insights_table(&insights));
    Ok(())
}

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate()?;

    web_server::run_server(&settings.bind_address(), settings.forecast.default_horizon).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn forecast_accepts_negative_horizon_for_the_engine_to_reject() {
        let cli = Cli::try_parse_from(["margin", "forecast", "-i", "r.json", "--horizon", "-1"])
            .unwrap();
        match cli.command {
            Commands::Forecast(args) => assert_eq!(args.horizon, Some(-1)),
            _ => panic!("expected forecast"),
        }
    }

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "margin",
            "serve",
            "--port",
            "8080",
            "--log-format",
            "pretty",
        ])
        .unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Pretty));
        assert!(matches!(cli.command, Commands::Serve(ServeArgs { port: Some(8080), .. })));
    }
}
