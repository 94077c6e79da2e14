use ally_cutover::cli::{Cli, OutputFormat};
use ally_cutover::config::AnalysisConfig;
use ally_cutover::csv_output::CsvOutput;
use ally_cutover::json_output::JsonOutput;
use ally_cutover::{charts, ingest, pipeline};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber (stderr; TRACE with --debug, else RUST_LOG or warn)
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let base = match &args.config {
        Some(path) => AnalysisConfig::from_toml(path)?,
        None => AnalysisConfig::default(),
    };
    let config = args.apply_overrides(base);
    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!(?config, "Loaded analysis configuration");

    let tables = ingest::load_tables(&args.applicants, &args.sessions, &args.events)?;
    let report = pipeline::run_analysis(&tables, &config).context("Analysis failed")?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", report.to_report_string());
            if args.charts {
                println!();
                print!("{}", charts::render_charts(&report, args.bins)?);
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonOutput::from_report(&report).to_json()?);
        }
        OutputFormat::Csv => {
            print!("{}", CsvOutput::from_report(&report).to_csv());
        }
    }

    if args.charts && args.format != OutputFormat::Text {
        tracing::warn!("--charts is only rendered with --format text");
    }

    Ok(())
}
