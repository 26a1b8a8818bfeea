// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use jma_forecast::{
    extract, load_catalog, load_forecast, parse_forecast_document, render_lines, telemetry, Config,
    DisplayRecord, JmaClient,
};

#[derive(Parser, Debug)]
#[command(name = "jma-forecast")]
#[command(about = "JMA weather forecasts in the terminal", version)]
struct Cli {
    /// Area directory URL (overrides JMA_AREA_URL)
    #[arg(long, global = true)]
    area_url: Option<String>,

    /// Forecast base URL (overrides JMA_FORECAST_BASE_URL)
    #[arg(long, global = true)]
    forecast_base_url: Option<String>,

    /// Request timeout in seconds (overrides JMA_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List forecast areas (centers and offices) sorted by name
    Areas {
        /// Only show areas whose name contains or code starts with this text
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Print the forecast for one area code
    Forecast {
        /// Area code, e.g. 130000
        code: Option<String>,

        /// Read the forecast document from a local JSON file instead
        #[arg(long, conflicts_with = "code")]
        file: Option<PathBuf>,

        /// Emit display records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive area picker and forecast view (default)
    Tui,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(url) = &self.area_url {
            config.area_url = url.clone();
        }
        if let Some(url) = &self.forecast_base_url {
            config.forecast_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Areas { query }) => {
            telemetry::init("info").context("Failed to install log subscriber")?;
            run_areas(&cli.config()?, query.as_deref())?;
        }
        Some(Command::Forecast { code, file, json }) => {
            telemetry::init("info").context("Failed to install log subscriber")?;
            run_forecast(&cli.config()?, code.as_deref(), file.as_ref(), *json)?;
        }
        Some(Command::Tui) | None => {
            // stderr would land on the alternate screen
            telemetry::init_to_file(&telemetry::default_log_path(), "warn")?;
            run_ui_mode(&cli.config()?)?;
        }
    }

    Ok(())
}

fn run_areas(config: &Config, query: Option<&str>) -> Result<()> {
    let client = JmaClient::new(config.clone());
    let catalog = load_catalog(&client).context("[ERROR] FAILED TO LOAD AREA LIST")?;

    let matches = catalog.search(query.unwrap_or_default());
    for entry in &matches {
        println!("{:<24} [{}]", entry.label(), entry.kind.as_str());
    }
    println!("\n✓ {} of {} areas", matches.len(), catalog.len());

    Ok(())
}

fn run_forecast(config: &Config, code: Option<&str>, file: Option<&PathBuf>, json: bool) -> Result<()> {
    let records = match (code, file) {
        (_, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read forecast file: {:?}", path))?;
            extract(&parse_forecast_document(&text)?)
        }
        (Some(code), None) => {
            let client = JmaClient::new(config.clone());
            load_forecast(&client, code).context("[ERROR] FAILED TO LOAD WEATHER DATA")?
        }
        (None, None) => anyhow::bail!("Give an area code or --file (see `jma-forecast areas`)"),
    };

    print_records(&records, json)
}

fn print_records(records: &[DisplayRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        for line in render_lines(records) {
            println!("{}", line);
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    println!("🌤️  Loading JMA area list...\n");

    let client = JmaClient::new(config.clone());
    let catalog = load_catalog(&client).context("[ERROR] FAILED TO LOAD AREA LIST")?;

    println!("✓ Loaded {} areas", catalog.len());
    println!("   Logs: {}\n", telemetry::default_log_path().display());

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app, &client)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: jma-forecast forecast <code>");
    std::process::exit(1);
}
