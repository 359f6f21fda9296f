use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use webshot_recorder::screenshot::client::{create_client, open_page};
use webshot_recorder::utils::logger::{init_console_logger, init_logger};
use webshot_recorder::utils::page_label;
use webshot_recorder::{Photographer, Settings, WebDriverSession};

/// Capture a screenshot and page source of a URL through a WebDriver server
#[derive(Debug, Parser)]
#[command(name = "webshot-recorder", version)]
struct Cli {
    /// Page to capture
    url: String,

    /// Label used to derive the file name (defaults to one built from the URL)
    #[arg(short, long)]
    label: Option<String>,

    /// Directory to save screenshots in
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser headless (true/false)
    #[arg(long)]
    headless: Option<bool>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Leave the intermediate temp file in place
    #[arg(long)]
    keep_temp: bool,

    /// Skip the page source dump
    #[arg(long)]
    no_source: bool,

    /// Write logs to a file in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            settings.webdriver_url = url.clone();
        }
        if let Some(headless) = self.headless {
            settings.headless = headless;
        }
        if let Some(width) = self.width {
            settings.viewport_width = width;
        }
        if let Some(height) = self.height {
            settings.viewport_height = height;
        }
        if self.keep_temp {
            settings.keep_temp_files = true;
        }
        if self.no_source {
            settings.write_page_source = false;
        }
        if let Some(dir) = &self.log_dir {
            settings.log_dir = Some(dir.clone());
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    match &settings.log_dir {
        Some(dir) => init_logger(dir)?,
        None => init_console_logger(cli.verbose)?,
    }

    let url = Url::parse(&cli.url).with_context(|| format!("Invalid URL: {}", cli.url))?;
    let label = cli.label.clone().unwrap_or_else(|| page_label(&url));

    fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("Failed to create directory: {}", settings.output_dir.display()))?;

    let client = create_client(&settings.webdriver_url, settings.viewport(), settings.headless).await?;
    let session = Arc::new(WebDriverSession::new(client.clone()));
    let photographer = Photographer::new(session, &settings.output_dir)
        .with_config(settings.photographer_config());

    let saved = match open_page(&client, url.as_str(), settings.page_load_timeout()).await {
        Ok(()) => photographer.take_screenshot(&label).await,
        Err(e) => {
            warn!("Could not load {}: {:#}", url, e);
            None
        }
    };

    if let Err(e) = client.close().await {
        warn!("Failed to close WebDriver client: {}", e);
    }

    match saved {
        Some(artifact) => {
            info!("Captured {} as {}", url, artifact.path().display());
            println!("{}", artifact.path().display());
            if let Some(source) = artifact.source_path() {
                println!("{}", source.display());
            }
            Ok(true)
        }
        None => {
            eprintln!("No screenshot captured for {}", url);
            Ok(false)
        }
    }
}
