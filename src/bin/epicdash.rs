use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use epicdash::server::{build_router, AppState};
use epicdash::{AppConfig, EpicDash, HolidayCalendar, JiraClient};

#[derive(Parser)]
#[command(name = "epicdash", about = "Epic reporting dashboard service")]
struct Cli {
    /// Listen address (default: BIND_ADDR env or 0.0.0.0:8000)
    #[arg(long)]
    bind: Option<String>,

    /// Holiday CSV path (default: HOLIDAY_FILE env or holidays.csv)
    #[arg(long)]
    holiday_file: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AppConfig::from_env()?;
    let bind = cli.bind.unwrap_or_else(|| config.bind_addr.clone());
    let holiday_file = cli
        .holiday_file
        .unwrap_or_else(|| config.holiday_file.clone());

    let client = JiraClient::new(config.jira.clone())?;
    let holidays = HolidayCalendar::load(Path::new(&holiday_file))?;
    log::info!(
        "loaded {} holiday entries from {}",
        holidays.len(),
        holiday_file
    );

    let agent = epicdash::llm::create_agent(&config.llm_provider, &config.llm_model).await?;

    let state = AppState {
        app: Arc::new(EpicDash::new(client, holidays)),
        agent: Arc::new(agent),
    };

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    log::info!("listening on {bind}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
