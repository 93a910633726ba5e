use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mohazo_core::app::{DashboardBuilder, MeetingInput, seed};
use mohazo_core::config::ConfigSources;
use mohazo_core::domain::DashboardError;
use mohazo_core::impls::{HttpMeetingApi, InMemoryMeetingApi};
use mohazo_core::ports::MeetingApi;

#[derive(Parser)]
#[command(name = "mohazo", version, about = "Team dashboard: meeting notes to assigned work")]
struct Cli {
    /// Meeting service base URL (overrides env and config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// JSON config file with `api_base_url` / `timeout_secs`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a sample meeting into the demo dataset (in memory) and print the dashboard
    Demo,
    /// Run the ingestion pipeline against the configured meeting service
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "cli")]
        uploaded_by: String,
    },
    /// List meetings known to the meeting service
    Meetings,
    /// Print the description script of a meeting
    Describe { meeting_id: i64 },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(kind = ?err.kind(), "{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DashboardError> {
    match cli.command {
        Commands::Demo => demo().await,
        Commands::Upload {
            title,
            content,
            uploaded_by,
        } => {
            let api = http_api(cli.base_url, cli.config.as_deref())?;
            let mut dashboard = DashboardBuilder::new()
                .meeting_api(api)
                .build()
                .map_err(|e| DashboardError::Config(e.to_string()))?;
            let input = MeetingInput::new(title, content).uploaded_by(uploaded_by);
            let report = dashboard.ingest(&input).await?;
            print_json(&report)
        }
        Commands::Meetings => {
            let api = http_api(cli.base_url, cli.config.as_deref())?;
            print_json(&api.get_meeting_list().await?)
        }
        Commands::Describe { meeting_id } => {
            let api = http_api(cli.base_url, cli.config.as_deref())?;
            println!("{}", api.describe_raw(meeting_id).await?);
            Ok(())
        }
    }
}

async fn demo() -> Result<(), DashboardError> {
    let mut dashboard = DashboardBuilder::new()
        .state(seed::demo_state())
        .meeting_api(Arc::new(InMemoryMeetingApi::new()))
        .build()
        .map_err(|e| DashboardError::Config(e.to_string()))?;

    let input = MeetingInput::new(
        "Search revamp planning",
        "- Audit current search logs\n- Prototype ranking tweaks\n- Design result cards\n- Load test the API\n- Plan the rollout",
    )
    .uploaded_by("demo");
    let report = dashboard.ingest(&input).await?;
    tracing::info!(work_id = %report.work_id, "demo ingestion done");

    if let Some(member) = dashboard.recommend_assignee(&report.work_id)?.map(|m| m.id.clone()) {
        dashboard.stage_assignment(&report.work_id, &member)?;
    }
    print_json(&dashboard.snapshot())
}

fn http_api(
    base_url: Option<String>,
    config: Option<&std::path::Path>,
) -> Result<Arc<HttpMeetingApi>, DashboardError> {
    let config = ConfigSources::from_env(config)?
        .with_override(base_url)
        .resolve()?;
    tracing::debug!(base_url = %config.base_url, "meeting service configured");
    Ok(Arc::new(HttpMeetingApi::with_config(config)?))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DashboardError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| DashboardError::Config(format!("cannot render output: {e}")))?;
    println!("{text}");
    Ok(())
}
