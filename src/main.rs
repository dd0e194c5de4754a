//! City Planner - Axum server and one-shot command line operations

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use city_planner::client::HttpBackend;
use city_planner::config::{Cli, Command};
use city_planner::dto::{NetworkRequest, SignalRequest};
use city_planner::error::PlannerError;
use city_planner::orchestrator::RequestOrchestrator;
use city_planner::view::ViewKind;
use city_planner::{api, console};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::from_default_env();
    let filter = match "city_planner=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(cli.config.backend_url.clone())?;
    let orchestrator = RequestOrchestrator::new(Arc::new(backend), cli.config.map_defaults());

    let (view, outcome) = match cli.command() {
        Command::Serve => return serve(orchestrator, &cli).await,
        Command::Network {
            algorithm,
            prioritize_population,
        } => (
            ViewKind::Network,
            loaded(&orchestrator)
                .await?
                .optimize_network(NetworkRequest {
                    algorithm,
                    prioritize_population,
                })
                .await,
        ),
        Command::Route(args) => (ViewKind::Route, loaded(&orchestrator).await?.shortest_path(args.into()).await),
        Command::Emergency(args) => (
            ViewKind::Emergency,
            loaded(&orchestrator).await?.emergency_route(args.into()).await,
        ),
        Command::Transport => (ViewKind::Transport, loaded(&orchestrator).await?.optimize_transport().await),
        Command::Signals {
            intersections,
            time_of_day,
        } => (
            ViewKind::Signals,
            loaded(&orchestrator)
                .await?
                .optimize_signals(SignalRequest {
                    intersections,
                    time_of_day,
                })
                .await,
        ),
    };

    let panel = orchestrator.with_session(|s| s.panel(view));
    console::print_panel(view, &panel.content);
    let report = outcome?;
    console::print_report(&report);
    Ok(())
}

/// Loads the snapshot a one-shot operation needs, failing when it cannot.
async fn loaded(orchestrator: &RequestOrchestrator) -> Result<&RequestOrchestrator, PlannerError> {
    let counts = orchestrator.load_snapshot().await?;
    console::print_snapshot_loaded(&counts);
    Ok(orchestrator)
}

async fn serve(orchestrator: RequestOrchestrator, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    console::print_banner();
    match orchestrator.load_snapshot().await {
        Ok(counts) => console::print_snapshot_loaded(&counts),
        Err(e) => warn!(error = %e, "Starting without a snapshot; POST /api/session/reload to retry"),
    }

    let app = api::create_router(orchestrator, cli.config.backend_url.clone());
    println!("Server listening on http://{}", cli.config.bind);
    let listener = tokio::net::TcpListener::bind(cli.config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
