//! helmc CLI entrypoint.
//!
//! This is the main entrypoint for the helmc command-line tool.

use std::io::Write;
use std::process::ExitCode;

use helmc::action::{list_charts, Fetcher, Installer, Updater};
use helmc::cli::{Cli, Commands, OutputFormatter};
use helmc::config::{Prerequisites, Settings};
use helmc::error::Result;
use helmc::home::HomeLayout;
use helmc::kube::KubectlClient;
use helmc::vcs::GitClient;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Load .env before parsing so it can supply HELMC_* defaults
    let dotenv = match std::env::current_dir().map(|cwd| Settings::load_dotenv(&cwd)) {
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        Ok(Ok(loaded)) => loaded,
        Err(_) => None,
    };

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    match dotenv {
        Some(path) => info!("Loaded environment from: {}", path.display()),
        None => debug!("No .env file in the current directory"),
    }

    // Run async runtime
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let applied = e.applied_resources();
            if !applied.is_empty() {
                eprintln!("Resources created before the failure:");
                for resource in applied {
                    eprintln!("  - {resource}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let settings = Settings::resolve(cli.home, cli.repo)?.with_kube(cli.kubeconfig, cli.context);
    let layout = settings.layout();
    debug!("Resolved settings: {settings:?}");

    match cli.command {
        Commands::Install { chart, namespace } => {
            cmd_install(&settings, &layout, &chart, namespace.as_deref(), &formatter).await
        }
        Commands::Update => cmd_update(&settings, &layout, &formatter).await,
        Commands::Fetch { chart, local_name } => {
            cmd_fetch(&layout, &chart, local_name.as_deref(), &formatter).await
        }
        Commands::List => cmd_list(&layout, &formatter),
    }
}

/// Install a chart.
async fn cmd_install(
    settings: &Settings,
    layout: &HomeLayout,
    chart: &str,
    namespace: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let kubectl = KubectlClient::with_program(&settings.kubectl_program)
        .with_kubeconfig(settings.kubeconfig.clone())
        .with_context(settings.context.clone());

    let report = Installer::new(layout, &kubectl)
        .with_prerequisites(Prerequisites::new().require(&settings.kubectl_program))
        .install(chart, namespace)
        .await?;

    emit(&formatter.format_install(&report))
}

/// Clone or update the chart repository.
async fn cmd_update(settings: &Settings, layout: &HomeLayout, formatter: &OutputFormatter) -> Result<()> {
    let git = GitClient::with_program(&settings.git_program);
    let prerequisites = Prerequisites::new()
        .require(&settings.git_program)
        .require(&settings.kubectl_program);

    let report = Updater::new(layout, &git)
        .with_prerequisites(prerequisites)
        .update(&settings.repo)
        .await?;

    emit(&formatter.format_update(&report))
}

/// Copy a chart into the workspace.
async fn cmd_fetch(
    layout: &HomeLayout,
    chart: &str,
    local_name: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let report = Fetcher::new(layout).run(chart, local_name).await?;
    emit(&formatter.format_fetch(&report))
}

/// List charts in the workspace.
fn cmd_list(layout: &HomeLayout, formatter: &OutputFormatter) -> Result<()> {
    let charts = list_charts(layout)?;
    emit(&formatter.format_list(&charts))
}

/// Writes command output to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
