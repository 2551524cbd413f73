//! ngx-e2e: run the ngx-admin end-to-end suite
//!
//! ## Usage
//!
//! ```bash
//! ngx-e2e list                          # Show the catalog
//! ngx-e2e env                           # Check .env / process variables
//! ngx-e2e run                           # Run everything headless
//! ngx-e2e run --filter tables -j 2      # Subset, two workers
//! ngx-e2e run --ci --no-sandbox         # CI defaults in a container
//! ```

use clap::Parser;
use ngx_admin_e2e::{scenarios, Environment, ScenarioStatus, SuiteRunner};
use ngx_admin_e2e_cli::{
    logging, render_catalog, render_environment, run_config, Cli, CliConfig, CliError, CliResult,
    Commands, ListArgs, ProgressReporter, RunArgs,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    if let Err(e) = logging::init(&config) {
        eprintln!("Warning: {e}");
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(command: Commands, config: CliConfig) -> CliResult<()> {
    console::set_colors_enabled(config.color.should_color());
    console::set_colors_enabled_stderr(config.color.should_color());

    match command {
        Commands::Run(args) => run_suite(&config, &args).await,
        Commands::List(args) => {
            run_list(&args);
            Ok(())
        }
        Commands::Env => run_env(),
    }
}

fn run_list(args: &ListArgs) {
    print!("{}", render_catalog(&scenarios::filtered(args.filter.as_deref())));
}

fn run_env() -> CliResult<()> {
    let env = Environment::from_process()?;
    print!("{}", render_environment(&env));
    Ok(())
}

async fn run_suite(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let env = Arc::new(Environment::from_process()?);
    let run = run_config(args, args.ci || env.ci);
    tracing::debug!(?run, "run configuration");
    let selected = scenarios::filtered(run.filter.as_deref());
    if selected.is_empty() {
        return Err(CliError::config(format!(
            "no scenario matches filter {:?}",
            run.filter.as_deref().unwrap_or_default()
        )));
    }

    let factory = driver_factory(args)?;
    let output_dir = run.output_dir.clone();
    let runner = SuiteRunner::new(factory, run, env.clone());

    let mut reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
    );
    reporter.info(&format!(
        "{} scenarios against {} ({} workers, {} retries)",
        selected.len(),
        env.base_url,
        runner.config().workers,
        runner.config().retries
    ));
    reporter.start_progress(selected.len() as u64, "running");
    let report = runner
        .run_with(selected, |result| reporter.scenario_finished(result))
        .await;
    reporter.finish();

    let files = report.write(&output_dir)?;
    reporter.summary(&report);
    reporter.info(&format!("HTML report: {}", files.html.display()));

    let failed = report.count(ScenarioStatus::Failed);
    if failed > 0 {
        return Err(CliError::ScenariosFailed {
            failed,
            total: report.total(),
        });
    }
    Ok(())
}

#[cfg(feature = "browser")]
fn driver_factory(args: &RunArgs) -> CliResult<Arc<dyn ngx_admin_e2e::DriverFactory>> {
    let options = ngx_admin_e2e_cli::browser_options(args);
    Ok(Arc::new(ngx_admin_e2e::CdpDriverFactory::new(options)))
}

#[cfg(not(feature = "browser"))]
fn driver_factory(_args: &RunArgs) -> CliResult<Arc<dyn ngx_admin_e2e::DriverFactory>> {
    Err(CliError::config(
        "built without browser support. Rebuild with --features browser",
    ))
}
