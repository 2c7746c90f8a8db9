use anyhow::Context;
use clap::Parser;
use lambda_deploy_aws::adapters::AwsLambdaApi;
use lambda_deploy_aws::cli::{Cli, Commands};
use lambda_deploy_aws::config::DeployFile;
use lambda_deploy_aws::logging::init_tracing;
use lambda_deploy_aws::runner::{run_plan, TaskPlan};
use lambda_deploy_core::tasks::TaskKind;
use tracing::{error, info};

async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Tasks) {
        for kind in TaskKind::ALL {
            println!("{:<16} {}", kind.as_str(), kind.description());
        }
        return Ok(());
    }

    let deploy_file = DeployFile::load_or_default(cli.config.as_deref())?;
    let plan = TaskPlan::resolve(&cli.command, &deploy_file)
        .context("command does not run a deployment task")?;
    let task = plan.kind().as_str();

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        plan.check()
            .with_context(|| format!("{task} input is incomplete"))?;
        info!(task, event = "dry_run_passed", "Task inputs resolved; AWS not called");
        return Ok(());
    }

    let client = AwsLambdaApi::from_options(&cli.client_options()).await;
    let report = run_plan(&plan, &client).with_context(|| format!("{task} failed"))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, &cli.log_level);

    let result = run(cli).await;
    if let Err(failure) = &result {
        error!(event = "run_failed", error = %format!("{failure:#}"));
    }
    result
}
