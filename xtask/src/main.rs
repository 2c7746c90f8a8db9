use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the lambda_deploy workspace",
    long_about = "A unified CLI for CI checks and offline checks of deploy files\n\
                  in the lambda_deploy workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests, sample deploy file)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Resolve every task in a deploy file without calling AWS
    DryRun {
        /// Deploy file to check
        #[arg(long, default_value = SAMPLE_DEPLOY_FILE)]
        config: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Dry-run every task of the sample deploy file
    Sample,
    /// Run check + sample
    All,
}

const SAMPLE_DEPLOY_FILE: &str = "lambda-deploy.example.toml";
const TASKS: [&str; 4] = [
    "create-alias",
    "update-alias",
    "migrate-alias",
    "update-function",
];

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn dry_run(config: &str) {
    for task in TASKS {
        step(&format!("Dry-run {task} ({config})"));
        run_cargo(&[
            "run",
            "-q",
            "-p",
            "lambda_deploy_aws",
            "--bin",
            "lambda_deploy",
            "--",
            "--config",
            config,
            "--log-format",
            "pretty",
            "--dry-run",
            task,
        ]);
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test lambda_deploy_core");
    run_cargo(&["test", "-p", "lambda_deploy_core"]);

    step("Test lambda_deploy_aws");
    run_cargo(&["test", "-p", "lambda_deploy_aws"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Sample => dry_run(SAMPLE_DEPLOY_FILE),
                CiJob::All => {
                    ci_check();
                    dry_run(SAMPLE_DEPLOY_FILE);
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::DryRun { config } => dry_run(&config),
    }
}
