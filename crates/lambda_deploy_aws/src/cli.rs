use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lambda_deploy_core::model::{EnvironmentVariables, NetworkConfig, S3ObjectRef};

use crate::adapters::ClientOptions;
use crate::config::{AliasOverrides, FunctionOverrides};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "lambda_deploy",
    about = "Create, update and migrate AWS Lambda aliases and function code",
    long_about = "Runs one deployment task against AWS Lambda. Values come from\n\
                  command-line flags, then the task's table in the deploy file,\n\
                  then the deploy file's [defaults] table; fields left unset\n\
                  keep their currently deployed value."
)]
pub struct Cli {
    /// Deploy file (defaults to ./lambda-deploy.toml when present)
    #[arg(long, short = 'c', env = "LAMBDA_DEPLOY_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    /// AWS region, overriding the default provider chain
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,
    /// Named AWS profile
    #[arg(long, env = "AWS_PROFILE", global = true)]
    pub profile: Option<String>,
    /// Custom Lambda endpoint, e.g. a local emulator
    #[arg(long, env = "LAMBDA_DEPLOY_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,
    /// Log output format
    #[arg(value_enum, long, default_value_t = LogFormat::Json, global = true)]
    pub log_format: LogFormat,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LAMBDA_DEPLOY_LOG", default_value = "info", global = true)]
    pub log_level: String,
    /// Resolve and print task inputs without calling AWS
    #[arg(long, global = true)]
    pub dry_run: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create Lambda Alias.
    CreateAlias(AliasArgs),
    /// Update Lambda Alias.
    UpdateAlias(AliasArgs),
    /// Create / Update Lambda Alias.
    MigrateAlias(AliasArgs),
    /// Update an existing Lambda function.
    UpdateFunction(FunctionArgs),
    /// List the available tasks
    Tasks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Pretty,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AliasArgs {
    #[arg(long)]
    pub alias_name: Option<String>,
    #[arg(long)]
    pub function_name: Option<String>,
    #[arg(long)]
    pub function_version: Option<String>,
    #[arg(long = "alias-description")]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FunctionArgs {
    #[arg(long)]
    pub function_name: Option<String>,
    /// Local code archive to upload
    #[arg(long, conflicts_with = "s3_bucket")]
    pub zip_file: Option<PathBuf>,
    #[arg(long, requires = "s3_key")]
    pub s3_bucket: Option<String>,
    #[arg(long, requires = "s3_bucket")]
    pub s3_key: Option<String>,
    #[arg(long, requires = "s3_bucket")]
    pub s3_object_version: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub runtime: Option<String>,
    #[arg(long)]
    pub handler: Option<String>,
    #[arg(long = "function-description")]
    pub description: Option<String>,
    /// Timeout in seconds
    #[arg(long)]
    pub timeout: Option<i32>,
    /// Memory size in MB
    #[arg(long)]
    pub memory_size: Option<i32>,
    /// Replaces the VPC subnets; repeat for several
    #[arg(long = "subnet-id")]
    pub subnet_ids: Vec<String>,
    /// Replaces the VPC security groups; repeat for several
    #[arg(long = "security-group-id")]
    pub security_group_ids: Vec<String>,
    /// Replaces the environment; KEY=VALUE, repeat for several
    #[arg(long = "env", value_parser = parse_key_value)]
    pub environment: Vec<(String, String)>,
    /// Publish a new version with the code update
    #[arg(long)]
    pub publish: Option<bool>,
}

// ── conversions ────────────────────────────────────────────────────

impl Cli {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

impl From<&AliasArgs> for AliasOverrides {
    fn from(args: &AliasArgs) -> Self {
        Self {
            alias_name: args.alias_name.clone(),
            function_name: args.function_name.clone(),
            function_version: args.function_version.clone(),
            description: args.description.clone(),
        }
    }
}

impl From<&FunctionArgs> for FunctionOverrides {
    fn from(args: &FunctionArgs) -> Self {
        let s3_file = args.s3_bucket.as_ref().map(|bucket| S3ObjectRef {
            bucket: Some(bucket.clone()),
            key: args.s3_key.clone(),
            object_version: args.s3_object_version.clone(),
        });
        let vpc = if args.subnet_ids.is_empty() && args.security_group_ids.is_empty() {
            None
        } else {
            Some(NetworkConfig {
                subnet_ids: args.subnet_ids.clone(),
                security_group_ids: args.security_group_ids.clone(),
            })
        };
        let environment = if args.environment.is_empty() {
            None
        } else {
            Some(
                args.environment
                    .iter()
                    .cloned()
                    .collect::<EnvironmentVariables>(),
            )
        };

        Self {
            function_name: args.function_name.clone(),
            zip_file: args.zip_file.clone(),
            s3_file,
            role: args.role.clone(),
            runtime: args.runtime.clone(),
            handler: args.handler.clone(),
            description: args.description.clone(),
            timeout: args.timeout,
            memory_size: args.memory_size,
            vpc,
            environment,
            publish: args.publish,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
