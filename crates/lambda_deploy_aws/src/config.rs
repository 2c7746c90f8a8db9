//! Deploy-file configuration.
//!
//! Each task field resolves through the chain: command-line flag (or its
//! environment variable), the task's own table, the `[defaults]` table.
//! Fields still unset after that fall back to the deployed state when the
//! task runs.

use std::fs;
use std::path::{Path, PathBuf};

use lambda_deploy_core::model::{
    EnvironmentVariables, FunctionConfigOverrides, NetworkConfig, S3ObjectRef,
};
use lambda_deploy_core::tasks::{AliasInput, FunctionUpdateInput, TaskKind};
use serde::Deserialize;

pub const DEFAULT_DEPLOY_FILE: &str = "lambda-deploy.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read deploy file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse deploy file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub alias_name: Option<String>,
    pub alias_description: Option<String>,
    pub publish: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasSection {
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub alias_name: Option<String>,
    pub alias_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionSection {
    pub function_name: Option<String>,
    pub zip_file: Option<PathBuf>,
    pub s3_file: Option<S3ObjectRef>,
    pub role: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub function_description: Option<String>,
    pub timeout: Option<i32>,
    pub memory_size: Option<i32>,
    pub vpc: Option<NetworkConfig>,
    pub environment: Option<EnvironmentVariables>,
    pub publish: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployFile {
    pub defaults: Defaults,
    pub create_alias: Option<AliasSection>,
    pub update_alias: Option<AliasSection>,
    pub migrate_alias: Option<AliasSection>,
    pub update_function: Option<FunctionSection>,
    /// Directory relative archive paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Alias values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasOverrides {
    pub alias_name: Option<String>,
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub description: Option<String>,
}

/// Function values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionOverrides {
    pub function_name: Option<String>,
    pub zip_file: Option<PathBuf>,
    pub s3_file: Option<S3ObjectRef>,
    pub role: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub description: Option<String>,
    pub timeout: Option<i32>,
    pub memory_size: Option<i32>,
    pub vpc: Option<NetworkConfig>,
    pub environment: Option<EnvironmentVariables>,
    pub publish: Option<bool>,
}

impl DeployFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut file: DeployFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        file.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Loads an explicitly named file, or the default file when it exists.
    /// Without either, every field must come from the command line.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_DEPLOY_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn alias_section(&self, kind: TaskKind) -> Option<&AliasSection> {
        match kind {
            TaskKind::CreateAlias => self.create_alias.as_ref(),
            TaskKind::UpdateAlias => self.update_alias.as_ref(),
            TaskKind::MigrateAlias => self.migrate_alias.as_ref(),
            TaskKind::UpdateFunction => None,
        }
    }

    pub fn alias_input(&self, kind: TaskKind, cli: &AliasOverrides) -> AliasInput {
        let section = self.alias_section(kind).cloned().unwrap_or_default();
        let defaults = &self.defaults;

        AliasInput {
            alias_name: first_set([
                &cli.alias_name,
                &section.alias_name,
                &defaults.alias_name,
            ]),
            function_name: first_set([
                &cli.function_name,
                &section.function_name,
                &defaults.function_name,
            ]),
            function_version: first_set([
                &cli.function_version,
                &section.function_version,
                &defaults.function_version,
            ]),
            description: first_set([
                &cli.description,
                &section.alias_description,
                &defaults.alias_description,
            ]),
        }
    }

    pub fn function_input(&self, cli: &FunctionOverrides) -> FunctionUpdateInput {
        let section = self.update_function.clone().unwrap_or_default();
        let defaults = &self.defaults;

        // A code source given on the command line replaces the file's source
        // entirely, so a flag never combines with the other kind from the file.
        let (zip_file, s3_file) = if cli.zip_file.is_some() || cli.s3_file.is_some() {
            (cli.zip_file.clone(), cli.s3_file.clone())
        } else {
            (
                section.zip_file.map(|path| self.base_dir.join(path)),
                section.s3_file,
            )
        };

        FunctionUpdateInput {
            function_name: first_set([
                &cli.function_name,
                &section.function_name,
                &defaults.function_name,
            ]),
            zip_file,
            s3_file,
            overrides: FunctionConfigOverrides {
                role: first_set([&cli.role, &section.role]),
                runtime: first_set([&cli.runtime, &section.runtime]),
                handler: first_set([&cli.handler, &section.handler]),
                description: first_set([&cli.description, &section.function_description]),
                timeout_seconds: cli.timeout.or(section.timeout),
                memory_mb: cli.memory_size.or(section.memory_size),
                network: first_set([&cli.vpc, &section.vpc]),
                environment: first_set([&cli.environment, &section.environment]),
                publish: cli.publish.or(section.publish).or(defaults.publish),
            },
        }
    }
}

fn first_set<T: Clone, const N: usize>(candidates: [&Option<T>; N]) -> Option<T> {
    candidates.into_iter().find_map(Clone::clone)
}
