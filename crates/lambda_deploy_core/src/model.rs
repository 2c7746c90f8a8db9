use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{require_fields, ConfigurationError};

/// Runtime assumed when the service returns no configuration at all.
pub const DEFAULT_RUNTIME: &str = "nodejs";

pub type EnvironmentVariables = BTreeMap<String, String>;

/// A fully specified alias, as sent on a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    pub name: String,
    pub function_name: String,
    pub function_version: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAliasRequest {
    pub function_name: String,
    pub name: Option<String>,
    pub function_version: Option<String>,
    pub description: Option<String>,
}

/// Alias state as reported by the service on read and write calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAliasConfig {
    pub alias_arn: Option<String>,
    pub name: Option<String>,
    pub function_version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// Function configuration as reported by the service on read and write calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFunctionConfig {
    pub function_name: Option<String>,
    pub function_arn: Option<String>,
    pub version: Option<String>,
    pub role: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub description: Option<String>,
    pub timeout_seconds: Option<i32>,
    pub memory_mb: Option<i32>,
    pub network: Option<NetworkConfig>,
    pub environment: Option<EnvironmentVariables>,
}

impl RemoteFunctionConfig {
    /// Stand-in snapshot used when a lookup succeeds without a configuration.
    pub fn minimal() -> Self {
        Self {
            runtime: Some(DEFAULT_RUNTIME.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionConfigOverrides {
    pub role: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub description: Option<String>,
    pub timeout_seconds: Option<i32>,
    pub memory_mb: Option<i32>,
    pub network: Option<NetworkConfig>,
    pub environment: Option<EnvironmentVariables>,
    pub publish: Option<bool>,
}

/// Full replacement configuration sent on an update call; fields left unset
/// here are unset on the service as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfigUpdate {
    pub function_name: String,
    pub role: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub description: Option<String>,
    pub timeout_seconds: Option<i32>,
    pub memory_mb: Option<i32>,
    pub network: Option<NetworkConfig>,
    pub environment: Option<EnvironmentVariables>,
}

/// Reference to a code archive already uploaded to an object store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct S3ObjectRef {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub object_version: Option<String>,
}

impl S3ObjectRef {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_fields(&[
            ("s3_file.bucket", self.bucket.as_deref()),
            ("s3_file.key", self.key.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCodeSource {
    LocalArchive(PathBuf),
    RemoteObject {
        bucket: String,
        key: String,
        object_version: Option<String>,
    },
}

impl FunctionCodeSource {
    /// Picks the single configured code source; zero or two is an error.
    pub fn select(
        zip_file: Option<&PathBuf>,
        s3_file: Option<&S3ObjectRef>,
    ) -> Result<Self, ConfigurationError> {
        match (zip_file, s3_file) {
            (Some(path), None) => Ok(Self::LocalArchive(path.clone())),
            (None, Some(object)) => {
                object.validate()?;
                Ok(Self::RemoteObject {
                    bucket: object.bucket.clone().unwrap_or_default(),
                    key: object.key.clone().unwrap_or_default(),
                    object_version: object.object_version.clone(),
                })
            }
            _ => Err(ConfigurationError::AmbiguousCodeSource),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodePayload {
    ZipFile(Vec<u8>),
    S3Object {
        bucket: String,
        key: String,
        object_version: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUpdate {
    pub function_name: String,
    pub payload: CodePayload,
    pub publish: Option<bool>,
}
