use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::client::{LambdaApi, Lookup};
use crate::error::{require_fields, TaskError};
use crate::merge::merge_opt;
use crate::model::{
    CodePayload, CodeUpdate, FunctionCodeSource, FunctionConfigOverrides, FunctionConfigUpdate,
    RemoteFunctionConfig, S3ObjectRef,
};

use super::TaskKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionUpdateInput {
    pub function_name: Option<String>,
    pub zip_file: Option<PathBuf>,
    pub s3_file: Option<S3ObjectRef>,
    pub overrides: FunctionConfigOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionUpdateOutcome {
    pub code: RemoteFunctionConfig,
    pub configuration: RemoteFunctionConfig,
}

/// Pushes new code to an existing function, then resubmits its full
/// configuration with overrides applied.
///
/// The two writes are not atomic: when the configuration update fails the
/// new code stays deployed.
pub struct FunctionUpdater<'a> {
    client: &'a dyn LambdaApi,
}

impl<'a> FunctionUpdater<'a> {
    pub fn new(client: &'a dyn LambdaApi) -> Self {
        Self { client }
    }

    pub fn check(input: &FunctionUpdateInput) -> Result<(), TaskError> {
        code_source(input).map(drop)
    }

    pub fn run(&self, input: &FunctionUpdateInput) -> Result<FunctionUpdateOutcome, TaskError> {
        let source = code_source(input)?;
        let function_name = input.function_name.clone().unwrap_or_default();

        let current = match self.client.get_function(&function_name)? {
            Lookup::Found(Some(config)) => config,
            Lookup::Found(None) => RemoteFunctionConfig::minimal(),
            Lookup::NotFound(message) => {
                warn!(task = TaskKind::UpdateFunction.as_str(), event = "function_lookup_failed", %message);
                error!(
                    task = TaskKind::UpdateFunction.as_str(),
                    event = "function_missing",
                    function_name = %function_name,
                    "Function does not exist"
                );
                return Err(TaskError::NotFound {
                    resource: format!("function {function_name}"),
                    message,
                });
            }
        };

        let code = self.update_code(&function_name, source, input.overrides.publish)?;
        let configuration = self.update_configuration(&function_name, &input.overrides, current)?;
        Ok(FunctionUpdateOutcome {
            code,
            configuration,
        })
    }

    fn update_code(
        &self,
        function_name: &str,
        source: FunctionCodeSource,
        publish: Option<bool>,
    ) -> Result<RemoteFunctionConfig, TaskError> {
        let payload = match source {
            FunctionCodeSource::LocalArchive(path) => match fs::read(&path) {
                Ok(bytes) => CodePayload::ZipFile(bytes),
                Err(source) => return Err(TaskError::Artifact { path, source }),
            },
            FunctionCodeSource::RemoteObject {
                bucket,
                key,
                object_version,
            } => CodePayload::S3Object {
                bucket,
                key,
                object_version,
            },
        };

        let updated = self.client.update_function_code(CodeUpdate {
            function_name: function_name.to_string(),
            payload,
            publish,
        })?;
        info!(
            task = TaskKind::UpdateFunction.as_str(),
            event = "function_code_updated",
            function_arn = updated.function_arn.as_deref().unwrap_or_default(),
            version = updated.version.as_deref().unwrap_or_default(),
            "Update Lambda function requested"
        );
        Ok(updated)
    }

    fn update_configuration(
        &self,
        function_name: &str,
        overrides: &FunctionConfigOverrides,
        current: RemoteFunctionConfig,
    ) -> Result<RemoteFunctionConfig, TaskError> {
        let request = merge_configuration(function_name, overrides, current);
        let updated = self.client.update_function_configuration(&request)?;
        info!(
            task = TaskKind::UpdateFunction.as_str(),
            event = "function_configuration_updated",
            function_arn = updated.function_arn.as_deref().unwrap_or_default(),
            "Update Lambda function configuration requested"
        );
        Ok(updated)
    }
}

fn code_source(input: &FunctionUpdateInput) -> Result<FunctionCodeSource, TaskError> {
    require_fields(&[("function_name", input.function_name.as_deref())])?;
    Ok(FunctionCodeSource::select(
        input.zip_file.as_ref(),
        input.s3_file.as_ref(),
    )?)
}

/// Resolves every configuration field independently against the snapshot.
pub fn merge_configuration(
    function_name: &str,
    overrides: &FunctionConfigOverrides,
    current: RemoteFunctionConfig,
) -> FunctionConfigUpdate {
    FunctionConfigUpdate {
        function_name: function_name.to_string(),
        role: merge_opt(overrides.role.clone(), current.role),
        runtime: merge_opt(overrides.runtime.clone(), current.runtime),
        handler: merge_opt(overrides.handler.clone(), current.handler),
        description: merge_opt(overrides.description.clone(), current.description),
        timeout_seconds: merge_opt(overrides.timeout_seconds, current.timeout_seconds),
        memory_mb: merge_opt(overrides.memory_mb, current.memory_mb),
        network: merge_opt(overrides.network.clone(), current.network),
        environment: merge_opt(overrides.environment.clone(), current.environment),
    }
}
