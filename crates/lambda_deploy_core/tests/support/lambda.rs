use std::sync::Mutex;

use lambda_deploy_core::client::{LambdaApi, Lookup};
use lambda_deploy_core::error::RemoteError;
use lambda_deploy_core::model::{
    AliasSpec, CodeUpdate, FunctionConfigUpdate, RemoteAliasConfig, RemoteFunctionConfig,
    UpdateAliasRequest,
};

pub const ACCOUNT_PREFIX: &str = "arn:aws:lambda:us-east-1:123456789012:function";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateAlias(AliasSpec),
    GetAlias {
        function_name: String,
        alias_name: String,
    },
    UpdateAlias(UpdateAliasRequest),
    GetFunction(String),
    UpdateFunctionCode(CodeUpdate),
    UpdateFunctionConfiguration(FunctionConfigUpdate),
}

/// What the fake returns from a function lookup.
#[derive(Debug, Clone)]
pub enum FunctionState {
    Missing,
    WithoutConfiguration,
    Deployed(RemoteFunctionConfig),
}

/// In-memory stand-in for the Lambda API that records every call.
pub struct RecordingLambda {
    calls: Mutex<Vec<Call>>,
    alias: Option<RemoteAliasConfig>,
    function: FunctionState,
    denied_operation: Option<&'static str>,
}

impl RecordingLambda {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            alias: None,
            function: FunctionState::Missing,
            denied_operation: None,
        }
    }

    pub fn with_alias(mut self, alias: RemoteAliasConfig) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_function(mut self, function: FunctionState) -> Self {
        self.function = function;
        self
    }

    /// Makes the named operation fail with a remote error.
    pub fn denying(mut self, operation: &'static str) -> Self {
        self.denied_operation = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), RemoteError> {
        self.calls.lock().expect("poisoned mutex").push(call);
        if self.denied_operation == Some(operation) {
            return Err(RemoteError::new(operation, "AccessDeniedException: not authorized"));
        }
        Ok(())
    }
}

pub fn alias_arn(function_name: &str, alias_name: &str) -> String {
    format!("{ACCOUNT_PREFIX}:{function_name}:{alias_name}")
}

impl LambdaApi for RecordingLambda {
    fn create_alias(&self, request: &AliasSpec) -> Result<RemoteAliasConfig, RemoteError> {
        self.record("CreateAlias", Call::CreateAlias(request.clone()))?;
        Ok(RemoteAliasConfig {
            alias_arn: Some(alias_arn(&request.function_name, &request.name)),
            name: Some(request.name.clone()),
            function_version: Some(request.function_version.clone()),
            description: request.description.clone(),
        })
    }

    fn get_alias(
        &self,
        function_name: &str,
        alias_name: &str,
    ) -> Result<Lookup<RemoteAliasConfig>, RemoteError> {
        self.record(
            "GetAlias",
            Call::GetAlias {
                function_name: function_name.to_string(),
                alias_name: alias_name.to_string(),
            },
        )?;
        Ok(match &self.alias {
            Some(alias) => Lookup::Found(alias.clone()),
            None => Lookup::NotFound(format!(
                "Alias not found: {}",
                alias_arn(function_name, alias_name)
            )),
        })
    }

    fn update_alias(&self, request: &UpdateAliasRequest) -> Result<RemoteAliasConfig, RemoteError> {
        self.record("UpdateAlias", Call::UpdateAlias(request.clone()))?;
        let name = request.name.clone().unwrap_or_default();
        Ok(RemoteAliasConfig {
            alias_arn: Some(alias_arn(&request.function_name, &name)),
            name: request.name.clone(),
            function_version: request.function_version.clone(),
            description: request.description.clone(),
        })
    }

    fn get_function(
        &self,
        function_name: &str,
    ) -> Result<Lookup<Option<RemoteFunctionConfig>>, RemoteError> {
        self.record("GetFunction", Call::GetFunction(function_name.to_string()))?;
        Ok(match &self.function {
            FunctionState::Missing => Lookup::NotFound(format!(
                "Function not found: {ACCOUNT_PREFIX}:{function_name}"
            )),
            FunctionState::WithoutConfiguration => Lookup::Found(None),
            FunctionState::Deployed(config) => Lookup::Found(Some(config.clone())),
        })
    }

    fn update_function_code(
        &self,
        request: CodeUpdate,
    ) -> Result<RemoteFunctionConfig, RemoteError> {
        let function_name = request.function_name.clone();
        let published = request.publish == Some(true);
        self.record("UpdateFunctionCode", Call::UpdateFunctionCode(request))?;
        Ok(RemoteFunctionConfig {
            function_name: Some(function_name.clone()),
            function_arn: Some(format!("{ACCOUNT_PREFIX}:{function_name}")),
            version: Some(if published { "8" } else { "$LATEST" }.to_string()),
            ..RemoteFunctionConfig::default()
        })
    }

    fn update_function_configuration(
        &self,
        request: &FunctionConfigUpdate,
    ) -> Result<RemoteFunctionConfig, RemoteError> {
        self.record(
            "UpdateFunctionConfiguration",
            Call::UpdateFunctionConfiguration(request.clone()),
        )?;
        Ok(RemoteFunctionConfig {
            function_name: Some(request.function_name.clone()),
            function_arn: Some(format!("{ACCOUNT_PREFIX}:{}", request.function_name)),
            version: Some("$LATEST".to_string()),
            role: request.role.clone(),
            runtime: request.runtime.clone(),
            handler: request.handler.clone(),
            description: request.description.clone(),
            timeout_seconds: request.timeout_seconds,
            memory_mb: request.memory_mb,
            network: request.network.clone(),
            environment: request.environment.clone(),
        })
    }
}
