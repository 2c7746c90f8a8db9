use std::future::Future;

use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, Runtime, VpcConfig};
use lambda_deploy_core::client::{LambdaApi, Lookup};
use lambda_deploy_core::error::RemoteError;
use lambda_deploy_core::model::{
    AliasSpec, CodePayload, CodeUpdate, EnvironmentVariables, FunctionConfigUpdate,
    NetworkConfig, RemoteAliasConfig, RemoteFunctionConfig, UpdateAliasRequest,
};

/// Overrides applied on top of the default AWS credential and region chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

/// [`LambdaApi`] backed by the AWS SDK.
///
/// Calls block the current worker thread, so this must be used from a
/// multi-threaded tokio runtime.
#[derive(Debug, Clone)]
pub struct AwsLambdaApi {
    client: aws_sdk_lambda::Client,
}

impl AwsLambdaApi {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }

    pub async fn from_options(options: &ClientOptions) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        Self::new(aws_sdk_lambda::Client::new(&sdk_config))
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn remote_error<E, R>(operation: &'static str, error: SdkError<E, R>) -> RemoteError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    RemoteError::new(operation, DisplayErrorContext(&error).to_string())
}

fn lookup_failure<T, E, R>(
    operation: &'static str,
    error: SdkError<E, R>,
    is_not_found: impl Fn(&E) -> bool,
) -> Result<Lookup<T>, RemoteError>
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = error.as_service_error() {
        if is_not_found(service_error) {
            let message = service_error
                .message()
                .unwrap_or("resource not found")
                .to_string();
            return Ok(Lookup::NotFound(message));
        }
    }
    Err(remote_error(operation, error))
}

fn alias_config(
    alias_arn: Option<&str>,
    name: Option<&str>,
    function_version: Option<&str>,
    description: Option<&str>,
) -> RemoteAliasConfig {
    RemoteAliasConfig {
        alias_arn: alias_arn.map(str::to_string),
        name: name.map(str::to_string),
        function_version: function_version.map(str::to_string),
        description: description.map(str::to_string),
    }
}

// FunctionConfiguration and the two update outputs expose identical getters
// but share no trait.
macro_rules! function_config {
    ($source:expr) => {{
        let source = $source;
        RemoteFunctionConfig {
            function_name: source.function_name().map(str::to_string),
            function_arn: source.function_arn().map(str::to_string),
            version: source.version().map(str::to_string),
            role: source.role().map(str::to_string),
            runtime: source.runtime().map(|runtime| runtime.as_str().to_string()),
            handler: source.handler().map(str::to_string),
            description: source.description().map(str::to_string),
            timeout_seconds: source.timeout(),
            memory_mb: source.memory_size(),
            network: source.vpc_config().map(|vpc| NetworkConfig {
                subnet_ids: vpc.subnet_ids().to_vec(),
                security_group_ids: vpc.security_group_ids().to_vec(),
            }),
            environment: source
                .environment()
                .and_then(|environment| environment.variables())
                .map(|variables| {
                    variables
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect::<EnvironmentVariables>()
                }),
        }
    }};
}

pub fn vpc_config(network: &NetworkConfig) -> VpcConfig {
    VpcConfig::builder()
        .set_subnet_ids(Some(network.subnet_ids.clone()))
        .set_security_group_ids(Some(network.security_group_ids.clone()))
        .build()
}

pub fn environment(variables: &EnvironmentVariables) -> Environment {
    Environment::builder()
        .set_variables(Some(variables.clone().into_iter().collect()))
        .build()
}

impl LambdaApi for AwsLambdaApi {
    fn create_alias(&self, request: &AliasSpec) -> Result<RemoteAliasConfig, RemoteError> {
        let output = block_on(
            self.client
                .create_alias()
                .function_name(&request.function_name)
                .name(&request.name)
                .function_version(&request.function_version)
                .set_description(request.description.clone())
                .send(),
        )
        .map_err(|error| remote_error("CreateAlias", error))?;

        Ok(alias_config(
            output.alias_arn(),
            output.name(),
            output.function_version(),
            output.description(),
        ))
    }

    fn get_alias(
        &self,
        function_name: &str,
        alias_name: &str,
    ) -> Result<Lookup<RemoteAliasConfig>, RemoteError> {
        let result = block_on(
            self.client
                .get_alias()
                .function_name(function_name)
                .name(alias_name)
                .send(),
        );

        match result {
            Ok(output) => Ok(Lookup::Found(alias_config(
                output.alias_arn(),
                output.name(),
                output.function_version(),
                output.description(),
            ))),
            Err(error) => lookup_failure("GetAlias", error, |service_error| {
                service_error.is_resource_not_found_exception()
            }),
        }
    }

    fn update_alias(&self, request: &UpdateAliasRequest) -> Result<RemoteAliasConfig, RemoteError> {
        let output = block_on(
            self.client
                .update_alias()
                .function_name(&request.function_name)
                .set_name(request.name.clone())
                .set_function_version(request.function_version.clone())
                .set_description(request.description.clone())
                .send(),
        )
        .map_err(|error| remote_error("UpdateAlias", error))?;

        Ok(alias_config(
            output.alias_arn(),
            output.name(),
            output.function_version(),
            output.description(),
        ))
    }

    fn get_function(
        &self,
        function_name: &str,
    ) -> Result<Lookup<Option<RemoteFunctionConfig>>, RemoteError> {
        let result = block_on(self.client.get_function().function_name(function_name).send());

        match result {
            Ok(output) => Ok(Lookup::Found(
                output
                    .configuration()
                    .map(|configuration| function_config!(configuration)),
            )),
            Err(error) => lookup_failure("GetFunction", error, |service_error| {
                service_error.is_resource_not_found_exception()
            }),
        }
    }

    fn update_function_code(
        &self,
        request: CodeUpdate,
    ) -> Result<RemoteFunctionConfig, RemoteError> {
        let builder = self
            .client
            .update_function_code()
            .function_name(request.function_name)
            .set_publish(request.publish);
        let builder = match request.payload {
            CodePayload::ZipFile(bytes) => builder.zip_file(Blob::new(bytes)),
            CodePayload::S3Object {
                bucket,
                key,
                object_version,
            } => builder
                .s3_bucket(bucket)
                .s3_key(key)
                .set_s3_object_version(object_version),
        };

        let output =
            block_on(builder.send()).map_err(|error| remote_error("UpdateFunctionCode", error))?;
        Ok(function_config!(&output))
    }

    fn update_function_configuration(
        &self,
        request: &FunctionConfigUpdate,
    ) -> Result<RemoteFunctionConfig, RemoteError> {
        let output = block_on(
            self.client
                .update_function_configuration()
                .function_name(&request.function_name)
                .set_role(request.role.clone())
                .set_runtime(request.runtime.as_deref().map(Runtime::from))
                .set_handler(request.handler.clone())
                .set_description(request.description.clone())
                .set_timeout(request.timeout_seconds)
                .set_memory_size(request.memory_mb)
                .set_vpc_config(request.network.as_ref().map(vpc_config))
                .set_environment(request.environment.as_ref().map(environment))
                .send(),
        )
        .map_err(|error| remote_error("UpdateFunctionConfiguration", error))?;

        Ok(function_config!(&output))
    }
}
