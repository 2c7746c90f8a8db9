use crate::error::RemoteError;
use crate::model::{
    AliasSpec, CodeUpdate, FunctionConfigUpdate, RemoteAliasConfig, RemoteFunctionConfig,
    UpdateAliasRequest,
};

/// Outcome of a remote read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// The resource does not exist; carries the service's message.
    NotFound(String),
}

/// The remote function-management operations the tasks consume.
///
/// Implementations are constructed and authenticated by the caller. Calls
/// block until the service responds.
pub trait LambdaApi {
    fn create_alias(&self, request: &AliasSpec) -> Result<RemoteAliasConfig, RemoteError>;

    fn get_alias(
        &self,
        function_name: &str,
        alias_name: &str,
    ) -> Result<Lookup<RemoteAliasConfig>, RemoteError>;

    fn update_alias(&self, request: &UpdateAliasRequest) -> Result<RemoteAliasConfig, RemoteError>;

    /// `Found(None)` means the function exists but no configuration came back.
    fn get_function(
        &self,
        function_name: &str,
    ) -> Result<Lookup<Option<RemoteFunctionConfig>>, RemoteError>;

    fn update_function_code(&self, request: CodeUpdate)
        -> Result<RemoteFunctionConfig, RemoteError>;

    fn update_function_configuration(
        &self,
        request: &FunctionConfigUpdate,
    ) -> Result<RemoteFunctionConfig, RemoteError>;
}
