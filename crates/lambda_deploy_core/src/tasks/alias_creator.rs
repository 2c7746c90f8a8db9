use crate::client::LambdaApi;
use crate::error::TaskError;
use crate::model::RemoteAliasConfig;

use super::{create_alias, AliasInput, TaskKind};

/// Creates a new alias unconditionally. "Already exists" surfaces as a
/// remote error.
pub struct AliasCreator<'a> {
    client: &'a dyn LambdaApi,
}

impl<'a> AliasCreator<'a> {
    pub fn new(client: &'a dyn LambdaApi) -> Self {
        Self { client }
    }

    pub fn check(input: &AliasInput) -> Result<(), TaskError> {
        input.to_spec().map(drop)
    }

    pub fn run(&self, input: &AliasInput) -> Result<RemoteAliasConfig, TaskError> {
        let spec = input.to_spec()?;
        create_alias(self.client, TaskKind::CreateAlias, &spec)
    }
}
