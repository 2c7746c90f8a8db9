use serde::Serialize;
use tracing::{info, warn};

use crate::client::{LambdaApi, Lookup};
use crate::error::TaskError;
use crate::model::RemoteAliasConfig;

use super::alias_updater::{require_alias_key, upsert_request};
use super::{create_alias, AliasInput, TaskKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created(RemoteAliasConfig),
    Updated(RemoteAliasConfig),
}

impl UpsertOutcome {
    pub fn alias(&self) -> &RemoteAliasConfig {
        match self {
            Self::Created(alias) | Self::Updated(alias) => alias,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Updates the alias when it exists, otherwise creates it from the raw
/// input.
pub struct AliasUpserter<'a> {
    client: &'a dyn LambdaApi,
}

impl<'a> AliasUpserter<'a> {
    pub fn new(client: &'a dyn LambdaApi) -> Self {
        Self { client }
    }

    pub fn check(input: &AliasInput) -> Result<(), TaskError> {
        require_alias_key(input)
    }

    pub fn run(&self, input: &AliasInput) -> Result<UpsertOutcome, TaskError> {
        Self::check(input)?;
        let alias_name = input.alias_name.as_deref().unwrap_or_default();
        let function_name = input.function_name.as_deref().unwrap_or_default();

        match self.client.get_alias(function_name, alias_name)? {
            Lookup::Found(current) => {
                let request = upsert_request(input, current);
                let updated = self.client.update_alias(&request)?;
                info!(
                    task = TaskKind::MigrateAlias.as_str(),
                    event = "alias_updated",
                    alias_arn = updated.alias_arn.as_deref().unwrap_or_default(),
                    "Update Lambda alias update requested"
                );
                Ok(UpsertOutcome::Updated(updated))
            }
            Lookup::NotFound(message) => {
                warn!(task = TaskKind::MigrateAlias.as_str(), event = "alias_lookup_failed", %message);
                warn!(
                    task = TaskKind::MigrateAlias.as_str(),
                    event = "alias_create_fallback",
                    alias_name,
                    "Creating alias"
                );
                // Nothing to merge against; the create call takes the input as given.
                let spec = input.to_spec()?;
                let created = create_alias(self.client, TaskKind::MigrateAlias, &spec)?;
                Ok(UpsertOutcome::Created(created))
            }
        }
    }
}
