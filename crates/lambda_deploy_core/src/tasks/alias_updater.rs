use tracing::{error, info, warn};

use crate::client::{LambdaApi, Lookup};
use crate::error::{require_fields, TaskError};
use crate::merge::merge_opt;
use crate::model::{RemoteAliasConfig, UpdateAliasRequest};

use super::{AliasInput, TaskKind};

/// Updates an existing alias, filling unset fields from its current state.
/// Never creates the alias.
pub struct AliasUpdater<'a> {
    client: &'a dyn LambdaApi,
}

impl<'a> AliasUpdater<'a> {
    pub fn new(client: &'a dyn LambdaApi) -> Self {
        Self { client }
    }

    /// All three identifiers are required even though the version is only
    /// used as an override.
    pub fn check(input: &AliasInput) -> Result<(), TaskError> {
        input.to_spec().map(drop)
    }

    pub fn run(&self, input: &AliasInput) -> Result<RemoteAliasConfig, TaskError> {
        Self::check(input)?;
        let alias_name = input.alias_name.as_deref().unwrap_or_default();
        let function_name = input.function_name.as_deref().unwrap_or_default();

        match self.client.get_alias(function_name, alias_name)? {
            Lookup::Found(current) => self.update(input, current),
            Lookup::NotFound(message) => {
                warn!(task = TaskKind::UpdateAlias.as_str(), event = "alias_lookup_failed", %message);
                error!(
                    task = TaskKind::UpdateAlias.as_str(),
                    event = "alias_missing",
                    alias_name,
                    "Alias does not exist"
                );
                Err(TaskError::NotFound {
                    resource: format!("alias {function_name}:{alias_name}"),
                    message,
                })
            }
        }
    }

    fn update(
        &self,
        input: &AliasInput,
        current: RemoteAliasConfig,
    ) -> Result<RemoteAliasConfig, TaskError> {
        let request = updater_request(input, current);
        let updated = self.client.update_alias(&request)?;
        info!(
            task = TaskKind::UpdateAlias.as_str(),
            event = "alias_updated",
            alias_arn = updated.alias_arn.as_deref().unwrap_or_default(),
            "Update Lambda alias update requested"
        );
        Ok(updated)
    }
}

/// Merges the input onto the alias snapshot. The target function name is
/// taken from the version input, matching the existing update behavior.
pub fn updater_request(input: &AliasInput, current: RemoteAliasConfig) -> UpdateAliasRequest {
    UpdateAliasRequest {
        function_name: input.function_version.clone().unwrap_or_default(),
        name: merge_opt(input.alias_name.clone(), current.name),
        function_version: merge_opt(input.function_version.clone(), current.function_version),
        description: merge_opt(input.description.clone(), current.description),
    }
}

/// Like [`updater_request`], but addresses the function by its name.
pub fn upsert_request(input: &AliasInput, current: RemoteAliasConfig) -> UpdateAliasRequest {
    UpdateAliasRequest {
        function_name: input.function_name.clone().unwrap_or_default(),
        ..updater_request(input, current)
    }
}

pub(crate) fn require_alias_key(input: &AliasInput) -> Result<(), TaskError> {
    require_fields(&[
        ("alias_name", input.alias_name.as_deref()),
        ("function_name", input.function_name.as_deref()),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot() -> RemoteAliasConfig {
        RemoteAliasConfig {
            alias_arn: Some("arn:aws:lambda:us-east-1:123456789012:function:f1:live".to_string()),
            name: Some("live".to_string()),
            function_version: Some("3".to_string()),
            description: Some("d1".to_string()),
        }
    }

    #[test]
    fn description_falls_back_to_snapshot() {
        let input = AliasInput {
            alias_name: Some("live".to_string()),
            function_name: Some("f1".to_string()),
            function_version: Some("5".to_string()),
            description: None,
        };

        let request = updater_request(&input, snapshot());
        assert_eq!(request.name.as_deref(), Some("live"));
        assert_eq!(request.description.as_deref(), Some("d1"));
        assert_eq!(request.function_version.as_deref(), Some("5"));
    }

    #[test]
    fn updater_targets_function_by_version_input() {
        let input = AliasInput {
            alias_name: Some("live".to_string()),
            function_name: Some("f1".to_string()),
            function_version: Some("5".to_string()),
            description: Some("d2".to_string()),
        };

        assert_eq!(updater_request(&input, snapshot()).function_name, "5");
        assert_eq!(upsert_request(&input, snapshot()).function_name, "f1");
    }

    #[test]
    fn upsert_keeps_snapshot_version_without_override() {
        let input = AliasInput {
            alias_name: Some("live".to_string()),
            function_name: Some("f1".to_string()),
            function_version: None,
            description: None,
        };

        let request = upsert_request(&input, snapshot());
        assert_eq!(request.function_version.as_deref(), Some("3"));
        assert_eq!(request.description.as_deref(), Some("d1"));
    }
}
