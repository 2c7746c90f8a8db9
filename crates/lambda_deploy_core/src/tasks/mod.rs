//! The four deployment tasks.
//!
//! Every task validates its input before touching the client, performs at
//! most one read and two writes, and logs the ARN of each write.

pub mod alias_creator;
pub mod alias_updater;
pub mod alias_upserter;
pub mod function_updater;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::LambdaApi;
use crate::error::{require_fields, TaskError};
use crate::model::{AliasSpec, RemoteAliasConfig};

pub use alias_creator::AliasCreator;
pub use alias_updater::AliasUpdater;
pub use alias_upserter::{AliasUpserter, UpsertOutcome};
pub use function_updater::{FunctionUpdateInput, FunctionUpdateOutcome, FunctionUpdater};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CreateAlias,
    UpdateAlias,
    MigrateAlias,
    UpdateFunction,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        Self::CreateAlias,
        Self::UpdateAlias,
        Self::MigrateAlias,
        Self::UpdateFunction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateAlias => "create_alias",
            Self::UpdateAlias => "update_alias",
            Self::MigrateAlias => "migrate_alias",
            Self::UpdateFunction => "update_function",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::CreateAlias => "Create Lambda Alias.",
            Self::UpdateAlias => "Update Lambda Alias.",
            Self::MigrateAlias => "Create / Update Lambda Alias.",
            Self::UpdateFunction => "Update an existing Lambda function.",
        }
    }
}

/// Alias task input. Which fields are required depends on the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasInput {
    pub alias_name: Option<String>,
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub description: Option<String>,
}

impl AliasInput {
    /// Builds a create request, failing if any of the three identifying
    /// fields is absent.
    pub fn to_spec(&self) -> Result<AliasSpec, TaskError> {
        require_fields(&[
            ("alias_name", self.alias_name.as_deref()),
            ("function_name", self.function_name.as_deref()),
            ("function_version", self.function_version.as_deref()),
        ])?;

        Ok(AliasSpec {
            name: self.alias_name.clone().unwrap_or_default(),
            function_name: self.function_name.clone().unwrap_or_default(),
            function_version: self.function_version.clone().unwrap_or_default(),
            description: self.description.clone(),
        })
    }
}

pub(crate) fn create_alias(
    client: &dyn LambdaApi,
    task: TaskKind,
    spec: &AliasSpec,
) -> Result<RemoteAliasConfig, TaskError> {
    let created = client.create_alias(spec)?;
    info!(
        task = task.as_str(),
        event = "alias_created",
        function_name = %spec.function_name,
        alias_name = %spec.name,
        alias_arn = created.alias_arn.as_deref().unwrap_or_default(),
        "Create Lambda alias requested"
    );
    Ok(created)
}
