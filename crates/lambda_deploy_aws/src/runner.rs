use lambda_deploy_core::client::LambdaApi;
use lambda_deploy_core::error::TaskError;
use lambda_deploy_core::model::RemoteAliasConfig;
use lambda_deploy_core::tasks::{
    AliasCreator, AliasInput, AliasUpdater, AliasUpserter, FunctionUpdateInput,
    FunctionUpdateOutcome, FunctionUpdater, TaskKind, UpsertOutcome,
};
use serde::Serialize;

use crate::cli::Commands;
use crate::config::{AliasOverrides, DeployFile, FunctionOverrides};

/// A task with its inputs fully resolved from flags and the deploy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", content = "input", rename_all = "snake_case")]
pub enum TaskPlan {
    CreateAlias(AliasInput),
    UpdateAlias(AliasInput),
    MigrateAlias(AliasInput),
    UpdateFunction(FunctionUpdateInput),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", content = "result", rename_all = "snake_case")]
pub enum TaskReport {
    CreateAlias(RemoteAliasConfig),
    UpdateAlias(RemoteAliasConfig),
    MigrateAlias(UpsertOutcome),
    UpdateFunction(FunctionUpdateOutcome),
}

impl TaskPlan {
    /// Returns `None` for commands that do not run a task.
    pub fn resolve(command: &Commands, file: &DeployFile) -> Option<Self> {
        let plan = match command {
            Commands::CreateAlias(args) => Self::CreateAlias(
                file.alias_input(TaskKind::CreateAlias, &AliasOverrides::from(args)),
            ),
            Commands::UpdateAlias(args) => Self::UpdateAlias(
                file.alias_input(TaskKind::UpdateAlias, &AliasOverrides::from(args)),
            ),
            Commands::MigrateAlias(args) => Self::MigrateAlias(
                file.alias_input(TaskKind::MigrateAlias, &AliasOverrides::from(args)),
            ),
            Commands::UpdateFunction(args) => {
                Self::UpdateFunction(file.function_input(&FunctionOverrides::from(args)))
            }
            Commands::Tasks => return None,
        };
        Some(plan)
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::CreateAlias(_) => TaskKind::CreateAlias,
            Self::UpdateAlias(_) => TaskKind::UpdateAlias,
            Self::MigrateAlias(_) => TaskKind::MigrateAlias,
            Self::UpdateFunction(_) => TaskKind::UpdateFunction,
        }
    }

    /// Runs the same input checks the task performs before its first call.
    pub fn check(&self) -> Result<(), TaskError> {
        match self {
            Self::CreateAlias(input) => AliasCreator::check(input),
            Self::UpdateAlias(input) => AliasUpdater::check(input),
            Self::MigrateAlias(input) => AliasUpserter::check(input),
            Self::UpdateFunction(input) => FunctionUpdater::check(input),
        }
    }
}

pub fn run_plan(plan: &TaskPlan, client: &dyn LambdaApi) -> Result<TaskReport, TaskError> {
    match plan {
        TaskPlan::CreateAlias(input) => AliasCreator::new(client)
            .run(input)
            .map(TaskReport::CreateAlias),
        TaskPlan::UpdateAlias(input) => AliasUpdater::new(client)
            .run(input)
            .map(TaskReport::UpdateAlias),
        TaskPlan::MigrateAlias(input) => AliasUpserter::new(client)
            .run(input)
            .map(TaskReport::MigrateAlias),
        TaskPlan::UpdateFunction(input) => FunctionUpdater::new(client)
            .run(input)
            .map(TaskReport::UpdateFunction),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use lambda_deploy_core::client::Lookup;
    use lambda_deploy_core::error::RemoteError;
    use lambda_deploy_core::model::{
        AliasSpec, CodeUpdate, FunctionConfigUpdate, RemoteFunctionConfig, UpdateAliasRequest,
    };
    use serde_json::json;

    use crate::cli::AliasArgs;

    use super::*;

    /// Records operation names; every alias lookup misses.
    struct CapturingLambda {
        operations: Mutex<Vec<&'static str>>,
    }

    impl CapturingLambda {
        fn new() -> Self {
            Self {
                operations: Mutex::new(Vec::new()),
            }
        }

        fn operations(&self) -> Vec<&'static str> {
            self.operations.lock().expect("poisoned mutex").clone()
        }

        fn push(&self, operation: &'static str) {
            self.operations
                .lock()
                .expect("poisoned mutex")
                .push(operation);
        }
    }

    impl LambdaApi for CapturingLambda {
        fn create_alias(&self, request: &AliasSpec) -> Result<RemoteAliasConfig, RemoteError> {
            self.push("CreateAlias");
            Ok(RemoteAliasConfig {
                alias_arn: Some(format!(
                    "arn:aws:lambda:us-east-1:123456789012:function:{}:{}",
                    request.function_name, request.name
                )),
                name: Some(request.name.clone()),
                function_version: Some(request.function_version.clone()),
                description: request.description.clone(),
            })
        }

        fn get_alias(
            &self,
            _function_name: &str,
            _alias_name: &str,
        ) -> Result<Lookup<RemoteAliasConfig>, RemoteError> {
            self.push("GetAlias");
            Ok(Lookup::NotFound("Alias not found".to_string()))
        }

        fn update_alias(
            &self,
            _request: &UpdateAliasRequest,
        ) -> Result<RemoteAliasConfig, RemoteError> {
            self.push("UpdateAlias");
            Err(RemoteError::new("UpdateAlias", "unexpected call"))
        }

        fn get_function(
            &self,
            _function_name: &str,
        ) -> Result<Lookup<Option<RemoteFunctionConfig>>, RemoteError> {
            self.push("GetFunction");
            Ok(Lookup::NotFound("Function not found".to_string()))
        }

        fn update_function_code(
            &self,
            _request: CodeUpdate,
        ) -> Result<RemoteFunctionConfig, RemoteError> {
            self.push("UpdateFunctionCode");
            Err(RemoteError::new("UpdateFunctionCode", "unexpected call"))
        }

        fn update_function_configuration(
            &self,
            _request: &FunctionConfigUpdate,
        ) -> Result<RemoteFunctionConfig, RemoteError> {
            self.push("UpdateFunctionConfiguration");
            Err(RemoteError::new("UpdateFunctionConfiguration", "unexpected call"))
        }
    }

    fn deploy_file() -> DeployFile {
        DeployFile::parse(
            "[defaults]\nfunction_name = \"f1\"\nfunction_version = \"2\"\n\n[migrate_alias]\nalias_name = \"prod\"\n",
            Path::new("lambda-deploy.toml"),
        )
        .expect("deploy file should parse")
    }

    #[test]
    fn migrate_plan_creates_missing_alias() {
        let plan = TaskPlan::resolve(
            &Commands::MigrateAlias(AliasArgs::default()),
            &deploy_file(),
        )
        .expect("migrate should resolve to a plan");
        let lambda = CapturingLambda::new();

        let report = run_plan(&plan, &lambda).expect("migrate should succeed");

        assert_eq!(lambda.operations(), vec!["GetAlias", "CreateAlias"]);
        let TaskReport::MigrateAlias(outcome) = report else {
            panic!("expected migrate report");
        };
        assert!(outcome.is_created());
    }

    #[test]
    fn check_rejects_incomplete_plan_without_client() {
        let plan = TaskPlan::resolve(
            &Commands::CreateAlias(AliasArgs::default()),
            &deploy_file(),
        )
        .expect("create should resolve to a plan");

        let error = plan.check().expect_err("alias name is missing");
        assert_eq!(error.to_string(), "alias_name is required");
    }

    #[test]
    fn tasks_command_has_no_plan() {
        assert_eq!(TaskPlan::resolve(&Commands::Tasks, &deploy_file()), None);
    }

    #[test]
    fn plan_serializes_with_task_tag() {
        let plan = TaskPlan::resolve(
            &Commands::MigrateAlias(AliasArgs::default()),
            &deploy_file(),
        )
        .expect("migrate should resolve to a plan");

        assert_eq!(
            serde_json::to_value(&plan).expect("plan should serialize"),
            json!({
                "task": "migrate_alias",
                "input": {
                    "alias_name": "prod",
                    "function_name": "f1",
                    "function_version": "2",
                    "description": null,
                }
            })
        );
    }
}
