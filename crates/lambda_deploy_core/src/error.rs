use std::path::PathBuf;

/// Invalid task input, detected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{}", describe_missing(.0))]
    MissingFields(Vec<&'static str>),
    #[error("exactly one of zip_file or s3_file is required")]
    AmbiguousCodeSource,
}

impl ConfigurationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            Self::AmbiguousCodeSource => &[],
        }
    }
}

fn describe_missing(fields: &[&'static str]) -> String {
    match fields {
        [] => "no required fields are missing".to_string(),
        [single] => format!("{single} is required"),
        [init @ .., last] => format!("{} and {last} are required", init.join(", ")),
    }
}

/// Checks that every named value is present and non-blank, reporting all
/// missing names at once.
pub fn require_fields(checks: &[(&'static str, Option<&str>)]) -> Result<(), ConfigurationError> {
    let missing: Vec<&'static str> = checks
        .iter()
        .filter(|(_, value)| value.map_or(true, |text| text.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::MissingFields(missing))
    }
}

/// A failure reported by the remote function-management service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct RemoteError {
    pub operation: &'static str,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{resource} does not exist: {message}")]
    NotFound { resource: String, message: String },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("failed to read code archive {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_missing_field() {
        let error = require_fields(&[
            ("alias_name", Some("live")),
            ("function_name", None),
            ("function_version", Some("  ")),
        ])
        .expect_err("blank and absent fields should fail");

        assert_eq!(
            error.missing_fields(),
            &["function_name", "function_version"]
        );
        assert_eq!(
            error.to_string(),
            "function_name and function_version are required"
        );
    }

    #[test]
    fn single_missing_field_message() {
        let error = require_fields(&[("function_name", None)]).expect_err("should fail");
        assert_eq!(error.to_string(), "function_name is required");
    }

    #[test]
    fn three_missing_fields_message() {
        let error = require_fields(&[("a", None), ("b", None), ("c", None)])
            .expect_err("should fail");
        assert_eq!(error.to_string(), "a, b and c are required");
    }

    #[test]
    fn passes_when_all_present() {
        require_fields(&[("alias_name", Some("live"))]).expect("present field should pass");
    }
}
