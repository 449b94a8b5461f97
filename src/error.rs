use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a descriptor session.
///
/// Invalid numeric or yes/no answers never show up here: the prompt loops
/// re-ask until the answer is acceptable.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("file {path} not found")]
    ConfigNotFound { path: PathBuf },

    #[error("descriptor {path} not found")]
    FileNotFound { path: PathBuf },

    #[error("{path}: {message}")]
    Schema { path: PathBuf, message: String },

    #[error("test '{0}' not found in the catalog")]
    NotFound(String),

    #[error("testbed '{0}' has no tests in the catalog")]
    UnknownTestbed(String),

    #[error("remote service error: {0}")]
    Remote(String),

    #[error("no testbeds available, cannot continue")]
    NoTestbeds,

    #[error("failed to write descriptor: {0}")]
    Serialization(String),

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("input closed before the session was complete")]
    InputClosed,
}

impl DescriptorError {
    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DescriptorError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DescriptorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DescriptorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_names_the_file() {
        let err = DescriptorError::ConfigNotFound {
            path: PathBuf::from("intent.yaml"),
        };
        assert_eq!(err.to_string(), "file intent.yaml not found");
    }

    #[test]
    fn schema_error_carries_path_and_message() {
        let err = DescriptorError::schema("nsd.yaml", "no 'default-df' deployment flavour");
        assert_eq!(
            err.to_string(),
            "nsd.yaml: no 'default-df' deployment flavour"
        );
    }

    #[test]
    fn not_found_quotes_the_key() {
        let err = DescriptorError::NotFound("T9".into());
        assert!(err.to_string().contains("'T9'"));
    }
}
