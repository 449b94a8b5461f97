use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ci-cd-service.5gasp.eu/manager";
pub const DEFAULT_TESTBED: &str = "testbed_itav";
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

pub const CATALOG_FILE: &str = "test_information.yaml";
pub const TEMPLATE_FILE: &str = "testing-descriptor_nods.yaml";
pub const CONNECTION_POINT_VALUES_FILE: &str = "connection_point_values.yaml";

/// Settings for a single descriptor session.
///
/// Built once by the binary and passed down by reference; nothing in the
/// library reads process-wide state after construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Emit debug-level progress messages.
    pub verbose: bool,
    /// Directory holding the catalog, template and connection point values.
    pub resources_dir: PathBuf,
    /// Base URL of the CI/CD manager API.
    pub base_url: String,
    /// Testbed whose catalog section is used when none is chosen.
    pub default_testbed: String,
    /// Timeout for a single remote request.
    pub request_timeout: Duration,
    /// How many times a failed remote request is retried.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on every further attempt.
    pub retry_backoff: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbose: false,
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            base_url: DEFAULT_BASE_URL.to_owned(),
            default_testbed: DEFAULT_TESTBED.to_owned(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl Settings {
    /// Defaults with environment variable overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("TDGEN_RESOURCES_DIR") {
            self.resources_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("TDGEN_BASE_URL") {
            self.base_url = url;
        }
        if let Some(testbed) = var("TDGEN_DEFAULT_TESTBED") {
            self.default_testbed = testbed;
        }
        if let Some(retries) = var("TDGEN_MAX_RETRIES")
            && let Ok(n) = retries.parse()
        {
            self.max_retries = n;
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resource(CATALOG_FILE)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resource(TEMPLATE_FILE)
    }

    pub fn connection_point_values_path(&self) -> PathBuf {
        self.resource(CONNECTION_POINT_VALUES_FILE)
    }

    fn resource(&self, name: &str) -> PathBuf {
        Path::new(&self.resources_dir).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_resources() {
        let settings = Settings::default();
        assert_eq!(
            settings.catalog_path(),
            PathBuf::from("resources/test_information.yaml")
        );
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn env_overrides_replace_defaults() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(|key| match key {
            "TDGEN_RESOURCES_DIR" => Some("/opt/tdgen".into()),
            "TDGEN_BASE_URL" => Some("http://localhost:8080".into()),
            "TDGEN_MAX_RETRIES" => Some("5".into()),
            _ => None,
        });
        assert_eq!(
            settings.template_path(),
            PathBuf::from("/opt/tdgen/testing-descriptor_nods.yaml")
        );
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.default_testbed, DEFAULT_TESTBED);
    }

    #[test]
    fn unparsable_retry_override_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(|key| (key == "TDGEN_MAX_RETRIES").then(|| "many".into()));
        assert_eq!(settings.max_retries, 3);
    }
}
