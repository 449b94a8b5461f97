use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::catalog::types::TestDefinition;
use crate::config::Settings;
use crate::error::{DescriptorError, Result};

/// A remote facility offering a set of executable tests.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Testbed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Directory of testbeds and the tests each one offers.
pub trait TestbedDirectory {
    /// All known testbeds, in service order.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Remote`] if the directory is unreachable.
    fn list_testbeds(&self) -> Result<Vec<Testbed>>;

    /// Tests offered by one testbed.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Remote`] if the directory is unreachable.
    fn list_tests(&self, testbed_id: &str) -> Result<Vec<TestDefinition>>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TestbedsData {
    testbeds: Vec<Testbed>,
}

#[derive(Debug, Deserialize)]
struct TestsData {
    tests: Vec<TestDefinition>,
}

/// Blocking client for the CI/CD manager REST API.
///
/// Failed requests are retried with exponential backoff; client errors
/// (4xx) are not retried.
pub struct CiCdManagerClient {
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
    agent: ureq::Agent,
}

struct FetchError {
    message: String,
    retryable: bool,
}

impl CiCdManagerClient {
    pub fn new(settings: &Settings) -> Self {
        let config = ureq::config::Config::builder()
            .timeout_global(Some(settings.request_timeout))
            .build();
        Self {
            base_url: settings.base_url.clone(),
            max_retries: settings.max_retries,
            retry_backoff: settings.retry_backoff,
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path);
        let mut attempt = 0;
        loop {
            match self.fetch(&url, query) {
                Ok(body) => return decode(&url, &body),
                Err(e) if e.retryable && attempt < self.max_retries => {
                    let delay = backoff_delay(self.retry_backoff, attempt);
                    warn!(%url, attempt = attempt + 1, ?delay, error = %e.message, "retrying request");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(DescriptorError::Remote(e.message)),
            }
        }
    }

    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> std::result::Result<String, FetchError> {
        debug!(%url, ?query, "GET");
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let mut response = request.call().map_err(|e| FetchError {
            retryable: !matches!(e, ureq::Error::StatusCode(code) if code < 500),
            message: format!("GET {url} failed: {e}"),
        })?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError {
                message: format!("failed to read response body from {url}: {e}"),
                retryable: true,
            })
    }
}

impl TestbedDirectory for CiCdManagerClient {
    fn list_testbeds(&self) -> Result<Vec<Testbed>> {
        let envelope: Envelope<TestbedsData> = self.get_json("testbeds/all", &[])?;
        Ok(envelope.data.testbeds)
    }

    fn list_tests(&self, testbed_id: &str) -> Result<Vec<TestDefinition>> {
        let envelope: Envelope<TestsData> =
            self.get_json("tests/all", &[("testbed", testbed_id)])?;
        Ok(envelope.data.tests)
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| DescriptorError::Remote(format!("unexpected response from {url}: {e}")))
}
