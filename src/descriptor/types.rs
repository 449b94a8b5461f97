use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// The testing descriptor document.
///
/// Field order is the order downstream consumers see in the output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    pub test_info: TestInfo,
    pub test_phases: TestPhases,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestInfo {
    #[serde(default)]
    pub netapp_id: String,
    /// Placeholder carried by the template; dropped when sections are reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_service_id: Option<String>,
    #[serde(default)]
    pub testbed_id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestPhases {
    #[serde(default)]
    pub setup: Setup,
    #[serde(default)]
    pub execution: Vec<ExecutionBatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Setup {
    /// Template keys this tool does not manage (e.g. `deployment_info`),
    /// passed through untouched.
    #[serde(flatten)]
    pub other: Mapping,
    #[serde(default)]
    pub testcases: Vec<Testcase>,
}

/// One configured test instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Testcase {
    pub testcase_id: u32,
    #[serde(rename = "type")]
    pub test_type: String,
    pub scope: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
}

/// A resolved `key: value` parameter. An empty value means "unset".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn unset(key: impl Into<String>) -> Self {
        Self::new(key, String::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionBatch {
    pub batch_id: u32,
    pub executions: Vec<Execution>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Execution {
    pub execution_id: u32,
    pub name: String,
    pub testcase_ids: Vec<u32>,
}
