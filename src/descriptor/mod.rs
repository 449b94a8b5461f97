pub mod testcase;
pub mod types;

use std::path::Path;

use crate::error::Result;
use crate::io::{load_yaml, write_yaml_atomic};

use self::types::{Descriptor, Execution, ExecutionBatch, TestInfo};

impl Descriptor {
    /// Load the descriptor skeleton that sessions start from.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DescriptorError::ConfigNotFound`] if the
    /// template is missing, or a YAML error if it is malformed.
    pub fn load_template(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    /// Fill in `test_info` from the session metadata.
    pub fn set_test_info(&mut self, netapp_id: &str, testbed_id: &str, description: &str) {
        self.test_info = TestInfo {
            netapp_id: netapp_id.to_owned(),
            network_service_id: self.test_info.network_service_id.take(),
            testbed_id: testbed_id.to_owned(),
            description: description.to_owned(),
        };
    }

    /// Prepare the user-managed sections for a new session.
    ///
    /// Drops the template's network service placeholder and clears the
    /// setup testcases. When `clear_executions` is set, the execution
    /// phase is replaced by [`default_execution`]; otherwise the template's
    /// executions are kept.
    pub fn reset_sections(&mut self, clear_executions: bool) {
        self.test_info.network_service_id = None;
        self.test_phases.setup.testcases.clear();

        if clear_executions {
            self.test_phases.execution = default_execution();
        }
    }

    /// Write the descriptor to `destination`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DescriptorError::Serialization`] on failure;
    /// the destination is left untouched in that case.
    pub fn write(&self, destination: &Path) -> Result<()> {
        write_yaml_atomic(self, destination)
    }
}

/// The single execution batch written when executions are cleared:
/// batch 1 running execution 1 over testcase 1.
pub fn default_execution() -> Vec<ExecutionBatch> {
    vec![ExecutionBatch {
        batch_id: 1,
        executions: vec![Execution {
            execution_id: 1,
            name: String::new(),
            testcase_ids: vec![1],
        }],
    }]
}
