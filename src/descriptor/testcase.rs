use crate::catalog::types::TestDefinition;
use crate::descriptor::types::{Parameter, Testcase};

/// Scope written when none is given; consumers reject an empty scope.
pub const DEFAULT_SCOPE: &str = " ";

/// Accumulates resolved parameters into a [`Testcase`].
///
/// Parameters keep insertion order. Duplicate keys are kept as-is; whether
/// they are meant as multi-valued parameters is still an open product
/// question, so nothing here deduplicates.
#[derive(Debug, Clone)]
pub struct TestcaseBuilder {
    testcase: Testcase,
}

impl TestcaseBuilder {
    pub fn new(
        testcase_id: u32,
        test_type: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            testcase: Testcase {
                testcase_id,
                test_type: test_type.into(),
                scope: DEFAULT_SCOPE.to_owned(),
                name: name.into(),
                description: description.into(),
                parameters: Vec::new(),
            },
        }
    }

    /// Start a testcase for a catalog definition with no parameters yet.
    pub fn for_definition(testcase_id: u32, test: &TestDefinition) -> Self {
        Self::new(testcase_id, &test.test_type, &test.name, &test.description)
    }

    pub fn append(&mut self, parameter: Parameter) {
        self.testcase.parameters.push(parameter);
    }

    /// Overwrite the value of the parameter at `index`.
    ///
    /// Returns `false` (and changes nothing) if `index` is out of bounds.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.testcase.parameters.get_mut(index) {
            Some(parameter) => {
                parameter.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.testcase.parameters
    }

    pub fn build(self) -> Testcase {
        self.testcase
    }
}
