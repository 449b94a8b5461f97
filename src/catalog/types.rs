use serde::{Deserialize, Serialize};

/// A test type a testbed knows how to run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestDefinition {
    /// Catalog key. Filled from the mapping key when loaded from a catalog file.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub test_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub test_variables: Vec<VariableSpec>,
}

/// A variable a test expects in its testcase parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariableSpec {
    pub variable_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub injected_by_nods: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_artifact_type: Option<InjectedArtifactType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_options: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    pub var_type: String,
}

impl VariableSpec {
    /// Whether the value can be filled from an inferred connection point.
    pub fn is_connection_point_injectable(&self) -> bool {
        self.injected_by_nods
            && self.injected_artifact_type == Some(InjectedArtifactType::ConnectionPoint)
    }
}

/// Kind of artifact injected into a variable by the NODS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InjectedArtifactType {
    ConnectionPoint,
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(injected: bool, artifact: Option<InjectedArtifactType>) -> VariableSpec {
        VariableSpec {
            variable_name: "host".into(),
            description: String::new(),
            mandatory: true,
            injected_by_nods: injected,
            injected_artifact_type: artifact,
            possible_options: None,
            var_type: "str".into(),
        }
    }

    #[test]
    fn injectable_requires_flag_and_connection_point_type() {
        assert!(variable(true, Some(InjectedArtifactType::ConnectionPoint))
            .is_connection_point_injectable());
        assert!(!variable(false, Some(InjectedArtifactType::ConnectionPoint))
            .is_connection_point_injectable());
        assert!(!variable(true, Some(InjectedArtifactType::Other)).is_connection_point_injectable());
        assert!(!variable(true, None).is_connection_point_injectable());
    }

    #[test]
    fn unknown_artifact_type_deserializes_as_other() {
        let yaml = "variable_name: x\ninjected_by_nods: true\ninjected_artifact_type: vnf_ip\n";
        let spec: VariableSpec = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(spec.injected_artifact_type, Some(InjectedArtifactType::Other));
        assert!(!spec.is_connection_point_injectable());
    }

    #[test]
    fn optional_fields_default() {
        let spec: VariableSpec = serde_yaml::from_str("variable_name: port\n").expect("parse");
        assert!(!spec.injected_by_nods);
        assert!(!spec.mandatory);
        assert_eq!(spec.possible_options, None);
        assert_eq!(spec.var_type, "");
    }
}
