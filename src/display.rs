use std::fmt::Display;

use crate::catalog::types::TestDefinition;
use crate::remote::Testbed;

/// Number items from 1 as `"<n> - <item>"`.
pub fn format_numbered<T: Display>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{} - {item}", i + 1))
        .collect()
}

/// One numbered line per testbed.
pub fn format_testbeds(testbeds: &[Testbed]) -> Vec<String> {
    testbeds
        .iter()
        .enumerate()
        .map(|(i, tb)| match tb.description.as_deref() {
            Some(desc) if !desc.is_empty() => {
                format!("{} - {} ({}): {desc}", i + 1, tb.name, tb.id)
            }
            _ => format!("{} - {} ({})", i + 1, tb.name, tb.id),
        })
        .collect()
}

/// Multi-line description of a test and its variables.
pub fn format_test_details(test: &TestDefinition) -> String {
    let mut out = format!(
        "Name: {}\nTest ID: {}\nDescription: \"{}\"\n",
        test.name, test.id, test.description
    );

    if test.test_variables.is_empty() {
        out.push_str("This test requires no parameters\n");
        return out;
    }

    out.push_str("Parameters/Variables:\n");
    for variable in &test.test_variables {
        out.push_str(&format!("\n\tVariable name: {}\n", variable.variable_name));
        out.push_str(&format!("\tDescription: {}\n", variable.description));
        out.push_str(&format!("\tMandatory: {}\n", variable.mandatory));
        if !variable.var_type.is_empty() {
            out.push_str(&format!("\tType: {}\n", variable.var_type));
        }
        if let Some(options) = &variable.possible_options
            && !options.is_empty()
        {
            out.push_str(&format!("\tPossible options: {}\n", options.join(", ")));
        }
        if variable.is_connection_point_injectable() {
            out.push_str("\tInjected from: connection point\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{InjectedArtifactType, VariableSpec};

    #[test]
    fn numbers_from_one() {
        let lines = format_numbered(&["bandwidth", "open_ports"]);
        assert_eq!(lines, vec!["1 - bandwidth", "2 - open_ports"]);
    }

    #[test]
    fn testbed_lines_skip_missing_description() {
        let testbeds = vec![
            Testbed {
                id: "testbed_itav".into(),
                name: "ITAv".into(),
                description: Some("Aveiro".into()),
            },
            Testbed {
                id: "testbed_ponte".into(),
                name: "Ponte".into(),
                description: None,
            },
        ];
        assert_eq!(
            format_testbeds(&testbeds),
            vec![
                "1 - ITAv (testbed_itav): Aveiro",
                "2 - Ponte (testbed_ponte)"
            ]
        );
    }

    #[test]
    fn details_without_variables() {
        let test = TestDefinition {
            id: "open_ports".into(),
            test_type: "open_ports".into(),
            name: "Open Ports".into(),
            description: "Scans ports".into(),
            test_variables: vec![],
        };
        let out = format_test_details(&test);
        assert!(out.contains("Name: Open Ports"));
        assert!(out.contains("Description: \"Scans ports\""));
        assert!(out.contains("This test requires no parameters"));
    }

    #[test]
    fn details_list_variables() {
        let test = TestDefinition {
            id: "bandwidth".into(),
            test_type: "bandwidth".into(),
            name: "Bandwidth".into(),
            description: "Throughput".into(),
            test_variables: vec![VariableSpec {
                variable_name: "host1_ip".into(),
                description: "Server address".into(),
                mandatory: true,
                injected_by_nods: true,
                injected_artifact_type: Some(InjectedArtifactType::ConnectionPoint),
                possible_options: Some(vec!["tcp".into(), "udp".into()]),
                var_type: "str".into(),
            }],
        };
        let out = format_test_details(&test);
        assert!(out.contains("Variable name: host1_ip"));
        assert!(out.contains("Mandatory: true"));
        assert!(out.contains("Type: str"));
        assert!(out.contains("Possible options: tcp, udp"));
        assert!(out.contains("Injected from: connection point"));
        assert!(!out.contains("requires no parameters"));
    }
}
