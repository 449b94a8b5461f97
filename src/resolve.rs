use tracing::debug;

use crate::catalog::types::{TestDefinition, VariableSpec};
use crate::descriptor::testcase::TestcaseBuilder;
use crate::descriptor::types::{Parameter, Testcase};
use crate::display::format_numbered;
use crate::error::Result;
use crate::inference::InferredTags;
use crate::prompt::Interact;

/// Combine a connection point tag with a value.
///
/// The last two characters of the tag (its closing `}}`) are replaced by
/// `|value}}`, so `{{ns|vnf|if}}` with `v1` becomes `{{ns|vnf|if|v1}}`.
pub fn synthesize_tag(connection_point: &str, value: &str) -> String {
    let mut chars = connection_point.chars();
    chars.next_back();
    chars.next_back();
    format!("{}|{value}}}}}", chars.as_str())
}

/// Decide the value of a single variable.
///
/// Variables that are not connection-point injectable, and injectable ones
/// in a session without inferred connection points, resolve to an unset
/// value without asking anything. Otherwise the user either picks an
/// inferred connection point plus a value for it, or types the value.
///
/// # Errors
///
/// Returns [`crate::error::DescriptorError::InputClosed`] if input ends
/// mid-question.
pub fn resolve_variable<P: Interact>(
    variable: &VariableSpec,
    tags: &InferredTags,
    prompt: &mut P,
) -> Result<Parameter> {
    let name = &variable.variable_name;
    if !variable.is_connection_point_injectable() || tags.is_empty() {
        return Ok(Parameter::unset(name));
    }

    prompt.say(format!(
        "\nThe {name} parameter must have a connection point injected"
    ))?;
    prompt.say("\nThe following connection points were inferred from the given NSD(s):")?;
    for line in format_numbered(&tags.connection_points) {
        prompt.say(line)?;
    }

    if !prompt.confirm("Do you want to inject one of these connection points?")? {
        let value = prompt.verbatim(&format!("Enter the value for {name}: "))?;
        return Ok(Parameter::new(name, value));
    }

    let cp = prompt.choose(
        "Which connection point do you want to inject on the parameter?",
        tags.connection_points.len(),
    )?;
    let connection_point = tags.connection_points[cp - 1].as_str();

    if tags.values.is_empty() {
        debug!(variable = %name, "no connection point values available, injecting bare tag");
        return Ok(Parameter::new(name, connection_point));
    }

    prompt.say("\nThe following values can be injected into the connection point:")?;
    for line in format_numbered(&tags.values) {
        prompt.say(line)?;
    }
    let value = prompt.choose(
        "Which value do you want to inject on the connection point?",
        tags.values.len(),
    )?;

    Ok(Parameter::new(
        name,
        synthesize_tag(connection_point, &tags.values[value - 1]),
    ))
}

/// Let the user overwrite parameters that are not connection-point
/// injectable, until they decline.
///
/// Choices index only the editable variables; the chosen value replaces
/// the parameter at that variable's position in the testcase.
///
/// # Errors
///
/// Returns [`crate::error::DescriptorError::InputClosed`] if input ends
/// mid-question.
pub fn manual_override_pass<P: Interact>(
    builder: &mut TestcaseBuilder,
    variables: &[VariableSpec],
    prompt: &mut P,
) -> Result<()> {
    let editable: Vec<usize> = variables
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_connection_point_injectable())
        .map(|(i, _)| i)
        .collect();
    if editable.is_empty() {
        return Ok(());
    }

    while prompt.confirm("Do you want to manually set a parameter?")? {
        prompt.say("\nParameters that can be set manually:")?;
        let names: Vec<&str> = editable
            .iter()
            .map(|&i| variables[i].variable_name.as_str())
            .collect();
        for line in format_numbered(&names) {
            prompt.say(line)?;
        }

        let choice = prompt.choose("Which parameter do you want to set?", editable.len())?;
        let position = editable[choice - 1];
        let value = prompt.verbatim(&format!("Enter the value for {}: ", names[choice - 1]))?;
        builder.set_value(position, value);
    }
    Ok(())
}

/// Build the testcase for `test`, resolving each variable in declaration
/// order and then offering manual overrides.
///
/// # Errors
///
/// Returns [`crate::error::DescriptorError::InputClosed`] if input ends
/// mid-question.
pub fn build_testcase<P: Interact>(
    testcase_id: u32,
    test: &TestDefinition,
    tags: &InferredTags,
    prompt: &mut P,
) -> Result<Testcase> {
    let mut builder = TestcaseBuilder::for_definition(testcase_id, test);
    for variable in &test.test_variables {
        builder.append(resolve_variable(variable, tags, prompt)?);
    }
    manual_override_pass(&mut builder, &test.test_variables, prompt)?;
    Ok(builder.build())
}
