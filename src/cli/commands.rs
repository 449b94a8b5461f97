use crate::assembler::{Assembler, CreateOptions};
use crate::config::Settings;
use crate::error::Result;
use crate::prompt::TerminalPrompt;
use crate::remote::CiCdManagerClient;

/// Run the `create-testing-descriptor` command on the terminal.
///
/// # Errors
///
/// Returns the error that ended the session; nothing is written then.
pub fn create_testing_descriptor(settings: &Settings, options: &CreateOptions) -> Result<String> {
    let client = CiCdManagerClient::new(settings);
    let mut assembler = Assembler::new(settings, &client, TerminalPrompt::new());
    assembler.create_testing_descriptor(options)?;
    Ok(format!(
        "\nDescriptor generated! Check it at {}",
        options.output_filename.display()
    ))
}

/// Run the `list-available-tests` command on the terminal.
///
/// # Errors
///
/// Returns an error if the testbed's tests cannot be loaded or input closes.
pub fn list_available_tests(settings: &Settings, testbed: Option<&str>) -> Result<()> {
    let client = CiCdManagerClient::new(settings);
    let mut assembler = Assembler::new(settings, &client, TerminalPrompt::new());
    assembler.list_available_tests(testbed)
}
