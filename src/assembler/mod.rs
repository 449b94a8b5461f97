pub mod state;

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogFile};
use crate::config::Settings;
use crate::descriptor::types::Descriptor;
use crate::display::{format_numbered, format_test_details, format_testbeds};
use crate::error::{DescriptorError, Result};
use crate::inference::{InferredTags, infer_tags};
use crate::io::load_yaml;
use crate::prompt::Interact;
use crate::remote::{Testbed, TestbedDirectory};
use crate::resolve::build_testcase;
use crate::util::slug::snake_case;

use self::state::SessionState;

/// Options for one descriptor-assembly session.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Document listing the intended tests (`tests: [<key>, ...]`).
    pub config_file: PathBuf,
    /// Where the finished descriptor is written.
    pub output_filename: PathBuf,
    /// Replace the template's executions with the default batch.
    pub clear_executions: bool,
    /// Network service descriptors to infer connection points from.
    pub infer_tags_from_nsd: Vec<PathBuf>,
}

/// The user's declared test selection.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IntendedTests {
    #[serde(default)]
    pub tests: Vec<String>,
}

/// Metadata collected for `test_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Metadata {
    netapp_id: String,
    testbed: Testbed,
    description: String,
}

/// Drives an interactive session that turns a template, a catalog and the
/// user's intent into a testing descriptor.
pub struct Assembler<'a, P> {
    settings: &'a Settings,
    directory: &'a dyn TestbedDirectory,
    prompt: P,
    state: SessionState,
}

impl<'a, P: Interact> Assembler<'a, P> {
    pub fn new(
        settings: &'a Settings,
        directory: &'a dyn TestbedDirectory,
        prompt: P,
    ) -> Self {
        Self {
            settings,
            directory,
            prompt,
            state: SessionState::Init,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Consume the assembler and hand back its prompt.
    pub fn into_prompt(self) -> P {
        self.prompt
    }

    fn enter(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    /// Run a full session and write the descriptor to
    /// `options.output_filename`.
    ///
    /// Returns the descriptor that was written.
    ///
    /// # Errors
    ///
    /// Any missing resource, malformed descriptor, unavailable testbed list,
    /// closed input, or write failure ends the session; nothing is written
    /// in that case.
    pub fn create_testing_descriptor(&mut self, options: &CreateOptions) -> Result<Descriptor> {
        let tags = self.gather_tags(&options.infer_tags_from_nsd)?;

        self.enter(SessionState::ReadingIntent);
        debug!(config = %options.config_file.display(), "reading configuration file");
        let intent: IntendedTests = load_yaml(&options.config_file)?;
        let mut descriptor = Descriptor::load_template(&self.settings.template_path())?;
        let catalog_file = CatalogFile::load(&self.settings.catalog_path())?;

        self.enter(SessionState::CollectingMetadata);
        let metadata = self.collect_metadata()?;

        self.enter(SessionState::ResetSections);
        descriptor.reset_sections(options.clear_executions);
        descriptor.set_test_info(
            &metadata.netapp_id,
            &metadata.testbed.id,
            &metadata.description,
        );

        let catalog = self.catalog_for(&catalog_file, &metadata.testbed.id)?;
        for key in &intent.tests {
            if catalog.get(key).is_err() {
                warn!(test = %key, testbed = %catalog.testbed(), "intended test is not offered by the testbed");
            }
        }

        if self
            .prompt
            .confirm("\nDo you want to configure the testcases now?")?
        {
            self.enter(SessionState::ConfiguringTestcases);
            self.configure_testcases(&mut descriptor, &catalog, &intent.tests, &tags)?;
        }

        self.enter(SessionState::Serialize);
        debug!(output = %options.output_filename.display(), "creating the descriptor");
        descriptor.write(&options.output_filename)?;

        self.enter(SessionState::Done);
        info!(
            output = %options.output_filename.display(),
            testcases = descriptor.test_phases.setup.testcases.len(),
            "descriptor generated"
        );
        Ok(descriptor)
    }

    /// Infer connection points from the given descriptors, or ask whether
    /// to continue without any.
    fn gather_tags(&mut self, paths: &[PathBuf]) -> Result<InferredTags> {
        let paths = if paths.is_empty() {
            if self
                .prompt
                .confirm("Are you sure you want to continue without providing a NSD?")?
            {
                return Ok(InferredTags::default());
            }
            let answer = self
                .prompt
                .text("Enter the location of the descriptors, separated by a \",\": ")?;
            split_paths(&answer)
        } else {
            paths.to_vec()
        };

        self.enter(SessionState::Inferring);
        debug!(descriptors = ?paths, "inferring tags");
        infer_tags(&paths, &self.settings.connection_point_values_path())
    }

    fn collect_metadata(&mut self) -> Result<Metadata> {
        let name = self
            .prompt
            .text("What's the name of your network application? ")?;

        let testbeds = self.fetch_testbeds();
        if testbeds.is_empty() {
            return Err(DescriptorError::NoTestbeds);
        }
        self.prompt.say("\nAvailable testbeds:")?;
        for line in format_testbeds(&testbeds) {
            self.prompt.say(line)?;
        }
        let choice = self
            .prompt
            .choose("Which testbed do you want to run the tests on?", testbeds.len())?;
        let testbed = testbeds[choice - 1].clone();

        let description = self
            .prompt
            .text("Enter a description for the testing descriptor: ")?;

        Ok(Metadata {
            netapp_id: snake_case(&name),
            testbed,
            description,
        })
    }

    /// Remote failures degrade to an empty list.
    fn fetch_testbeds(&self) -> Vec<Testbed> {
        match self.directory.list_testbeds() {
            Ok(testbeds) => testbeds,
            Err(e) => {
                warn!(error = %e, "could not fetch testbeds");
                Vec::new()
            }
        }
    }

    /// Pick the local catalog section for a testbed, falling back to the
    /// remote directory when the catalog does not know the testbed.
    fn catalog_for(&self, file: &CatalogFile, testbed_id: &str) -> Result<Catalog> {
        match file.section(testbed_id) {
            Err(DescriptorError::UnknownTestbed(_)) => {
                info!(testbed = %testbed_id, "testbed not in local catalog, asking the CI/CD manager");
                match self.directory.list_tests(testbed_id) {
                    Ok(tests) if !tests.is_empty() => {
                        Ok(Catalog::from_definitions(testbed_id, tests))
                    }
                    Ok(_) => Err(DescriptorError::UnknownTestbed(testbed_id.to_owned())),
                    Err(e) => {
                        warn!(error = %e, testbed = %testbed_id, "could not fetch tests");
                        Err(e)
                    }
                }
            }
            other => other,
        }
    }

    /// Offer every intended test in catalog order; accepted tests get dense
    /// ids starting at 1 and are appended to the setup phase.
    fn configure_testcases(
        &mut self,
        descriptor: &mut Descriptor,
        catalog: &Catalog,
        intent: &[String],
        tags: &InferredTags,
    ) -> Result<()> {
        let mut next_id = 1;
        for test in catalog.select(intent) {
            self.prompt.say(format!("\n{}", format_test_details(test)))?;
            if !self
                .prompt
                .confirm(&format!("Do you want to configure the '{}' testcase?", test.id))?
            {
                debug!(test = %test.id, "testcase skipped");
                continue;
            }

            let testcase = build_testcase(next_id, test, tags, &mut self.prompt)?;
            descriptor.test_phases.setup.testcases.push(testcase);
            next_id += 1;
        }
        Ok(())
    }

    /// Browse the tests a testbed offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or input is closed.
    pub fn list_available_tests(&mut self, testbed: Option<&str>) -> Result<()> {
        let testbed = testbed
            .unwrap_or(self.settings.default_testbed.as_str())
            .to_owned();
        let file = CatalogFile::load(&self.settings.catalog_path())?;
        let catalog = self.catalog_for(&file, &testbed)?;
        if catalog.is_empty() {
            self.prompt
                .say(format!("\nTestbed {testbed} does not offer any tests."))?;
            return Ok(());
        }

        let keys: Vec<&str> = catalog.all().map(|(key, _)| key).collect();
        self.prompt
            .say("\nThe following tests can be injected on the testing descriptor:\n")?;
        for line in format_numbered(&keys) {
            self.prompt.say(line)?;
        }

        while self
            .prompt
            .confirm("Do you wish to see some information about a test?")?
        {
            let choice = self.prompt.choose("Choose the test:", keys.len())?;
            let test = catalog.get(keys[choice - 1])?;
            self.prompt.say(format!("\nThe chosen test was: {}", test.id))?;
            self.prompt.say(format!("\n{}", format_test_details(test)))?;
        }
        Ok(())
    }
}

/// Split a comma-separated list of paths, dropping blanks.
fn split_paths(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::TestDefinition;
    use crate::prompt::scripted;

    const CATALOG: &str = r#"
tests:
  testbed_itav:
    T1:
      test_type: t1
      name: Test One
      description: first
      test_variables:
        - variable_name: a
    T2:
      test_type: t2
      name: Test Two
      description: second
      test_variables: []
    T3:
      test_type: t3
      name: Test Three
      description: third
      test_variables:
        - variable_name: c
"#;

    const TEMPLATE: &str = r#"
test_info:
  netapp_id: netapp
  network_service_id: ns
  testbed_id: tb
  description: template
test_phases:
  setup:
    testcases: []
  execution: []
"#;

    struct StubDirectory {
        testbeds: Vec<Testbed>,
        tests: Vec<TestDefinition>,
    }

    impl TestbedDirectory for StubDirectory {
        fn list_testbeds(&self) -> Result<Vec<Testbed>> {
            Ok(self.testbeds.clone())
        }
        fn list_tests(&self, _testbed_id: &str) -> Result<Vec<TestDefinition>> {
            Ok(self.tests.clone())
        }
    }

    struct FailingDirectory;

    impl TestbedDirectory for FailingDirectory {
        fn list_testbeds(&self) -> Result<Vec<Testbed>> {
            Err(DescriptorError::Remote("connection refused".into()))
        }
        fn list_tests(&self, _testbed_id: &str) -> Result<Vec<TestDefinition>> {
            Err(DescriptorError::Remote("connection refused".into()))
        }
    }

    fn stub(testbed_id: &str) -> StubDirectory {
        StubDirectory {
            testbeds: vec![Testbed {
                id: testbed_id.into(),
                name: "Testbed".into(),
                description: None,
            }],
            tests: vec![],
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            std::fs::write(dir.path().join("test_information.yaml"), CATALOG).expect("catalog");
            std::fs::write(dir.path().join("testing-descriptor_nods.yaml"), TEMPLATE)
                .expect("template");
            std::fs::write(
                dir.path().join("connection_point_values.yaml"),
                "values:\n  - ipv4\n",
            )
            .expect("values");
            let settings = Settings {
                resources_dir: dir.path().to_path_buf(),
                ..Settings::default()
            };
            Self { dir, settings }
        }

        fn options(&self, intent: &str) -> CreateOptions {
            let config_file = self.dir.path().join("intent.yaml");
            std::fs::write(&config_file, intent).expect("intent");
            CreateOptions {
                config_file,
                output_filename: self.dir.path().join("out.yaml"),
                clear_executions: true,
                infer_tags_from_nsd: vec![],
            }
        }
    }

    fn run(
        fixture: &Fixture,
        directory: &dyn TestbedDirectory,
        options: &CreateOptions,
        answers: &[&str],
    ) -> (Result<Descriptor>, SessionState) {
        let mut assembler = Assembler::new(&fixture.settings, directory, scripted(answers));
        let result = assembler.create_testing_descriptor(options);
        (result, assembler.state())
    }

    #[test]
    fn ids_are_dense_over_accepted_tests() {
        let fixture = Fixture::new();
        let options = fixture.options("tests: [T3, T2, T1]\n");
        let answers = [
            "y",           // continue without NSD
            "My-NetApp",   // name
            "1",           // testbed
            "demo",        // description
            "y",           // configure testcases
            "n",           // T1 declined
            "y",           // T2 accepted (no variables)
            "y",           // T3 accepted
            "n",           // no manual override for T3
        ];
        let (result, state) = run(&fixture, &stub("testbed_itav"), &options, &answers);
        let descriptor = result.expect("session succeeds");
        assert_eq!(state, SessionState::Done);

        let testcases = &descriptor.test_phases.setup.testcases;
        let summary: Vec<(u32, &str)> = testcases
            .iter()
            .map(|t| (t.testcase_id, t.test_type.as_str()))
            .collect();
        assert_eq!(summary, vec![(1, "t2"), (2, "t3")]);
        assert_eq!(descriptor.test_info.netapp_id, "my_net_app");
        assert_eq!(descriptor.test_info.testbed_id, "testbed_itav");
        assert_eq!(descriptor.test_info.network_service_id, None);
        assert!(options.output_filename.exists());
    }

    #[test]
    fn declining_configuration_leaves_setup_empty() {
        let fixture = Fixture::new();
        let options = fixture.options("tests: [T1]\n");
        let answers = ["y", "app", "1", "", "n"];
        let (result, _) = run(&fixture, &stub("testbed_itav"), &options, &answers);
        let descriptor = result.expect("session succeeds");
        assert!(descriptor.test_phases.setup.testcases.is_empty());
        assert_eq!(descriptor.test_phases.execution.len(), 1);
    }

    #[test]
    fn missing_intent_file_is_fatal_and_writes_nothing() {
        let fixture = Fixture::new();
        let mut options = fixture.options("tests: []\n");
        options.config_file = fixture.dir.path().join("absent.yaml");
        let (result, state) = run(&fixture, &stub("testbed_itav"), &options, &["y"]);
        assert!(matches!(result, Err(DescriptorError::ConfigNotFound { .. })));
        assert_eq!(state, SessionState::ReadingIntent);
        assert!(!options.output_filename.exists());
    }

    #[test]
    fn unreachable_directory_means_no_testbeds() {
        let fixture = Fixture::new();
        let options = fixture.options("tests: [T1]\n");
        let (result, state) = run(&fixture, &FailingDirectory, &options, &["y", "app"]);
        assert!(matches!(result, Err(DescriptorError::NoTestbeds)));
        assert_eq!(state, SessionState::CollectingMetadata);
    }

    #[test]
    fn unknown_testbed_uses_remote_tests() {
        let fixture = Fixture::new();
        let options = fixture.options("tests: [remote_only]\n");
        let mut directory = stub("testbed_remote");
        directory.tests = vec![TestDefinition {
            id: "remote_only".into(),
            test_type: String::new(),
            name: "Remote".into(),
            description: "from the API".into(),
            test_variables: vec![],
        }];
        let answers = ["y", "app", "1", "d", "y", "y"];
        let (result, _) = run(&fixture, &directory, &options, &answers);
        let descriptor = result.expect("session succeeds");
        let testcases = &descriptor.test_phases.setup.testcases;
        assert_eq!(testcases.len(), 1);
        assert_eq!(testcases[0].test_type, "remote_only");
    }

    #[test]
    fn declining_to_skip_nsd_asks_for_paths() {
        let fixture = Fixture::new();
        let options = fixture.options("tests: []\n");
        let missing = fixture.dir.path().join("missing_nsd.yaml");
        let path_answer = format!(" {} , ", missing.display());
        let answers = ["n", path_answer.as_str()];
        let (result, state) = run(&fixture, &stub("testbed_itav"), &options, &answers);
        assert!(matches!(result, Err(DescriptorError::FileNotFound { .. })));
        assert_eq!(state, SessionState::Inferring);
    }

    #[test]
    fn missing_catalog_fails_before_metadata_prompts() {
        let fixture = Fixture::new();
        std::fs::remove_file(fixture.settings.catalog_path()).expect("remove catalog");
        let options = fixture.options("tests: [T1]\n");
        let catalog = stub("testbed_itav");
        let mut assembler = Assembler::new(&fixture.settings, &catalog, scripted(&["y"]));
        let err = assembler.create_testing_descriptor(&options).unwrap_err();
        assert!(matches!(err, DescriptorError::ConfigNotFound { ref path } if path.ends_with("test_information.yaml")));
        assert_eq!(assembler.state(), SessionState::ReadingIntent);
        let out = String::from_utf8(assembler.into_prompt().into_output()).expect("utf8");
        assert!(!out.contains("name of your network application"));
    }

    #[test]
    fn remote_test_fetch_failure_is_reported() {
        let fixture = Fixture::new();
        let mut assembler = Assembler::new(&fixture.settings, &FailingDirectory, scripted(&[]));
        let err = assembler
            .list_available_tests(Some("testbed_remote"))
            .unwrap_err();
        assert!(matches!(err, DescriptorError::Remote(_)), "got: {err}");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn list_available_tests_shows_details_until_declined() {
        let fixture = Fixture::new();
        let directory = stub("testbed_itav");
        let mut assembler =
            Assembler::new(&fixture.settings, &directory, scripted(&["y", "2", "n"]));
        assembler.list_available_tests(None).expect("listing");
        let out = String::from_utf8(assembler.into_prompt().into_output()).expect("utf8");
        assert!(out.contains("1 - T1"));
        assert!(out.contains("3 - T3"));
        assert!(out.contains("The chosen test was: T2"));
        assert!(out.contains("This test requires no parameters"));
    }

    #[test]
    fn split_paths_trims_and_drops_blanks() {
        assert_eq!(
            split_paths(" a.yaml, b.yaml ,,"),
            vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
        );
    }
}
