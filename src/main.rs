use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tdgen::assembler::CreateOptions;
use tdgen::cli::commands;
use tdgen::config::Settings;

#[derive(Parser)]
#[command(
    name = "tdgen",
    about = "Assemble testing descriptors for network applications",
    version
)]
struct Cli {
    /// Print progress messages
    #[arg(long, global = true)]
    verbose: bool,

    /// Directory holding the test catalog, descriptor template and connection point values
    #[arg(long, global = true)]
    resources_dir: Option<PathBuf>,

    /// Base URL of the CI/CD manager API
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a testing descriptor from a file listing the intended tests
    CreateTestingDescriptor {
        /// File containing the names of the intended tests
        #[arg(long)]
        config_file: PathBuf,

        /// Output filename
        #[arg(long, default_value = "testing-descriptor.yaml")]
        output_filename: PathBuf,

        /// Replace existing executions with the default execution batch
        #[arg(long)]
        clear_executions: bool,

        /// Network service descriptor to infer tags from (repeatable)
        #[arg(long = "infer-tags-from-nsd")]
        infer_tags_from_nsd: Vec<PathBuf>,
    },

    /// List the tests a testbed offers and show their details
    ListAvailableTests {
        /// Testbed id (default: the configured default testbed)
        #[arg(long)]
        testbed: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tdgen=debug" } else { "tdgen=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    settings.verbose = cli.verbose;
    if let Some(dir) = cli.resources_dir {
        settings.resources_dir = dir;
    }
    if let Some(url) = cli.base_url {
        settings.base_url = url;
    }
    init_logging(settings.verbose);

    let result = match cli.command {
        Some(Commands::CreateTestingDescriptor {
            config_file,
            output_filename,
            clear_executions,
            infer_tags_from_nsd,
        }) => {
            let options = CreateOptions {
                config_file,
                output_filename,
                clear_executions,
                infer_tags_from_nsd,
            };
            commands::create_testing_descriptor(&settings, &options).map(|msg| println!("{msg}"))
        }
        Some(Commands::ListAvailableTests { testbed }) => {
            commands::list_available_tests(&settings, testbed.as_deref())
        }
        None => {
            // No subcommand: show help
            Cli::parse_from(["tdgen", "--help"]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
