//! RISC-V compliance testsuite CLI.
//!
//! This binary provides a single entry point for all framework operations. It performs:
//! 1. **Run:** Execute the compliance suite against a model and report per-extension results.
//! 2. **Generate:** Produce a platform plugin (manifest + header environment) for a target.
//! 3. **Targets:** List the built-in targets and the headers they supply.
//! 4. **Check:** Validate a target's header set or a generated plugin directory.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvtest_core::common::{
    BaseIsa, Csr, Extension, MemoryRange, PrivilegeMode, TrapCause,
};
use rvtest_core::config::RunConfig;
use rvtest_core::environment::Environment;
use rvtest_core::plugin::{Plugin, PluginGenerator};
use rvtest_core::suite::SuiteRunner;
use rvtest_core::target;

#[derive(Parser, Debug)]
#[command(
    name = "rvtest",
    author,
    version,
    about = "RISC-V compliance testsuite runner",
    long_about = "Run the RISC-V compliance suite against a processor model, generate platform plugins, and validate target configuration headers.\n\nThe toolchain (riscv gcc and spike) is located under --toolchain or $RISCV/bin.\n\nExamples:\n  rvtest run -m ./my_model -p ./plugin -s compliance_tests -e env/spike\n  rvtest generate -t codasip-sdk -o ./plugin --isa rv32i --memory 0x400000,0x0,0x0 --extensions m,c\n  rvtest targets\n  rvtest check --target ri5cy-verilator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the compliance suite against a RISC-V model.
    Run {
        /// Path to the model executable implementing the plugin's interface.
        #[arg(short, long)]
        model: PathBuf,

        /// Plugin directory containing plugin.json and the environment.
        #[arg(short, long)]
        plugin: PathBuf,

        /// Directory containing the compliance test sources.
        #[arg(short, long)]
        suite: PathBuf,

        /// Reference environment with headers for golden-model compilation.
        #[arg(short, long)]
        environment: PathBuf,

        /// Working directory of the testsuite.
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Toolchain binary directory. By default $RISCV/bin is used.
        #[arg(long)]
        toolchain: Option<PathBuf>,
    },

    /// Generate a platform plugin for a built-in target.
    Generate(GenerateArgs),

    /// List built-in targets and the headers they supply.
    Targets,

    /// Validate a target's header set or a generated plugin directory.
    Check {
        /// Built-in target whose configuration headers are validated.
        #[arg(short, long)]
        target: Option<String>,

        /// Generated plugin directory to validate.
        #[arg(short, long, conflicts_with = "target")]
        plugin: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            model,
            plugin,
            suite,
            environment,
            work_dir,
            toolchain,
        } => cmd_run(model, plugin, suite, environment, work_dir, toolchain),
        Commands::Generate(args) => cmd_generate(args),
        Commands::Targets => cmd_targets(),
        Commands::Check { target, plugin } => cmd_check(target, plugin),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Runs the suite and prints the compliance summary.
///
/// Exits with code 1 when any test fails, so scripted callers can gate
/// on compliance directly.
fn cmd_run(
    model: PathBuf,
    plugin_dir: PathBuf,
    suite: PathBuf,
    environment: PathBuf,
    work_dir: Option<PathBuf>,
    toolchain: Option<PathBuf>,
) -> Result<(), rvtest_core::Error> {
    let mut config = RunConfig::default();
    if let Some(work_dir) = work_dir {
        config.work_dir = work_dir;
    }
    config.toolchain = toolchain;

    let plugin = Plugin::open(plugin_dir)?;
    let reference = Environment::open(environment)?;
    let runner = SuiteRunner::new(&plugin, model, reference, suite, config)?;

    println!("{}", runner.header());
    println!();

    let report = runner.run()?;

    println!();
    println!("{}", report.summary());

    if !report.is_compliant() {
        process::exit(1);
    }
    Ok(())
}

/// Flags of the `generate` subcommand.
#[derive(Args, Debug)]
struct GenerateArgs {
    /// Target the plugin is generated for (see `rvtest targets`).
    #[arg(short, long)]
    target: String,

    /// Output directory of the plugin.
    #[arg(short, long)]
    output: PathBuf,

    /// Base ISA of the platform (e.g. rv32i).
    #[arg(long)]
    isa: BaseIsa,

    /// Memory range as size,program_start,data_start.
    #[arg(long)]
    memory: MemoryRange,

    /// Standard extensions, comma separated (e.g. m,c).
    #[arg(long, value_delimiter = ',')]
    extensions: Vec<Extension>,

    /// Privilege modes beyond machine mode, comma separated.
    #[arg(long, value_delimiter = ',')]
    modes: Vec<PrivilegeMode>,

    /// Trap causes the platform recognises, comma separated.
    #[arg(long, value_delimiter = ',')]
    causes: Vec<TrapCause>,

    /// Implemented control and status registers, comma separated.
    #[arg(long, value_delimiter = ',')]
    csrs: Vec<Csr>,

    /// Whether misaligned memory access is supported.
    #[arg(long)]
    misaligned: Option<bool>,

    /// Whether interrupts are supported.
    #[arg(long)]
    interrupts: Option<bool>,

    /// Model display name used in reports.
    #[arg(long)]
    name: Option<String>,

    /// Reference environment to copy missing mandatory headers from.
    #[arg(short, long)]
    environment: Option<PathBuf>,
}

/// Generates a plugin directory from the command-line platform description.
fn cmd_generate(args: GenerateArgs) -> Result<(), rvtest_core::Error> {
    let target = target::find(&args.target)?;
    let mut generator = PluginGenerator::new(target, args.isa, args.memory)?;

    for extension in args.extensions {
        generator.extension(extension);
    }
    for mode in args.modes {
        generator.mode(mode);
    }
    for cause in args.causes {
        generator.cause(cause);
    }
    for csr in args.csrs {
        generator.csr(csr);
    }
    if let Some(supported) = args.misaligned {
        generator.misaligned(supported);
    }
    if let Some(supported) = args.interrupts {
        generator.interrupts(supported);
    }
    if let Some(name) = args.name {
        generator.model_name(name);
    }

    let reference = match args.environment {
        Some(path) => Some(Environment::open(path)?),
        None => None,
    };
    generator.generate(&args.output, reference.as_ref())
}

/// Prints the built-in target table.
fn cmd_targets() -> Result<(), rvtest_core::Error> {
    for target in target::builtin() {
        let headers: Vec<&str> = target.headers().map(|(name, _)| name).collect();
        let supplies = if headers.is_empty() {
            "reference environment only".to_string()
        } else {
            headers.join(", ")
        };
        println!("{:<16} {} [{}]", target.name(), target.description(), supplies);
    }
    Ok(())
}

/// Validates a built-in target's headers or a generated plugin directory.
///
/// Exits with code 1 when violations or missing headers are found.
fn cmd_check(
    target: Option<String>,
    plugin: Option<PathBuf>,
) -> Result<(), rvtest_core::Error> {
    match (target, plugin) {
        (Some(name), None) => check_target(&name),
        (None, Some(dir)) => check_plugin(dir),
        _ => {
            eprintln!("error: specify --target <name> or --plugin <dir>");
            eprintln!("  rvtest check --target codasip-sdk");
            eprintln!("  rvtest check --plugin ./plugin");
            process::exit(1);
        }
    }
}

fn check_target(name: &str) -> Result<(), rvtest_core::Error> {
    let target = target::find(name)?;
    let violations = target.validate()?;
    if violations.is_empty() {
        println!("{}: header set is valid", target.name());
        return Ok(());
    }
    for violation in &violations {
        println!("{}: {}", target.name(), violation);
    }
    process::exit(1);
}

fn check_plugin(dir: PathBuf) -> Result<(), rvtest_core::Error> {
    let plugin = Plugin::open(dir)?;
    let environment = plugin.environment()?;
    let missing = environment.missing_headers();
    if missing.is_empty() {
        println!(
            "{}: plugin for target '{}' is valid",
            plugin.root().display(),
            plugin.manifest().target
        );
        return Ok(());
    }
    for header in &missing {
        println!("missing mandatory header file {header}");
    }
    process::exit(1);
}
