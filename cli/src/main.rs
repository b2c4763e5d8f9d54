use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cmdkit_core::{CmdError, Command, Redirect, RunOptions};

mod config;

use config::{Catalog, CatalogLoader, ConfigError};

/// cmdkit - run external commands built from declarative templates
#[derive(Parser)]
#[command(name = "cmdkit", version, about)]
struct Cli {
    /// Path to the command catalog (YAML)
    #[arg(short = 'f', long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a raw command line
    Exec {
        /// Command line, split by POSIX quoting rules
        #[arg(short = 'c', long = "command")]
        line: String,

        /// Variable assignments
        #[arg(value_name = "NAME=VALUE")]
        vars: Vec<String>,

        #[command(flatten)]
        exec: ExecFlags,
    },

    /// Execute a named command from the catalog
    Run {
        /// Catalog entry name
        name: String,

        /// Variable assignments overlaying the catalog defaults
        #[arg(value_name = "NAME=VALUE")]
        vars: Vec<String>,

        #[command(flatten)]
        exec: ExecFlags,
    },

    /// List catalog commands
    List,

    /// Print the resolved argv without executing
    Show {
        /// Catalog entry name
        name: String,

        /// Variable assignments overlaying the catalog defaults
        #[arg(value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Emit the argv as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ExecFlags {
    /// Print the resolved command line before executing
    #[arg(long)]
    echo: bool,

    /// Resolve and validate redirects, but skip the spawn
    #[arg(long)]
    dry_run: bool,

    /// Redirect the command's stdin from a file
    #[arg(long, value_name = "PATH")]
    input: Option<String>,

    /// Redirect the command's stdout to a file
    #[arg(long, value_name = "PATH")]
    output: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec { line, vars, exec } => {
            let cmd = build_command(&line, &BTreeMap::new(), &vars)?;
            execute(&cmd, &exec, false)
        }
        Commands::Run { name, vars, exec } => {
            let catalog = load_catalog(cli.config.as_deref())?;
            let spec = catalog.get(&name)?;
            let cmd = build_command(&spec.command, &spec.variables, &vars)?;
            execute(&cmd, &exec, spec.echo)
        }
        Commands::List => {
            let catalog = load_catalog(cli.config.as_deref())?;
            for (name, spec) in &catalog.commands {
                println!("{name}\t{}", spec.command);
            }
            Ok(())
        }
        Commands::Show { name, vars, json } => {
            let catalog = load_catalog(cli.config.as_deref())?;
            let spec = catalog.get(&name)?;
            let cmd = build_command(&spec.command, &spec.variables, &vars)?;
            let argv = cmd.resolve_args()?;
            if json {
                println!("{}", serde_json::to_string(&argv)?);
            } else {
                println!("{}", argv.join(" "));
            }
            Ok(())
        }
    }
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

fn load_catalog(explicit: Option<&str>) -> Result<Catalog, ConfigError> {
    let loader = CatalogLoader::new();
    let loader = match explicit {
        Some(path) => loader.with_file(path),
        None => loader,
    };
    loader.load()
}

/// Build a command from a template line, catalog defaults, and `NAME=VALUE`
/// overlays (later assignment overwrites earlier).
fn build_command(
    line: &str,
    defaults: &BTreeMap<String, String>,
    assignments: &[String],
) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::new(line)?;
    for (name, value) in defaults {
        cmd.set_var(name, value.as_str())?;
    }
    for raw in assignments {
        let (name, value) = parse_assignment(raw)?;
        cmd.set_var(&name, value)?;
    }
    Ok(cmd)
}

fn parse_assignment(raw: &str) -> Result<(String, String), ConfigError> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| ConfigError::InvalidAssignment(raw.to_string()))
}

fn run_options(flags: &ExecFlags, echo_default: bool) -> RunOptions {
    let mut options = RunOptions::new()
        .echo(flags.echo || echo_default)
        .dry_run(flags.dry_run)
        .output(Redirect::Inherit);
    if let Some(ref path) = flags.input {
        options = options.input(Redirect::File(expand_path(path)));
    }
    if let Some(ref path) = flags.output {
        options = options.output(Redirect::File(expand_path(path)));
    }
    options
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn execute(
    cmd: &Command,
    flags: &ExecFlags,
    echo_default: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd.run(run_options(flags, echo_default)) {
        Ok(_) => Ok(()),
        // Mirror the child's exit code, like a shell would.
        Err(CmdError::NonZeroExit { command, code }) => {
            eprintln!("cmdkit: '{command}' exited with code {code}");
            std::process::exit(code);
        }
        Err(e) => Err(e.into()),
    }
}
